use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::token_type::TokenType::{self, *};

/// The `Scanner` walks through a query string and yields its tokens one at a time.
///
/// Scanning never fails. Whatever cannot be read as a parenthesis, a keyword or a quoted
/// phrase is a plain `Term`.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>, // iterator over chars of source
    current: Option<(usize, char)>, // current char (byte index, char)
    offset: usize, // char offset of current char
}

impl<'a> Scanner<'a> {

    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current = chars.next();

        Scanner {
            source,
            chars,
            current,
            offset: 0,
        }
    }

    fn scan_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let (start_idx, c) = self.current?;
        let offset = self.offset;

        let variant = match c {
            '(' => { self.advance(); LeftParen },
            ')' => { self.advance(); RightParen },
            '"' => self.phrase(start_idx),
            _ => self.word(start_idx),
        };

        let token = Token {
            variant,
            lexeme: self.source[start_idx..self.byte_index()].to_string(),
            offset,
        };
        tracing::trace!(%token, offset, "scanned token");
        Some(token)
    }

    /// Consumes a quoted phrase including both quotes. A quote without a closing partner, or
    /// with nothing between the quotes, starts an ordinary word instead.
    fn phrase(&mut self, start_idx: usize) -> TokenType {
        match self.source[start_idx + 1..].find('"') {
            Some(len) if len > 0 => {
                let end_idx = start_idx + len + 2;
                while matches!(self.current, Some((idx, _)) if idx < end_idx) {
                    self.advance();
                }
                Term
            },
            _ => self.word(start_idx),
        }
    }

    /// Consumes a maximal run of non-delimiter chars and checks it against the keywords.
    fn word(&mut self, start_idx: usize) -> TokenType {
        while matches!(self.peek(), Some(c) if !Self::is_delimiter(c)) {
            self.advance();
        }

        TokenType::keyword(&self.source[start_idx..self.byte_index()]).unwrap_or(Term)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_delimiter(c: char) -> bool {
        c.is_whitespace() || c == '(' || c == ')'
    }

    /// Byte index of the current char, or the source length at the end.
    fn byte_index(&self) -> usize {
        self.current.map_or(self.source.len(), |(idx, _)| idx)
    }

    /// Return current char and advance to next.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.current = self.chars.next();
            self.offset += 1;
        }
        c
    }

    /// Return current char without advancing.
    fn peek(&self) -> Option<char> {
        self.current.map(|(_, c)| c)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.scan_token()
    }
}

impl FusedIterator for Scanner<'_> {}

/// Splits `source` into tokens. The returned scanner is lazy.
pub fn tokenize(source: &str) -> Scanner<'_> {
    Scanner::new(source)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub variant: TokenType,
    pub lexeme: String, // raw text, quotes included
    pub offset: usize, // char offset into the query
}

impl Token {
    /// Char range covered by the token.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.lexeme.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.variant, self.lexeme)
    }
}
