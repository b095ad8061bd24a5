//! A recursive descent parser for boolean tag queries.
//!
//! Grammar of query syntax:
//!
//! expr   -> term ( OR term )*
//! term   -> factor ( AND factor )*
//! factor -> "(" expr ")" | NOT factor | TERM
//!
//! Examples: "rpg", "action AND NOT puzzle", "(\"open world\" OR sandbox) AND coop"
//!
//! The parser is lenient. Malformed input still yields a tree, and every recovery is recorded
//! as a `Diagnostic`.

use crate::error::Diagnostic;
use crate::expr::Expr;
use crate::scanner::Token;
use crate::token_type::TokenType::{self, *};

/// Deepest nesting of groups and negations the parser descends into. Each level costs a few
/// stack frames, so the cap keeps hostile input like 5000 '(' from overflowing the stack.
pub const MAX_DEPTH: usize = 128;

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    depth: usize, // open groups and negations around the current factor
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Parser<'a> {

    pub fn new(tokens: &'a [Token], diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Parser {
            tokens,
            current: 0,
            depth: 0,
            diagnostics,
        }
    }

    /// Parses all tokens into a syntax tree. Encountered recoveries are stored in
    /// `self.diagnostics`.
    pub fn parse(&mut self) -> Expr {
        let expr = self.expr();

        // Case: complete expression followed by more tokens. Ex.: 'a b', 'a ) b'
        if let Some(token) = self.peek() {
            let end = self.tokens.last().map_or(token.offset, |last| last.span().end);
            self.report(Diagnostic::TrailingInput { span: token.offset..end });
        }

        tracing::debug!(tokens = self.tokens.len(), diagnostics = self.diagnostics.len(), %expr, "parsed query");
        expr
    }

    /// Matches production: expr -> term ( OR term )*
    fn expr(&mut self) -> Expr {
        let mut left = self.term();
        while self.match_token(Or) {
            let right = self.term();
            left = Expr::or(left, right);
        }
        left
    }

    /// Matches production: term -> factor ( AND factor )*
    fn term(&mut self) -> Expr {
        let mut left = self.factor();
        while self.match_token(And) {
            let right = self.factor();
            left = Expr::and(left, right);
        }
        left
    }

    /// Matches production: factor -> "(" expr ")" | NOT factor | TERM
    fn factor(&mut self) -> Expr {
        let Some(token) = self.advance() else {
            return self.missing_operand();
        };

        match token.variant {
            LeftParen | Not if self.depth >= MAX_DEPTH => {
                self.report(Diagnostic::TooDeep { span: token.span() });
                self.literal(token)
            },
            LeftParen => {
                self.depth += 1;
                let expr = self.expr();
                self.depth -= 1;
                if !self.match_token(RightParen) {
                    self.report(Diagnostic::UnclosedGroup { span: token.span() });
                }
                expr
            },
            Not => {
                self.depth += 1;
                let operand = self.factor();
                self.depth -= 1;
                Expr::not(operand)
            },
            RightParen => {
                self.report(Diagnostic::StrayClosingParen { span: token.span() });
                self.literal(token)
            },
            And | Or => {
                self.report(Diagnostic::MisplacedOperator { span: token.span() });
                self.literal(token)
            },
            Term => self.literal(token),
        }
    }

    /// Out of tokens where an operand was expected. An empty query is not worth a diagnostic.
    fn missing_operand(&mut self) -> Expr {
        if let Some(previous) = self.previous() {
            self.report(Diagnostic::MissingOperand { span: previous.span() });
        }
        Expr::empty()
    }

    fn literal(&mut self, token: &Token) -> Expr {
        let lexeme = token.lexeme.as_str();
        if lexeme.strip_prefix('"').is_some_and(|rest| !rest.contains('"')) {
            self.report(Diagnostic::UnterminatedQuote { span: token.span() });
        }
        Expr::Literal(normalize(lexeme))
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            return true
        }
        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        matches!(self.peek(), Some(token) if token.variant == token_type)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.current)?;
        self.current += 1;
        Some(token)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.current)
    }

    fn previous(&self) -> Option<&'a Token> {
        self.current.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "recovered from malformed query");
        self.diagnostics.push(diagnostic);
    }
}

/// Turns a term lexeme into a search term: one pair of enclosing quotes is stripped and the
/// rest is lower-cased.
pub fn normalize(lexeme: &str) -> String {
    lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(lexeme)
        .to_lowercase()
}
