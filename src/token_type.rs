#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TokenType {
    LeftParen, RightParen, // ()
    And, Or, Not,
    Term, // bare word or quoted phrase
}

/// Reserved words of the query language, matched ignoring ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Keyword {
    And,
    Or,
    Not,
}

impl From<Keyword> for TokenType {
    fn from(keyword: Keyword) -> Self {
        match keyword {
            Keyword::And => TokenType::And,
            Keyword::Or => TokenType::Or,
            Keyword::Not => TokenType::Not,
        }
    }
}

impl TokenType {
    /// Maps a whole word to its keyword token, if it is one.
    pub fn keyword(word: &str) -> Option<TokenType> {
        word.parse::<Keyword>().ok().map(TokenType::from)
    }
}
