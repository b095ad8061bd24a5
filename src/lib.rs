//! A small boolean query language for filtering items by their tags.
//!
//! A query such as `"open world" AND (rpg OR action) AND NOT puzzle` is parsed once into an
//! [`Expr`] and can then be evaluated against any number of tag lists:
//!
//! ```
//! use tag_filter::{evaluate_ast, parse_boolean_query};
//!
//! let query = parse_boolean_query("\"open world\" AND (rpg OR action) AND NOT puzzle");
//! assert!(evaluate_ast(&query, &["RPG", "Open World"]));
//! assert!(!evaluate_ast(&query, &["rpg", "open world", "puzzle"]));
//! ```
//!
//! Parsing never fails. Malformed queries still produce a tree; use
//! [`parse_with_diagnostics`] to learn where the parser had to recover.

pub mod error;
pub mod eval;
pub mod expr;
pub mod parser;
pub mod scanner;
pub mod token_type;

pub use error::Diagnostic;
pub use eval::{evaluate, TagSet};
pub use expr::Expr;

use parser::Parser;
use scanner::{tokenize, Token};

/// Parses a query into a syntax tree. Never fails.
pub fn parse_boolean_query(query: &str) -> Expr {
    parse_with_diagnostics(query).0
}

/// Parses a query and returns the recoveries the parser made along the way.
pub fn parse_with_diagnostics(query: &str) -> (Expr, Vec<Diagnostic>) {
    let tokens: Vec<Token> = tokenize(query).collect();
    let mut diagnostics = Vec::new();
    let expr = Parser::new(&tokens, &mut diagnostics).parse();
    (expr, diagnostics)
}

/// Evaluates a parsed query against a list of tags.
pub fn evaluate_ast<S: AsRef<str>>(expr: &Expr, tags: &[S]) -> bool {
    evaluate(expr, tags)
}
