use std::fmt;

/// Syntax tree of a boolean tag query.
///
/// The tree owns all of its nodes and holds no shared state, so a parsed query can be cached
/// and evaluated from several threads at once.
///
/// A flat chain like `a AND b AND … AND z` becomes a tree as deep as the chain is long, so
/// every whole-tree operation (drop, clone, comparison, formatting, evaluation) walks it with
/// an explicit stack instead of recursing.
pub enum Expr {
    /// Normalized search term: quotes stripped, lower-cased.
    Literal(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn literal(term: impl Into<String>) -> Expr {
        Expr::Literal(term.into())
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::Not(Box::new(operand))
    }

    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Placeholder produced where the parser runs out of input. Matches no real tag.
    pub fn empty() -> Expr {
        Expr::Literal(String::new())
    }

    /// Literal terms of the tree from left to right.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Literal(term) => terms.push(term.as_str()),
                Expr::Not(operand) => stack.push(&**operand),
                Expr::And(left, right) | Expr::Or(left, right) => {
                    stack.push(&**right);
                    stack.push(&**left);
                },
            }
        }
        terms
    }

    /// Moves the children out of `self` and onto `stack`, leaving empty literals behind.
    fn take_children(&mut self, stack: &mut Vec<Expr>) {
        match self {
            Expr::Literal(_) => {},
            Expr::Not(operand) => stack.push(std::mem::replace(operand.as_mut(), Expr::empty())),
            Expr::And(left, right) | Expr::Or(left, right) => {
                stack.push(std::mem::replace(left.as_mut(), Expr::empty()));
                stack.push(std::mem::replace(right.as_mut(), Expr::empty()));
            },
        }
    }

    /// Writes the tree in pre-order, using `syntax` for the operator nodes.
    fn write_tree(&self, f: &mut fmt::Formatter, syntax: &Syntax) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Text(text) => f.write_str(text)?,
                Piece::Node(Expr::Literal(term)) => (syntax.literal)(f, term)?,
                Piece::Node(Expr::Not(operand)) => {
                    f.write_str(syntax.not)?;
                    stack.push(Piece::Text(")"));
                    stack.push(Piece::Node(operand));
                },
                Piece::Node(Expr::And(left, right)) => {
                    f.write_str(syntax.and.0)?;
                    stack.extend([Piece::Text(")"), Piece::Node(right), Piece::Text(syntax.and.1), Piece::Node(left)]);
                },
                Piece::Node(Expr::Or(left, right)) => {
                    f.write_str(syntax.or.0)?;
                    stack.extend([Piece::Text(")"), Piece::Node(right), Piece::Text(syntax.or.1), Piece::Node(left)]);
                },
            }
        }
        Ok(())
    }
}

enum Piece<'a> {
    Node(&'a Expr),
    Text(&'static str),
}

/// How operator nodes are spelled: opening text, and (opening, separator) for binary nodes.
/// Every node is closed with ')'.
struct Syntax {
    literal: fn(&mut fmt::Formatter, &str) -> fmt::Result,
    not: &'static str,
    and: (&'static str, &'static str),
    or: (&'static str, &'static str),
}

fn quoted_literal(f: &mut fmt::Formatter, term: &str) -> fmt::Result {
    write!(f, "\"{}\"", term)
}

fn debug_literal(f: &mut fmt::Formatter, term: &str) -> fmt::Result {
    write!(f, "Literal({:?})", term)
}

const QUERY_SYNTAX: Syntax = Syntax {
    literal: quoted_literal,
    not: "(NOT ",
    and: ("(", " AND "),
    or: ("(", " OR "),
};

const DEBUG_SYNTAX: Syntax = Syntax {
    literal: debug_literal,
    not: "Not(",
    and: ("And(", ", "),
    or: ("Or(", ", "),
};

impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.take_children(&mut stack);
        }
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        enum Task<'a> { Visit(&'a Expr), Not, And, Or }

        fn pop(built: &mut Vec<Expr>) -> Expr {
            built.pop().unwrap_or_else(Expr::empty)
        }

        // post-order: children are built before the node that owns them
        let mut tasks = vec![Task::Visit(self)];
        let mut built: Vec<Expr> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(Expr::Literal(term)) => built.push(Expr::Literal(term.clone())),
                Task::Visit(Expr::Not(operand)) => tasks.extend([Task::Not, Task::Visit(operand)]),
                Task::Visit(Expr::And(left, right)) => tasks.extend([Task::And, Task::Visit(right), Task::Visit(left)]),
                Task::Visit(Expr::Or(left, right)) => tasks.extend([Task::Or, Task::Visit(right), Task::Visit(left)]),
                Task::Not => {
                    let operand = pop(&mut built);
                    built.push(Expr::not(operand));
                },
                Task::And => {
                    let right = pop(&mut built);
                    let left = pop(&mut built);
                    built.push(Expr::and(left, right));
                },
                Task::Or => {
                    let right = pop(&mut built);
                    let left = pop(&mut built);
                    built.push(Expr::or(left, right));
                },
            }
        }
        pop(&mut built)
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some(pair) = stack.pop() {
            match pair {
                (Expr::Literal(a), Expr::Literal(b)) => if a != b { return false },
                (Expr::Not(a), Expr::Not(b)) => stack.push((&**a, &**b)),
                (Expr::And(a_left, a_right), Expr::And(b_left, b_right))
                | (Expr::Or(a_left, a_right), Expr::Or(b_left, b_right)) => {
                    stack.push((&**a_right, &**b_right));
                    stack.push((&**a_left, &**b_left));
                },
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Expr {}

/// Same shape as a derived `Debug`, e.g. `And(Literal("a"), Not(Literal("b")))`.
impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_tree(f, &DEBUG_SYNTAX)
    }
}

/// Canonical form: every operator node is parenthesized and literals are quoted, e.g.
/// `("a" OR ("b" AND (NOT "c")))`. Literals are written without escaping, so the form parses
/// back to the same tree as long as no term contains a '"'.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_tree(f, &QUERY_SYNTAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cases = vec![
            (Expr::literal("rpg"), "\"rpg\""),
            (Expr::empty(), "\"\""),
            (Expr::not(Expr::literal("a")), "(NOT \"a\")"),
            (
                Expr::or(Expr::literal("a"), Expr::and(Expr::literal("b"), Expr::not(Expr::literal("c")))),
                "(\"a\" OR (\"b\" AND (NOT \"c\")))",
            ),
            (Expr::literal("open world"), "\"open world\""),
        ];

        for (expr, expected) in cases {
            assert_eq!(expr.to_string(), expected);
        }
    }

    #[test]
    fn test_terms_in_order() {
        let expr = Expr::and(
            Expr::or(Expr::literal("a"), Expr::not(Expr::literal("b"))),
            Expr::literal("c"),
        );
        assert_eq!(expr.terms(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_debug_matches_derived_shape() {
        let expr = Expr::and(Expr::literal("a"), Expr::or(Expr::not(Expr::literal("b")), Expr::empty()));
        assert_eq!(format!("{:?}", expr), "And(Literal(\"a\"), Or(Not(Literal(\"b\")), Literal(\"\")))");
    }

    #[test]
    fn test_literal_is_not_escaped() {
        assert_eq!(Expr::literal("a\\b").to_string(), "\"a\\b\"");
        assert_eq!(Expr::literal("abc\"").to_string(), "\"abc\"\"");
    }

    #[test]
    fn test_clone_and_eq() {
        let expr = Expr::or(Expr::and(Expr::literal("a"), Expr::not(Expr::literal("b"))), Expr::literal("c"));
        let copy = expr.clone();
        assert_eq!(copy, expr);
        assert_ne!(copy, Expr::or(Expr::and(Expr::literal("a"), Expr::literal("b")), Expr::literal("c")));
        assert_ne!(Expr::and(Expr::literal("a"), Expr::literal("b")), Expr::or(Expr::literal("a"), Expr::literal("b")));
    }

    fn deep_chain(len: usize) -> Expr {
        (1..len).fold(Expr::literal("a"), |left, _| Expr::and(left, Expr::literal("a")))
    }

    fn deep_negation(len: usize) -> Expr {
        (0..len).fold(Expr::literal("a"), |operand, _| Expr::not(operand))
    }

    #[test]
    fn test_deep_trees_do_not_recurse() {
        let chain = deep_chain(200_000);
        assert_eq!(chain.terms().len(), 200_000);
        assert_eq!(chain.clone(), chain);
        assert!(chain.to_string().starts_with("(((("));
        assert!(format!("{:?}", chain).starts_with("And(And("));

        let negation = deep_negation(200_000);
        assert_eq!(negation.terms(), vec!["a"]);
        assert_eq!(negation.clone(), negation);
        drop(negation);
        drop(chain);
    }
}
