use std::collections::HashSet;

use crate::expr::Expr;

/// Tags of one item, case-folded once on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: HashSet<String>,
}

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagSet {
            tags: tags.into_iter().map(|tag| tag.as_ref().to_lowercase()).collect(),
        }
    }

    /// `term` must already be lower-cased, as every parsed literal is.
    pub fn contains(&self, term: &str) -> bool {
        self.tags.contains(term)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(tags: I) -> Self {
        TagSet::new(tags)
    }
}

/// Work left on the way back up from a node.
enum Pending<'a> {
    Negate,
    And(&'a Expr), // right side, evaluated only if the left side holds
    Or(&'a Expr),  // right side, evaluated only if the left side fails
}

impl Expr {
    /// Evaluates the tree against a tag set. `And` and `Or` look at the left side first and
    /// skip the right side when the left side decides the result. Runs on an explicit stack,
    /// so long chains don't grow the call stack.
    pub fn matches(&self, tags: &TagSet) -> bool {
        let mut pending: Vec<Pending> = Vec::new();
        let mut expr = self;

        loop {
            // Descend along left edges to a literal.
            let mut value = loop {
                match expr {
                    Expr::Literal(term) => break tags.contains(term),
                    Expr::Not(operand) => {
                        pending.push(Pending::Negate);
                        expr = &**operand;
                    },
                    Expr::And(left, right) => {
                        pending.push(Pending::And(right));
                        expr = &**left;
                    },
                    Expr::Or(left, right) => {
                        pending.push(Pending::Or(right));
                        expr = &**left;
                    },
                }
            };

            // Fold the value upwards until a right side needs evaluating.
            loop {
                match pending.pop() {
                    None => return value,
                    Some(Pending::Negate) => value = !value,
                    Some(Pending::And(right)) if value => {
                        expr = right;
                        break
                    },
                    Some(Pending::Or(right)) if !value => {
                        expr = right;
                        break
                    },
                    Some(Pending::And(_) | Pending::Or(_)) => {},
                }
            }
        }
    }
}

/// Evaluates `expr` against a list of tags. Case and duplicates in `tags` don't matter.
pub fn evaluate<S: AsRef<str>>(expr: &Expr, tags: &[S]) -> bool {
    expr.matches(&TagSet::new(tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(term: &str) -> Expr {
        Expr::literal(term)
    }

    #[test]
    fn test_tag_set_folds_case() {
        let tags = TagSet::new(["RPG", "rpg", "Open World"]);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("rpg"));
        assert!(tags.contains("open world"));
        assert!(!tags.contains("RPG"));
        assert!(!tags.contains("open"));
    }

    #[test]
    fn test_evaluate() {
        let expr = Expr::or(lit("a"), Expr::and(lit("b"), Expr::not(lit("c"))));
        let cases = vec![
            (vec!["a"], true),
            (vec!["A", "c"], true),
            (vec!["b"], true),
            (vec!["b", "c"], false),
            (vec!["c"], false),
            (vec![], false),
        ];

        for (tags, expected) in cases {
            assert_eq!(evaluate(&expr, &tags), expected, "Wrong result for {:?}", tags);
        }
    }

    #[test]
    fn test_empty_literal() {
        assert!(!evaluate(&Expr::empty(), &["a", "b"]));
        assert!(!evaluate::<&str>(&Expr::empty(), &[]));
        assert!(evaluate(&Expr::empty(), &[""]));
        assert!(evaluate(&Expr::not(Expr::empty()), &["a"]));
    }

    #[test]
    fn test_short_circuit_keeps_pending_negation() {
        let cases = vec![
            (Expr::not(Expr::and(lit("a"), lit("b"))), vec!["b"], true),
            (Expr::not(Expr::and(lit("a"), lit("b"))), vec!["a", "b"], false),
            (Expr::not(Expr::or(lit("a"), lit("b"))), vec!["a"], false),
            (Expr::and(Expr::or(lit("a"), lit("b")), Expr::not(lit("c"))), vec!["b"], true),
            (Expr::or(Expr::and(lit("a"), lit("b")), Expr::not(lit("c"))), vec!["a"], true),
            (Expr::or(Expr::and(lit("a"), lit("b")), Expr::not(lit("c"))), vec!["a", "c"], false),
            (Expr::not(Expr::not(lit("a"))), vec!["a"], true),
        ];

        for (expr, tags, expected) in cases {
            assert_eq!(evaluate(&expr, &tags), expected, "Wrong result for {} with {:?}", expr, tags);
        }
    }

    #[test]
    fn test_long_chains() {
        let chain = (1..100_000).fold(lit("a"), |left, _| Expr::and(left, lit("a")));
        assert!(evaluate(&chain, &["a"]));
        assert!(!evaluate(&chain, &["b"]));

        let chain = (1..100_000).fold(lit("a"), |left, _| Expr::or(left, lit("b")));
        assert!(evaluate(&chain, &["b"]));
        assert!(!evaluate(&chain, &["c"]));

        let right_leaning = (1..100_000).fold(lit("a"), |right, _| Expr::and(lit("a"), right));
        assert!(evaluate(&right_leaning, &["A"]));

        let negation = (0..100_001).fold(lit("a"), |operand, _| Expr::not(operand));
        assert!(evaluate(&negation, &["b"]));
        assert!(!evaluate(&negation, &["a"]));
    }

    #[test]
    fn test_collect_tag_set() {
        let tags: TagSet = vec!["Puzzle".to_string(), "Co-op".to_string()].into_iter().collect();
        assert!(Expr::and(lit("puzzle"), lit("co-op")).matches(&tags));
        assert!(TagSet::default().is_empty());
    }
}
