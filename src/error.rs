use ariadne::{self, Label, Report, ReportKind, Source};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::ops::Range;

/// A place where the parser recovered from malformed input.
///
/// Parsing never fails. A diagnostic records what the parser assumed so that a front end can
/// point the user at the typo. Spans are char ranges into the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// '(' without a matching ')'. The group is closed at the end of its expression.
    UnclosedGroup { span: Range<usize> },
    /// Operator, '(' or NOT with nothing after it. The operand becomes an empty literal.
    MissingOperand { span: Range<usize> },
    /// ')' where an operand was expected. It is read as the literal ")".
    StrayClosingParen { span: Range<usize> },
    /// AND or OR where an operand was expected. It is read as a term.
    MisplacedOperator { span: Range<usize> },
    /// '(' or NOT nested deeper than the parser descends. It is read as a term.
    TooDeep { span: Range<usize> },
    /// Tokens after a complete expression. They are ignored.
    TrailingInput { span: Range<usize> },
    /// Term that opens a quote but never closes it. It is matched as written.
    UnterminatedQuote { span: Range<usize> },
}

impl Diagnostic {
    pub fn span(&self) -> Range<usize> {
        match self {
            Diagnostic::UnclosedGroup { span }
            | Diagnostic::MissingOperand { span }
            | Diagnostic::StrayClosingParen { span }
            | Diagnostic::MisplacedOperator { span }
            | Diagnostic::TooDeep { span }
            | Diagnostic::TrailingInput { span }
            | Diagnostic::UnterminatedQuote { span } => span.clone(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Diagnostic::UnclosedGroup { .. } => "'(' is never closed",
            Diagnostic::MissingOperand { .. } => "Expected a term after this",
            Diagnostic::StrayClosingParen { .. } => "Unmatched ')' is read as a term",
            Diagnostic::MisplacedOperator { .. } => "Operator where a term was expected is read as a term",
            Diagnostic::TooDeep { .. } => "Nested too deeply, read as a term",
            Diagnostic::TrailingInput { .. } => "Ignored, expected AND or OR before this",
            Diagnostic::UnterminatedQuote { .. } => "Quote is never closed",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} (column {})", self.message(), self.span().start + 1)
    }
}


/// Renders diagnostics as a warning report on stderr.
pub fn print_diagnostics(source: &str, diagnostics: &[Diagnostic]) -> io::Result<()> {
    let source_name = "query";
    let labels = format_diagnostics(diagnostics, source_name);

    if labels.is_empty() {
        return Ok(())
    }

    Report::build(ReportKind::Warning, (source_name, 0..0))
        .with_message("Query was read leniently")
        .with_labels(labels)
        .finish()
        .eprint((source_name, Source::from(source)))
}

/// Converts diagnostics into `ariadne::Label`s, one per span to declutter output.
fn format_diagnostics<'a>(diagnostics: &[Diagnostic], source_name: &'a str) -> Vec<Label<(&'a str, Range<usize>)>> {
    let mut labels = Vec::new();
    let mut reported = HashSet::<Range<usize>>::new();

    for diagnostic in diagnostics {
        let span = diagnostic.span();
        if reported.insert(span.clone()) {
            labels.push(Label::new((source_name, span)).with_message(diagnostic.message()));
        }
    }
    labels
}
