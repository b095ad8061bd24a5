use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;

use tag_filter::error::{self, Diagnostic};
use tag_filter::{parse_with_diagnostics, Expr, TagSet};

mod cli;
mod logging;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("query rejected, the parser had to recover {0} time(s)")]
    Strict(usize),
}

impl CliError {
    fn status(&self) -> u8 {
        match self {
            CliError::Io(_) => 1,
            CliError::Strict(_) => 2,
        }
    }
}


fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::init_logging(args.log_level.as_deref());

    match run_cli(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tag-filter: {}", e);
            ExitCode::from(e.status())
        },
    }
}

/// Parses `source` and, if `report` is set, prints the recoveries the parser made.
pub fn run(source: &str, report: bool) -> Result<(Expr, Vec<Diagnostic>), CliError> {
    let (expr, diagnostics) = parse_with_diagnostics(source);

    if report { error::print_diagnostics(source, &diagnostics)?; }

    Ok((expr, diagnostics))
}

fn run_cli(args: &cli::Args) -> Result<(), CliError> {
    let (expr, diagnostics) = run(&args.query, !args.quiet)?;

    if args.strict && !diagnostics.is_empty() {
        return Err(CliError::Strict(diagnostics.len()))
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.ast { writeln!(out, "{}", expr)?; }

    if args.tags.is_empty() {
        filter_lines(&expr, io::stdin().lock(), &mut out)?;
    } else {
        for tags in &args.tags {
            let tags = TagSet::new(cli::parse_tags(tags));
            writeln!(out, "{}", expr.matches(&tags))?;
        }
    }
    Ok(())
}

/// Copies the item lines of `input` whose tags match `expr` to `output`. Returns the number
/// of matching items.
fn filter_lines<R: BufRead, W: Write>(expr: &Expr, input: R, output: &mut W) -> Result<usize, CliError> {
    let mut matched = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue
        }

        if expr.matches(&TagSet::new(cli::parse_item(&line))) {
            writeln!(output, "{}", line)?;
            matched += 1;
        }
    }

    tracing::debug!(matched, "filtered items");
    Ok(matched)
}
