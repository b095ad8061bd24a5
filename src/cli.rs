use clap::Parser;

/// Filter items by a boolean tag query.
///
/// Without --tags, items are read from stdin, one per line, as 'name: tag1, tag2' or just
/// 'tag1, tag2'. Matching lines are printed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Query, e.g. '"open world" AND (rpg OR action) AND NOT puzzle'
    pub query: String,

    /// Comma-separated tags to test the query against. Repeat for more tag lists.
    #[clap(short, long)]
    pub tags: Vec<String>,

    /// Print the parsed query first
    #[clap(long, default_value = "false")]
    pub ast: bool,

    /// Reject queries the parser had to recover from
    #[clap(long, default_value = "false")]
    pub strict: bool,

    /// Don't report recoveries
    #[clap(short, long, default_value = "false")]
    pub quiet: bool,

    /// Tracing filter, e.g. 'debug' or 'tag_filter=trace'. Falls back to RUST_LOG.
    #[clap(long)]
    pub log_level: Option<String>,
}

/// Splits a comma-separated tag list. Surrounding whitespace is trimmed, empty entries dropped.
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags of an item line. Everything up to the first ':' is the item's name.
pub fn parse_item(line: &str) -> Vec<String> {
    match line.split_once(':') {
        Some((_, tags)) => parse_tags(tags),
        None => parse_tags(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        let cases = vec![
            ("rpg", vec!["rpg"]),
            ("rpg, Open World ,co-op", vec!["rpg", "Open World", "co-op"]),
            (" , ,", vec![]),
            ("", vec![]),
        ];

        for (tags, expected) in cases {
            assert_eq!(parse_tags(tags), expected, "Wrong tags for {:?}", tags);
        }
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("Skyrim: rpg, open world"), vec!["rpg", "open world"]);
        assert_eq!(parse_item("rpg, action"), vec!["rpg", "action"]);
        assert_eq!(parse_item("Portal:"), Vec::<String>::new());
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["tag-filter", "a AND b", "-t", "a,b", "--tags", "c", "--strict"])
            .expect("valid arguments");
        assert_eq!(args.query, "a AND b");
        assert_eq!(args.tags, vec!["a,b", "c"]);
        assert!(args.strict);
        assert!(!args.ast);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_query_is_required() {
        assert!(Args::try_parse_from(["tag-filter"]).is_err());
    }
}
