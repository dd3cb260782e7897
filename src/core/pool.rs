//! Topic pool loading.
//!
//! The topic pool is a plain text file with one topic per line. Lines are
//! trimmed and blank lines are dropped, so the file can be hand-edited
//! freely while the bot is running.

use crate::errors::{Error, Result};
use std::path::Path;

/// Parses topic file contents into the list of topics.
///
/// Each line is trimmed; lines that are empty after trimming are skipped.
/// Duplicate lines are kept as-is, the file is the source of truth.
#[must_use]
pub fn parse_topics(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Loads the topic pool from a file.
///
/// # Errors
/// Returns [`Error::TopicSource`] if the file cannot be read.
pub fn load_topics<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path_ref = path.as_ref();
    let contents = std::fs::read_to_string(path_ref).map_err(|e| {
        Error::TopicSource(format!("Failed to read topic file {path_ref:?}: {e}"))
    })?;
    Ok(parse_topics(&contents))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::write_topics;

    #[test]
    fn test_parse_topics_trims_and_drops_blanks() {
        let contents = "  first topic  \n\nsecond topic\n   \n\tthird topic\t\n";
        let topics = parse_topics(contents);
        assert_eq!(topics, vec!["first topic", "second topic", "third topic"]);
    }

    #[test]
    fn test_parse_topics_empty_input() {
        assert!(parse_topics("").is_empty());
        assert!(parse_topics("\n\n   \n").is_empty());
    }

    #[test]
    fn test_parse_topics_keeps_duplicates() {
        let topics = parse_topics("same\nsame\n");
        assert_eq!(topics, vec!["same", "same"]);
    }

    #[test]
    fn test_load_topics_reads_file() -> crate::errors::Result<()> {
        let (_dir, path) = write_topics(&["alpha", "", "  beta  "])?;
        let topics = load_topics(&path)?;
        assert_eq!(topics, vec!["alpha", "beta"]);
        Ok(())
    }

    #[test]
    fn test_load_topics_missing_file_is_error() {
        let result = load_topics("definitely/not/a/real/topics.txt");
        assert!(matches!(result, Err(Error::TopicSource(_))));
    }
}
