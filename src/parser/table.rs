//! Pipe-table row helpers.

use once_cell::sync::Lazy;
use regex::Regex;

const COLUMN_DELIMITER: char = '|';

static SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-{3,}:?$").unwrap());

/// Split a table row into trimmed cell strings.
///
/// One optional leading and one optional trailing delimiter are stripped.
/// Returns `None` when the line contains no delimiter at all.
pub fn split_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if !trimmed.contains(COLUMN_DELIMITER) {
        return None;
    }

    let core = trimmed.strip_prefix(COLUMN_DELIMITER).unwrap_or(trimmed);
    let core = core.strip_suffix(COLUMN_DELIMITER).unwrap_or(core);

    Some(
        core.split(COLUMN_DELIMITER)
            .map(|cell| cell.trim().to_string())
            .collect(),
    )
}

/// Check if a line is a header separator row (`|---|:---:|`).
pub fn is_separator(line: &str) -> bool {
    split_row(line).is_some_and(|cells| cells.iter().all(|c| SEPARATOR_CELL.is_match(c)))
}

/// Check if a line can belong to a table.
pub fn has_delimiter(line: &str) -> bool {
    line.contains(COLUMN_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_row() {
        assert_eq!(
            split_row("| a | b |"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            split_row("a | b"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            split_row("| a || c"),
            Some(vec!["a".to_string(), String::new(), "c".to_string()])
        );
        assert_eq!(split_row("no delimiter"), None);
    }

    #[test]
    fn test_separator() {
        assert!(is_separator("|---|---|"));
        assert!(is_separator("| :--- | ---: | :---: |"));
        assert!(is_separator("---|---"));
        assert!(!is_separator("|--|---|"));
        assert!(!is_separator("| a | b |"));
        assert!(!is_separator("---"));
    }
}
