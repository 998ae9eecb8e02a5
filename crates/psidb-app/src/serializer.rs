//! Wire encoding of validated form state
//!
//! Delimiters are not escaped: a key, value or argument containing `=` or
//! `;` is passed through as is and will be split by the backend.

use psidb_core::{KeyValuePair, PathEntry};

/// Separates pairs in the metadata string and arguments in the argument string
pub const ITEM_DELIMITER: char = ';';

/// Separates key and value inside one metadata pair
pub const PAIR_DELIMITER: char = '=';

/// Raw path strings, order preserved
pub fn paths(entries: &[PathEntry]) -> Vec<String> {
    entries.iter().map(|e| e.path.clone()).collect()
}

/// Argument text of each entry joined with `;`, aligned with [`paths`]
///
/// Entries without an argument contribute an empty segment, so two scripts
/// where only the first has `-x` encode as `-x;`.
pub fn script_args(entries: &[PathEntry]) -> String {
    join(entries.iter().map(PathEntry::argument_text))
}

/// Metadata pairs as `key=value` joined with `;`; no pairs is the empty string
pub fn metadata(pairs: &[KeyValuePair]) -> String {
    join(
        pairs
            .iter()
            .map(|p| format!("{}{}{}", p.key, PAIR_DELIMITER, p.value)),
    )
}

fn join<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(ITEM_DELIMITER);
        }
        out.push_str(item.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_encoding() {
        let pairs = vec![KeyValuePair::new("a", "1"), KeyValuePair::new("b", "2")];
        assert_eq!(metadata(&pairs), "a=1;b=2");
        assert_eq!(metadata(&[]), "");
    }

    #[test]
    fn test_metadata_keeps_partial_pairs() {
        let pairs = vec![KeyValuePair::new("k", ""), KeyValuePair::new("", "v")];
        assert_eq!(metadata(&pairs), "k=;=v");
    }

    #[test]
    fn test_metadata_delimiters_not_escaped() {
        let pairs = vec![KeyValuePair::new("note", "a;b=c")];
        assert_eq!(metadata(&pairs), "note=a;b=c");
    }

    #[test]
    fn test_script_args_aligned_with_paths() {
        let entries = vec![
            PathEntry::new(0, "a.py").with_argument("-x"),
            PathEntry::new(2, "b.py"),
            PathEntry::new(5, "c.py").with_argument("--fast"),
        ];

        assert_eq!(paths(&entries), vec!["a.py", "b.py", "c.py"]);
        assert_eq!(script_args(&entries), "-x;;--fast");
    }

    #[test]
    fn test_script_args_single_and_empty() {
        assert_eq!(script_args(&[PathEntry::new(0, "a.py")]), "");
        assert_eq!(script_args(&[]), "");
        assert_eq!(
            script_args(&[
                PathEntry::new(0, "a.py").with_argument("-x"),
                PathEntry::new(1, "b.py")
            ]),
            "-x;"
        );
    }
}
