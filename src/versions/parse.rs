//! The `key value` line format shared by local and remote version files.

use std::collections::BTreeMap;

use crate::error::{CiaoError, Result};

/// Package name -> version string.
pub type VersionMap = BTreeMap<String, String>;

/// Parse `key value` lines into a [`VersionMap`].
///
/// Blank lines are skipped. The key is everything before the first space
/// and the value is the remainder, so values may contain spaces.
///
/// # Errors
///
/// Returns `Parse` for a non-blank line without a space and
/// `DuplicateKey` when a key repeats.
///
/// # Example
///
/// ```
/// use ciao_contrib::versions::parse_version_lines;
///
/// let map = parse_version_lines("ciao 4.16.0 Wednesday, December 13, 2023\n").unwrap();
/// assert_eq!(map["ciao"], "4.16.0 Wednesday, December 13, 2023");
/// ```
pub fn parse_version_lines(text: &str) -> Result<VersionMap> {
    let mut out = VersionMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(' ').ok_or_else(|| CiaoError::Parse {
            message: format!("Unable to parse line: '{}'", line),
        })?;

        if out.contains_key(key) {
            return Err(CiaoError::DuplicateKey {
                key: key.to_string(),
            });
        }
        out.insert(key.to_string(), value.to_string());
    }

    Ok(out)
}

/// Render a [`VersionMap`] back into `key value` lines.
pub fn format_version_lines(map: &VersionMap) -> String {
    map.iter()
        .map(|(k, v)| format!("{} {}\n", k, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_space_only() {
        let map = parse_version_lines("tools 4.16.1 Monday, March 4, 2024").unwrap();
        assert_eq!(map["tools"], "4.16.1 Monday, March 4, 2024");
    }

    #[test]
    fn skips_blank_and_whitespace_lines() {
        let map = parse_version_lines("\n  \nciao 4.16\n\n").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["ciao"], "4.16");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let map = parse_version_lines("   sherpa 4.16.0   \r\n").unwrap();
        assert_eq!(map["sherpa"], "4.16.0");
    }

    #[test]
    fn line_without_space_is_parse_error() {
        let err = parse_version_lines("ciao 4.16\nbroken\n").unwrap_err();
        assert!(matches!(err, CiaoError::Parse { .. }));
        assert_eq!(err.to_string(), "Unable to parse line: 'broken'");
    }

    #[test]
    fn duplicate_key_fails_in_either_order() {
        for text in ["a 1\nb 2\na 3\n", "a 3\na 1\n"] {
            let err = parse_version_lines(text).unwrap_err();
            assert!(matches!(err, CiaoError::DuplicateKey { ref key } if key == "a"));
        }
    }

    #[test]
    fn empty_input_is_empty_map() {
        assert!(parse_version_lines("").unwrap().is_empty());
    }

    #[test]
    fn format_then_parse_round_trips() {
        let mut map = VersionMap::new();
        map.insert("ciao".into(), "4.16.0 Wednesday, December 13, 2023".into());
        map.insert("contrib".into(), "4.16.1".into());
        map.insert("caldb".into(), "4.11.0 with spaces inside".into());

        let text = format_version_lines(&map);
        assert_eq!(parse_version_lines(&text).unwrap(), map);
    }
}
