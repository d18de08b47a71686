//! Google News topic name resolution.
//!
//! Friendly section names ("technology", "world", ...) map to the opaque
//! hashed identifiers used in `news.google.com/rss/topics/<id>` URLs.
//! Anything not in the table is assumed to already be such an identifier.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopicError {
    #[error("Topic not specified")]
    Empty,
}

/// Known section names and their hashed topic identifiers.
static TOPICS: &[(&str, &str)] = &[
    ("top_stories", "CAAqIggKIhxDQkFTRHdvSkwyMHZNREZpYjJvU0FtVnVLQUFQAQ"),
    ("world", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRVXlnQVAB"),
    ("nation", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRVkNnQVAB"),
    ("business", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRV1dnQVAB"),
    ("technology", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRV2dnQVAB"),
    ("entertainment", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRV3FnQVAB"),
    ("sports", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRV2tnQVAB"),
    ("science", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRVmdnQVAB"),
    ("health", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRVmtnQVAB"),
    // Aliases
    ("tech", "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRV2dnQVAB"),
];

/// Resolves a friendly topic name or passes an opaque topic id through.
///
/// Lookup is case- and whitespace-insensitive. On a miss the trimmed input
/// is returned with its original case, since hashed ids are case-sensitive.
/// No attempt is made to check that an unknown value is a well-formed id.
///
/// # Errors
///
/// Returns [`TopicError::Empty`] for an empty or whitespace-only value.
pub fn resolve(name_or_id: &str) -> Result<String, TopicError> {
    let trimmed = name_or_id.trim();
    if trimmed.is_empty() {
        return Err(TopicError::Empty);
    }

    let key = trimmed.to_lowercase();
    let resolved = TOPICS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, id)| (*id).to_owned())
        .unwrap_or_else(|| trimmed.to_owned());

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TECHNOLOGY_ID: &str = "CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pRV2dnQVAB";

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        assert_eq!(resolve("technology").unwrap(), TECHNOLOGY_ID);
        assert_eq!(resolve("Technology").unwrap(), TECHNOLOGY_ID);
        assert_eq!(resolve(" technology ").unwrap(), TECHNOLOGY_ID);
        assert_eq!(resolve("TECHNOLOGY\n").unwrap(), TECHNOLOGY_ID);
    }

    #[test]
    fn test_alias_shares_id() {
        assert_eq!(resolve("tech").unwrap(), resolve("technology").unwrap());
    }

    #[test]
    fn test_every_table_entry_resolves() {
        for (name, id) in TOPICS {
            assert_eq!(resolve(name).unwrap(), *id);
        }
    }

    #[test]
    fn test_unknown_value_passes_through() {
        assert_eq!(resolve("some-unknown-id").unwrap(), "some-unknown-id");
    }

    #[test]
    fn test_unknown_value_keeps_case_but_is_trimmed() {
        assert_eq!(
            resolve("  CAAqBwgKMMqAmAsw  ").unwrap(),
            "CAAqBwgKMMqAmAsw"
        );
    }

    #[test]
    fn test_empty_and_blank_rejected() {
        assert_eq!(resolve(""), Err(TopicError::Empty));
        assert_eq!(resolve("   "), Err(TopicError::Empty));
        assert_eq!(resolve("\t\n"), Err(TopicError::Empty));
    }
}
