//! Name filter shared by the MongoDB and in-memory stores.

use crate::config::NameSearchMode;
use regex::RegexBuilder;
use serde_json::Value;
use thiserror::Error;

/// A search fragment that could not be turned into a pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Escaped fragment still failed to compile (size limits).
    #[error(transparent)]
    Literal(#[from] regex::Error),
    /// Raw fragment is not a valid backtracking pattern.
    #[error(transparent)]
    Raw(#[from] Box<fancy_regex::Error>),
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal(regex::Regex),
    Raw(fancy_regex::Regex),
}

/// Case-insensitive "name contains" filter.
///
/// The pattern source is what MongoDB receives in `$regex`; the compiled form lets the
/// in-memory store apply identical semantics. Raw fragments compile with `fancy-regex` so
/// lookaround and backreferences behave as they do under PCRE.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    matcher: Matcher,
}

impl NamePattern {
    /// Wrap `fragment` with open-ended matching on both sides.
    ///
    /// In [`NameSearchMode::Literal`] every pattern metacharacter in the fragment is escaped.
    /// In [`NameSearchMode::Raw`] the fragment is embedded unchanged and must itself be a
    /// valid pattern.
    pub fn new(fragment: &str, mode: NameSearchMode) -> Result<Self, PatternError> {
        let (source, matcher) = match mode {
            NameSearchMode::Literal => {
                let source = format!(".*{}.*", regex::escape(fragment));
                let compiled = RegexBuilder::new(&source).case_insensitive(true).build()?;
                (source, Matcher::Literal(compiled))
            }
            NameSearchMode::Raw => {
                let source = format!(".*{fragment}.*");
                let compiled = fancy_regex::Regex::new(&format!("(?i){source}"))
                    .map_err(Box::new)?;
                (source, Matcher::Raw(compiled))
            }
        };
        Ok(Self { source, matcher })
    }

    /// Pattern text handed to the document store.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether a stored name satisfies the filter. Names that are not strings never match.
    pub fn is_match(&self, name: &Value) -> bool {
        let Some(name) = name.as_str() else {
            return false;
        };
        match &self.matcher {
            Matcher::Literal(regex) => regex.is_match(name),
            Matcher::Raw(regex) => regex.is_match(name).unwrap_or_else(|err| {
                tracing::warn!(pattern = %self.source, error = %err, "Name pattern aborted");
                false
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matches(pattern: &NamePattern, name: &str) -> bool {
        pattern.is_match(&json!(name))
    }

    #[test]
    fn matches_substrings_ignoring_case() {
        let pattern = NamePattern::new("ALI", NameSearchMode::Literal).expect("pattern");
        assert!(matches(&pattern, "Alice"));
        assert!(matches(&pattern, "Natalia"));
        assert!(!matches(&pattern, "Bob"));
    }

    #[test]
    fn literal_mode_escapes_metacharacters() {
        let pattern = NamePattern::new("a.c", NameSearchMode::Literal).expect("pattern");
        assert_eq!(pattern.source(), r".*a\.c.*");
        assert!(matches(&pattern, "Ja.cob"));
        assert!(!matches(&pattern, "Jabcob"));
    }

    #[test]
    fn raw_mode_keeps_pattern_syntax() {
        let pattern = NamePattern::new("^bo", NameSearchMode::Raw).expect("pattern");
        assert_eq!(pattern.source(), ".*^bo.*");
        assert!(matches(&pattern, "Bob"));
        assert!(!matches(&pattern, "Jimbo"));

        let dot = NamePattern::new("a.c", NameSearchMode::Raw).expect("pattern");
        assert!(matches(&dot, "Jabcob"));
    }

    #[test]
    fn raw_mode_supports_lookaround_and_backreferences() {
        let ahead = NamePattern::new("Al(?=i)", NameSearchMode::Raw).expect("lookahead");
        assert!(matches(&ahead, "Alice"));
        assert!(!matches(&ahead, "Alan"));

        let negative = NamePattern::new("al(?!i)", NameSearchMode::Raw).expect("lookahead");
        assert!(matches(&negative, "Alan"));
        assert!(!matches(&negative, "Alice"));

        let repeated = NamePattern::new(r"(l)\1", NameSearchMode::Raw).expect("backreference");
        assert!(matches(&repeated, "Allen"));
        assert!(!matches(&repeated, "Alan"));
    }

    #[test]
    fn raw_mode_rejects_invalid_patterns() {
        assert!(NamePattern::new("(unclosed", NameSearchMode::Raw).is_err());
        assert!(NamePattern::new("(unclosed", NameSearchMode::Literal).is_ok());
    }

    #[test]
    fn empty_fragment_matches_every_string_name() {
        let pattern = NamePattern::new("", NameSearchMode::Literal).expect("pattern");
        assert!(matches(&pattern, ""));
        assert!(matches(&pattern, "anyone"));
    }

    #[test]
    fn non_string_names_never_match() {
        let pattern = NamePattern::new("7", NameSearchMode::Literal).expect("pattern");
        assert!(!pattern.is_match(&json!(7)));
        assert!(!pattern.is_match(&json!(["7"])));
        assert!(pattern.is_match(&json!("Agent 7")));
    }
}
