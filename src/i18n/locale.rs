//! Locale type: a validated, registry-backed locale code.
//!
//! A `Locale` can only be obtained from a `LocaleRegistry`, so every value
//! flowing through the resolver and router is a member of the supported set.

use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Check that a string has the shape of a language tag (e.g. "en", "sw", "pt-BR").
pub fn is_valid_tag(tag: &str) -> bool {
    let regex = TAG_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z]{2,8}(-[A-Za-z0-9]{1,8})*$").unwrap());
    regex.is_match(tag)
}

/// A supported locale.
///
/// Cloning is cheap; the code is shared with the registry that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    code: Arc<str>,
}

impl Locale {
    /// Only the registry mints locales, after validating the code.
    pub(crate) fn new(code: &str) -> Self {
        Self { code: Arc::from(code) }
    }

    /// The locale code as configured (e.g., "en", "sw").
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Tag Validation Tests ====================

    #[test]
    fn test_valid_tags() {
        assert!(is_valid_tag("en"));
        assert!(is_valid_tag("sw"));
        assert!(is_valid_tag("pt-BR"));
        assert!(is_valid_tag("zh-Hant-TW"));
        assert!(is_valid_tag("es-419"));
    }

    #[test]
    fn test_invalid_tags() {
        assert!(!is_valid_tag(""));
        assert!(!is_valid_tag("e"));
        assert!(!is_valid_tag("en_US"));
        assert!(!is_valid_tag("en-"));
        assert!(!is_valid_tag("*"));
        assert!(!is_valid_tag("en US"));
        assert!(!is_valid_tag("../en"));
    }

    #[test]
    fn test_nine_letter_primary_subtag_rejected() {
        assert!(!is_valid_tag("abcdefghi"));
    }

    // ==================== Locale Tests ====================

    #[test]
    fn test_code_and_display() {
        let locale = Locale::new("sw");
        assert_eq!(locale.code(), "sw");
        assert_eq!(locale.to_string(), "sw");
        assert_eq!(locale.as_ref(), "sw");
    }

    #[test]
    fn test_clone_shares_code() {
        let locale = Locale::new("de");
        let cloned = locale.clone();
        assert_eq!(locale, cloned);
        assert!(Arc::ptr_eq(&locale.code, &cloned.code));
    }
}
