//! Locale resolution from a client's `Accept-Language` preference.
//!
//! Matching is first-match in the order the client listed its languages.
//! Quality weights are parsed and validated but not used for sorting; a
//! weight of zero marks a language as not acceptable and removes it.

use crate::i18n::locale::{is_valid_tag, Locale};
use crate::i18n::registry::LocaleRegistry;

/// One entry from a weighted language list.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    /// Language tag as sent by the client, or `*`
    pub tag: String,

    /// Quality weight in `0.0..=1.0` (defaults to 1.0)
    pub quality: f32,
}

/// Parse an `Accept-Language` style header into preferences, in client order.
///
/// Malformed entries are skipped rather than failing the whole header.
pub fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    header.split(',').filter_map(parse_entry).collect()
}

fn parse_entry(entry: &str) -> Option<LanguagePreference> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();

    if tag != "*" && !is_valid_tag(tag) {
        return None;
    }

    let mut quality = 1.0;
    for param in parts {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("q") {
            quality = parse_quality(value.trim())?;
        }
    }

    Some(LanguagePreference {
        tag: tag.to_string(),
        quality,
    })
}

fn parse_quality(value: &str) -> Option<f32> {
    let q: f32 = value.parse().ok()?;
    if q.is_finite() && (0.0..=1.0).contains(&q) {
        Some(q)
    } else {
        None
    }
}

/// Pick the locale for a request that carries no locale in its path.
///
/// Always returns a member of the registry; absent, malformed or entirely
/// unsupported preferences fall back to the registry default.
pub fn resolve(registry: &LocaleRegistry, preference: Option<&str>) -> Locale {
    preference
        .into_iter()
        .flat_map(parse_accept_language)
        .filter(|pref| pref.quality > 0.0)
        .find_map(|pref| registry.get_ignore_case(&pref.tag))
        .unwrap_or_else(|| registry.default_locale())
}
