//! Locale routing: make sure every page path carries a supported locale prefix.
//!
//! Per request the router either passes the request through untouched
//! (exempt system paths), resolves the locale from the first path segment,
//! or computes a redirect to the locale-prefixed path.
//!
//! A first segment that names a language we do not serve (`/fr/tours`) is a
//! stale locale and gets replaced; any other segment (`/tours`) gets the
//! locale inserted in front of it.

use crate::i18n::{is_valid_tag, resolve, Locale, LocaleRegistry};
use std::sync::Arc;
use tracing::debug;

/// Path prefixes that never take part in locale routing.
pub const EXEMPT_PREFIXES: &[&str] = &[
    "/api",
    "/static",
    "/assets",
    "/_internal",
    "/favicon.ico",
    "/robots.txt",
    "/health",
];

/// ISO 639-1 language codes, sorted for binary search.
const LANGUAGE_CODES: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// The locale chosen for one request, plus the path it was found on.
///
/// Threaded through the request explicitly; handlers extract it from the
/// request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    pub locale: Locale,
    pub path: String,
}

impl ResolvedLocale {
    /// The path with the locale segment removed (always starts with `/`).
    pub fn unprefixed_path(&self) -> &str {
        let rest = &self.path[1 + self.locale.code().len()..];
        if rest.is_empty() {
            "/"
        } else {
            rest
        }
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Exempt path, handled without a locale
    Bypass,

    /// The path already starts with a supported locale
    Resolved(ResolvedLocale),

    /// The path lacks a supported locale; send the client to `location`
    Redirect { locale: Locale, location: String },
}

/// Per-request locale router backed by the shared registry.
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    registry: Arc<LocaleRegistry>,
}

impl LocaleRouter {
    /// Create a router over the shared registry.
    ///
    /// # Arguments
    /// * `registry` - The process-wide locale registry
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }

    /// Get the registry this router validates against.
    ///
    /// # Returns
    /// A reference to the shared `LocaleRegistry`.
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Decide how to handle a request path.
    ///
    /// # Arguments
    /// * `path` - Request path (e.g., "/tours")
    /// * `query` - Raw query string without the `?`, carried into redirects
    /// * `accept_language` - The client's language preference header, if any
    ///
    /// # Returns
    /// * `Bypass` for exempt system paths
    /// * `Resolved` when the first segment is a supported locale
    /// * `Redirect` otherwise; a stale language segment is replaced, any
    ///   other path gets the resolved locale inserted in front
    pub fn route(
        &self,
        path: &str,
        query: Option<&str>,
        accept_language: Option<&str>,
    ) -> RouteDecision {
        if is_exempt(path) {
            return RouteDecision::Bypass;
        }

        if let Some(locale) = first_segment(path).and_then(|s| self.registry.get(s)) {
            return RouteDecision::Resolved(ResolvedLocale {
                locale,
                path: path.to_string(),
            });
        }

        let rest = match first_segment(path) {
            Some(segment) if is_language_segment(segment) => &path[1 + segment.len()..],
            _ => path,
        };

        let locale = resolve(&self.registry, accept_language);
        let location = prefixed_location(&locale, rest, query);
        debug!("Redirecting {} to {}", path, location);

        RouteDecision::Redirect { locale, location }
    }

    /// Path for the same page in another locale (used by the language switcher).
    ///
    /// Replaces the locale prefix when present, otherwise inserts one.
    ///
    /// # Arguments
    /// * `path` - Current request path (e.g., "/de/tours")
    /// * `target` - Locale to switch to
    ///
    /// # Returns
    /// The path of the same page under `target` (e.g., "/sw/tours").
    pub fn switch_locale_path(&self, path: &str, target: &Locale) -> String {
        match first_segment(path).and_then(|s| self.registry.get(s)) {
            Some(current) => {
                let rest = &path[1 + current.code().len()..];
                format!("/{}{}", target, rest)
            }
            None => prefixed_location(target, path, None),
        }
    }
}

/// Whether a path bypasses locale routing. Prefixes match on segment boundaries.
pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Whether a segment names a language (e.g. "fr", "pt-BR") rather than a page.
fn is_language_segment(segment: &str) -> bool {
    let primary = segment.split('-').next().unwrap_or(segment);
    LANGUAGE_CODES.binary_search(&primary).is_ok() && is_valid_tag(segment)
}

fn first_segment(path: &str) -> Option<&str> {
    path.strip_prefix('/')?
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

fn prefixed_location(locale: &Locale, path: &str, query: Option<&str>) -> String {
    let mut location = match path {
        "" | "/" => format!("/{}", locale),
        p if p.starts_with('/') => format!("/{}{}", locale, p),
        p => format!("/{}/{}", locale, p),
    };

    if let Some(q) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(q);
    }

    location
}
