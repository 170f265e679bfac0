//! Locale registry: single source of truth for the supported locales.
//!
//! The registry is built once at process start from configuration and is
//! immutable afterwards. It is shared through an `Arc` and handed explicitly
//! to the resolver, router and message catalog.

use crate::config::Config;
use crate::error::LocaleError;
use crate::i18n::locale::{is_valid_tag, Locale};
use tracing::info;

/// Display metadata for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// The locale itself
    pub locale: Locale,

    /// English name of the language (e.g., "English", "Swahili")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Kiswahili")
    pub native_name: &'static str,
}

impl LocaleConfig {
    fn new(locale: Locale) -> Self {
        let (name, native_name) = known_names(locale.code());
        Self {
            locale,
            name,
            native_name,
        }
    }

    /// Get the locale code.
    ///
    /// # Returns
    /// The code as configured (e.g., "en", "sw").
    pub fn code(&self) -> &str {
        self.locale.code()
    }

    /// Native name, or the code itself for languages without built-in names.
    pub fn display_name(&self) -> &str {
        if self.native_name.is_empty() {
            self.code()
        } else {
            self.native_name
        }
    }
}

/// Immutable set of supported locales plus the default.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default: Locale,
}

impl LocaleRegistry {
    /// Build a registry from an ordered list of codes and a default.
    ///
    /// # Errors
    /// Refuses to initialize when the list is empty, a code is not a
    /// well-formed language tag, a code appears twice (case-insensitively),
    /// or the default is not one of the supported codes.
    pub fn new<S: AsRef<str>>(supported: &[S], default: &str) -> Result<Self, LocaleError> {
        if supported.is_empty() {
            return Err(LocaleError::EmptyRegistry);
        }

        let mut locales: Vec<LocaleConfig> = Vec::with_capacity(supported.len());
        for code in supported {
            let code = code.as_ref();
            if !is_valid_tag(code) {
                return Err(LocaleError::InvalidCode(code.to_string()));
            }
            if locales.iter().any(|c| c.code().eq_ignore_ascii_case(code)) {
                return Err(LocaleError::DuplicateLocale(code.to_string()));
            }
            locales.push(LocaleConfig::new(Locale::new(code)));
        }

        let default = locales
            .iter()
            .find(|c| c.code() == default)
            .map(|c| c.locale.clone())
            .ok_or_else(|| LocaleError::DefaultNotSupported(default.to_string()))?;

        Ok(Self { locales, default })
    }

    /// Build the registry from process configuration.
    ///
    /// # Arguments
    /// * `config` - Configuration carrying `supported_locales` and `default_locale`
    ///
    /// # Returns
    /// * `Ok(LocaleRegistry)` if the configuration is consistent
    /// * `Err(LocaleError)` if the registry refuses to initialize
    pub fn from_config(config: &Config) -> Result<Self, LocaleError> {
        let registry = Self::new(&config.supported_locales, &config.default_locale)?;
        info!(
            "Locale registry: supported [{}], default '{}'",
            registry
                .supported_locales()
                .iter()
                .map(Locale::code)
                .collect::<Vec<_>>()
                .join(", "),
            registry.default_locale()
        );
        Ok(registry)
    }

    /// Get all supported locales.
    ///
    /// # Returns
    /// The supported locales in configured (preference) order.
    pub fn supported_locales(&self) -> Vec<Locale> {
        self.locales.iter().map(|c| c.locale.clone()).collect()
    }

    /// Get the default locale.
    ///
    /// # Returns
    /// The fallback locale, always a member of `supported_locales()`.
    pub fn default_locale(&self) -> Locale {
        self.default.clone()
    }

    /// Look up a locale by its exact, case-sensitive code.
    ///
    /// Used for path segments, which must match a supported code exactly.
    ///
    /// # Arguments
    /// * `code` - The locale code (e.g., "sw")
    ///
    /// # Returns
    /// * `Some(Locale)` if the code is supported
    /// * `None` otherwise (including "SW" when only "sw" is configured)
    pub fn get(&self, code: &str) -> Option<Locale> {
        self.locales
            .iter()
            .find(|c| c.code() == code)
            .map(|c| c.locale.clone())
    }

    /// Look up a locale ignoring ASCII case, as language tags are case-insensitive.
    ///
    /// Used for `Accept-Language` candidates.
    ///
    /// # Arguments
    /// * `tag` - Language tag as sent by a client (e.g., "DE")
    ///
    /// # Returns
    /// * `Some(Locale)` carrying the configured code (e.g., "de")
    /// * `None` if no supported code matches
    pub fn get_ignore_case(&self, tag: &str) -> Option<Locale> {
        self.locales
            .iter()
            .find(|c| c.code().eq_ignore_ascii_case(tag))
            .map(|c| c.locale.clone())
    }

    /// Check if a code is supported.
    ///
    /// # Arguments
    /// * `code` - The locale code to check (exact, case-sensitive)
    ///
    /// # Returns
    /// `true` if the code is in the supported set, `false` otherwise.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Get display metadata for every supported locale.
    ///
    /// # Returns
    /// A slice of `LocaleConfig` in preference order.
    pub fn configs(&self) -> &[LocaleConfig] {
        &self.locales
    }
}

/// English and native names for languages commonly offered to safari guests.
fn known_names(code: &str) -> (&'static str, &'static str) {
    let primary = code.split('-').next().unwrap_or(code).to_ascii_lowercase();
    match primary.as_str() {
        "en" => ("English", "English"),
        "sw" => ("Swahili", "Kiswahili"),
        "de" => ("German", "Deutsch"),
        "fr" => ("French", "Français"),
        "es" => ("Spanish", "Español"),
        "it" => ("Italian", "Italiano"),
        "nl" => ("Dutch", "Nederlands"),
        "zh" => ("Chinese", "中文"),
        _ => ("", ""),
    }
}
