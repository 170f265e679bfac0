//! Message catalogs: per-locale translation tables.
//!
//! Messages live in one JSON document per locale. Nested objects are
//! flattened to dotted keys, so `{"errors": {"emailRequired": "..."}}`
//! becomes `errors.emailRequired`.

use crate::error::LocaleError;
use crate::i18n::locale::Locale;
use crate::i18n::registry::LocaleRegistry;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, info};

/// Translation key to localized string, for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMapping {
    messages: BTreeMap<String, String>,
}

impl MessageMapping {
    /// Build a mapping from a JSON document.
    ///
    /// The root must be an object. String, number and boolean leaves are
    /// accepted; arrays and nulls are rejected.
    ///
    /// # Arguments
    /// * `locale` - Locale the document belongs to (used in error reports)
    /// * `document` - Parsed JSON message document
    ///
    /// # Returns
    /// * `Ok(MessageMapping)` with every leaf under its dotted key
    /// * `Err(MalformedMessages)` for unsupported values, or when a dotted key
    ///   (`"a.b"`) and a nested path (`{"a": {"b": ..}}`) name the same message
    pub fn from_json(locale: &Locale, document: &Value) -> Result<Self, LocaleError> {
        let Value::Object(root) = document else {
            return Err(malformed(locale, "root must be a JSON object"));
        };

        let mut messages = BTreeMap::new();
        let mut stack: Vec<(String, &Value)> = root
            .iter()
            .map(|(key, value)| (key.clone(), value))
            .collect();

        while let Some((key, value)) = stack.pop() {
            let text = match value {
                Value::Object(children) => {
                    for (child, value) in children {
                        stack.push((format!("{}.{}", key, child), value));
                    }
                    continue;
                }
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Null => {
                    return Err(malformed(locale, &format!("unsupported value at '{}'", key)));
                }
            };

            if messages.contains_key(&key) {
                return Err(malformed(locale, &format!("duplicate key '{}'", key)));
            }
            messages.insert(key, text);
        }

        Ok(Self { messages })
    }

    /// Look up a message by dotted key.
    ///
    /// # Arguments
    /// * `key` - Dotted translation key (e.g., "errors.emailRequired")
    ///
    /// # Returns
    /// * `Some(&str)` with the localized message
    /// * `None` if the key is not present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Look up a message and substitute `{name}` placeholders.
    ///
    /// Placeholders without a matching argument are left as-is.
    ///
    /// # Arguments
    /// * `key` - Dotted translation key
    /// * `args` - `(name, value)` pairs replacing `{name}`
    ///
    /// # Returns
    /// The formatted message, or `None` if the key is not present.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> Option<String> {
        let template = self.get(key)?;
        Some(
            args.iter()
                .fold(template.to_string(), |text, (name, value)| {
                    text.replace(&format!("{{{}}}", name), value)
                }),
        )
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MessageMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            messages: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn malformed(locale: &Locale, reason: &str) -> LocaleError {
    LocaleError::MalformedMessages {
        locale: locale.code().to_string(),
        reason: reason.to_string(),
    }
}

/// Source of translation tables.
///
/// Loading must succeed for every supported locale; a failure is a
/// configuration defect.
pub trait MessageLoader {
    fn load_messages(&self, locale: &Locale) -> Result<MessageMapping, LocaleError>;
}

/// Loads `{dir}/{code}.json` from disk.
#[derive(Debug, Clone)]
pub struct FsMessageLoader {
    dir: PathBuf,
}

impl FsMessageLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl MessageLoader for FsMessageLoader {
    fn load_messages(&self, locale: &Locale) -> Result<MessageMapping, LocaleError> {
        let path = self.dir.join(format!("{}.json", locale.code()));
        debug!("Loading messages for '{}' from {}", locale, path.display());

        let content =
            std::fs::read_to_string(&path).map_err(|e| LocaleError::MessagesUnavailable {
                locale: locale.code().to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;

        let document: Value =
            serde_json::from_str(&content).map_err(|e| malformed(locale, &e.to_string()))?;

        MessageMapping::from_json(locale, &document)
    }
}

/// In-memory message tables keyed by locale code.
#[derive(Debug, Clone, Default)]
pub struct StaticMessageLoader {
    tables: HashMap<String, MessageMapping>,
}

impl StaticMessageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(mut self, code: &str, messages: MessageMapping) -> Self {
        self.tables.insert(code.to_string(), messages);
        self
    }
}

impl MessageLoader for StaticMessageLoader {
    fn load_messages(&self, locale: &Locale) -> Result<MessageMapping, LocaleError> {
        self.tables
            .get(locale.code())
            .cloned()
            .ok_or_else(|| LocaleError::MessagesUnavailable {
                locale: locale.code().to_string(),
                reason: "no messages registered".to_string(),
            })
    }
}

/// Messages for every supported locale, loaded eagerly at startup.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    tables: HashMap<Locale, MessageMapping>,
}

impl MessageCatalog {
    /// Load messages for all supported locales, failing on the first defect.
    ///
    /// # Arguments
    /// * `registry` - Registry whose supported locales must all load
    /// * `loader` - Source of the per-locale tables
    ///
    /// # Returns
    /// * `Ok(MessageCatalog)` holding a table for every supported locale
    /// * `Err(LocaleError)` from the first locale that fails to load
    pub fn load(registry: &LocaleRegistry, loader: &dyn MessageLoader) -> Result<Self, LocaleError> {
        let mut tables = HashMap::new();
        for locale in registry.supported_locales() {
            let messages = loader.load_messages(&locale)?;
            info!("Loaded {} messages for '{}'", messages.len(), locale);
            tables.insert(locale, messages);
        }
        Ok(Self { tables })
    }

    /// Messages for a resolved locale.
    ///
    /// Never substitutes another locale's messages.
    ///
    /// # Arguments
    /// * `locale` - The locale resolved for the request
    ///
    /// # Returns
    /// * `Ok(&MessageMapping)` for a locale loaded at startup
    /// * `Err(MessagesUnavailable)` if the catalog has no table for it
    pub fn messages(&self, locale: &Locale) -> Result<&MessageMapping, LocaleError> {
        self.tables
            .get(locale)
            .ok_or_else(|| LocaleError::MessagesUnavailable {
                locale: locale.code().to_string(),
                reason: "locale not in catalog".to_string(),
            })
    }
}
