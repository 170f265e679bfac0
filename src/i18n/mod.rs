//! Internationalization (i18n) module for the booking site.
//!
//! # Architecture
//!
//! - `registry`: Immutable set of supported locales and the default
//! - `locale`: Validated `Locale` type, only minted by the registry
//! - `resolver`: Picks a locale from the client's `Accept-Language` header
//! - `messages`: Per-locale translation tables and their loaders
//!
//! # Example
//!
//! ```rust,ignore
//! use safari_tours::i18n::{resolve, FsMessageLoader, LocaleRegistry, MessageCatalog};
//!
//! let registry = LocaleRegistry::new(&["en", "sw", "de"], "en")?;
//! let catalog = MessageCatalog::load(&registry, &FsMessageLoader::new("messages"))?;
//!
//! let locale = resolve(&registry, Some("sw;q=0.9, en;q=0.5"));
//! let title = catalog.messages(&locale)?.get("home.title");
//! ```

mod locale;
mod messages;
mod registry;
mod resolver;

pub use locale::{is_valid_tag, Locale};
pub use messages::{FsMessageLoader, MessageCatalog, MessageLoader, MessageMapping, StaticMessageLoader};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use resolver::{parse_accept_language, resolve, LanguagePreference};
