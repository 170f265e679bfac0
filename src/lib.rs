//! Locale-aware routing and localized pages for the safari tours booking site.
//!
//! Every page path carries a supported locale as its first segment
//! (`/sw/tours`). Requests without one are redirected to the best match for
//! the client's `Accept-Language` header, and the chosen locale is threaded
//! through to the handlers that render translated pages.

pub mod config;
pub mod error;
pub mod i18n;
pub mod router;
pub mod server;
