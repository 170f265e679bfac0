use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Configuration defects in the locale layer.
///
/// Every variant is fatal: the registry refuses to initialize, or a supported
/// locale cannot be rendered because its messages are missing or broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("No supported locales configured")]
    EmptyRegistry,

    #[error("Invalid locale code: '{0}'")]
    InvalidCode(String),

    #[error("Locale '{0}' is listed more than once")]
    DuplicateLocale(String),

    #[error("Default locale '{0}' is not in the supported set")]
    DefaultNotSupported(String),

    #[error("Messages for locale '{locale}' are unavailable: {reason}")]
    MessagesUnavailable { locale: String, reason: String },

    #[error("Messages for locale '{locale}' are malformed: {reason}")]
    MalformedMessages { locale: String, reason: String },
}

/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("cannot render this locale")]
    LocaleUnavailable(#[from] LocaleError),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::LocaleUnavailable(ref e) => {
                tracing::error!("Locale rendering failed: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}
