use crate::config::Config;
use crate::error::{AppError, LocaleError};
use crate::i18n::{FsMessageLoader, LocaleRegistry, MessageCatalog, MessageMapping};
use crate::router::{LocaleRouter, ResolvedLocale, RouteDecision};
use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, CACHE_CONTROL, LOCATION, VARY},
        StatusCode,
    },
    middleware::{from_fn_with_state, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only state for every request.
pub struct AppState {
    pub router: LocaleRouter,
    pub catalog: MessageCatalog,
}

impl AppState {
    /// Build the registry and load every locale's messages from disk.
    pub fn new(config: &Config) -> Result<Arc<Self>, LocaleError> {
        let registry = LocaleRegistry::from_config(config)?;
        let loader = FsMessageLoader::new(&config.messages_dir);
        let catalog = MessageCatalog::load(&registry, &loader)?;
        Ok(Self::from_parts(registry, catalog))
    }

    pub fn from_parts(registry: LocaleRegistry, catalog: MessageCatalog) -> Arc<Self> {
        Arc::new(Self {
            router: LocaleRouter::new(Arc::new(registry)),
            catalog,
        })
    }
}

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/:locale", get(home_handler))
        .route("/:locale/", get(home_handler))
        .route("/:locale/tours", get(tours_handler))
        .route("/:locale/checkout", get(checkout_handler))
        .route("/api/locales", get(locales_handler))
        .route("/api/health", get(health_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(from_fn_with_state(state.clone(), locale_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<()> {
    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server running on {}", address);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ==================== Locale Middleware ====================

/// Enforce a locale prefix on page paths.
///
/// Resolved requests carry a `ResolvedLocale` extension into the handlers;
/// unprefixed ones get a temporary, uncacheable redirect.
pub async fn locale_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = {
        let accept_language = request
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        state
            .router
            .route(request.uri().path(), request.uri().query(), accept_language)
    };

    match decision {
        RouteDecision::Bypass => next.run(request).await,
        RouteDecision::Resolved(resolved) => {
            request.extensions_mut().insert(resolved);
            next.run(request).await
        }
        RouteDecision::Redirect { location, .. } => redirect(&location),
    }
}

fn redirect(location: &str) -> Response {
    (
        StatusCode::TEMPORARY_REDIRECT,
        [
            (LOCATION, location),
            (CACHE_CONTROL, "no-store"),
            (VARY, "Accept-Language"),
        ],
    )
        .into_response()
}

// ==================== Page Handlers ====================

async fn home_handler(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedLocale>,
) -> Result<Html<String>, AppError> {
    let messages = state.catalog.messages(&resolved.locale)?;
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/{}/tours\">{}</a></p>",
        t(messages, "home.title"),
        t(messages, "home.intro"),
        resolved.locale,
        t(messages, "nav.tours"),
    );
    Ok(Html(render_page(&state, &resolved, messages, "home.title", &body)))
}

async fn tours_handler(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedLocale>,
) -> Result<Html<String>, AppError> {
    let messages = state.catalog.messages(&resolved.locale)?;
    let tours = ["tours.serengeti", "tours.mara", "tours.ngorongoro"];

    let count = tours.len().to_string();
    let summary = messages
        .format("tours.count", &[("count", count.as_str())])
        .unwrap_or_else(|| "tours.count".to_string());

    let items: String = tours
        .iter()
        .map(|key| format!("<li>{}</li>", t(messages, key)))
        .collect();

    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<ul>{}</ul>",
        t(messages, "tours.title"),
        escape_html(&summary),
        items,
    );
    Ok(Html(render_page(&state, &resolved, messages, "tours.title", &body)))
}

async fn checkout_handler(
    State(state): State<Arc<AppState>>,
    Extension(resolved): Extension<ResolvedLocale>,
) -> Result<Html<String>, AppError> {
    let messages = state.catalog.messages(&resolved.locale)?;
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        t(messages, "checkout.title"),
        t(messages, "checkout.summary"),
    );
    Ok(Html(render_page(&state, &resolved, messages, "checkout.title", &body)))
}

async fn not_found_handler(
    State(state): State<Arc<AppState>>,
    resolved: Option<Extension<ResolvedLocale>>,
) -> Result<Response, AppError> {
    let Some(Extension(resolved)) = resolved else {
        return Err(AppError::NotFound);
    };

    let messages = state.catalog.messages(&resolved.locale)?;
    let body = format!("<p>{}</p>", t(messages, "errors.notFound"));
    let page = render_page(&state, &resolved, messages, "errors.notFound", &body);
    Ok((StatusCode::NOT_FOUND, Html(page)).into_response())
}

/// Translate a key, showing the key itself when the message is missing.
fn t(messages: &MessageMapping, key: &str) -> String {
    escape_html(messages.get(key).unwrap_or(key))
}

fn render_page(
    state: &AppState,
    resolved: &ResolvedLocale,
    messages: &MessageMapping,
    title_key: &str,
    body: &str,
) -> String {
    let switcher: String = state
        .router
        .registry()
        .configs()
        .iter()
        .map(|config| {
            let href = state
                .router
                .switch_locale_path(&resolved.path, &config.locale);
            let current = if config.locale == resolved.locale {
                " aria-current=\"true\""
            } else {
                ""
            };
            format!(
                "<li><a href=\"{}\" hreflang=\"{}\"{}>{}</a></li>",
                escape_html(&href),
                config.code(),
                current,
                escape_html(config.display_name()),
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head><meta charset=\"utf-8\"><title>{title} | {site}</title></head>\n<body>\n<nav><a href=\"/{lang}\">{home}</a> <a href=\"/{lang}/tours\">{tours}</a> <a href=\"/{lang}/checkout\">{checkout}</a></nav>\n<main>\n{body}\n</main>\n<footer><span>{language}</span><ul>{switcher}</ul></footer>\n</body>\n</html>\n",
        lang = resolved.locale,
        title = t(messages, title_key),
        site = t(messages, "meta.siteName"),
        home = t(messages, "nav.home"),
        tours = t(messages, "nav.tours"),
        checkout = t(messages, "nav.checkout"),
        language = t(messages, "nav.language"),
        body = body,
        switcher = switcher,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ==================== API Handlers ====================

#[derive(Debug, Serialize)]
pub struct LocalesResponse {
    pub default: String,
    pub supported: Vec<LocaleInfo>,
}

#[derive(Debug, Serialize)]
pub struct LocaleInfo {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

async fn locales_handler(State(state): State<Arc<AppState>>) -> Json<LocalesResponse> {
    let registry = state.router.registry();
    Json(LocalesResponse {
        default: registry.default_locale().code().to_string(),
        supported: registry
            .configs()
            .iter()
            .map(|config| LocaleInfo {
                code: config.code().to_string(),
                name: config.name.to_string(),
                native_name: config.display_name().to_string(),
            })
            .collect(),
    })
}

async fn health_handler() -> &'static str {
    "ok"
}
