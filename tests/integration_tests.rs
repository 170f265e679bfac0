//! Integration tests for the safari tours server
//!
//! These tests drive the full axum application (locale middleware, page
//! handlers and API routes) through `tower::ServiceExt::oneshot`, using the
//! message files bundled in `messages/`.

use axum::{
    body::Body,
    http::{
        header::{ACCEPT_LANGUAGE, CACHE_CONTROL, LOCATION},
        Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use safari_tours::{
    config::Config,
    error::LocaleError,
    i18n::{FsMessageLoader, LocaleRegistry, MessageCatalog, MessageMapping, StaticMessageLoader},
    server::{app, AppState},
};

// ==================== Test Helpers ====================

fn messages_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/messages")
}

/// Registry = {supported: [en, sw, de], default: en} with the bundled messages
fn test_app() -> Router {
    let registry = LocaleRegistry::new(&["en", "sw", "de"], "en").expect("valid registry");
    let catalog = MessageCatalog::load(&registry, &FsMessageLoader::new(messages_dir()))
        .expect("bundled messages load");
    app(AppState::from_parts(registry, catalog))
}

async fn get(app: Router, uri: &str, accept_language: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = accept_language {
        builder = builder.header(ACCEPT_LANGUAGE, value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response.headers()[LOCATION].to_str().unwrap()
}

// ==================== Redirect Scenario Tests ====================

#[tokio::test]
async fn test_unprefixed_path_redirects_to_default() {
    let response = get(test_app(), "/tours", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/en/tours");
    assert_eq!(response.headers()[CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_prefixed_path_renders_without_redirect() {
    let response = get(test_app(), "/de/tours", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<html lang=\"de\">"));
    assert!(html.contains("Unsere Touren"));
    assert!(html.contains("3 Touren verfügbar"));
}

#[tokio::test]
async fn test_unsupported_prefix_redirects_using_header() {
    let response = get(test_app(), "/fr/tours", Some("sw")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/sw/tours");

    let followed = get(test_app(), "/sw/tours", Some("sw")).await;
    assert_eq!(followed.status(), StatusCode::OK);
    assert!(body_text(followed).await.contains("Safari zetu"));
}

#[tokio::test]
async fn test_page_path_without_locale_keeps_its_segments() {
    let response = get(test_app(), "/tours", Some("de")).await;
    assert_eq!(location(&response), "/de/tours");
}

#[tokio::test]
async fn test_root_redirects_by_preference() {
    let response = get(test_app(), "/", Some("fr;q=0.9, de;q=0.5")).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/de");
}

#[tokio::test]
async fn test_redirect_keeps_query_string() {
    let response = get(test_app(), "/checkout?tour=mara", Some("sw")).await;
    assert_eq!(location(&response), "/sw/checkout?tour=mara");
}

#[tokio::test]
async fn test_malformed_preference_degrades_to_default() {
    let response = get(test_app(), "/tours", Some(";;q=,,==")).await;
    assert_eq!(location(&response), "/en/tours");
}

#[tokio::test]
async fn test_following_redirect_never_redirects_again() {
    let first = get(test_app(), "/checkout", Some("sw")).await;
    let target = location(&first).to_string();

    let second = get(test_app(), &target, Some("de")).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(body_text(second).await.contains("Kamilisha uhifadhi wako"));
}

// ==================== Page Rendering Tests ====================

#[tokio::test]
async fn test_home_page_in_swahili() {
    let response = get(test_app(), "/sw", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<html lang=\"sw\">"));
    assert!(html.contains("Safari zisizosahaulika"));
    assert!(html.contains("href=\"/sw/tours\""));
}

#[tokio::test]
async fn test_home_page_with_trailing_slash() {
    let response = get(test_app(), "/en/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_language_switcher_links_to_same_page() {
    let html = body_text(get(test_app(), "/en/tours", None).await).await;

    assert!(html.contains("href=\"/sw/tours\" hreflang=\"sw\""));
    assert!(html.contains("href=\"/de/tours\" hreflang=\"de\""));
    assert!(html.contains("href=\"/en/tours\" hreflang=\"en\" aria-current=\"true\""));
    assert!(html.contains("Kiswahili"));
}

#[tokio::test]
async fn test_unknown_localized_page_is_localized_404() {
    let response = get(test_app(), "/de/safari/unknown", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response)
        .await
        .contains("Diese Seite konnte nicht gefunden werden."));
}

// ==================== Exempt Path Tests ====================

#[tokio::test]
async fn test_api_routes_bypass_locale_routing() {
    let response = get(test_app(), "/api/health", Some("sw")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_unknown_exempt_path_is_plain_404() {
    let response = get(test_app(), "/api/en/tours", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_static_assets_are_never_redirected() {
    let response = get(test_app(), "/static/en/logo.png", Some("de")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_locales_endpoint() {
    let response = get(test_app(), "/api/locales", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["default"], "en");
    assert_eq!(json["supported"][1]["code"], "sw");
    assert_eq!(json["supported"][1]["name"], "Swahili");
    assert_eq!(json["supported"][1]["native_name"], "Kiswahili");
    assert_eq!(json["supported"].as_array().unwrap().len(), 3);
}

// ==================== Startup Failure Tests ====================

#[test]
fn test_state_refuses_default_outside_supported_set() {
    let config = Config {
        port: 8080,
        supported_locales: vec!["en".to_string(), "sw".to_string()],
        default_locale: "de".to_string(),
        messages_dir: messages_dir().into(),
    };

    let err = AppState::new(&config).err().expect("should refuse to start");
    assert_eq!(err, LocaleError::DefaultNotSupported("de".to_string()));
}

#[test]
fn test_state_refuses_missing_messages() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();

    let config = Config {
        port: 8080,
        supported_locales: vec!["en".to_string(), "sw".to_string()],
        default_locale: "en".to_string(),
        messages_dir: temp_dir.path().to_path_buf(),
    };

    let err = AppState::new(&config).err().expect("should refuse to start");
    assert!(matches!(err, LocaleError::MessagesUnavailable { ref locale, .. } if locale == "sw"));
}

#[tokio::test]
async fn test_missing_keys_render_as_key_names() {
    let registry = LocaleRegistry::new(&["en"], "en").unwrap();
    let loader = StaticMessageLoader::new().with_messages(
        "en",
        [("home.title", "Welcome")].into_iter().collect::<MessageMapping>(),
    );
    let catalog = MessageCatalog::load(&registry, &loader).unwrap();
    let app = app(AppState::from_parts(registry, catalog));

    let html = body_text(get(app, "/en", None).await).await;
    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(html.contains("home.intro"));
}
