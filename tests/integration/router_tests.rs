//! Router integration tests through the axum adapter.
//!
//! Tests verify:
//! - Pages, indexes and attachments over HTTP with their headers
//! - HEAD responses carry GET headers and no body
//! - 404, 405 and 500 status mapping
//! - Query strings and percent-encoded paths

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tracing::Level;

use notebook_www::{create_router, RouterConfig, WwwInterface};

use super::test_utils::{
    body_text, builtin_template, global_capture, interface, test_notebook,
};

fn router() -> Router {
    create_router(interface(), RouterConfig::new().with_tracing(false))
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_of(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    body_text(&body)
}

// =============================================================================
// Successful Requests
// =============================================================================

#[tokio::test]
async fn test_get_page() {
    let response = router()
        .oneshot(request(Method::GET, "/Test/foo.html"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=\"utf-8\""
    );
    assert_eq!(response.headers().get_all(header::DATE).iter().count(), 1);
    assert!(response.headers().contains_key(header::CONTENT_LENGTH));

    let body = body_of(response).await;
    assert!(body.contains("<h1>Foo <a name='Test:foo'></a></h1>"));
    assert!(body.contains("<td><a href='/+file/Test/foo/attachment.pdf'>attachment.pdf</a></td>"));
}

#[tokio::test]
async fn test_get_index() {
    let response = router().oneshot(request(Method::GET, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_of(response).await;
    assert!(body.contains("<li><a href=\"/Test/foo.html\" title=\"foo\" class=\"page\">foo</a>"));
}

#[tokio::test]
async fn test_get_attachment() {
    let response = router()
        .oneshot(request(Method::GET, "/+file/Test/foo/attachment.pdf"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "8");
    assert_eq!(body_of(response).await, "%PDF-1.4");
}

#[tokio::test]
async fn test_query_string_is_ignored() {
    let response = router()
        .oneshot(request(Method::GET, "/Test/foo.html?version=2#top"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_percent_encoded_path() {
    let notebook = test_notebook().with_page("Test:my page", "Spaced page\n");
    let interface = WwwInterface::new(notebook, builtin_template());
    let router = create_router(interface, RouterConfig::new().with_tracing(false));

    let response = router
        .oneshot(request(Method::GET, "/Test/my%20page.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_of(response).await.contains("Spaced page"));
}

// =============================================================================
// HEAD
// =============================================================================

#[tokio::test]
async fn test_head_has_headers_without_body() {
    let get = router()
        .oneshot(request(Method::GET, "/Test/foo.html"))
        .await
        .unwrap();
    let head = router()
        .oneshot(request(Method::HEAD, "/Test/foo.html"))
        .await
        .unwrap();

    assert_eq!(head.status(), StatusCode::OK);
    assert_eq!(
        get.headers().get(header::CONTENT_TYPE),
        head.headers().get(header::CONTENT_TYPE)
    );
    assert_eq!(
        get.headers().get(header::CONTENT_LENGTH),
        head.headers().get(header::CONTENT_LENGTH)
    );
    assert!(body_of(head).await.is_empty());
}

#[tokio::test]
async fn test_head_not_found() {
    let response = router()
        .oneshot(request(Method::HEAD, "/nonexistingpage.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_of(response).await.is_empty());
}

// =============================================================================
// Error Statuses
// =============================================================================

#[tokio::test]
async fn test_not_found() {
    for uri in ["/Test", "/nonexistingpage.html", "/nonexisting/", "/+file/Test/foo/bar.txt"] {
        let response = router().oneshot(request(Method::GET, uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {}", uri);
        assert!(response.headers().contains_key(header::CONTENT_TYPE));
    }
}

#[tokio::test]
async fn test_not_found_level_is_configurable() {
    let capture = global_capture();
    let config = RouterConfig::new()
        .with_tracing(false)
        .with_not_found_level(Level::WARN);
    let router = create_router(interface(), config);

    let response = router
        .oneshot(request(Method::GET, "/warn-level-missing-page.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = capture.events_for("/warn-level-missing-page.html");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Level::WARN);
    assert_eq!(events[0].1, "Resource not found");
}

#[tokio::test]
async fn test_not_found_level_defaults_to_debug() {
    let capture = global_capture();
    let router = create_router(interface(), RouterConfig::new().with_tracing(false));

    let response = router
        .oneshot(request(Method::GET, "/debug-level-missing-page.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = capture.events_for("/debug-level-missing-page.html");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Level::DEBUG);
}

#[tokio::test]
async fn test_method_not_allowed() {
    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let response = router()
            .oneshot(request(method.clone(), "/Test/foo.html"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, HEAD");
    }
}

#[tokio::test]
async fn test_store_fault() {
    let notebook = test_notebook().with_fault("Test:foo");
    let interface = WwwInterface::new(notebook, builtin_template());
    let router = create_router(interface, RouterConfig::new());

    let response = router
        .oneshot(request(Method::GET, "/Test/foo.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body_of(response).await.contains("simulated failure"));
}

#[tokio::test]
async fn test_router_with_tracing_layer() {
    let router = create_router(interface(), RouterConfig::new());
    let response = router.oneshot(request(Method::GET, "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
