//! End-to-end tests of `WwwInterface::handle`.
//!
//! Tests verify:
//! - Index and page rendering (links, headings, attachments, sub-pages)
//! - Attachments and static resources with their content types
//! - 404 for unresolvable paths and store misses, for GET and HEAD
//! - HEAD/GET header parity
//! - 405 for other methods and 500 for store faults

use http::{Method, StatusCode};

use notebook_www::template::CONTENT_MARKER;
use notebook_www::{Request, Response, WwwInterface};

use super::test_utils::{
    body_text, builtin_template, create_fs_notebook, file_template, interface, test_notebook,
    MockNotebook,
};

fn get(path: &str) -> Response {
    interface().handle(&Request::get(path))
}

fn assert_single_core_headers(response: &Response) {
    assert_eq!(response.header_count("Content-Type"), 1);
    assert_eq!(response.header_count("Date"), 1);
    assert_eq!(response.header_count("Content-Length"), 1);
}

// =============================================================================
// Index
// =============================================================================

#[test]
fn test_root_index_lists_pages_recursively() {
    let response = get("/");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.header("Content-Type"),
        Some("text/html; charset=\"utf-8\"")
    );

    let body = body_text(response.body());
    assert!(body.contains(CONTENT_MARKER));
    assert!(body.contains("<li><a href=\"/Test.html\" title=\"Test\" class=\"page\">Test</a>"));
    assert!(body.contains("<li><a href=\"/Test/foo.html\" title=\"foo\" class=\"page\">foo</a>"));
    assert!(body.contains(
        "<li><a href=\"/Test/foo/bar.html\" title=\"bar\" class=\"page\">bar</a></li>"
    ));
}

#[test]
fn test_section_index() {
    let response = get("/Test/");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response.body());
    assert!(body.contains("href=\"/Test/foo.html\""));
    assert!(!body.contains("href=\"/Test.html\""));
    // Index documents carry only the page list
    assert!(!body.contains("<h1>"));
}

#[test]
fn test_missing_section_index_is_not_found() {
    let response = get("/nonexisting/");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_empty_notebook_root_index() {
    let interface = WwwInterface::new(MockNotebook::new(), builtin_template());
    let response = interface.handle(&Request::get("/"));
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Pages
// =============================================================================

#[test]
fn test_page_with_attachment_and_sub_page() {
    let response = get("/Test/foo.html");
    assert_eq!(response.status(), StatusCode::OK);
    assert_single_core_headers(&response);

    let body = body_text(response.body());
    assert!(body.contains("<h1>Foo <a name='Test:foo'></a></h1>"));
    assert!(body.contains("<td><a href='/+file/Test/foo/attachment.pdf'>attachment.pdf</a></td>"));
    assert!(body.contains(
        "<li><a href=\"/Test/foo/bar.html\" title=\"bar\" class=\"page\">bar</a></li>"
    ));

    // The sub-page source never shows up as an attachment
    assert!(!body.contains("bar.txt"));
    assert_eq!(body.matches("/+file/").count(), 1);
    assert_eq!(body.matches("href=\"/Test/foo/bar.html\"").count(), 1);
}

#[test]
fn test_page_markup_is_rendered() {
    let body = body_text(get("/Test/foo.html").body());

    assert!(body.contains("<strong>bold</strong>"));
    assert!(body.contains("<a href=\"/Test.html\" title=\":Test\" class=\"page\">link back</a>"));
    assert!(body.contains("<img src=\"/+resources/checked-box.png\" alt=\"[*]\">"));
    assert!(body.contains("<img src=\"/+resources/unchecked-box.png\" alt=\"[ ]\">"));
    // Header block is not part of the body
    assert!(!body.contains("Wiki-Format"));
}

#[test]
fn test_top_level_page() {
    let response = get("/Test.html");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response.body());
    assert!(body.contains("<h1>Test <a name='Test'></a></h1>"));
    assert!(body.contains("href=\"/Test/foo.html\""));
    // Sub-page folder and source of foo are not attachments of Test
    assert!(!body.contains("/+file/"));
}

#[test]
fn test_missing_pages_are_not_found() {
    for path in ["/nonexistingpage.html", "/Test/nope.html", "/Test", "/.html"] {
        let response = get(path);
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {}", path);
        assert_single_core_headers(&response);
        assert!(!response.body().is_empty());
    }
}

#[test]
fn test_not_found_for_head_too() {
    for path in ["/nonexistingpage.html", "/Test", "/nonexisting/"] {
        let response = interface().handle(&Request::head(path));
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {}", path);
        assert!(response.body().is_empty());
    }
}

#[test]
fn test_traversal_is_not_found() {
    for path in [
        "/../secret.html",
        "/Test/%2E%2E/secret.html",
        "/+file/Test/../Test.txt",
        "/+resources/../Cargo.toml",
    ] {
        assert_eq!(get(path).status(), StatusCode::NOT_FOUND, "path {}", path);
    }
}

// =============================================================================
// Attachments and Resources
// =============================================================================

#[test]
fn test_attachment() {
    let response = get("/+file/Test/foo/attachment.pdf");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("Content-Type"), Some("application/pdf"));
    assert_eq!(response.header("Content-Length"), Some("8"));
    assert_eq!(response.body().as_ref(), b"%PDF-1.4");
}

#[test]
fn test_sub_page_source_is_not_an_attachment() {
    let response = get("/+file/Test/foo/bar.txt");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_file_named_after_sub_page_is_not_an_attachment() {
    let notebook = test_notebook().with_attachment("Test:foo", "bar", b"plain file");
    let interface = WwwInterface::new(notebook, builtin_template());

    let response = interface.handle(&Request::get("/+file/Test/foo/bar"));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_text(interface.handle(&Request::get("/Test/foo.html")).body());
    assert!(!body.contains("/+file/Test/foo/bar'"));
    assert!(body.contains("/+file/Test/foo/attachment.pdf"));
}

#[test]
fn test_missing_attachment() {
    assert_eq!(
        get("/+file/Test/foo/missing.pdf").status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_favicon_and_builtin_resources() {
    let response = get("/favicon.ico");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.header("Content-Type").unwrap();
    assert!(content_type.starts_with("image/"), "{}", content_type);
    assert!(!response.body().is_empty());

    let response = get("/+resources/checked-box.png");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("Content-Type"), Some("image/png"));

    assert_eq!(
        get("/+resources/missing.png").status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_builtin_template_has_no_folder_resources() {
    assert_eq!(
        get("/+resources/foo/bar.png").status(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_file_template_resources() {
    let interface = WwwInterface::new(test_notebook(), file_template());

    let response = interface.handle(&Request::get("/+resources/foo/bar.png"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header("Content-Type"), Some("image/png"));
    assert_eq!(&response.body()[..4], b"\x89PNG");

    // Built-in resources are still available as a fallback
    let response = interface.handle(&Request::get("/+resources/checked-box.png"));
    assert_eq!(response.status(), StatusCode::OK);

    let response = interface.handle(&Request::get("/Test/foo.html"));
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response.body());
    assert!(body.contains(CONTENT_MARKER));
    assert!(body.contains("<div class=\"footer\">Test:foo</div>"));
}

// =============================================================================
// Methods
// =============================================================================

#[test]
fn test_head_matches_get() {
    for path in [
        "/",
        "/Test/foo.html",
        "/+file/Test/foo/attachment.pdf",
        "/favicon.ico",
        "/nonexistingpage.html",
    ] {
        let get = interface().handle(&Request::get(path));
        let head = interface().handle(&Request::head(path));

        assert_eq!(get.status(), head.status(), "path {}", path);
        let names = |r: &Response| -> Vec<String> {
            r.headers().iter().map(|(n, _)| n.as_str().to_string()).collect()
        };
        assert_eq!(names(&get), names(&head), "path {}", path);
        for name in ["Content-Type", "Content-Length"] {
            assert_eq!(get.header(name), head.header(name), "path {} {}", path, name);
        }

        assert!(head.body().is_empty());
        if get.status() == StatusCode::OK {
            assert!(!get.body().is_empty());
        }
    }
}

#[test]
fn test_other_methods_not_allowed() {
    let response = interface().handle(&Request::new(Method::POST, "/Test/foo.html"));
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.header("Allow"), Some("GET, HEAD"));
    assert_single_core_headers(&response);
}

// =============================================================================
// Faults
// =============================================================================

#[test]
fn test_store_fault_is_server_error() {
    let notebook = test_notebook().with_fault("Test:foo");
    let interface = WwwInterface::new(notebook, builtin_template());

    let response = interface.handle(&Request::get("/Test/foo.html"));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_single_core_headers(&response);
    assert!(!body_text(response.body()).contains("simulated failure"));

    // The interface keeps serving other requests
    let response = interface.handle(&Request::get("/Test.html"));
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_store_fault_in_index() {
    let notebook = test_notebook().with_fault("");
    let interface = WwwInterface::new(notebook, builtin_template());
    assert_eq!(
        interface.handle(&Request::get("/")).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// =============================================================================
// Filesystem Notebook
// =============================================================================

#[test]
fn test_fs_notebook_end_to_end() {
    let (dir, notebook) = create_fs_notebook();
    let interface = WwwInterface::new(notebook, builtin_template());

    let response = interface.handle(&Request::get("/"));
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response.body())
        .contains("<li><a href=\"/Test/foo.html\" title=\"foo\" class=\"page\">foo</a>"));

    let response = interface.handle(&Request::get("/Test/foo.html"));
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response.body());
    assert!(body.contains("<h1>Foo <a name='Test:foo'></a></h1>"));
    assert!(body.contains("<td><a href='/+file/Test/foo/attachment.pdf'>attachment.pdf</a></td>"));
    assert!(body.contains("href=\"/Test/foo/bar.html\""));
    assert!(!body.contains("bar.txt"));

    let response = interface.handle(&Request::get("/+file/Test/foo/attachment.pdf"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"%PDF-1.4");

    assert_eq!(
        interface.handle(&Request::get("/+file/Test/foo/bar.txt")).status(),
        StatusCode::NOT_FOUND
    );

    // A plain file named like the sub-page is neither listed nor served
    std::fs::write(dir.path().join("Test/foo/bar"), b"plain file").unwrap();
    let body = body_text(interface.handle(&Request::get("/Test/foo.html")).body());
    assert!(!body.contains("/+file/Test/foo/bar'"));
    assert_eq!(
        interface.handle(&Request::get("/+file/Test/foo/bar")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        interface.handle(&Request::get("/nonexistingpage.html")).status(),
        StatusCode::NOT_FOUND
    );
}
