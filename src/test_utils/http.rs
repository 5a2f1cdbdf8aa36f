use axum::{body::Body, http::StatusCode, response::Response};
use axum_htmx::HX_REDIRECT;

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let got = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");

    assert_eq!(got, content_type);
}

/// Assert that HTMX will send the browser to `url`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, url: &str) {
    let got = response
        .headers()
        .get(HX_REDIRECT)
        .unwrap_or_else(|| panic!("want redirect to {url}, got no {HX_REDIRECT} header"));

    assert_eq!(got, url, "want redirect to {url}, got {got:?}");
}
