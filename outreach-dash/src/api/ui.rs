//! Static dashboard page
//!
//! Both assets are compiled into the binary. They are served with
//! `no-cache` so a restarted dashboard never pairs a stale page with a
//! newer JSON shape.

use axum::http::{header, HeaderValue};
use axum::response::IntoResponse;

const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

fn embedded_asset(content_type: &'static str, body: &'static str) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        body,
    )
}

/// GET /
pub async fn serve_index() -> impl IntoResponse {
    embedded_asset("text/html; charset=utf-8", INDEX_HTML)
}

/// GET /static/app.js
pub async fn serve_app_js() -> impl IntoResponse {
    embedded_asset("application/javascript; charset=utf-8", APP_JS)
}
