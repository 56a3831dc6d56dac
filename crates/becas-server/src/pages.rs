//! Static pages and the list script, embedded at compile time.

use axum::{http::header, response::{Html, IntoResponse}};

const INDEX: &str = include_str!("../assets/index.html");
const UPLOAD: &str = include_str!("../assets/upload.html");
const LIST: &str = include_str!("../assets/list.html");
const SCRIPT: &str = include_str!("../assets/script.js");

/// `GET /`
pub async fn index() -> Html<&'static str> { Html(INDEX) }

/// `GET /upload`
pub async fn upload() -> Html<&'static str> { Html(UPLOAD) }

/// `GET /list`
pub async fn list() -> Html<&'static str> { Html(LIST) }

/// `GET /script.js`
pub async fn script() -> impl IntoResponse {
  ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], SCRIPT)
}
