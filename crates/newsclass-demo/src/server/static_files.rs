use axum::{
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;
use std::borrow::Cow;

#[derive(Embed)]
#[folder = "web"]
struct WebAssets;

/// Serve the embedded UI
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    // Try exact path first
    if !path.is_empty() {
        if let Some(content) = <WebAssets as Embed>::get(path) {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            return (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response();
        }
    }

    // Single page: every other path gets index.html
    if let Some(content) = <WebAssets as Embed>::get("index.html") {
        return Html(String::from_utf8_lossy(&content.data).to_string()).into_response();
    }

    Html(FALLBACK_HTML.to_string()).into_response()
}

/// Blank image served in place of a missing logo
pub fn placeholder_logo() -> Cow<'static, [u8]> {
    match <WebAssets as Embed>::get("placeholder.svg") {
        Some(content) => content.data,
        None => Cow::Borrowed(FALLBACK_PLACEHOLDER.as_bytes()),
    }
}

const FALLBACK_PLACEHOLDER: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><rect width="100" height="100" fill="#000"/></svg>"##;

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>BBC News Classifier</title>
</head>
<body>
    <h1>News Article Classification</h1>
    <textarea id="text" rows="10" cols="80"></textarea>
    <p><button id="classify">Classify</button></p>
    <p id="result"></p>
    <script>
        document.getElementById('classify').addEventListener('click', async () => {
            const res = await fetch('/api/classify', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ text: document.getElementById('text').value })
            });
            const body = await res.json();
            document.getElementById('result').textContent =
                body.warning || body.error || ('Predicted Category: ' + body.category);
        });
    </script>
</body>
</html>
"#;
