//! Upload form handler.

use axum::response::Html;

use crate::render::UPLOAD_FORM_HTML;

/// Serve the upload form. Also used as the router fallback.
pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM_HTML)
}
