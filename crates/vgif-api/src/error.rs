//! API error types.
//!
//! Every failure maps to a flat status code and a short plain-text message.
//! Inner causes are logged and never sent to the client.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use vgif_media::MediaError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error("Could not parse form: {0}")]
    ParseForm(String),

    #[error("Could not get uploaded file: {0}")]
    MissingUpload(String),

    #[error("Could not save uploaded file: {0}")]
    CreateFile(#[source] std::io::Error),

    #[error("Failed to save file: {0}")]
    SaveFile(#[source] std::io::Error),

    #[error("Failed to convert video to GIF: {0}")]
    Conversion(#[from] MediaError),

    #[error("Failed to read GIF file: {0}")]
    ReadOutput(#[source] std::io::Error),
}

impl ApiError {
    pub fn parse_form(msg: impl Into<String>) -> Self {
        Self::ParseForm(msg.into())
    }

    pub fn missing_upload(msg: impl Into<String>) -> Self {
        Self::MissingUpload(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::ParseForm(_)
            | ApiError::CreateFile(_)
            | ApiError::SaveFile(_)
            | ApiError::Conversion(_)
            | ApiError::ReadOutput(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Invalid request method",
            ApiError::ParseForm(_) => "Could not parse form",
            ApiError::MissingUpload(_) => "Could not get uploaded file",
            ApiError::CreateFile(_) => "Could not save uploaded file",
            ApiError::SaveFile(_) => "Failed to save file",
            ApiError::Conversion(_) => "Failed to convert video to GIF",
            ApiError::ReadOutput(_) => "Failed to read GIF file",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self.public_message()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::missing_upload("no video field").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::parse_form("length limit exceeded").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let conversion: ApiError = MediaError::InputNotFound(PathBuf::from("x.mov")).into();
        assert_eq!(conversion.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_response_hides_inner_cause() {
        let err: ApiError = MediaError::ffmpeg_failed("secret diagnostics", Some(1)).into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Failed to convert video to GIF\n");
    }
}
