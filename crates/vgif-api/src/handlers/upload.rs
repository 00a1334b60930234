//! Video upload and conversion handler.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::Html;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_conversion, record_upload_bytes};
use crate::render::result_page;
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// A file part read from the upload form.
#[derive(Debug)]
pub struct UploadedVideo {
    /// File name as sent by the client.
    pub file_name: String,
    pub data: Bytes,
}

/// Convert an uploaded video to a GIF and return it embedded in HTML.
///
/// On success both the stored upload and the GIF are scheduled for deletion
/// after the configured delay. On failure nothing is cleaned up.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Html<String>> {
    let multipart = multipart.map_err(|e| ApiError::parse_form(e.body_text()))?;
    let video = read_video_field(multipart).await?;

    let video_path = state
        .paths
        .upload_path(&video.file_name)
        .ok_or_else(|| ApiError::missing_upload(format!("unusable file name {:?}", video.file_name)))?;

    save_upload(&video_path, &video.data).await?;
    record_upload_bytes(video.data.len());
    info!(
        filename = %video.file_name,
        path = %video_path.display(),
        bytes = video.data.len(),
        "Saved upload"
    );

    let gif_path = state.paths.output_path(&video_path);
    if let Err(e) = state.converter.convert(&video_path, &gif_path).await {
        record_conversion(if e.is_precondition() { "missing_input" } else { "failed" });
        return Err(e.into());
    }
    record_conversion("converted");

    let gif = fs::read(&gif_path).await.map_err(ApiError::ReadOutput)?;
    let page = result_page(&gif);

    schedule_cleanup(&state, video_path, gif_path);

    Ok(Html(page))
}

/// Reject anything but POST on the upload route.
pub async fn upload_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Read the whole form and return the first file part named `video`.
///
/// Every part is consumed so a malformed or oversized body is reported as a
/// parse failure even when the video part came first.
pub async fn read_video_field(mut multipart: Multipart) -> ApiResult<UploadedVideo> {
    let mut video: Option<UploadedVideo> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::parse_form(e.body_text()))?
    {
        let is_video = field.name() == Some(VIDEO_FIELD);
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::parse_form(e.body_text()))?;

        if video.is_none() && is_video {
            if let Some(file_name) = file_name {
                video = Some(UploadedVideo { file_name, data });
            }
        }
    }

    video.ok_or_else(|| ApiError::missing_upload(format!("no file in field {:?}", VIDEO_FIELD)))
}

/// Write the upload to disk, replacing any file with the same name.
async fn save_upload(path: &Path, data: &[u8]) -> ApiResult<()> {
    let mut file = File::create(path).await.map_err(ApiError::CreateFile)?;
    file.write_all(data).await.map_err(ApiError::SaveFile)?;
    file.flush().await.map_err(ApiError::SaveFile)?;
    Ok(())
}

fn schedule_cleanup(state: &AppState, video_path: PathBuf, gif_path: PathBuf) {
    // Detached; outlives the request.
    drop(state.cleanup.schedule([video_path, gif_path]));
}
