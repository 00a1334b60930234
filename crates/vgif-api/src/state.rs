//! Application state.

use std::sync::Arc;

use vgif_media::{FfmpegGifConverter, GifConverter, StoragePaths};

use crate::cleanup::CleanupScheduler;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub paths: StoragePaths,
    pub converter: Arc<dyn GifConverter>,
    pub cleanup: CleanupScheduler,
}

impl AppState {
    /// Create application state converting with FFmpeg.
    pub fn new(config: ApiConfig) -> Self {
        let converter = Arc::new(FfmpegGifConverter::new(config.ffmpeg_program.clone()));
        Self::with_converter(config, converter)
    }

    /// Create application state with a custom converter.
    pub fn with_converter(config: ApiConfig, converter: Arc<dyn GifConverter>) -> Self {
        Self {
            paths: config.storage_paths(),
            cleanup: CleanupScheduler::new(config.cleanup_delay),
            config: Arc::new(config),
            converter,
        }
    }
}
