//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use vgif_media::paths::{DEFAULT_OUTPUT_DIR, DEFAULT_UPLOAD_DIR};
use vgif_media::{StoragePaths, DEFAULT_FFMPEG_PROGRAM};

/// API server configuration.
///
/// All values are fixed at build time; there is no environment or file
/// override.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory receiving uploaded videos
    pub upload_dir: PathBuf,
    /// Directory receiving generated GIFs
    pub output_dir: PathBuf,
    /// Max multipart body size
    pub max_body_size: usize,
    /// Delay between a successful response and artifact deletion
    pub cleanup_delay: Duration,
    /// FFmpeg program name or path
    pub ffmpeg_program: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_body_size: 10 * 1024 * 1024, // 10MB
            cleanup_delay: Duration::from_secs(10),
            ffmpeg_program: PathBuf::from(DEFAULT_FFMPEG_PROGRAM),
        }
    }
}

impl ApiConfig {
    /// Storage layout described by this config.
    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(&self.upload_dir, &self.output_dir)
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.max_body_size, 10_485_760);
        assert_eq!(config.cleanup_delay, Duration::from_secs(10));
        assert_eq!(config.storage_paths(), StoragePaths::default());
    }
}
