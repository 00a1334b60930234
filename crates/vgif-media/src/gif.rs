//! Video to GIF conversion.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Sampling rate of the generated GIF.
pub const GIF_FPS: u32 = 10;
/// Output width in pixels; height follows the source aspect ratio.
pub const GIF_WIDTH: u32 = 320;
/// Scaler used when resizing frames.
pub const GIF_SCALE_FLAGS: &str = "lanczos";
/// Longest GIF produced, in seconds of source video.
pub const GIF_MAX_DURATION_SECS: u32 = 10;
/// Extension of generated files.
pub const GIF_EXTENSION: &str = "gif";
/// File name offered to the browser when downloading the result.
pub const DOWNLOAD_FILE_NAME: &str = "output.gif";

/// FFmpeg filter graph for GIF output.
pub fn gif_filter() -> String {
    format!(
        "fps={},scale={}:-1:flags={}",
        GIF_FPS, GIF_WIDTH, GIF_SCALE_FLAGS
    )
}

/// Build the FFmpeg command converting `input` into a GIF at `output`.
pub fn gif_command(input: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::new(input, output)
        .video_filter(gif_filter())
        .max_duration(GIF_MAX_DURATION_SECS)
}

/// Converts an uploaded video into an animated GIF.
#[async_trait]
pub trait GifConverter: Send + Sync {
    /// Convert `input` into a GIF written at `output`.
    ///
    /// Returns once the output is fully written or conversion has failed.
    async fn convert(&self, input: &Path, output: &Path) -> MediaResult<()>;
}

/// [`GifConverter`] backed by the FFmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegGifConverter {
    runner: FfmpegRunner,
}

impl FfmpegGifConverter {
    /// Create a converter invoking the given FFmpeg program (name or path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            runner: FfmpegRunner::new(program),
        }
    }
}

#[async_trait]
impl GifConverter for FfmpegGifConverter {
    async fn convert(&self, input: &Path, output: &Path) -> MediaResult<()> {
        convert_video_to_gif(&self.runner, input, output).await
    }
}

/// Convert a video file into a GIF with the fixed output settings.
///
/// The input must exist; this is checked before FFmpeg is started so a
/// missing upload is reported as [`MediaError::InputNotFound`] rather than as
/// a tool failure.
pub async fn convert_video_to_gif(
    runner: &FfmpegRunner,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !fs::try_exists(input).await.unwrap_or(false) {
        return Err(MediaError::InputNotFound(input.to_path_buf()));
    }

    info!(
        input = %input.display(),
        output = %output.display(),
        "Converting video to GIF"
    );

    runner.run(&gif_command(input, output)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gif_filter() {
        assert_eq!(gif_filter(), "fps=10,scale=320:-1:flags=lanczos");
    }

    #[test]
    fn test_gif_command_args() {
        let args: Vec<String> = gif_command("uploads/clip.mov", "gifs/clip.gif")
            .build_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-y",
                "-i",
                "uploads/clip.mov",
                "-vf",
                "fps=10,scale=320:-1:flags=lanczos",
                "-t",
                "10",
                "gifs/clip.gif",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_input_is_reported_before_launch() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("missing.mov");
        let output = dir.path().join("missing.gif");

        // A runner that could never launch proves FFmpeg was not reached.
        let runner = FfmpegRunner::new("/nonexistent/vgif-ffmpeg");
        let err = convert_video_to_gif(&runner, &input, &output)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::InputNotFound(ref p) if p == &input));
        assert!(err.is_precondition());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_unavailable_ffmpeg_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.mov");
        let output = dir.path().join("clip.gif");
        fs::write(&input, b"not really a video").await.unwrap();

        let converter = FfmpegGifConverter::new("/nonexistent/vgif-ffmpeg");
        let err = converter.convert(&input, &output).await.unwrap_err();

        assert!(matches!(err, MediaError::FfmpegNotFound(_)));
        assert!(!err.is_precondition());
        assert!(!output.exists());
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_converts_generated_clip() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("clip.mp4");
        let output = dir.path().join("clip.gif");

        let status = tokio::process::Command::new("ffmpeg")
            .args(["-y", "-v", "error", "-f", "lavfi", "-i", "testsrc=duration=2:size=640x360:rate=25"])
            .arg(&input)
            .status()
            .await
            .unwrap();
        assert!(status.success());

        FfmpegGifConverter::default()
            .convert(&input, &output)
            .await
            .unwrap();

        let bytes = fs::read(&output).await.unwrap();
        assert!(bytes.starts_with(b"GIF8"));
    }
}
