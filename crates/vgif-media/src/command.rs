//! FFmpeg command builder and runner.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use metrics::histogram;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Default FFmpeg program name, resolved through `PATH`.
pub const DEFAULT_FFMPEG_PROGRAM: &str = "ffmpeg";

/// Histogram of FFmpeg wall-clock durations.
pub const FFMPEG_DURATION_SECONDS: &str = "vgif_ffmpeg_duration_seconds";

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level, FFmpeg's own default when unset
    log_level: Option<String>,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: None,
        }
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Cap the output duration.
    pub fn max_duration(self, seconds: u32) -> Self {
        self.output_arg("-t").output_arg(seconds.to_string())
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Whether an existing output file is overwritten.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build the command arguments.
    ///
    /// Paths are passed as `OsString` so non-UTF-8 file names reach FFmpeg
    /// unchanged.
    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        if self.overwrite {
            args.push("-y".into());
        }

        if let Some(level) = &self.log_level {
            args.push("-v".into());
            args.push(level.into());
        }

        args.push("-i".into());
        args.push(self.input.as_os_str().to_owned());

        args.extend(self.output_args.iter().map(OsString::from));

        args.push(self.output.as_os_str().to_owned());

        args
    }
}

/// Runner for FFmpeg commands.
///
/// The child inherits the server's stdout and stderr so FFmpeg diagnostics
/// land on the operator console and nowhere else.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    program: PathBuf,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_PROGRAM)
    }
}

impl FfmpegRunner {
    /// Create a runner for the given FFmpeg program (name or path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run an FFmpeg command to completion.
    ///
    /// The child is killed if the returned future is dropped before it exits.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let program = check_ffmpeg(&self.program)?;

        let args = cmd.build_args();
        debug!(
            "Running FFmpeg: {} {}",
            program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let start = Instant::now();
        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                MediaError::ffmpeg_failed(
                    format!("failed to launch {}: {}", program.display(), e),
                    None,
                )
            })?;

        let status = child.wait().await?;
        let elapsed = start.elapsed();
        histogram!(FFMPEG_DURATION_SECONDS).record(elapsed.as_secs_f64());

        if status.success() {
            info!(
                output = %cmd.output().display(),
                duration_ms = elapsed.as_millis() as u64,
                "FFmpeg finished"
            );
            Ok(())
        } else {
            warn!(
                input = %cmd.input().display(),
                exit_code = ?status.code(),
                "FFmpeg exited with non-zero status"
            );
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                status.code(),
            ))
        }
    }
}

/// Resolve an FFmpeg program name or path to an executable.
pub fn check_ffmpeg(program: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let program = program.as_ref();
    which::which(program)
        .map_err(|_| MediaError::FfmpegNotFound(program.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_as_strings(cmd: &FfmpegCommand) -> Vec<String> {
        cmd.build_args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("input.mp4", "output.gif")
            .video_filter("fps=10")
            .max_duration(10);

        assert_eq!(
            args_as_strings(&cmd),
            vec!["-y", "-i", "input.mp4", "-vf", "fps=10", "-t", "10", "output.gif"]
        );
    }

    #[test]
    fn test_log_level_precedes_input() {
        let cmd = FfmpegCommand::new("in.mov", "out.gif")
            .log_level("error")
            .overwrite(false);

        let args = args_as_strings(&cmd);
        assert_eq!(args, vec!["-v", "error", "-i", "in.mov", "out.gif"]);
    }

    #[test]
    fn test_check_ffmpeg_missing_program() {
        let err = check_ffmpeg("/nonexistent/vgif-ffmpeg").unwrap_err();
        assert!(matches!(err, MediaError::FfmpegNotFound(_)));
    }

    #[tokio::test]
    async fn test_runner_reports_missing_program() {
        let runner = FfmpegRunner::new("/nonexistent/vgif-ffmpeg");
        let cmd = FfmpegCommand::new("in.mov", "out.gif");

        let err = runner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::FfmpegNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runner_reports_non_zero_exit() {
        // `false` accepts any arguments and always exits with status 1.
        let runner = FfmpegRunner::new("false");
        let cmd = FfmpegCommand::new("in.mov", "out.gif");

        match runner.run(&cmd).await {
            Err(MediaError::FfmpegFailed { exit_code, .. }) => assert_eq!(exit_code, Some(1)),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
