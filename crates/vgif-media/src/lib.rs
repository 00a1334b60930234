//! FFmpeg CLI wrapper for video to GIF conversion.
//!
//! This crate provides:
//! - FFmpeg command building and execution with inherited stdio
//! - The fixed video to GIF conversion
//! - Upload/output directory layout and output path derivation

pub mod command;
pub mod error;
pub mod gif;
pub mod paths;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner, DEFAULT_FFMPEG_PROGRAM};
pub use error::{MediaError, MediaResult};
pub use gif::{
    convert_video_to_gif, gif_command, FfmpegGifConverter, GifConverter, DOWNLOAD_FILE_NAME,
    GIF_EXTENSION,
};
pub use paths::{output_gif_path, StoragePaths};
