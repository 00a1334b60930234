//! On-disk locations for uploads and generated GIFs.

use std::path::{Path, PathBuf};

use crate::error::MediaResult;
use crate::gif::GIF_EXTENSION;

/// Default directory for incoming uploads, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads/";
/// Default directory for generated GIFs, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./gifs/";

/// Upload and output directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DIR, DEFAULT_OUTPUT_DIR)
    }
}

impl StoragePaths {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create both directories if they are missing.
    ///
    /// Directories are created with mode 0o777 (subject to the process umask).
    /// Calling this on existing directories is a no-op.
    pub fn ensure_dirs(&self) -> MediaResult<()> {
        create_dir_all_open(&self.upload_dir)?;
        create_dir_all_open(&self.output_dir)?;
        Ok(())
    }

    /// Location of an uploaded file.
    ///
    /// Only the final component of the client-supplied name is used, so a
    /// name like `a/b/clip.mov` lands at `upload_dir/clip.mov`. Returns `None`
    /// when the name has no usable file component (empty, `..`, `/`).
    pub fn upload_path(&self, client_file_name: &str) -> Option<PathBuf> {
        let file_name = Path::new(client_file_name).file_name()?;
        Some(self.upload_dir.join(file_name))
    }

    /// Location of the GIF generated from `input`.
    pub fn output_path(&self, input: impl AsRef<Path>) -> PathBuf {
        output_gif_path(input, &self.output_dir)
    }
}

/// Derive the GIF path for an input video.
///
/// The input's extension is replaced with `gif` (or added when absent) and
/// the file is relocated into `output_dir`, keeping its base name.
pub fn output_gif_path(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let mut file_name = input
        .file_stem()
        .unwrap_or_else(|| input.as_os_str())
        .to_os_string();
    file_name.push(".");
    file_name.push(GIF_EXTENSION);
    output_dir.as_ref().join(file_name)
}

#[cfg(unix)]
fn create_dir_all_open(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o777)
        .create(path)
}

#[cfg(not(unix))]
fn create_dir_all_open(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_replaces_extension() {
        let path = output_gif_path("./uploads/clip.mov", "./gifs/");
        assert!(path.ends_with("clip.gif"));
        assert_eq!(path.parent(), Some(Path::new("./gifs/")));
    }

    #[test]
    fn test_output_path_without_extension() {
        let path = output_gif_path("./uploads/name", "./gifs/");
        assert_eq!(path, Path::new("./gifs/name.gif"));
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        let path = output_gif_path("holiday.final.mp4", "out");
        assert_eq!(path, Path::new("out/holiday.final.gif"));
    }

    #[test]
    fn test_upload_path_uses_final_component() {
        let paths = StoragePaths::new("up", "out");
        assert_eq!(paths.upload_path("clip.mov"), Some(PathBuf::from("up/clip.mov")));
        assert_eq!(
            paths.upload_path("../../etc/clip.mov"),
            Some(PathBuf::from("up/clip.mov"))
        );
        assert_eq!(paths.upload_path(""), None);
        assert_eq!(paths.upload_path(".."), None);
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = StoragePaths::new(dir.path().join("uploads"), dir.path().join("gifs"));

        paths.ensure_dirs().unwrap();
        paths.ensure_dirs().unwrap();

        assert!(paths.upload_dir.is_dir());
        assert!(paths.output_dir.is_dir());
    }
}
