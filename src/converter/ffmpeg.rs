//! FFmpeg wrapper for video conversion.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors that can occur during FFmpeg operations.
#[derive(Error, Debug)]
pub enum FfmpegError {
    #[error("FFmpeg binary not found. Please install FFmpeg and make sure it is on PATH")]
    NotFound,
    #[error("Failed to run FFmpeg: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("FFmpeg conversion failed: {0}")]
    ConversionFailed(String),
    #[error("FFmpeg is not usable: {0}")]
    Unusable(String),
}

/// Wrapper around a resolved FFmpeg binary.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    /// Path to the FFmpeg binary
    path: PathBuf,
}

impl Ffmpeg {
    /// Locate FFmpeg on the system.
    pub fn locate() -> Result<Self, FfmpegError> {
        Self::find_ffmpeg().map(|path| Self { path })
    }

    /// Wrap an explicit binary path without searching.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The resolved binary path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find the FFmpeg binary in various locations.
    fn find_ffmpeg() -> Result<PathBuf, FfmpegError> {
        // 1. Check system PATH using which crate
        if let Ok(path) = which::which("ffmpeg") {
            return Ok(path);
        }

        // 2. Check common install locations
        let common_paths = if cfg!(target_os = "macos") {
            vec![
                "/usr/local/bin/ffmpeg",
                "/opt/homebrew/bin/ffmpeg",
                "/opt/local/bin/ffmpeg",
            ]
        } else if cfg!(target_os = "windows") {
            vec![
                "C:\\ffmpeg\\bin\\ffmpeg.exe",
                "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
            ]
        } else {
            vec![
                "/usr/bin/ffmpeg",
                "/usr/local/bin/ffmpeg",
            ]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(FfmpegError::NotFound)
    }

    /// Run a minimal version query to confirm the binary actually works.
    ///
    /// Returns the first line of the version banner for display.
    pub fn version(&self) -> Result<String, FfmpegError> {
        let output = Command::new(&self.path).arg("-version").output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FfmpegError::Unusable(stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }

    /// Convert a single input file, blocking until FFmpeg exits.
    ///
    /// Video is re-encoded to H.264 (CRF 23, medium preset) and audio to
    /// AAC at 128 kb/s; an existing destination is overwritten.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<(), FfmpegError> {
        let result = Command::new(&self.path)
            .arg("-i")
            .arg(input)
            .args([
                "-c:v", "libx264",
                "-crf", "23",
                "-preset", "medium",
                "-c:a", "aac",
                "-b:a", "128k",
                "-y",
            ])
            .arg(output)
            .output()?;

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            Err(FfmpegError::ConversionFailed(stderr))
        }
    }

    /// Generate the output path for a converted file.
    pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());

        output_dir.join(format!("{}.mp4", stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(
            Ffmpeg::output_path(Path::new("/videos/clip.webm"), Path::new("/output")),
            PathBuf::from("/output/clip.mp4")
        );
    }

    #[test]
    fn output_path_is_stable_across_runs() {
        let input = Path::new("/videos/holiday.webm");
        let dir = Path::new("/output");
        assert_eq!(
            Ffmpeg::output_path(input, dir),
            Ffmpeg::output_path(input, dir)
        );
    }

    #[test]
    fn output_path_without_stem_falls_back() {
        assert_eq!(
            Ffmpeg::output_path(Path::new(".."), Path::new("/output")),
            PathBuf::from("/output/output.mp4")
        );
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable shell script into `dir` and return its path.
        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "#!/bin/sh").unwrap();
            writeln!(file, "{}", body).unwrap();
            drop(file);
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn version_returns_first_banner_line() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_script(
                dir.path(),
                "ffmpeg",
                "echo 'ffmpeg version 6.1.1'; echo 'built with gcc'",
            );

            let version = Ffmpeg::at(tool).version().unwrap();
            assert_eq!(version, "ffmpeg version 6.1.1");
        }

        #[test]
        fn version_reports_unusable_binary() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_script(dir.path(), "ffmpeg", "echo 'bad install' >&2; exit 1");

            let err = Ffmpeg::at(tool).version().unwrap_err();
            assert!(matches!(err, FfmpegError::Unusable(ref msg) if msg.contains("bad install")));
        }

        #[test]
        fn convert_captures_stderr_on_failure() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_script(dir.path(), "ffmpeg", "echo 'no such codec' >&2; exit 1");

            let err = Ffmpeg::at(tool)
                .convert(Path::new("/videos/clip.webm"), Path::new("/tmp/clip.mp4"))
                .unwrap_err();
            assert!(matches!(err, FfmpegError::ConversionFailed(ref msg) if msg.contains("no such codec")));
        }

        #[test]
        fn convert_spawn_error_for_missing_tool() {
            let err = Ffmpeg::at("/nonexistent/ffmpeg")
                .convert(Path::new("/videos/clip.webm"), Path::new("/tmp/clip.mp4"))
                .unwrap_err();
            assert!(matches!(err, FfmpegError::Spawn(_)));
        }
    }
}
