//! WebM to MP4 Converter Library
//!
//! A small desktop utility that batch-converts WebM files to MP4 by shelling
//! out to FFmpeg, one file at a time, with progress reported in a native GUI.

pub mod app;
pub mod converter;

// Re-export commonly used types
pub use app::ConverterApp;
pub use converter::{Ffmpeg, FfmpegError, WorkerEvent};
