//! WebM to MP4 Conversion Module
//!
//! Shells out to FFmpeg once per input file, sequentially.

mod ffmpeg;
mod worker;

pub use ffmpeg::{Ffmpeg, FfmpegError};
pub use worker::{run_batch, spawn_batch, WorkerEvent};
