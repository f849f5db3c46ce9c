//! Sequential batch worker.
//!
//! The worker runs on its own thread, converts each input file to completion
//! before moving to the next, and reports back to the UI thread over a
//! channel. It never touches UI state directly.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

use super::ffmpeg::Ffmpeg;

/// Events sent from the batch worker to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// Status line text; each update replaces the previous one.
    Status(String),
    /// Overall batch progress in percent (0.0 - 100.0).
    Progress(f32),
    /// The batch finished; every input was attempted.
    BatchComplete { total: usize, failed: usize },
}

/// Spawn a batch on a dedicated thread.
///
/// The worker owns a snapshot of the file list and output directory taken at
/// spawn time, so later changes in the UI cannot affect a running batch.
pub fn spawn_batch(
    ffmpeg: Ffmpeg,
    files: Vec<PathBuf>,
    output_dir: PathBuf,
    events: Sender<WorkerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || run_batch(&ffmpeg, &files, &output_dir, &events))
}

/// Convert every file in order, one at a time.
///
/// Per-file failures are reported as status events and never abort the
/// batch. The progress value emitted before file `i` of `n` is `i / n * 100`,
/// so the bar only reaches 100 through the final explicit update after the
/// loop.
pub fn run_batch(ffmpeg: &Ffmpeg, files: &[PathBuf], output_dir: &Path, events: &Sender<WorkerEvent>) {
    let total = files.len();
    let mut failed = 0usize;

    for (index, input) in files.iter().enumerate() {
        let file_name = input
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let _ = events.send(WorkerEvent::Status(format!(
            "Converting {}/{}: {}",
            index + 1,
            total,
            file_name
        )));
        let _ = events.send(WorkerEvent::Progress(index as f32 / total as f32 * 100.0));

        let output = Ffmpeg::output_path(input, output_dir);
        log::info!("Converting {} -> {}", input.display(), output.display());

        if let Err(e) = ffmpeg.convert(input, &output) {
            failed += 1;
            log::error!("Conversion of {} failed: {}", input.display(), e);
            let _ = events.send(WorkerEvent::Status(format!(
                "Failed to convert {}: {}",
                file_name, e
            )));
        }
    }

    let _ = events.send(WorkerEvent::Progress(100.0));
    let _ = events.send(WorkerEvent::Status(format!(
        "Batch complete: {} files processed",
        total
    )));
    let _ = events.send(WorkerEvent::BatchComplete { total, failed });
}
