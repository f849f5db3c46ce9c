//! Main application window and state.
//!
//! The app owns the job list, the output directory, and the run-in-progress
//! flag. Worker events arrive over a channel and are applied to the display
//! only from here, so the UI thread stays the single writer of presentation
//! state.

use std::path::{Path, PathBuf};

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui::{self, Color32, RichText};

use crate::converter::{spawn_batch, Ffmpeg, WorkerEvent};

/// FFmpeg availability, detected once at startup and never re-checked.
pub enum Capability {
    Available { ffmpeg: Ffmpeg, version: String },
    Unavailable { reason: String },
}

/// Why the Convert action refused to start a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRefusal {
    /// No input files are selected.
    NoFiles,
    /// A batch is already running.
    AlreadyRunning,
    /// FFmpeg was not found at startup.
    FfmpegUnavailable,
}

/// Outcome of a finished batch, used for the completion dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
}

/// Main application state.
pub struct ConverterApp {
    /// Files queued for the next batch
    files: Vec<PathBuf>,
    /// Where converted files are written
    output_dir: PathBuf,
    /// Whether a batch is currently running
    running: bool,
    /// Displayed progress in percent
    progress: f32,
    /// Displayed status line
    status: String,
    /// FFmpeg detection result from startup
    capability: Capability,
    /// Worker event channel; the sender is cloned into each batch
    event_tx: Sender<WorkerEvent>,
    event_rx: Receiver<WorkerEvent>,
}

impl ConverterApp {
    /// Create the application, probing for FFmpeg once.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_capability(detect_ffmpeg())
    }

    fn with_capability(capability: Capability) -> Self {
        let (event_tx, event_rx) = unbounded();

        Self {
            files: Vec::new(),
            output_dir: default_output_dir(),
            running: false,
            progress: 0.0,
            status: "Ready".to_string(),
            capability,
            event_tx,
            event_rx,
        }
    }

    /// Whether the Convert control is currently actionable.
    fn convert_enabled(&self) -> bool {
        matches!(self.capability, Capability::Available { .. }) && !self.running
    }

    fn start_refusal(&self) -> Option<StartRefusal> {
        if matches!(self.capability, Capability::Unavailable { .. }) {
            return Some(StartRefusal::FfmpegUnavailable);
        }
        if self.files.is_empty() {
            return Some(StartRefusal::NoFiles);
        }
        if self.running {
            return Some(StartRefusal::AlreadyRunning);
        }
        None
    }

    /// Start a batch, or report why one cannot start.
    ///
    /// The worker gets an owned snapshot of the file list and output
    /// directory, so selection changes during a run cannot affect it.
    pub fn try_start(&mut self) -> Result<(), StartRefusal> {
        if let Some(refusal) = self.start_refusal() {
            return Err(refusal);
        }
        let Capability::Available { ffmpeg, .. } = &self.capability else {
            return Err(StartRefusal::FfmpegUnavailable);
        };

        self.running = true;
        self.progress = 0.0;
        log::info!(
            "Starting batch: {} files into {}",
            self.files.len(),
            self.output_dir.display()
        );

        let _ = spawn_batch(
            ffmpeg.clone(),
            self.files.clone(),
            self.output_dir.clone(),
            self.event_tx.clone(),
        );
        Ok(())
    }

    /// Apply all pending worker events. Returns the summary when a batch
    /// just finished.
    fn drain_events(&mut self) -> Option<BatchSummary> {
        let mut finished = None;
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                WorkerEvent::Status(text) => self.status = text,
                WorkerEvent::Progress(value) => self.progress = value,
                WorkerEvent::BatchComplete { total, failed } => {
                    self.running = false;
                    finished = Some(BatchSummary { total, failed });
                }
            }
        }
        finished
    }

    fn file_summary(&self) -> String {
        match self.files.as_slice() {
            [] => "No files selected".to_string(),
            [single] => format!("1 file selected: {}", display_file_name(single)),
            many => format!("{} files selected", many.len()),
        }
    }

    fn show_file_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.file_summary());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Select Files").clicked() {
                    self.open_file_dialog();
                }
            });
        });
    }

    fn show_output_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let path_str = self.output_dir.display().to_string();
            let truncated = truncate_path_display(&path_str, 50);
            ui.label(format!("Output folder: {}", truncated));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Change Folder").clicked() {
                    self.open_folder_dialog();
                }
            });
        });
    }

    fn show_progress(&self, ui: &mut egui::Ui) {
        let bar = egui::ProgressBar::new(self.progress / 100.0).show_percentage();
        ui.add(bar);
        ui.vertical_centered(|ui| {
            ui.label(&self.status);
        });
    }

    fn show_convert_button(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.convert_enabled(), |ui| {
                if ui.button(RichText::new("Convert").strong()).clicked() {
                    self.start_clicked();
                }
            });
        });
    }

    fn start_clicked(&mut self) {
        match self.try_start() {
            Ok(()) => {}
            Err(StartRefusal::NoFiles) => {
                notice("No files", "Please select WebM files to convert.");
            }
            Err(StartRefusal::AlreadyRunning) => {
                notice("In progress", "A conversion is already running.");
            }
            Err(StartRefusal::FfmpegUnavailable) => {
                notice("FFmpeg missing", "FFmpeg could not be found on this system.");
            }
        }
    }

    fn show_capability_indicator(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| match &self.capability {
            Capability::Available { version, .. } => {
                ui.label(
                    RichText::new(format!("✓ FFmpeg detected ({})", version))
                        .color(Color32::GREEN)
                        .small(),
                );
            }
            Capability::Unavailable { reason } => {
                ui.label(RichText::new(format!("✗ {}", reason)).color(Color32::RED).small());
            }
        });
    }

    /// Accept WebM files dropped onto the window while no batch is running.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if self.running {
            return;
        }

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.eq_ignore_ascii_case("webm"))
                        .unwrap_or(false)
                })
                .collect()
        });

        if !dropped.is_empty() {
            self.files.extend(dropped);
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("WebM video", &["webm"])
            .pick_files()
        {
            // Cancelled or empty selection keeps the prior list.
            if !paths.is_empty() {
                self.files = paths;
            }
        }
    }

    fn open_folder_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.output_dir)
            .pick_folder()
        {
            self.output_dir = path;
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let finished = self.drain_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("WebM to MP4 Converter");
            });
            ui.add_space(12.0);

            self.show_file_row(ui);
            self.show_output_row(ui);
            ui.add_space(12.0);
            self.show_progress(ui);
            ui.add_space(12.0);
            self.show_convert_button(ui);
            ui.add_space(8.0);
            self.show_capability_indicator(ui);
        });

        self.handle_dropped_files(ctx);

        // Keep draining worker events while a batch runs.
        if self.running {
            ctx.request_repaint();
        }

        // The modal blocks this thread, so it opens only after the panel
        // above has rendered the final status and 100% progress.
        if let Some(summary) = finished {
            show_completion_dialog(summary);
        }
    }
}

/// Probe for FFmpeg once; the result stands for the process lifetime.
fn detect_ffmpeg() -> Capability {
    match Ffmpeg::locate().and_then(|f| f.version().map(|v| (f, v))) {
        Ok((ffmpeg, version)) => {
            log::info!("FFmpeg found at {}: {}", ffmpeg.path().display(), version);
            Capability::Available { ffmpeg, version }
        }
        Err(e) => {
            log::error!("FFmpeg unavailable: {}", e);
            Capability::Unavailable { reason: e.to_string() }
        }
    }
}

/// `~/Videos` when it exists, otherwise the current directory.
fn default_output_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE").map(PathBuf::from);
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME").map(PathBuf::from);

    if let Ok(home) = home {
        let videos = home.join("Videos");
        if videos.is_dir() {
            return videos;
        }
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Keep the tail of a long path display, cutting on a char boundary.
fn truncate_path_display(path_str: &str, max_len: usize) -> String {
    if path_str.len() <= max_len {
        return path_str.to_string();
    }

    let mut cut = path_str.len() - (max_len - 3);
    while !path_str.is_char_boundary(cut) {
        cut += 1;
    }
    format!("...{}", &path_str[cut..])
}

fn notice(title: &str, text: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title(title)
        .set_description(text)
        .show();
}

fn completion_message(summary: BatchSummary) -> String {
    if summary.failed == 0 {
        format!("Successfully converted {} files to MP4.", summary.total)
    } else {
        format!(
            "{} of {} files converted, {} failed. See the status line for details.",
            summary.total - summary.failed,
            summary.total,
            summary.failed
        )
    }
}

fn show_completion_dialog(summary: BatchSummary) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("Conversion finished")
        .set_description(completion_message(summary))
        .show();
}
