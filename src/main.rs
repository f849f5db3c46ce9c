//! WebM to MP4 Converter
//!
//! Main entry point for the application.

mod app;
mod converter;

use app::ConverterApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting WebM Converter v{}", env!("CARGO_PKG_VERSION"));

    // Any otherwise-unhandled panic ends up in a dialog instead of a
    // silently vanishing window.
    std::panic::set_hook(Box::new(|info| {
        let message = info.to_string();
        log::error!("Unhandled panic: {}", message);
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Application error")
            .set_description(message)
            .show();
    }));

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_resizable(false)
            .with_title("WebM to MP4 Converter"),
        ..Default::default()
    };

    // Run the app
    eframe::run_native(
        "WebM to MP4 Converter",
        native_options,
        Box::new(|cc| Box::new(ConverterApp::new(cc))),
    )
}
