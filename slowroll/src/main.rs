//! slowRoll — MIDI timeline and falling-shapes visualizer

mod app;
mod audio;
mod config;
mod job;
mod library;
mod panels;
mod session;

use app::SlowRollApp;
use clap::Parser;
use config::{Args, Settings};
use log::warn;
use rollcore::theme::SlowTheme;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::resolve(&args);
    let initial_file = args.file;

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 680.0])
        .with_min_inner_size([600.0, 400.0])
        .with_drag_and_drop(true);

    if let Some(pos) = rollcore::cascade_position() {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "slowRoll",
        options,
        Box::new(move |cc| {
            SlowTheme::default().apply(&cc.egui_ctx);
            let mut app = SlowRollApp::new(cc, settings);
            if let Some(path) = initial_file {
                if path.exists() {
                    app.select(path);
                    app.process();
                } else {
                    warn!("{} does not exist", path.display());
                }
            }
            Box::new(app)
        }),
    )
}
