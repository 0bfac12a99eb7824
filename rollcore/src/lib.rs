//! rollcore — timeline and falling-shapes rendering core for slowRoll
//!
//! Everything in here is frame-driven and synchronous, except the
//! processing task handle, which hands work to a single worker thread.

pub mod easing;
pub mod falling;
pub mod geometry;
pub mod import;
pub mod piece;
pub mod playback;
pub mod repaint;
pub mod spinner;
pub mod summary;
pub mod task;
pub mod theme;
pub mod timeline;
pub mod widgets;

pub use import::ImportError;
pub use piece::{EventKind, Note, NoteEvent, Piece, Track};
pub use playback::PlaybackClock;
pub use repaint::RepaintController;
pub use summary::{PieceSummary, PitchRange, TrackSummary};
pub use theme::SlowTheme;

/// Get cascade window position offset from environment variable
/// Returns (x_offset, y_offset) based on SLOWOS_CASCADE env var
pub fn cascade_position() -> Option<egui::Pos2> {
    std::env::var("SLOWOS_CASCADE").ok()
        .and_then(|s| s.parse::<u32>().ok())
        .map(|n| {
            let offset = (n as f32) * 30.0;
            egui::Pos2::new(100.0 + offset, 100.0 + offset)
        })
}
