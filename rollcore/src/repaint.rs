//! Repaint scheduling for slowRoll
//!
//! egui repaints on input by default. Playback and processing have to
//! animate without input, so the app tells the controller what it is busy
//! with and the controller keeps the repaint timer running at a rate that
//! suits the activity. When nothing moves, nothing is scheduled.

use std::time::Duration;

/// Frame interval while the playhead moves: the figures ease every frame.
const PLAYBACK_INTERVAL: Duration = Duration::from_millis(16);

/// Frame interval while the spinner turns.
const PROCESSING_INTERVAL: Duration = Duration::from_millis(33);

/// What keeps the window animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Idle,
    Processing,
    Playing,
}

/// Drop this into the app struct, set the activity during `update()` and
/// call [`RepaintController::end_frame`] at the bottom.
pub struct RepaintController {
    activity: Activity,
    needs_repaint: bool,
}

impl Default for RepaintController {
    fn default() -> Self {
        Self::new()
    }
}

impl RepaintController {
    pub fn new() -> Self {
        Self {
            activity: Activity::Idle,
            needs_repaint: false,
        }
    }

    pub fn set_activity(&mut self, activity: Activity) {
        self.activity = activity;
    }

    /// Request a single repaint, e.g. when a background job finished.
    pub fn mark_needs_repaint(&mut self) {
        self.needs_repaint = true;
    }

    /// Timer interval for the current activity, `None` when idle.
    pub fn interval(&self) -> Option<Duration> {
        match self.activity {
            Activity::Idle => None,
            Activity::Processing => Some(PROCESSING_INTERVAL),
            Activity::Playing => Some(PLAYBACK_INTERVAL),
        }
    }

    /// Consume the one-shot flag. `Some(ZERO)` asks for an immediate repaint.
    fn next_repaint(&mut self) -> Option<Duration> {
        let one_shot = std::mem::take(&mut self.needs_repaint);
        match self.interval() {
            Some(interval) => Some(interval),
            None if one_shot => Some(Duration::ZERO),
            None => None,
        }
    }

    pub fn end_frame(&mut self, ctx: &egui::Context) {
        match self.next_repaint() {
            Some(interval) if interval.is_zero() => ctx.request_repaint(),
            Some(interval) => ctx.request_repaint_after(interval),
            None => {}
        }
    }
}
