//! Playback clock: the playhead both views read every frame.

/// Seconds the playhead starts before the first note, so the earliest
/// note is not already under it when playback begins.
pub const DEFAULT_LEAD_IN: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

#[derive(Clone, Debug)]
pub struct PlaybackClock {
    state: PlaybackState,
    current_time: f32,
    total_duration: f32,
    first_note_time: f32,
    lead_in: f32,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(DEFAULT_LEAD_IN)
    }
}

impl PlaybackClock {
    pub fn new(lead_in: f32) -> Self {
        Self {
            state: PlaybackState::Stopped,
            current_time: -lead_in,
            total_duration: 0.0,
            first_note_time: 0.0,
            lead_in,
        }
    }

    /// Point the clock at a newly processed piece and rewind to its start.
    /// A piece without notes starts from zero.
    pub fn load(&mut self, first_note_time: Option<f32>, total_duration: f32) {
        self.first_note_time = first_note_time.unwrap_or(0.0);
        self.total_duration = total_duration;
        self.reset();
    }

    /// Where playback begins: the first note minus the lead-in.
    pub fn start_time(&self) -> f32 {
        self.first_note_time - self.lead_in
    }

    /// Rewind to the start without touching the play state.
    pub fn reset(&mut self) {
        self.current_time = self.start_time();
    }

    pub fn start(&mut self) {
        self.state = PlaybackState::Playing;
        self.reset();
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Advance by one frame. Holds at the end of the piece while still
    /// reporting `Playing`.
    pub fn advance(&mut self, dt: f32) {
        if self.state == PlaybackState::Playing && self.current_time < self.total_duration {
            self.current_time = (self.current_time + dt).min(self.total_duration);
        }
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn lead_in(&self) -> f32 {
        self.lead_in
    }
}
