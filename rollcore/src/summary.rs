//! Per-track and whole-piece statistics, computed once per processed file.

use crate::piece::Piece;

/// Inclusive pitch range of a set of notes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PitchRange {
    pub min: u8,
    pub max: u8,
}

impl PitchRange {
    pub fn single(pitch: u8) -> Self {
        Self { min: pitch, max: pitch }
    }

    pub fn include(&mut self, pitch: u8) {
        self.min = self.min.min(pitch);
        self.max = self.max.max(pitch);
    }

    pub fn union(self, other: PitchRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Number of distinct pitches covered (max - min + 1)
    pub fn span(&self) -> u32 {
        (self.max - self.min) as u32 + 1
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackSummary {
    /// `None` when the track has no sounding note
    pub pitch_range: Option<PitchRange>,
    /// Meta texts of the track joined by newlines, in file order
    pub meta_text: String,
}

impl TrackSummary {
    pub fn has_note(&self) -> bool {
        self.pitch_range.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PieceSummary {
    /// One entry per track of the summarized piece
    pub tracks: Vec<TrackSummary>,
    /// Range over all tracks that have notes
    pub pitch_range: Option<PitchRange>,
    /// Earliest note onset in the whole piece
    pub first_note_time: Option<f32>,
}

impl PieceSummary {
    /// Scan every event of every track once.
    pub fn compute(piece: &Piece) -> Self {
        let mut tracks = Vec::with_capacity(piece.tracks.len());
        let mut first_note_time: Option<f32> = None;

        for track in &piece.tracks {
            let mut summary = TrackSummary::default();

            for event in &track.events {
                if let Some(note) = event.as_note() {
                    match summary.pitch_range.as_mut() {
                        Some(range) => range.include(note.pitch),
                        None => summary.pitch_range = Some(PitchRange::single(note.pitch)),
                    }
                    if first_note_time.map_or(true, |t| event.onset < t) {
                        first_note_time = Some(event.onset);
                    }
                }

                if let Some(text) = event.meta_text() {
                    if !text.is_empty() {
                        if !summary.meta_text.is_empty() {
                            summary.meta_text.push('\n');
                        }
                        summary.meta_text.push_str(text);
                    }
                }
            }

            tracks.push(summary);
        }

        let pitch_range = tracks
            .iter()
            .filter_map(|t| t.pitch_range)
            .reduce(PitchRange::union);

        Self {
            tracks,
            pitch_range,
            first_note_time,
        }
    }

    pub fn tracks_with_notes(&self) -> usize {
        self.tracks.iter().filter(|t| t.has_note()).count()
    }
}
