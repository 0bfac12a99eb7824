//! Parsed event stream: a piece is a list of tracks, a track is a list of
//! timed events in file order.

/// A sounding note. Duration is the time until the matching note-off,
/// zero when the file never released it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Note {
    /// MIDI key number (0-127, middle C = 60)
    pub pitch: u8,
    /// Velocity (0-127)
    pub velocity: u8,
    /// Duration in seconds
    pub duration: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    /// Note-on that starts a sounding pitch
    Note(Note),
    /// Meta event carrying a text payload (track name, lyric, marker...)
    Meta(String),
    /// Anything else (controllers, tempo, sysex, note-offs)
    Other,
}

/// A single event with its absolute onset time in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteEvent {
    pub onset: f32,
    pub kind: EventKind,
}

impl NoteEvent {
    pub fn note(onset: f32, pitch: u8, velocity: u8, duration: f32) -> Self {
        Self {
            onset,
            kind: EventKind::Note(Note { pitch, velocity, duration }),
        }
    }

    pub fn meta(onset: f32, text: impl Into<String>) -> Self {
        Self {
            onset,
            kind: EventKind::Meta(text.into()),
        }
    }

    pub fn other(onset: f32) -> Self {
        Self { onset, kind: EventKind::Other }
    }

    /// The note payload, if this is a sounding note-on.
    pub fn as_note(&self) -> Option<&Note> {
        match &self.kind {
            EventKind::Note(note) => Some(note),
            _ => None,
        }
    }

    /// The text payload, if this is a meta event.
    pub fn meta_text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Meta(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub events: Vec<NoteEvent>,
}

impl Track {
    pub fn new(events: Vec<NoteEvent>) -> Self {
        Self { events }
    }

    /// Iterate the sounding notes of this track with their onsets.
    pub fn notes(&self) -> impl Iterator<Item = (f32, &Note)> + '_ {
        self.events
            .iter()
            .filter_map(|event| event.as_note().map(|note| (event.onset, note)))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Piece {
    pub tracks: Vec<Track>,
    /// Time of the last event in seconds
    pub duration: f32,
}

impl Piece {
    pub fn new(tracks: Vec<Track>, duration: f32) -> Self {
        Self { tracks, duration }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_notes_skip_meta_and_other() {
        let track = Track::new(vec![
            NoteEvent::meta(0.0, "piano"),
            NoteEvent::note(0.5, 60, 100, 1.0),
            NoteEvent::other(0.7),
            NoteEvent::note(1.0, 64, 90, 0.5),
        ]);
        let pitches: Vec<u8> = track.notes().map(|(_, n)| n.pitch).collect();
        assert_eq!(pitches, vec![60, 64]);
        assert_eq!(track.events[0].meta_text(), Some("piano"));
        assert!(track.events[2].as_note().is_none());
    }

    #[test]
    fn test_piece_note_count() {
        let piece = Piece::new(
            vec![
                Track::new(vec![NoteEvent::note(0.0, 60, 100, 1.0)]),
                Track::default(),
                Track::new(vec![
                    NoteEvent::note(0.0, 40, 100, 1.0),
                    NoteEvent::note(1.0, 41, 100, 1.0),
                ]),
            ],
            2.0,
        );
        assert_eq!(piece.track_count(), 3);
        assert_eq!(piece.note_count(), 3);
    }
}
