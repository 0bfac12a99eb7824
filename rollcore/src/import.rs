//! Standard MIDI File import
//!
//! Converts a parsed SMF into a `Piece`: absolute onsets in seconds,
//! note-on/note-off pairs folded into one note with a duration, and meta
//! text events kept as annotations.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use log::debug;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use thiserror::Error;

use crate::piece::{EventKind, NoteEvent, Piece, Track};

/// Tempo until the first tempo meta event: 120 BPM.
const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("MIDI parse error: {0}")]
    Parse(#[from] midly::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

pub fn import_file(path: &Path) -> Result<Piece> {
    let bytes = std::fs::read(path)?;
    import_bytes(&bytes)
}

pub fn import_bytes(bytes: &[u8]) -> Result<Piece> {
    let smf = Smf::parse(bytes)?;
    Ok(piece_from_smf(&smf))
}

#[derive(Clone, Copy, Debug)]
struct TempoSegment {
    start_tick: u64,
    micros_per_quarter: u32,
    seconds_at_start: f64,
}

/// Tick to seconds conversion for one file.
enum TickClock {
    Metrical {
        ticks_per_quarter: f64,
        segments: Vec<TempoSegment>,
    },
    Timecode {
        ticks_per_second: f64,
    },
}

impl TickClock {
    fn new(smf: &Smf) -> Self {
        match smf.header.timing {
            Timing::Metrical(tpq) => {
                let ticks_per_quarter = tpq.as_int().max(1) as f64;
                Self::Metrical {
                    ticks_per_quarter,
                    segments: tempo_map(smf, ticks_per_quarter),
                }
            }
            Timing::Timecode(fps, subframes) => Self::Timecode {
                ticks_per_second: (fps.as_f32() as f64 * subframes.max(1) as f64),
            },
        }
    }

    fn seconds(&self, tick: u64) -> f64 {
        match self {
            Self::Metrical { ticks_per_quarter, segments } => {
                // segments[0] starts at tick 0, so there is always a match
                let idx = segments.partition_point(|s| s.start_tick <= tick).saturating_sub(1);
                let seg = segments[idx];
                seg.seconds_at_start
                    + (tick - seg.start_tick) as f64 * seg.micros_per_quarter as f64
                        / 1_000_000.0
                        / ticks_per_quarter
            }
            Self::Timecode { ticks_per_second } => tick as f64 / ticks_per_second,
        }
    }
}

/// Merge tempo changes from every track into one timeline.
fn tempo_map(smf: &Smf, ticks_per_quarter: f64) -> Vec<TempoSegment> {
    let mut changes: Vec<(u64, u32)> = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        for event in track {
            tick += event.delta.as_int() as u64;
            if let TrackEventKind::Meta(MetaMessage::Tempo(tempo)) = event.kind {
                changes.push((tick, tempo.as_int()));
            }
        }
    }
    changes.sort_by_key(|&(tick, _)| tick);

    let mut segments = vec![TempoSegment {
        start_tick: 0,
        micros_per_quarter: DEFAULT_MICROS_PER_QUARTER,
        seconds_at_start: 0.0,
    }];
    for (tick, micros_per_quarter) in changes {
        let prev = segments[segments.len() - 1];
        let seconds_at_start = prev.seconds_at_start
            + (tick - prev.start_tick) as f64 * prev.micros_per_quarter as f64
                / 1_000_000.0
                / ticks_per_quarter;
        segments.push(TempoSegment {
            start_tick: tick,
            micros_per_quarter,
            seconds_at_start,
        });
    }
    segments
}

fn meta_text(meta: MetaMessage) -> Option<String> {
    match meta {
        MetaMessage::Text(bytes)
        | MetaMessage::Copyright(bytes)
        | MetaMessage::TrackName(bytes)
        | MetaMessage::InstrumentName(bytes)
        | MetaMessage::Lyric(bytes)
        | MetaMessage::Marker(bytes)
        | MetaMessage::CuePoint(bytes)
        | MetaMessage::ProgramName(bytes)
        | MetaMessage::DeviceName(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

pub fn piece_from_smf(smf: &Smf) -> Piece {
    let clock = TickClock::new(smf);
    let mut tracks = Vec::with_capacity(smf.tracks.len());
    let mut duration: f64 = 0.0;

    for track in &smf.tracks {
        let mut tick: u64 = 0;
        let mut events: Vec<NoteEvent> = Vec::with_capacity(track.len());
        // open notes per (channel, key), oldest first
        let mut open: HashMap<(u8, u8), VecDeque<usize>> = HashMap::new();

        for event in track {
            tick += event.delta.as_int() as u64;
            let seconds = clock.seconds(tick);
            let onset = seconds as f32;
            duration = duration.max(seconds);

            let next = match event.kind {
                TrackEventKind::Midi { channel, message } => {
                    let channel = channel.as_int();
                    match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            open.entry((channel, key.as_int()))
                                .or_default()
                                .push_back(events.len());
                            NoteEvent::note(onset, key.as_int(), vel.as_int(), 0.0)
                        }
                        MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                            let started = open
                                .get_mut(&(channel, key.as_int()))
                                .and_then(|queue| queue.pop_front());
                            if let Some(idx) = started {
                                let start = events[idx].onset;
                                if let EventKind::Note(note) = &mut events[idx].kind {
                                    note.duration = (onset - start).max(0.0);
                                }
                            }
                            NoteEvent::other(onset)
                        }
                        _ => NoteEvent::other(onset),
                    }
                }
                TrackEventKind::Meta(meta) => match meta_text(meta) {
                    Some(text) => NoteEvent::meta(onset, text),
                    None => NoteEvent::other(onset),
                },
                _ => NoteEvent::other(onset),
            };
            events.push(next);
        }

        tracks.push(Track::new(events));
    }

    let piece = Piece::new(tracks, duration as f32);
    debug!(
        "imported {} tracks, {} notes, {:.2}s",
        piece.track_count(),
        piece.note_count(),
        piece.duration
    );
    piece
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::num::{u15, u24, u28, u4, u7};
    use midly::{Format, Fps, Header, TrackEvent};

    fn ev(delta: u32, kind: TrackEventKind<'static>) -> TrackEvent<'static> {
        TrackEvent { delta: u28::new(delta), kind }
    }

    fn on(channel: u8, key: u8, vel: u8) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::NoteOn { key: u7::new(key), vel: u7::new(vel) },
        }
    }

    fn off(channel: u8, key: u8) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: u4::new(channel),
            message: MidiMessage::NoteOff { key: u7::new(key), vel: u7::new(0) },
        }
    }

    fn tempo(micros: u32) -> TrackEventKind<'static> {
        TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros)))
    }

    fn end() -> TrackEventKind<'static> {
        TrackEventKind::Meta(MetaMessage::EndOfTrack)
    }

    fn notes(track: &Track) -> Vec<(f32, u8, u8, f32)> {
        track
            .notes()
            .map(|(onset, n)| (onset, n.pitch, n.velocity, n.duration))
            .collect()
    }

    fn metrical(tracks: Vec<Vec<TrackEvent<'static>>>) -> Smf<'static> {
        Smf {
            header: Header::new(Format::Parallel, Timing::Metrical(u15::new(480))),
            tracks,
        }
    }

    #[test]
    fn test_tempo_map_across_tracks() {
        let smf = metrical(vec![
            vec![
                ev(0, TrackEventKind::Meta(MetaMessage::TrackName(b"Conductor"))),
                ev(0, tempo(500_000)),
                // two quarters at 120 BPM = 1 s, then 240 BPM
                ev(960, tempo(250_000)),
                ev(0, end()),
            ],
            vec![
                ev(480, on(0, 60, 100)),
                ev(480, off(0, 60)),
                ev(480, on(0, 64, 90)),
                ev(480, off(0, 64)),
                ev(0, end()),
            ],
        ]);
        let piece = piece_from_smf(&smf);
        assert_eq!(piece.track_count(), 2);
        assert_eq!(notes(&piece.tracks[1]), vec![(0.5, 60, 100, 0.5), (1.25, 64, 90, 0.25)]);
        assert_eq!(piece.duration, 1.5);
        assert_eq!(piece.tracks[0].events[0].meta_text(), Some("Conductor"));
    }

    #[test]
    fn test_velocity_zero_closes_note() {
        let smf = metrical(vec![vec![
            ev(0, on(0, 60, 80)),
            ev(240, on(0, 60, 0)),
            ev(0, end()),
        ]]);
        let piece = piece_from_smf(&smf);
        assert_eq!(notes(&piece.tracks[0]), vec![(0.0, 60, 80, 0.25)]);
        // the closing event is kept but is not a note
        assert_eq!(piece.tracks[0].events.len(), 3);
    }

    #[test]
    fn test_overlapping_same_key_pairs_oldest_first() {
        let smf = metrical(vec![vec![
            ev(0, on(0, 60, 100)),
            ev(480, on(0, 60, 100)),
            ev(480, off(0, 60)),
            ev(480, off(0, 60)),
            // different channel does not close anything
            ev(0, off(1, 60)),
            ev(0, end()),
        ]]);
        let piece = piece_from_smf(&smf);
        assert_eq!(
            notes(&piece.tracks[0]),
            vec![(0.0, 60, 100, 1.0), (0.5, 60, 100, 1.0)]
        );
    }

    #[test]
    fn test_unclosed_note_has_zero_duration() {
        let smf = metrical(vec![vec![ev(0, on(2, 70, 100)), ev(960, end())]]);
        let piece = piece_from_smf(&smf);
        assert_eq!(notes(&piece.tracks[0]), vec![(0.0, 70, 100, 0.0)]);
        assert_eq!(piece.duration, 1.0);
    }

    #[test]
    fn test_meta_texts() {
        let smf = metrical(vec![vec![
            ev(0, TrackEventKind::Meta(MetaMessage::Copyright(b"(c) 1720"))),
            ev(0, TrackEventKind::Meta(MetaMessage::Lyric(b"la"))),
            ev(0, TrackEventKind::Meta(MetaMessage::Marker(b""))),
            ev(0, tempo(600_000)),
            ev(0, end()),
        ]]);
        let piece = piece_from_smf(&smf);
        let texts: Vec<Option<&str>> = piece.tracks[0].events.iter().map(|e| e.meta_text()).collect();
        assert_eq!(texts, vec![Some("(c) 1720"), Some("la"), Some(""), None, None]);
    }

    #[test]
    fn test_timecode_timing() {
        // 25 fps * 40 subframes = 1000 ticks per second
        let smf = Smf {
            header: Header::new(Format::SingleTrack, Timing::Timecode(Fps::Fps25, 40)),
            tracks: vec![vec![
                ev(500, on(0, 50, 64)),
                ev(250, off(0, 50)),
                ev(0, end()),
            ]],
        };
        let piece = piece_from_smf(&smf);
        assert_eq!(notes(&piece.tracks[0]), vec![(0.5, 50, 64, 0.25)]);
    }

    #[test]
    fn test_import_bytes_round_trip_and_errors() {
        let smf = metrical(vec![vec![ev(0, on(0, 60, 100)), ev(480, off(0, 60)), ev(0, end())]]);
        let mut bytes = Vec::new();
        smf.write(&mut bytes).unwrap();
        let piece = import_bytes(&bytes).unwrap();
        assert_eq!(notes(&piece.tracks[0]), vec![(0.0, 60, 100, 0.5)]);

        assert!(matches!(import_bytes(b"not a midi file"), Err(ImportError::Parse(_))));
        assert!(matches!(
            import_file(Path::new("/nonexistent/slowroll/test.mid")),
            Err(ImportError::Io(_))
        ));
    }
}
