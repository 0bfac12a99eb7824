//! Piano-roll timeline: one horizontal lane per track
//!
//! x is linear in onset minus scroll offset, y in the track's max pitch
//! minus pitch. Nothing is culled horizontally; notes outside the visible
//! window are left to the painter's clip rect.

use std::ops::RangeInclusive;

use egui::{Pos2, Rect, Shape, Stroke};
use serde::{Deserialize, Serialize};

use crate::piece::{Note, Track};
use crate::summary::PitchRange;
use crate::theme::SlowColors;

pub const PIXELS_PER_SECOND_RANGE: RangeInclusive<f32> = 10.0..=1000.0;
pub const NOTE_HEIGHT_RANGE: RangeInclusive<f32> = 3.0..=20.0;
pub const PLAYHEAD_WIDTH: f32 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub pixels_per_second: f32,
    pub note_height: f32,
    /// Keep the playhead centered instead of free scrolling
    pub follow: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: 100.0,
            note_height: 5.0,
            follow: false,
        }
    }
}

/// Offset that puts the playhead in the middle of the visible width.
pub fn follow_offset(current_time: f32, visible_width: f32, pixels_per_second: f32) -> f32 {
    current_time - (visible_width / 2.0) / pixels_per_second
}

/// Free-scroll position of the timeline, in seconds at the left edge.
///
/// A drag gesture is previewed live and only folded into the stored
/// offset when it ends. Follow mode never writes here, so toggling it
/// returns to wherever the user last left the timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineScroll {
    offset: f32,
    drag_pixels: f32,
}

impl TimelineScroll {
    pub fn new(offset: f32) -> Self {
        Self { offset, drag_pixels: 0.0 }
    }

    /// Accumulate horizontal pointer movement of the current gesture.
    pub fn drag(&mut self, dx: f32) {
        self.drag_pixels += dx;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_pixels != 0.0
    }

    /// Commit the gesture into the stored offset.
    pub fn end_drag(&mut self, pixels_per_second: f32) {
        self.offset -= self.drag_pixels / pixels_per_second;
        self.drag_pixels = 0.0;
    }

    /// Drop the gesture without moving the stored offset.
    pub fn cancel_drag(&mut self) {
        self.drag_pixels = 0.0;
    }

    /// Stored offset, without any gesture in progress.
    pub fn committed(&self) -> f32 {
        self.offset
    }

    /// Offset to render this frame.
    pub fn offset(&self, config: &TimelineConfig, current_time: f32, visible_width: f32) -> f32 {
        if config.follow {
            follow_offset(current_time, visible_width, config.pixels_per_second)
        } else {
            self.offset - self.drag_pixels / config.pixels_per_second
        }
    }
}

/// Height of a lane covering `range`.
pub fn lane_height(range: PitchRange, note_height: f32) -> f32 {
    range.span() as f32 * note_height
}

pub fn time_to_x(origin_x: f32, time: f32, offset: f32, pixels_per_second: f32) -> f32 {
    origin_x + (time - offset) * pixels_per_second
}

/// Rectangle of one note inside a lane whose top-left corner is `origin`.
/// Notes are one pixel shorter than their duration so neighbours stay apart.
pub fn note_rect(
    origin: Pos2,
    onset: f32,
    note: &Note,
    max_pitch: u8,
    offset: f32,
    config: &TimelineConfig,
) -> Rect {
    let min = Pos2::new(
        time_to_x(origin.x, onset, offset, config.pixels_per_second),
        origin.y + (max_pitch as f32 - note.pitch as f32) * config.note_height,
    );
    let max = Pos2::new(
        (min.x + note.duration * config.pixels_per_second - 1.0).max(min.x),
        min.y + config.note_height,
    );
    Rect::from_min_max(min, max)
}

/// Everything drawn inside one lane: its notes and the playhead.
pub fn lane_shapes(
    origin: Pos2,
    track: &Track,
    range: PitchRange,
    current_time: f32,
    offset: f32,
    config: &TimelineConfig,
) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = track
        .notes()
        .map(|(onset, note)| {
            let rect = note_rect(origin, onset, note, range.max, offset, config);
            Shape::rect_filled(rect, 0.0, SlowColors::BLACK)
        })
        .collect();

    let x = time_to_x(origin.x, current_time, offset, config.pixels_per_second);
    let height = lane_height(range, config.note_height);
    shapes.push(Shape::line_segment(
        [Pos2::new(x, origin.y), Pos2::new(x, origin.y + height)],
        Stroke::new(PLAYHEAD_WIDTH, SlowColors::ACCENT),
    ));
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::NoteEvent;

    fn config() -> TimelineConfig {
        TimelineConfig {
            pixels_per_second: 100.0,
            note_height: 5.0,
            follow: false,
        }
    }

    #[test]
    fn test_note_rect_position_and_width() {
        let note = Note { pitch: 60, velocity: 100, duration: 2.0 };
        let rect = note_rect(Pos2::ZERO, 10.0, &note, 64, 5.0, &config());
        assert_eq!(rect.min.x, 500.0);
        assert_eq!(rect.width(), 199.0);
        assert_eq!(rect.min.y, 20.0);
        assert_eq!(rect.height(), 5.0);
    }

    #[test]
    fn test_note_rect_relative_to_origin() {
        let note = Note { pitch: 64, velocity: 100, duration: 1.0 };
        let rect = note_rect(Pos2::new(30.0, 200.0), 1.0, &note, 64, 0.0, &config());
        assert_eq!(rect.min, Pos2::new(130.0, 200.0));
    }

    #[test]
    fn test_far_notes_are_not_culled() {
        let track = Track::new(vec![
            NoteEvent::note(0.0, 60, 100, 1.0),
            NoteEvent::note(500.0, 62, 100, 1.0),
            NoteEvent::meta(0.0, "lead"),
        ]);
        let range = PitchRange { min: 60, max: 62 };
        let shapes = lane_shapes(Pos2::ZERO, &track, range, 0.0, 0.0, &config());
        // two notes plus the playhead
        assert_eq!(shapes.len(), 3);
    }

    #[test]
    fn test_playhead_spans_lane() {
        let track = Track::new(vec![NoteEvent::note(0.0, 60, 100, 1.0)]);
        let range = PitchRange { min: 55, max: 66 };
        let shapes = lane_shapes(Pos2::new(0.0, 10.0), &track, range, 3.0, 1.0, &config());
        match shapes.last() {
            Some(Shape::LineSegment { points, .. }) => {
                assert_eq!(points[0], Pos2::new(200.0, 10.0));
                assert_eq!(points[1], Pos2::new(200.0, 10.0 + 12.0 * 5.0));
            }
            other => panic!("expected playhead line, got {:?}", other),
        }
    }

    #[test]
    fn test_lane_height() {
        assert_eq!(lane_height(PitchRange { min: 60, max: 60 }, 5.0), 5.0);
        assert_eq!(lane_height(PitchRange { min: 48, max: 72 }, 4.0), 100.0);
    }

    #[test]
    fn test_follow_offset_centers_playhead() {
        assert_eq!(follow_offset(20.0, 800.0, 100.0), 16.0);
        let cfg = TimelineConfig { follow: true, ..config() };
        let scroll = TimelineScroll::new(3.0);
        assert_eq!(scroll.offset(&cfg, 20.0, 800.0), 16.0);
    }

    #[test]
    fn test_drag_previews_then_commits() {
        let cfg = config();
        let mut scroll = TimelineScroll::new(10.0);
        scroll.drag(50.0);
        scroll.drag(50.0);
        assert!(scroll.is_dragging());
        // dragging right moves the view back in time
        assert_eq!(scroll.offset(&cfg, 0.0, 800.0), 9.0);
        assert_eq!(scroll.committed(), 10.0);
        scroll.end_drag(cfg.pixels_per_second);
        assert!(!scroll.is_dragging());
        assert_eq!(scroll.committed(), 9.0);
        assert_eq!(scroll.offset(&cfg, 0.0, 800.0), 9.0);
    }

    #[test]
    fn test_follow_does_not_reset_free_offset() {
        let mut cfg = config();
        let mut scroll = TimelineScroll::new(7.5);
        cfg.follow = true;
        assert_eq!(scroll.offset(&cfg, 30.0, 400.0), 28.0);
        scroll.end_drag(cfg.pixels_per_second);
        cfg.follow = false;
        assert_eq!(scroll.offset(&cfg, 30.0, 400.0), 7.5);
    }

    #[test]
    fn test_short_note_width_never_negative() {
        let note = Note { pitch: 60, velocity: 100, duration: 0.0 };
        let rect = note_rect(Pos2::ZERO, 1.0, &note, 60, 0.0, &config());
        assert_eq!(rect.width(), 0.0);
    }

    #[test]
    fn test_cancel_drag_keeps_offset() {
        let cfg = config();
        let mut scroll = TimelineScroll::new(3.0);
        scroll.drag(-200.0);
        scroll.cancel_drag();
        assert!(!scroll.is_dragging());
        assert_eq!(scroll.offset(&cfg, 0.0, 800.0), 3.0);
    }
}
