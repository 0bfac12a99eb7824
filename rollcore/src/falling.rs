//! Falling-shapes animation
//!
//! Each track with notes gets a figure and a color. A note drifts in from
//! the right edge towards the center while it is upcoming, growing and
//! fading in, then sits at the center and shrinks away over its duration
//! once the playhead has passed its onset.

use std::ops::RangeInclusive;

use egui::{Color32, Pos2, Rect, Shape, Stroke};
use serde::{Deserialize, Serialize};

use crate::easing::{ease_in_cubic, lerp};
use crate::geometry::{figure_shape, FigureStyle, ShapeKind};
use crate::piece::Piece;
use crate::summary::{PieceSummary, PitchRange};
use crate::theme::SlowColors;

pub const PIXELS_PER_SECOND_RANGE: RangeInclusive<f32> = 10.0..=1000.0;
pub const FIGURE_HEIGHT_RANGE: RangeInclusive<f32> = 10.0..=1000.0;

/// Highest MIDI velocity; figures are scaled by velocity / MAX_VELOCITY.
const MAX_VELOCITY: f32 = 127.0;

/// Figure and color per track, cycled by the number of tracks with notes.
pub const PALETTE: [(ShapeKind, Color32); 16] = [
    (ShapeKind::Circle, Color32::from_rgb(0xFF, 0xB0, 0x12)),
    (ShapeKind::Triangle, Color32::from_rgb(0x4D, 0xC5, 0xA3)),
    (ShapeKind::Square, Color32::from_rgb(0xEE, 0xDA, 0xA3)),
    (ShapeKind::Rhombus, Color32::from_rgb(0xE9, 0xAC, 0x9C)),
    (ShapeKind::Pentagon, Color32::from_rgb(0xFE, 0x82, 0x3F)),
    (ShapeKind::Hexagon, Color32::from_rgb(0x0F, 0x78, 0x92)),
    (ShapeKind::TriangleInverted, Color32::from_rgb(0xB5, 0x9C, 0x72)),
    (ShapeKind::Circle, Color32::from_rgb(0x7A, 0x8F, 0xA8)),
    (ShapeKind::Triangle, Color32::from_rgb(0xA2, 0x54, 0x38)),
    (ShapeKind::Square, Color32::from_rgb(0x33, 0x56, 0x8C)),
    (ShapeKind::Rhombus, Color32::from_rgb(0x57, 0x5D, 0x46)),
    (ShapeKind::Pentagon, Color32::from_rgb(0x71, 0x61, 0x7B)),
    (ShapeKind::Hexagon, Color32::from_rgb(0xD1, 0x39, 0x3F)),
    (ShapeKind::TriangleInverted, Color32::from_rgb(0xEE, 0xF0, 0xF2)),
    (ShapeKind::Circle, Color32::from_rgb(0xA0, 0x9C, 0x9B)),
    (ShapeKind::Triangle, Color32::from_rgb(0x3B, 0x3D, 0x4C)),
];

pub fn palette_entry(index: usize) -> (ShapeKind, Color32) {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingConfig {
    pub pixels_per_second: f32,
    /// Size of a full-velocity figure at its peak
    pub figure_height: f32,
    pub show_grid: bool,
}

impl Default for FallingConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: 300.0,
            figure_height: 100.0,
            show_grid: false,
        }
    }
}

/// One figure to paint this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Figure {
    /// Index of the source track in the piece
    pub track: usize,
    pub kind: ShapeKind,
    pub center: Pos2,
    pub size: f32,
    pub style: FigureStyle,
}

impl Figure {
    pub fn shape(&self) -> Shape {
        figure_shape(self.kind, self.center, self.size, self.style)
    }
}

/// Row height for the global pitch range inside a canvas of `height`.
/// One spare row keeps the lowest pitch off the bottom edge.
pub fn row_height(height: f32, range: PitchRange) -> f32 {
    height / (range.span() as f32 + 1.0)
}

/// Seconds between the playhead and either edge of the canvas.
pub fn half_window(width: f32, pixels_per_second: f32) -> f32 {
    width / (2.0 * pixels_per_second)
}

/// Compute every visible figure for the playhead at `current_time`.
/// Returns nothing when the piece has no notes.
pub fn figures(
    rect: Rect,
    current_time: f32,
    piece: &Piece,
    summary: &PieceSummary,
    config: &FallingConfig,
) -> Vec<Figure> {
    let mut figures = Vec::new();
    let Some(range) = summary.pitch_range else {
        return figures;
    };
    if config.pixels_per_second <= 0.0 {
        return figures;
    }

    let half = half_window(rect.width(), config.pixels_per_second);
    let row = row_height(rect.height(), range);
    let center_x = rect.center().x;
    let mut palette_index = 0;

    for (track_idx, (track, track_summary)) in piece.tracks.iter().zip(&summary.tracks).enumerate() {
        if !track_summary.has_note() {
            continue;
        }
        let (kind, color) = palette_entry(palette_index);
        palette_index += 1;

        for (onset, note) in track.notes() {
            if onset < current_time - half || onset > current_time + half {
                continue;
            }

            let y = rect.min.y + (range.max as f32 - note.pitch as f32 + 1.0) * row;
            let peak = config.figure_height * (note.velocity as f32 / MAX_VELOCITY);

            if onset > current_time {
                let progress = ease_in_cubic(1.0 - (onset - current_time) / half);
                figures.push(Figure {
                    track: track_idx,
                    kind,
                    center: Pos2::new(lerp(rect.max.x, center_x, progress), y),
                    size: peak * progress,
                    style: FigureStyle { filled: false, opacity: progress, color },
                });
            } else {
                if note.duration <= 0.0 {
                    continue;
                }
                let progress = (current_time - onset) / note.duration;
                if progress >= 1.0 {
                    continue;
                }
                figures.push(Figure {
                    track: track_idx,
                    kind,
                    center: Pos2::new(center_x, y),
                    size: peak * (1.0 - ease_in_cubic(progress)),
                    style: FigureStyle { filled: true, opacity: 1.0 - progress, color },
                });
            }
        }
    }

    figures
}

/// Playhead line plus one horizontal line per pitch of the global range.
pub fn grid_shapes(rect: Rect, range: PitchRange) -> Vec<Shape> {
    let stroke = Stroke::new(1.0, SlowColors::ACCENT);
    let row = row_height(rect.height(), range);
    let mut shapes = vec![Shape::line_segment(
        [Pos2::new(rect.center().x, rect.min.y), Pos2::new(rect.center().x, rect.max.y)],
        stroke,
    )];
    for pitch in range.min..=range.max {
        let y = rect.min.y + (range.max as f32 - pitch as f32 + 1.0) * row;
        shapes.push(Shape::line_segment(
            [Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)],
            stroke,
        ));
    }
    shapes
}

/// All shapes for one frame of the animation canvas.
pub fn frame_shapes(
    rect: Rect,
    current_time: f32,
    piece: &Piece,
    summary: &PieceSummary,
    config: &FallingConfig,
) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = figures(rect, current_time, piece, summary, config)
        .iter()
        .map(Figure::shape)
        .collect();
    if config.show_grid {
        if let Some(range) = summary.pitch_range {
            shapes.extend(grid_shapes(rect, range));
        }
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{NoteEvent, Track};
    use egui::Vec2;

    // 800 px wide at 100 px/s: the playhead sees 4 s either side
    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 100.0))
    }

    fn config() -> FallingConfig {
        FallingConfig {
            pixels_per_second: 100.0,
            figure_height: 127.0,
            show_grid: false,
        }
    }

    fn single_note(onset: f32, duration: f32) -> (Piece, PieceSummary) {
        let piece = Piece::new(
            vec![Track::new(vec![NoteEvent::note(onset, 60, 127, duration)])],
            onset + duration,
        );
        let summary = PieceSummary::compute(&piece);
        (piece, summary)
    }

    #[test]
    fn test_culls_outside_window() {
        let (piece, summary) = single_note(10.0, 1.0);
        assert!(figures(canvas(), 5.9, &piece, &summary, &config()).is_empty());
        assert_eq!(figures(canvas(), 6.0, &piece, &summary, &config()).len(), 1);
        assert!(figures(canvas(), 14.1, &piece, &summary, &config()).is_empty());
    }

    #[test]
    fn test_upcoming_note_eases_in_from_right() {
        let (piece, summary) = single_note(10.0, 1.0);
        // 2 s of the 4 s approach left: linear 0.5, eased 0.125
        let figs = figures(canvas(), 8.0, &piece, &summary, &config());
        let fig = figs[0];
        assert!(!fig.style.filled);
        assert_eq!(fig.style.opacity, 0.125);
        assert_eq!(fig.size, 127.0 * 0.125);
        assert_eq!(fig.center.x, lerp(800.0, 400.0, 0.125));
        assert_eq!(fig.kind, ShapeKind::Circle);
    }

    #[test]
    fn test_note_at_window_edge_is_invisible() {
        let (piece, summary) = single_note(10.0, 1.0);
        let fig = figures(canvas(), 6.0, &piece, &summary, &config())[0];
        assert_eq!(fig.size, 0.0);
        assert_eq!(fig.style.opacity, 0.0);
        assert_eq!(fig.center.x, 800.0);
    }

    #[test]
    fn test_sounding_note_shrinks_at_center() {
        let (piece, summary) = single_note(10.0, 2.0);
        let fig = figures(canvas(), 11.0, &piece, &summary, &config())[0];
        assert!(fig.style.filled);
        assert_eq!(fig.style.opacity, 0.5);
        assert_eq!(fig.size, 127.0 * (1.0 - 0.125));
        assert_eq!(fig.center.x, 400.0);
    }

    #[test]
    fn test_note_at_onset_is_full_size() {
        let (piece, summary) = single_note(10.0, 2.0);
        let fig = figures(canvas(), 10.0, &piece, &summary, &config())[0];
        assert!(fig.style.filled);
        assert_eq!(fig.size, 127.0);
        assert_eq!(fig.style.opacity, 1.0);
    }

    #[test]
    fn test_elapsed_note_not_drawn() {
        let (piece, summary) = single_note(10.0, 2.0);
        assert!(figures(canvas(), 12.0, &piece, &summary, &config()).is_empty());
        let (piece, summary) = single_note(10.0, 0.0);
        assert!(figures(canvas(), 10.0, &piece, &summary, &config()).is_empty());
    }

    #[test]
    fn test_vertical_position_from_global_range() {
        let piece = Piece::new(
            vec![Track::new(vec![
                NoteEvent::note(0.0, 60, 100, 1.0),
                NoteEvent::note(0.0, 63, 100, 1.0),
            ])],
            1.0,
        );
        let summary = PieceSummary::compute(&piece);
        // range 60..=63 spans 4 pitches: 5 rows of 20 px
        let figs = figures(canvas(), 0.5, &piece, &summary, &config());
        assert_eq!(figs[0].center.y, 80.0);
        assert_eq!(figs[1].center.y, 20.0);
        assert_eq!(figs[0].size, 127.0 * (100.0 / 127.0) * (1.0 - 0.125));
    }

    #[test]
    fn test_palette_skips_silent_tracks() {
        let piece = Piece::new(
            vec![
                Track::new(vec![NoteEvent::note(0.0, 60, 100, 1.0)]),
                Track::new(vec![NoteEvent::meta(0.0, "silent")]),
                Track::new(vec![NoteEvent::note(0.0, 62, 100, 1.0)]),
            ],
            1.0,
        );
        let summary = PieceSummary::compute(&piece);
        let figs = figures(canvas(), 0.0, &piece, &summary, &config());
        assert_eq!(figs.len(), 2);
        assert_eq!((figs[0].track, figs[0].kind), (0, PALETTE[0].0));
        assert_eq!((figs[1].track, figs[1].kind), (2, PALETTE[1].0));
        assert_eq!(figs[1].style.color, PALETTE[1].1);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(palette_entry(16), PALETTE[0]);
        assert_eq!(palette_entry(37), PALETTE[5]);
    }

    #[test]
    fn test_no_notes_draws_nothing() {
        let piece = Piece::new(vec![Track::new(vec![NoteEvent::meta(0.0, "x")])], 0.0);
        let summary = PieceSummary::compute(&piece);
        let cfg = FallingConfig { show_grid: true, ..config() };
        assert!(frame_shapes(canvas(), 0.0, &piece, &summary, &cfg).is_empty());
    }

    #[test]
    fn test_grid_lines() {
        let range = PitchRange { min: 60, max: 63 };
        let shapes = grid_shapes(canvas(), range);
        // playhead + one line per pitch
        assert_eq!(shapes.len(), 5);
        match &shapes[0] {
            Shape::LineSegment { points, .. } => assert_eq!(points[0].x, 400.0),
            other => panic!("expected line, got {:?}", other),
        }
    }
}
