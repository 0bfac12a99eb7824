//! Figure geometry for the falling-shapes view
//!
//! Every figure is centered on a point and sized by its height: the
//! vertical extent of its bounding box. Widths follow from the regular
//! shape (a triangle of height h is 2h/√3 wide, a pentagon φ·a wide...).

use egui::{Color32, Pos2, Shape, Stroke, Vec2};

const SQRT_3: f32 = 1.732_050_8;
const GOLDEN_RATIO: f32 = 1.618_034;
/// Side of a regular pentagon relative to its height
const PENTAGON_SIDE: f32 = 0.649_839_4;
const SIN_36: f32 = 0.587_785_25;

/// Outline width for unfilled figures
pub const OUTLINE_WIDTH: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Triangle,
    TriangleInverted,
    Square,
    Rhombus,
    Pentagon,
    Hexagon,
}

/// How a figure is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureStyle {
    pub filled: bool,
    pub opacity: f32,
    pub color: Color32,
}

/// Replace the alpha channel of `color` with `opacity`, keeping RGB.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (255.0 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Polygon vertices in clockwise screen order, or `None` for a circle.
pub fn vertices(kind: ShapeKind, center: Pos2, height: f32) -> Option<Vec<Pos2>> {
    let h = height.max(0.0);
    let half = h / 2.0;
    let offsets: Vec<Vec2> = match kind {
        ShapeKind::Circle => return None,
        ShapeKind::Triangle => {
            let side = 2.0 * h / SQRT_3;
            vec![
                Vec2::new(0.0, -half),
                Vec2::new(side / 2.0, half),
                Vec2::new(-side / 2.0, half),
            ]
        }
        ShapeKind::TriangleInverted => {
            let side = 2.0 * h / SQRT_3;
            vec![
                Vec2::new(0.0, half),
                Vec2::new(-side / 2.0, -half),
                Vec2::new(side / 2.0, -half),
            ]
        }
        ShapeKind::Square => vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ],
        ShapeKind::Rhombus => vec![
            Vec2::new(0.0, -half),
            Vec2::new(half, 0.0),
            Vec2::new(0.0, half),
            Vec2::new(-half, 0.0),
        ],
        ShapeKind::Pentagon => {
            let a = h * PENTAGON_SIDE;
            let d = a * GOLDEN_RATIO;
            // shoulder vertices sit a·sin36° below the apex
            let y = half - a * SIN_36;
            vec![
                Vec2::new(0.0, -half),
                Vec2::new(d / 2.0, -y),
                Vec2::new(a / 2.0, half),
                Vec2::new(-a / 2.0, half),
                Vec2::new(-d / 2.0, -y),
            ]
        }
        ShapeKind::Hexagon => {
            let a = h / SQRT_3;
            vec![
                Vec2::new(a / 2.0, -half),
                Vec2::new(a, 0.0),
                Vec2::new(a / 2.0, half),
                Vec2::new(-a / 2.0, half),
                Vec2::new(-a, 0.0),
                Vec2::new(-a / 2.0, -half),
            ]
        }
    };
    Some(offsets.into_iter().map(|o| center + o).collect())
}

/// Build the paintable shape for a figure.
pub fn figure_shape(kind: ShapeKind, center: Pos2, height: f32, style: FigureStyle) -> Shape {
    let color = with_opacity(style.color, style.opacity);
    match vertices(kind, center, height) {
        None => {
            let radius = height.max(0.0) / 2.0;
            if style.filled {
                Shape::circle_filled(center, radius, color)
            } else {
                Shape::circle_stroke(center, radius, Stroke::new(OUTLINE_WIDTH, color))
            }
        }
        Some(points) => {
            if style.filled {
                Shape::convex_polygon(points, color, Stroke::NONE)
            } else {
                Shape::closed_line(points, Stroke::new(OUTLINE_WIDTH, color))
            }
        }
    }
}
