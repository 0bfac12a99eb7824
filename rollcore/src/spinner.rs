//! Indeterminate progress indicator shown while a file is processed
//!
//! A ring of dots whose radii pulse around the ring. The phase lives in the
//! `Spinner` value and only moves when the frame loop calls `advance`.

use std::f32::consts::PI;

use egui::{Color32, Pos2, Sense, Shape, Ui, Vec2};

use crate::easing::modulo_add;

/// Smallest dot radius, relative to the full dot radius
const MIN_DOT_SCALE: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct Spinner {
    phase: f32,
    dots: usize,
    /// Seconds per full revolution of the pulse
    period: f32,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(10, 1.0)
    }
}

impl Spinner {
    pub fn new(dots: usize, period: f32) -> Self {
        Self {
            phase: 0.0,
            dots: dots.max(1),
            period,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn advance(&mut self, dt: f32) {
        if self.period > 0.0 {
            self.phase = modulo_add(self.phase, dt / self.period);
        }
    }

    /// Dot centers and radii for a spinner filling the square at `min`
    /// with side `size`.
    pub fn dots(&self, min: Pos2, size: f32) -> Vec<(Pos2, f32)> {
        let n = self.dots as f32;
        let step = 2.0 * PI / n;
        let sin_pi_n = (PI / n).sin();
        let ring_radius = size / (2.0 * sin_pi_n + 2.0);
        let dot_radius = ring_radius * sin_pi_n;
        let ring_center = min + Vec2::splat(dot_radius + ring_radius);

        (0..self.dots)
            .map(|i| {
                let x = modulo_add(1.0 - i as f32 / n, self.phase);
                let angle = i as f32 * step;
                let center = ring_center + ring_radius * Vec2::new(angle.cos(), angle.sin());
                let scale = (2.0 * x - 1.0).powi(2) * (1.0 - MIN_DOT_SCALE) + MIN_DOT_SCALE;
                (center, dot_radius * scale)
            })
            .collect()
    }

    pub fn shapes(&self, min: Pos2, size: f32, color: Color32) -> Vec<Shape> {
        self.dots(min, size)
            .into_iter()
            .map(|(center, radius)| Shape::circle_filled(center, radius, color))
            .collect()
    }

    /// Paint the spinner in the largest square that fits the available space.
    pub fn show(&self, ui: &mut Ui, color: Color32) {
        let available = ui.available_size();
        let size = available.x.min(available.y).max(0.0);
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
        if ui.is_rect_visible(rect) {
            ui.painter().extend(self.shapes(rect.min, size, color));
        }
    }
}
