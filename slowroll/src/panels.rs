//! The two visualizations: the timeline piano roll and the falling-shapes canvas

use egui::{Rect, Sense, Stroke, Ui, Vec2};
use rollcore::falling::{self, FallingConfig, FIGURE_HEIGHT_RANGE};
use rollcore::spinner::Spinner;
use rollcore::theme::SlowColors;
use rollcore::timeline::{self, TimelineConfig, TimelineScroll, NOTE_HEIGHT_RANGE};

use crate::job::Loaded;

const SPINNER_SIZE: f32 = 96.0;

pub fn timeline_settings(ui: &mut Ui, config: &mut TimelineConfig) {
    egui::CollapsingHeader::new("display settings")
        .id_source("timeline_settings")
        .show(ui, |ui| {
            ui.add(
                egui::Slider::new(&mut config.pixels_per_second, timeline::PIXELS_PER_SECOND_RANGE)
                    .text("pixels per second"),
            );
            ui.add(egui::Slider::new(&mut config.note_height, NOTE_HEIGHT_RANGE).text("note height"));
            ui.checkbox(&mut config.follow, "follow playhead");
        });
}

pub fn animation_settings(ui: &mut Ui, config: &mut FallingConfig) {
    egui::CollapsingHeader::new("display settings")
        .id_source("animation_settings")
        .show(ui, |ui| {
            ui.add(
                egui::Slider::new(&mut config.pixels_per_second, falling::PIXELS_PER_SECOND_RANGE)
                    .text("pixels per second"),
            );
            ui.add(egui::Slider::new(&mut config.figure_height, FIGURE_HEIGHT_RANGE).text("figure height"));
            ui.checkbox(&mut config.show_grid, "show grid");
        });
}

/// One lane per track with notes, stacked in a vertical scroll area.
/// Dragging any lane pans all of them together.
pub fn timeline_view(
    ui: &mut Ui,
    config: &TimelineConfig,
    scroll: &mut TimelineScroll,
    current_time: f32,
    loaded: &Loaded,
) {
    let offset = scroll.offset(config, current_time, ui.available_width());
    let mut dragging = false;
    let mut drag_dx = 0.0;

    egui::ScrollArea::vertical()
        .id_source("timeline_lanes")
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .show(ui, |ui| {
            let tracks = loaded.piece.tracks.iter().zip(&loaded.summary.tracks);
            for (index, (track, summary)) in tracks.enumerate() {
                ui.push_id(index, |ui| {
                    ui.separator();
                    ui.label(format!("track no {}", index));
                    if !summary.meta_text.is_empty() {
                        egui::CollapsingHeader::new("meta message").show(ui, |ui| {
                            ui.label(&summary.meta_text);
                        });
                    }
                    let Some(range) = summary.pitch_range else {
                        return;
                    };
                    let size = Vec2::new(
                        ui.available_width(),
                        timeline::lane_height(range, config.note_height),
                    );
                    let (response, painter) = ui.allocate_painter(size, Sense::drag());
                    let rect = response.rect;
                    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SlowColors::BLACK));
                    painter.extend(timeline::lane_shapes(
                        rect.min,
                        track,
                        range,
                        current_time,
                        offset,
                        config,
                    ));
                    if response.dragged() {
                        dragging = true;
                        drag_dx += response.drag_delta().x;
                    }
                });
            }
        });

    if config.follow {
        scroll.cancel_drag();
    } else if dragging {
        scroll.drag(drag_dx);
    } else if scroll.is_dragging() {
        scroll.end_drag(config.pixels_per_second);
    }
}

pub fn animation_view(ui: &mut Ui, config: &FallingConfig, current_time: f32, loaded: &Loaded) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, SlowColors::BLACK);
    painter.extend(falling::frame_shapes(
        rect,
        current_time,
        &loaded.piece,
        &loaded.summary,
        config,
    ));
}

/// Spinner in the middle of the remaining space.
pub fn processing_view(ui: &mut Ui, spinner: &Spinner) {
    let available = ui.available_rect_before_wrap();
    let size = SPINNER_SIZE.min(available.width()).min(available.height()).max(0.0);
    let rect = Rect::from_center_size(available.center(), Vec2::splat(size));
    ui.allocate_ui_at_rect(rect, |ui| spinner.show(ui, SlowColors::BLACK));
}

pub fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(text);
    });
}
