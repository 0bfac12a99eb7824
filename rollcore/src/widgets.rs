//! Small chrome widgets shared by the slowRoll panels

use egui::Ui;

use crate::theme::SlowColors;

/// Status bar: white bg, 1px black top border
pub fn status_bar(ui: &mut Ui, text: &str) {
    egui::Frame::none()
        .fill(SlowColors::WHITE)
        .stroke(egui::Stroke::new(1.0, SlowColors::BLACK))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(text);
        });
}

/// Toolbar separator (vertical 1px black line)
pub fn toolbar_separator(ui: &mut Ui) {
    let height = ui.spacing().interact_size.y;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, height), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        ui.painter().vline(
            rect.center().x,
            rect.y_range(),
            egui::Stroke::new(1.0, SlowColors::BLACK),
        );
    }
}

/// `m:ss.s` for the status bar; negative times (the lead-in) keep their sign.
pub fn format_time(seconds: f32) -> String {
    let tenths = (seconds.abs() * 10.0).round() as u32;
    let sign = if seconds < 0.0 && tenths > 0 { "-" } else { "" };
    let mins = tenths / 600;
    let rest = tenths % 600;
    format!("{}{}:{:02}.{}", sign, mins, rest / 10, rest % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00.0");
        assert_eq!(format_time(65.3), "1:05.3");
        assert_eq!(format_time(-0.4), "-0:00.4");
        assert_eq!(format_time(600.0), "10:00.0");
    }

    #[test]
    fn test_format_time_carries_into_minutes() {
        assert_eq!(format_time(59.96), "1:00.0");
        assert_eq!(format_time(119.99), "2:00.0");
        assert_eq!(format_time(-0.01), "0:00.0");
    }
}
