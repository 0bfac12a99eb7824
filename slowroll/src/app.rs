//! slowRoll - MIDI piano roll and falling-shapes visualizer

use std::path::PathBuf;

use egui::{Context, Key};
use log::{info, warn};
use rollcore::falling::FallingConfig;
use rollcore::repaint::Activity;
use rollcore::spinner::Spinner;
use rollcore::theme::{menu_bar, SlowColors};
use rollcore::timeline::{TimelineConfig, TimelineScroll};
use rollcore::widgets::{format_time, status_bar, toolbar_separator};
use rollcore::RepaintController;

use crate::audio::AudioPlayer;
use crate::config::Settings;
use crate::job::Converter;
use crate::library::{display_name, is_midi, Library};
use crate::panels;
use crate::session::Session;

/// Longest step the clock takes in one frame, so a stalled window does
/// not jump the playhead.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Timeline,
    Animation,
    Split,
}

pub struct SlowRollApp {
    library: Library,
    session: Session<AudioPlayer>,
    timeline: TimelineConfig,
    scroll: TimelineScroll,
    animation: FallingConfig,
    spinner: Spinner,
    view_mode: ViewMode,
    show_about: bool,
    repaint: RepaintController,
}

impl SlowRollApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let converter = settings
            .audio
            .then(|| Converter::new(settings.converter.clone()));
        let mut app = Self {
            library: Library::new(settings.midi_dir()),
            session: Session::new(AudioPlayer::new(), settings.lead_in, converter),
            timeline: settings.timeline,
            scroll: TimelineScroll::default(),
            animation: settings.animation,
            spinner: Spinner::default(),
            view_mode: ViewMode::Split,
            show_about: false,
            repaint: RepaintController::new(),
        };
        app.rescan();
        app
    }

    fn rescan(&mut self) {
        if !self.session.clear() {
            return;
        }
        match self.library.rescan() {
            Ok(count) => {
                info!("found {} MIDI files in {}", count, self.library.dir().display());
            }
            Err(e) => {
                warn!("could not scan {}: {}", self.library.dir().display(), e);
                self.session
                    .set_message(Some(format!("could not scan {}", self.library.dir().display())));
            }
        }
    }

    pub fn select(&mut self, path: PathBuf) {
        if self.session.select(path) {
            self.scroll = TimelineScroll::default();
        }
    }

    pub fn process(&mut self) {
        self.session.process();
    }

    fn handle_keys(&mut self, ctx: &Context) {
        let dropped: Option<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .find(|p| is_midi(p))
        });
        if let Some(path) = dropped {
            self.select(path);
            self.process();
        }

        if ctx.wants_keyboard_input() {
            return;
        }
        let (space, one, two, three) = ctx.input(|i| {
            (
                i.key_pressed(Key::Space),
                i.key_pressed(Key::Num1),
                i.key_pressed(Key::Num2),
                i.key_pressed(Key::Num3),
            )
        });
        if space {
            self.session.toggle_playback();
        }
        if one {
            self.view_mode = ViewMode::Timeline;
        }
        if two {
            self.view_mode = ViewMode::Animation;
        }
        if three {
            self.view_mode = ViewMode::Split;
        }
    }

    fn render_file_controls(&mut self, ui: &mut egui::Ui) {
        let in_flight = self.session.is_in_flight();
        let processed = self.session.loaded().is_some();
        let mut choice = None;

        ui.horizontal(|ui| {
            ui.add_enabled_ui(!in_flight, |ui| {
                if ui.button("rescan").clicked() {
                    self.rescan();
                }
                let selected_text = self
                    .session
                    .selected()
                    .map(display_name)
                    .unwrap_or_else(|| "choose a file".to_string());
                egui::ComboBox::from_id_source("file")
                    .selected_text(selected_text)
                    .width(240.0)
                    .show_ui(ui, |ui| {
                        for path in self.library.files() {
                            let is_selected = self.session.selected() == Some(path.as_path());
                            if ui.selectable_label(is_selected, display_name(path)).clicked() {
                                choice = Some(path.clone());
                            }
                        }
                    });
            });

            toolbar_separator(ui);

            if in_flight {
                ui.label("processing...");
            } else if processed {
                let label = if self.session.clock().is_playing() { "stop" } else { "play" };
                if ui.button(label).clicked() {
                    self.session.toggle_playback();
                }
            } else if self.session.selected().is_some() && ui.button("process").clicked() {
                self.process();
            }
        });

        if let Some(path) = choice {
            self.select(path);
        }
    }

    fn render_timeline(&mut self, ui: &mut egui::Ui) {
        ui.heading("timeline");
        panels::timeline_settings(ui, &mut self.timeline);
        match self.session.result() {
            Some(Ok(loaded)) => panels::timeline_view(
                ui,
                &self.timeline,
                &mut self.scroll,
                self.session.clock().current_time(),
                loaded,
            ),
            Some(Err(_)) => panels::placeholder(ui, "could not process this file"),
            None if self.session.is_in_flight() => panels::processing_view(ui, &self.spinner),
            None => panels::placeholder(ui, "no file processed"),
        }
    }

    fn render_animation(&mut self, ui: &mut egui::Ui) {
        ui.heading("animation");
        panels::animation_settings(ui, &mut self.animation);
        match self.session.result() {
            Some(Ok(loaded)) => panels::animation_view(
                ui,
                &self.animation,
                self.session.clock().current_time(),
                loaded,
            ),
            Some(Err(_)) => panels::placeholder(ui, "could not process this file"),
            None if self.session.is_in_flight() => panels::processing_view(ui, &self.spinner),
            None => panels::placeholder(ui, "no file processed"),
        }
    }

    fn status_text(&self) -> String {
        if let Some(message) = self.session.message() {
            return message.to_string();
        }
        if self.session.is_in_flight() {
            return "processing...".to_string();
        }
        let clock = self.session.clock();
        match self.session.loaded() {
            Some(loaded) => format!(
                "{} | {} tracks | {} notes | {} / {} | {}",
                display_name(&loaded.path),
                loaded.piece.track_count(),
                loaded.piece.note_count(),
                format_time(clock.current_time()),
                format_time(clock.total_duration()),
                if clock.is_playing() { "playing" } else { "stopped" },
            ),
            None => format!(
                "{} files in {}",
                self.library.files().len(),
                self.library.dir().display()
            ),
        }
    }

    fn render_about(&mut self, ctx: &Context) {
        egui::Window::new("about slowRoll")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("slowRoll");
                    ui.label(format!("version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(8.0);
                    ui.label("MIDI visualizer for slowOS");
                });
                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);
                ui.label("views:");
                ui.label("  timeline piano roll, one lane per track");
                ui.label("  falling shapes animation");
                ui.add_space(4.0);
                ui.label("frameworks:");
                ui.label("  egui/eframe (MIT), midly (MIT), rodio (MIT)");
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        self.show_about = false;
                    }
                });
            });
    }
}

impl eframe::App for SlowRollApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt).min(MAX_FRAME_DT);
        if self.session.poll() {
            self.repaint.mark_needs_repaint();
        }
        self.session.advance(dt);
        if self.session.is_in_flight() {
            self.spinner.advance(dt);
        }
        self.handle_keys(ctx);

        let activity = if self.session.is_in_flight() {
            Activity::Processing
        } else if self.session.clock().is_playing() {
            Activity::Playing
        } else {
            Activity::Idle
        };
        self.repaint.set_activity(activity);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            menu_bar(ui, |ui| {
                ui.menu_button("file", |ui| {
                    let idle = !self.session.is_in_flight();
                    if ui.add_enabled(idle, egui::Button::new("rescan folder")).clicked() {
                        self.rescan();
                        ui.close_menu();
                    }
                    let can_process = idle
                        && self.session.selected().is_some()
                        && self.session.loaded().is_none();
                    if ui.add_enabled(can_process, egui::Button::new("process")).clicked() {
                        self.process();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close_menu();
                    }
                });
                ui.menu_button("view", |ui| {
                    if ui.button("timeline   1").clicked() {
                        self.view_mode = ViewMode::Timeline;
                        ui.close_menu();
                    }
                    if ui.button("animation  2").clicked() {
                        self.view_mode = ViewMode::Animation;
                        ui.close_menu();
                    }
                    if ui.button("both       3").clicked() {
                        self.view_mode = ViewMode::Split;
                        ui.close_menu();
                    }
                });
                ui.menu_button("transport", |ui| {
                    let playing = self.session.clock().is_playing();
                    let play_text = if playing { "stop   space" } else { "play   space" };
                    let can_play = self.session.loaded().is_some();
                    if ui.add_enabled(can_play, egui::Button::new(play_text)).clicked() {
                        self.session.toggle_playback();
                        ui.close_menu();
                    }
                });
                ui.menu_button("help", |ui| {
                    if ui.button("about").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_file_controls(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            status_bar(ui, &self.status_text());
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(SlowColors::WHITE).inner_margin(8.0))
            .show(ctx, |ui| match self.view_mode {
                ViewMode::Timeline => self.render_timeline(ui),
                ViewMode::Animation => self.render_animation(ui),
                ViewMode::Split => {
                    ui.columns(2, |columns| {
                        self.render_timeline(&mut columns[0]);
                        self.render_animation(&mut columns[1]);
                    });
                }
            });

        if self.show_about {
            self.render_about(ctx);
        }

        self.repaint.end_frame(ctx);
    }
}
