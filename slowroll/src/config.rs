//! Startup configuration: command line, optional JSON file, defaults
//!
//! The JSON file is only read. Anything changed in the settings panels
//! lasts for the session.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, warn};
use rollcore::falling::{self, FallingConfig, FIGURE_HEIGHT_RANGE};
use rollcore::playback::DEFAULT_LEAD_IN;
use rollcore::timeline::{self, TimelineConfig, NOTE_HEIGHT_RANGE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Parser, Debug, Default)]
#[command(name = "slowroll", about = "Piano roll and falling-shapes MIDI visualizer")]
pub struct Args {
    /// MIDI file to process on startup.
    pub file: Option<PathBuf>,

    /// Directory scanned for .mid files (default ~/MIDI).
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Program that renders MIDI to WAV (called as `<converter> FILE -Ow -o OUT`).
    #[arg(short, long)]
    pub converter: Option<String>,

    /// Skip audio rendering and playback.
    #[arg(long)]
    pub no_audio: bool,

    /// Seconds the playhead starts before the first note.
    #[arg(long)]
    pub lead_in: Option<f32>,

    /// Settings file to read instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub midi_dir: Option<PathBuf>,
    pub converter: String,
    pub audio: bool,
    pub lead_in: f32,
    pub timeline: TimelineConfig,
    pub animation: FallingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            midi_dir: None,
            converter: "timidity".into(),
            audio: true,
            lead_in: DEFAULT_LEAD_IN,
            timeline: TimelineConfig::default(),
            animation: FallingConfig::default(),
        }
    }
}

/// Default settings file: `<config dir>/slowos/slowroll.json`
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "slowos")
        .map(|p| p.config_dir().join("slowroll.json"))
}

/// Get MIDI directory (~/MIDI)
pub fn default_midi_dir() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        let midi = home.join("MIDI");
        if midi.is_dir() {
            return midi;
        }
        let _ = std::fs::create_dir_all(&midi);
        if midi.is_dir() {
            return midi;
        }
    }
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Defaults, then the settings file, then command line overrides.
    /// A missing default file is normal; a broken or missing explicit one
    /// is reported and ignored.
    pub fn resolve(args: &Args) -> Self {
        let mut settings = match (&args.config, default_config_path()) {
            (Some(path), _) => Self::load(path).unwrap_or_else(|e| {
                warn!("could not read settings {}: {}", path.display(), e);
                Self::default()
            }),
            (None, Some(path)) if path.exists() => Self::load(&path).unwrap_or_else(|e| {
                warn!("could not read settings {}: {}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };
        settings.apply_args(args);
        settings.clamp();
        debug!("settings: {:?}", settings);
        settings
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.dir {
            self.midi_dir = Some(dir.clone());
        }
        if let Some(converter) = &args.converter {
            self.converter = converter.clone();
        }
        if args.no_audio {
            self.audio = false;
        }
        if let Some(lead_in) = args.lead_in {
            self.lead_in = lead_in.max(0.0);
        }
    }

    /// Pull file values into the ranges the sliders offer.
    pub fn clamp(&mut self) {
        let clamp = |value: &mut f32, range: &RangeInclusive<f32>| {
            *value = if value.is_nan() {
                *range.start()
            } else {
                value.clamp(*range.start(), *range.end())
            };
        };
        clamp(&mut self.timeline.pixels_per_second, &timeline::PIXELS_PER_SECOND_RANGE);
        clamp(&mut self.timeline.note_height, &NOTE_HEIGHT_RANGE);
        clamp(&mut self.animation.pixels_per_second, &falling::PIXELS_PER_SECOND_RANGE);
        clamp(&mut self.animation.figure_height, &FIGURE_HEIGHT_RANGE);
        if self.lead_in.is_nan() || self.lead_in < 0.0 {
            self.lead_in = 0.0;
        }
    }

    pub fn midi_dir(&self) -> PathBuf {
        self.midi_dir.clone().unwrap_or_else(default_midi_dir)
    }
}
