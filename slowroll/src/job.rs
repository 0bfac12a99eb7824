//! The processing job run on the worker thread: import, aggregate, render audio

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, info};
use rollcore::import::{import_file, ImportError};
use rollcore::{Piece, PieceSummary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("{0}")]
    Import(#[from] ImportError),
    #[error("could not run converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("converter failed ({0})")]
    Convert(ExitStatus),
    #[error("converter wrote no output at {0}")]
    MissingOutput(PathBuf),
}

/// Everything the panels need once a file is processed.
#[derive(Debug)]
pub struct Loaded {
    pub path: PathBuf,
    pub piece: Piece,
    pub summary: PieceSummary,
    /// Rendered WAV, absent when audio is disabled.
    pub audio: Option<PathBuf>,
}

/// External MIDI to WAV renderer, called as `<program> FILE -Ow -o OUT`.
#[derive(Clone, Debug)]
pub struct Converter {
    pub program: String,
    pub output: PathBuf,
}

impl Converter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            output: std::env::temp_dir().join("slowroll-render.wav"),
        }
    }

    pub fn render(&self, midi: &Path) -> Result<PathBuf, ProcessError> {
        let _ = std::fs::remove_file(&self.output);
        debug!("rendering {} with {}", midi.display(), self.program);
        let status = Command::new(&self.program)
            .arg(midi)
            .arg("-Ow")
            .arg("-o")
            .arg(&self.output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| ProcessError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ProcessError::Convert(status));
        }
        if !self.output.is_file() {
            return Err(ProcessError::MissingOutput(self.output.clone()));
        }
        Ok(self.output.clone())
    }
}

pub struct ProcessJob {
    pub path: PathBuf,
    pub converter: Option<Converter>,
}

impl ProcessJob {
    pub fn run(self) -> Result<Loaded, ProcessError> {
        let piece = import_file(&self.path)?;
        let summary = PieceSummary::compute(&piece);
        let audio = match &self.converter {
            Some(converter) => Some(converter.render(&self.path)?),
            None => None,
        };
        info!(
            "processed {}: {} tracks, {} notes, {:.1}s",
            self.path.display(),
            piece.track_count(),
            piece.note_count(),
            piece.duration
        );
        Ok(Loaded {
            path: self.path,
            piece,
            summary,
            audio,
        })
    }
}
