//! Selected file, processing and playback state shared by every control
//!
//! The panels, menus, keys and drag and drop all go through here, so the
//! rules hold no matter which control fired: processing stops playback,
//! nothing changes while a job is in flight, and play needs a processed
//! piece.

use std::path::{Path, PathBuf};

use log::{error, info};
use rollcore::task::ProcessTask;
use rollcore::PlaybackClock;

use crate::audio::AudioOut;
use crate::job::{Converter, Loaded, ProcessError, ProcessJob};

pub type JobResult = Result<Loaded, ProcessError>;

pub struct Session<A> {
    selected: Option<PathBuf>,
    task: ProcessTask<JobResult>,
    clock: PlaybackClock,
    audio: A,
    converter: Option<Converter>,
    message: Option<String>,
}

impl<A: AudioOut> Session<A> {
    pub fn new(audio: A, lead_in: f32, converter: Option<Converter>) -> Self {
        Self {
            selected: None,
            task: ProcessTask::new(),
            clock: PlaybackClock::new(lead_in),
            audio,
            converter,
            message: None,
        }
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn result(&self) -> Option<&JobResult> {
        self.task.result()
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        match self.task.result() {
            Some(Ok(loaded)) => Some(loaded),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.task.is_in_flight()
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    /// Drop the selection and any result. Refused while a job is in flight.
    pub fn clear(&mut self) -> bool {
        if self.task.is_in_flight() {
            return false;
        }
        self.stop_playback();
        self.task.reset();
        self.selected = None;
        self.message = None;
        true
    }

    /// Choose another file, discarding the processed one. Returns `false`
    /// when nothing changed: the file is already selected or a job is in flight.
    pub fn select(&mut self, path: PathBuf) -> bool {
        if self.task.is_in_flight() || self.selected.as_ref() == Some(&path) {
            return false;
        }
        self.stop_playback();
        self.task.reset();
        self.message = None;
        self.selected = Some(path);
        true
    }

    /// Process the selected file on the worker thread.
    pub fn process(&mut self) -> bool {
        let Some(path) = self.selected.clone() else {
            return false;
        };
        let job = ProcessJob {
            path: path.clone(),
            converter: self.converter.clone(),
        };
        let started = self.start_job(move || job.run());
        if started {
            info!("processing {}", path.display());
        }
        started
    }

    fn start_job<F>(&mut self, job: F) -> bool
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        if self.task.is_in_flight() {
            return false;
        }
        self.stop_playback();
        self.message = None;
        self.task.start(job)
    }

    /// Publish a finished job. Returns `true` on the frame it happens.
    pub fn poll(&mut self) -> bool {
        if !self.task.poll() {
            return false;
        }
        match self.task.result() {
            Some(Ok(loaded)) => {
                self.clock.load(loaded.summary.first_note_time, loaded.piece.duration);
            }
            Some(Err(e)) => {
                error!("processing failed: {}", e);
                self.message = Some(format!("processing failed: {}", e));
            }
            None => {}
        }
        true
    }

    pub fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }

    pub fn start_playback(&mut self) {
        let Some(loaded) = self.loaded() else {
            return;
        };
        if let Some(wav) = loaded.audio.clone() {
            self.audio.play(&wav);
        }
        self.clock.start();
    }

    pub fn stop_playback(&mut self) {
        self.audio.stop();
        self.clock.stop();
    }

    pub fn toggle_playback(&mut self) {
        if self.clock.is_playing() {
            self.stop_playback();
        } else {
            self.start_playback();
        }
    }
}
