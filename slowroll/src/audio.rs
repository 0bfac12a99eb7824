//! Playback of the rendered WAV alongside the playhead

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("playback error: {0}")]
    Play(#[from] rodio::PlayError),
}

/// Where the rendered piece is played. Failures are the sink's business;
/// callers never wait on or react to them.
pub trait AudioOut {
    fn play(&mut self, path: &Path);
    fn stop(&mut self);
}

pub struct AudioPlayer {
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (stream, handle) = OutputStream::try_default().ok().unzip();
        if handle.is_none() {
            warn!("no audio output device, playback will be silent");
        }
        Self {
            _stream: stream,
            handle,
            sink: None,
        }
    }

    fn try_play(&mut self, path: &Path) -> Result<(), AudioError> {
        let handle = self.handle.as_ref().ok_or(AudioError::NoDevice)?;
        let source = Decoder::new(BufReader::new(File::open(path)?))?;
        let sink = Sink::try_new(handle)?;
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }
}

impl AudioOut for AudioPlayer {
    /// Start `path` from the beginning. Failures are logged and the
    /// visual playback carries on without sound.
    fn play(&mut self, path: &Path) {
        self.stop();
        match self.try_play(path) {
            Ok(()) => info!("playing {}", path.display()),
            Err(e) => warn!("could not play {}: {}", path.display(), e),
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
