//! Anthem playback
//!
//! The plugin only decides *when* to play and *what*; playing goes through an
//! [`AnthemPlayer`] injected by whoever hosts the plugin.

mod fade;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub use fade::FadeTail;

/// Display name when no anthem file is selected
pub const NO_FILE_SELECTED: &str = "No file selected";

/// Length of the fade applied to the end of an anthem
pub const FADE_OUT_DURATION: Duration = Duration::from_secs(3);

/// The anthem file chosen by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnthemSelection {
    path: Option<String>,
}

impl AnthemSelection {
    /// Build from the persisted path setting; empty means nothing selected
    pub fn from_setting(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self {
            path: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(Path::new)
    }

    pub fn is_selected(&self) -> bool {
        self.path.is_some()
    }

    /// Final path component, splitting on both separator styles since the
    /// setting may have been written on another platform
    pub fn display_name(&self) -> &str {
        match &self.path {
            Some(path) => path.rsplit(['/', '\\']).next().unwrap_or(path),
            None => NO_FILE_SELECTED,
        }
    }
}

/// Plays an anthem file
pub trait AnthemPlayer {
    /// Start playing `path`, replacing anything already playing
    fn play(&mut self, path: &Path, fade_out: bool) -> Result<()>;

    /// Stop playback if any
    fn stop(&mut self);
}

/// Player used when no audio device is available
#[derive(Debug, Default)]
pub struct NullAnthemPlayer;

impl AnthemPlayer for NullAnthemPlayer {
    fn play(&mut self, path: &Path, fade_out: bool) -> Result<()> {
        info!(
            "Audio output unavailable, skipping {} (fade out: {})",
            path.display(),
            fade_out
        );
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Plays anthems on the default output device
pub struct RodioAnthemPlayer {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioAnthemPlayer {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device available")?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }
}

impl AnthemPlayer for RodioAnthemPlayer {
    fn play(&mut self, path: &Path, fade_out: bool) -> Result<()> {
        self.stop();

        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode {}", path.display()))?;
        let sink = Sink::try_new(&self.handle).context("failed to create audio sink")?;

        if fade_out {
            sink.append(FadeTail::new(source, FADE_OUT_DURATION));
        } else {
            sink.append(source);
        }

        debug!("Playing {} (fade out: {})", path.display(), fade_out);
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
