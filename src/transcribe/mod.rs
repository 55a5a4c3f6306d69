// Modular transcription architecture
//
// Each backend implements the single `Transcriber` contract. Backend
// selection happens once at startup: the ordered candidate list is walked
// and the first available backend wins, with the canned placeholder as the
// terminal fallback. Requests never re-probe availability.

pub mod placeholder;
pub mod whisper_cli;

use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

use crate::config::TranscriberConfig;
use crate::error::Result;

/// A single recognized span of speech as reported by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Start offset in seconds from the beginning of the audio.
    pub start: f64,
    pub text: String,
}

/// Main trait for transcription operations
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into ordered segments.
    ///
    /// Blocks for the duration of inference; this is the dominant latency
    /// of the whole pipeline.
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Vec<Segment>>;

    /// Whether the backend's runtime is reachable on this host.
    fn is_available(&self) -> bool;

    fn name(&self) -> &'static str;
}

/// Select the first available backend from the fixed candidate list.
pub fn select_backend(config: &TranscriberConfig) -> Box<dyn Transcriber> {
    let whisper = whisper_cli::WhisperCliTranscriber::new(config.clone());
    if whisper.is_available() {
        info!("Using transcription backend: {}", whisper.name());
        return Box::new(whisper);
    }

    warn!(
        "No speech recognition backend available ({} not found); \
         falling back to placeholder subtitles",
        config.binary_path
    );
    Box::new(placeholder::PlaceholderTranscriber)
}
