use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

use super::{Segment, Transcriber};
use crate::config::TranscriberConfig;
use crate::download::run_with_timeout;
use crate::error::{Result, ZimuError};

/// Whisper CLI JSON output format
#[derive(Debug, Clone, Deserialize)]
pub struct WhisperOutput {
    pub segments: Vec<WhisperSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub text: String,
}

/// Backend that shells out to the `whisper` CLI.
///
/// Runs one inference per call with JSON output into a private temp
/// directory; the model is selected by name and loaded by the CLI itself,
/// so process-wide model state lives outside this process.
pub struct WhisperCliTranscriber {
    config: TranscriberConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

fn to_segments(output: WhisperOutput) -> Vec<Segment> {
    output
        .segments
        .into_iter()
        .map(|segment| Segment {
            start: segment.start,
            text: segment.text,
        })
        .collect()
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Vec<Segment>> {
        info!("Transcribing {} with whisper CLI", audio_path.display());

        let temp_dir = tempfile::tempdir()
            .map_err(|e| ZimuError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let output = run_with_timeout(
            Command::new(&self.config.binary_path)
                .arg(audio_path)
                .args(["--model", &self.config.model])
                .args(["--language", language])
                .arg("--output_dir")
                .arg(output_dir)
                .args(["--output_format", "json"])
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
            Duration::from_secs(self.config.timeout_secs),
            "transcription",
        )
        .await
        .map_err(|e| match e {
            ZimuError::Io(e) => ZimuError::Transcriber(format!("Failed to execute whisper: {}", e)),
            other => other,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ZimuError::Transcriber(format!(
                "Whisper failed: {}",
                stderr
            )));
        }

        // Whisper names its output after the audio file's stem
        let stem = audio_path
            .file_stem()
            .ok_or_else(|| ZimuError::Transcriber("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", stem.to_string_lossy()));

        let json_content = std::fs::read_to_string(&json_file)
            .map_err(|e| ZimuError::Transcriber(format!("Failed to read whisper output: {}", e)))?;

        let whisper_output: WhisperOutput = serde_json::from_str(&json_content)
            .map_err(|e| ZimuError::Transcriber(format!("Failed to parse whisper JSON: {}", e)))?;

        Ok(to_segments(whisper_output))
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(&self.config.binary_path)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "whisper-cli"
    }
}
