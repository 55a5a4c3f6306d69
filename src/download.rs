use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::DownloadConfig;
use crate::error::{Result, ZimuError};

/// Metadata returned by the probe. Best-effort; falls back to defaults
/// when the probe fails so a dead metadata endpoint never sinks a request.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

fn default_title() -> String {
    "video".to_string()
}

impl Default for VideoInfo {
    fn default() -> Self {
        Self {
            title: default_title(),
            duration: 0.0,
            thumbnail: None,
        }
    }
}

/// yt-dlp front end for the URL entry mode.
pub struct Downloader {
    config: DownloadConfig,
}

impl Downloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Probe title/duration/thumbnail without downloading media.
    ///
    /// Any failure (non-zero exit, timeout, malformed JSON) degrades to
    /// `VideoInfo::default()`; metadata is never mandatory.
    pub async fn probe_metadata(&self, url: &str) -> VideoInfo {
        debug!("Probing metadata for: {}", url);

        let result = run_with_timeout(
            Command::new(&self.config.binary_path)
                .args(["--dump-json", "--no-download", url])
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
            Duration::from_secs(self.config.metadata_timeout_secs),
            "metadata probe",
        )
        .await;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!("Metadata probe failed, using defaults: {}", e);
                return VideoInfo::default();
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Metadata probe exited non-zero, using defaults: {}", stderr);
            return VideoInfo::default();
        }

        match parse_metadata(&String::from_utf8_lossy(&output.stdout)) {
            Ok(info) => info,
            Err(e) => {
                warn!("Metadata probe returned malformed JSON, using defaults: {}", e);
                VideoInfo::default()
            }
        }
    }

    /// Download the audio track to a deterministic path inside `dir`.
    ///
    /// Unlike the probe, this step is mandatory: non-zero exit or timeout
    /// is a hard error. `dir` is the caller's per-request scratch space,
    /// which makes the fixed file name collision-free.
    pub async fn fetch_audio(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let output_path = dir.join("audio.mp3");
        debug!("Downloading audio for {} to {}", url, output_path.display());

        let output = run_with_timeout(
            Command::new(&self.config.binary_path)
                .args([
                    "-x",
                    "--audio-format",
                    "mp3",
                    "--no-playlist",
                    "--output",
                ])
                .arg(&output_path)
                .arg(url)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped()),
            Duration::from_secs(self.config.download_timeout_secs),
            "audio download",
        )
        .await
        .map_err(|e| match e {
            ZimuError::Io(e) => {
                ZimuError::Download(format!("Failed to execute downloader: {}", e))
            }
            other => other,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ZimuError::Download(format!(
                "Audio download failed: {}",
                stderr
            )));
        }

        if !output_path.exists() {
            return Err(ZimuError::Download(
                "Downloader reported success but produced no audio file".to_string(),
            ));
        }

        Ok(output_path)
    }
}

/// Parse the probe's stdout. yt-dlp can emit several JSON lines for
/// playlist-ish URLs; the last non-empty line describes the resolved video.
fn parse_metadata(stdout: &str) -> Result<VideoInfo> {
    let line = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .next_back()
        .ok_or_else(|| ZimuError::Download("Metadata probe produced no output".to_string()))?;

    Ok(serde_json::from_str(line)?)
}

/// Run an external command with an upper time bound.
///
/// Spawn failures come back as `Io` so callers can wrap them in their own
/// error variant; a timeout kills the child and maps to `Timeout`.
pub(crate) async fn run_with_timeout(
    command: &mut Command,
    limit: Duration,
    description: &str,
) -> Result<std::process::Output> {
    let future = command.kill_on_drop(true).output();

    match tokio::time::timeout(limit, future).await {
        Ok(result) => result.map_err(ZimuError::Io),
        Err(_) => Err(ZimuError::Timeout(format!(
            "{} exceeded {}s",
            description,
            limit.as_secs()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let info = parse_metadata(r#"{"title":"t","duration":125,"thumbnail":"http://x/y.jpg"}"#)
            .unwrap();
        assert_eq!(info.title, "t");
        assert_eq!(info.duration, 125.0);
        assert_eq!(info.thumbnail.as_deref(), Some("http://x/y.jpg"));
    }

    #[test]
    fn test_parse_metadata_takes_last_line() {
        let stdout = "{\"title\":\"first\"}\n\n{\"title\":\"second\",\"duration\":10}\n";
        let info = parse_metadata(stdout).unwrap();
        assert_eq!(info.title, "second");
        assert_eq!(info.duration, 10.0);
    }

    #[test]
    fn test_parse_metadata_fills_missing_fields() {
        let info = parse_metadata("{}").unwrap();
        assert_eq!(info.title, "video");
        assert_eq!(info.duration, 0.0);
        assert!(info.thumbnail.is_none());
    }

    #[test]
    fn test_parse_metadata_rejects_garbage() {
        assert!(parse_metadata("").is_err());
        assert!(parse_metadata("not json").is_err());
    }
}
