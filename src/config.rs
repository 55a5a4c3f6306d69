use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ZimuError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub download: DownloadConfig,
    pub media: MediaConfig,
    pub transcriber: TranscriberConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port the HTTP service listens on
    pub port: u16,
    /// Directory scratch space is allocated under; system temp dir when unset
    pub scratch_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Path to the yt-dlp binary
    pub binary_path: String,
    /// Timeout for the metadata probe (best-effort, short)
    pub metadata_timeout_secs: u64,
    /// Timeout for audio download (mandatory, long)
    pub download_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to the ffmpeg binary
    pub binary_path: String,
    /// Timeout for stripping the video stream from an upload
    pub transcode_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper CLI binary
    pub binary_path: String,
    /// Model size (tiny, base, small, medium, large)
    pub model: String,
    /// Language hint passed to the recognizer
    pub language: String,
    /// Timeout for a single inference run
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 8000,
                scratch_dir: None,
            },
            download: DownloadConfig {
                binary_path: "yt-dlp".to_string(),
                metadata_timeout_secs: 30,
                download_timeout_secs: 300,
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                transcode_timeout_secs: 300,
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "base".to_string(),
                language: "zh".to_string(),
                timeout_secs: 600,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ZimuError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    /// Apply environment overrides on top of file/default values.
    ///
    /// `PORT` is provided by hosting platforms; the rest exist so that
    /// deployments can swap binaries or model size without a config file.
    pub fn apply_env(&mut self) {
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse::<u16>()
        {
            self.server.port = port;
        }
        if let Ok(model) = std::env::var("WHISPER_MODEL")
            && !model.trim().is_empty()
        {
            self.transcriber.model = model;
        }
        if let Ok(path) = std::env::var("FFMPEG_PATH")
            && !path.trim().is_empty()
        {
            self.media.binary_path = path;
        }
        if let Ok(path) = std::env::var("YTDLP_PATH")
            && !path.trim().is_empty()
        {
            self.download.binary_path = path;
        }
    }
}
