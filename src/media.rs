use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::download::run_with_timeout;
use crate::error::{Result, ZimuError};

/// Extensions accepted as already-audio containers; anything else goes
/// through the video-strip transcode first.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-acodec").arg(codec)
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Execute the command, bounded by `limit`.
    pub async fn execute(&self, limit: Duration) -> Result<()> {
        debug!(
            "Executing media processing command: {} {:?}",
            self.binary_path, self.args
        );

        let output = run_with_timeout(
            Command::new(&self.binary_path).args(&self.args),
            limit,
            &self.description,
        )
        .await
        .map_err(|e| match e {
            ZimuError::Io(e) => {
                ZimuError::Media(format!("Failed to execute media processor: {}", e))
            }
            other => other,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ZimuError::Media(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(())
    }
}

/// FFmpeg-based transcoder for the upload entry mode.
pub struct MediaProcessor {
    config: MediaConfig,
}

impl MediaProcessor {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Strip the video stream from `input` and emit an mp3 at `output`.
    pub async fn strip_video(&self, input: &Path, output: &Path) -> Result<()> {
        info!(
            "Extracting audio from {} to {}",
            input.display(),
            output.display()
        );

        MediaCommand::new(&self.config.binary_path, "Audio extraction")
            .input(input)
            .no_video()
            .audio_codec("libmp3lame")
            .overwrite()
            .output(output)
            .execute(Duration::from_secs(self.config.transcode_timeout_secs))
            .await?;

        info!("Audio extraction completed");
        Ok(())
    }

    /// Check if the media processor is available
    pub fn check_availability(&self) -> Result<()> {
        let output = std::process::Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| ZimuError::Media(format!("Media processor not found: {}", e)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ZimuError::Media(
                "Media processor version check failed".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(&PathBuf::from("a.mp3")));
        assert!(is_audio_file(&PathBuf::from("a.WAV")));
        assert!(is_audio_file(&PathBuf::from("dir/a.m4a")));
        assert!(!is_audio_file(&PathBuf::from("a.mp4")));
        assert!(!is_audio_file(&PathBuf::from("a.mkv")));
        assert!(!is_audio_file(&PathBuf::from("noext")));
    }

    #[test]
    fn test_check_availability_rejects_missing_binary() {
        let processor = MediaProcessor::new(crate::config::MediaConfig {
            binary_path: "/nonexistent/ffmpeg-binary".to_string(),
            transcode_timeout_secs: 10,
        });
        let err = processor.check_availability().unwrap_err().to_string();
        assert!(err.contains("Media processor not found"), "got: {err}");
    }

    #[test]
    fn test_strip_video_command_shape() {
        let command = MediaCommand::new("ffmpeg", "Audio extraction")
            .input("in.mp4")
            .no_video()
            .audio_codec("libmp3lame")
            .overwrite()
            .output("out.mp3");

        assert_eq!(
            command.args,
            vec!["-i", "in.mp4", "-vn", "-acodec", "libmp3lame", "-y", "out.mp3"]
        );
    }
}
