use std::path::PathBuf;
use tempfile::TempDir;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::{self, format_clock};
use crate::config::Config;
use crate::download::Downloader;
use crate::error::{Result, ZimuError};
use crate::media::{self, MediaProcessor};
use crate::platform::Platform;
use crate::subtitle::{self, ExtractionResult, SubtitleEntry};
use crate::transcribe::{self, Segment, Transcriber};

/// Platform label used for uploaded files, which have no source URL.
const LOCAL_PLATFORM: &str = "local file";

/// Per-request extraction pipeline.
///
/// Built once at startup and shared by all requests; the transcription
/// backend is selected here, not per call. Each request gets its own
/// scratch directory, so concurrent requests never contend on file names,
/// and the directory is removed when it drops - on success and on every
/// error path alike.
pub struct Pipeline {
    downloader: Downloader,
    media: MediaProcessor,
    transcriber: Box<dyn Transcriber>,
    language: String,
    scratch_root: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let transcriber = transcribe::select_backend(&config.transcriber);
        Self::with_transcriber(config, transcriber)
    }

    pub fn with_transcriber(config: Config, transcriber: Box<dyn Transcriber>) -> Self {
        let media = MediaProcessor::new(config.media);
        // Uploads need ffmpeg, URL extraction does not; a missing binary is
        // surfaced at startup rather than failing the whole service.
        if let Err(e) = media.check_availability() {
            warn!("ffmpeg unavailable, file uploads will fail: {}", e);
        }

        Self {
            downloader: Downloader::new(config.download),
            media,
            transcriber,
            language: config.transcriber.language,
            scratch_root: config.server.scratch_dir,
        }
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let dir = match &self.scratch_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                TempDir::new_in(root)?
            }
            None => TempDir::new()?,
        };
        Ok(dir)
    }

    /// Extract subtitles from a video URL.
    ///
    /// Metadata is best-effort; the audio download is mandatory.
    pub async fn extract_from_url(&self, url: &str) -> Result<ExtractionResult> {
        let request_id = Uuid::new_v4();
        info!(%request_id, url, "Extracting subtitles from URL");

        let scratch = self.scratch_dir()?;

        let video_info = self.downloader.probe_metadata(url).await;
        let audio_path = self.downloader.fetch_audio(url, scratch.path()).await?;

        let segments = self
            .transcriber
            .transcribe(&audio_path, &self.language)
            .await?;
        let subtitles = to_subtitles(segments);
        let summary = subtitle::summarize(&subtitles);

        info!(%request_id, entries = subtitles.len(), "Extraction complete");

        Ok(ExtractionResult {
            title: video_info.title,
            duration: format_clock(video_info.duration),
            platform: Platform::detect(url).label().to_string(),
            thumbnail: video_info.thumbnail,
            subtitles,
            summary: Some(summary),
        })
    }

    /// Extract subtitles from an uploaded media file.
    ///
    /// Audio containers are transcribed directly; anything else has its
    /// video stream stripped first.
    pub async fn extract_from_upload(&self, filename: &str, data: &[u8]) -> Result<ExtractionResult> {
        let request_id = Uuid::new_v4();
        info!(%request_id, filename, bytes = data.len(), "Extracting subtitles from upload");

        let filename = sanitize_filename(filename)?;
        let scratch = self.scratch_dir()?;
        let upload_path = scratch.path().join(&filename);
        tokio::fs::write(&upload_path, data).await?;

        let audio_path = if media::is_audio_file(&upload_path) {
            upload_path
        } else {
            let stripped = upload_path.with_extension("mp3");
            self.media.strip_video(&upload_path, &stripped).await?;
            stripped
        };

        let segments = self
            .transcriber
            .transcribe(&audio_path, &self.language)
            .await?;
        let subtitles = to_subtitles(segments);
        let summary = subtitle::summarize(&subtitles);

        info!(%request_id, entries = subtitles.len(), "Extraction complete");

        Ok(ExtractionResult {
            title: filename,
            duration: clock::UNKNOWN_CLOCK.to_string(),
            platform: LOCAL_PLATFORM.to_string(),
            thumbnail: None,
            subtitles,
            summary: Some(summary),
        })
    }
}

fn to_subtitles(segments: Vec<Segment>) -> Vec<SubtitleEntry> {
    segments
        .into_iter()
        .map(|segment| SubtitleEntry {
            timestamp: format_clock(segment.start),
            text: segment.text.trim().to_string(),
        })
        .collect()
}

/// Reduce an upload name to its final path component and reject names
/// that would escape the scratch directory.
fn sanitize_filename(filename: &str) -> Result<String> {
    let name = std::path::Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .filter(|name| !name.is_empty() && name != "." && name != "..");

    name.ok_or_else(|| ZimuError::Media(format!("Invalid upload filename: {:?}", filename)))
}
