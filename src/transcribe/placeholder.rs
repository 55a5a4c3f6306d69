use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

use super::{Segment, Transcriber};
use crate::error::Result;

/// Degraded-mode backend used when no recognition runtime is installed.
///
/// Returns a fixed three-entry announcement instead of failing the
/// request; this is a deliberate contract so the service stays usable for
/// demos on hosts without whisper.
pub struct PlaceholderTranscriber;

#[async_trait]
impl Transcriber for PlaceholderTranscriber {
    async fn transcribe(&self, audio_path: &Path, _language: &str) -> Result<Vec<Segment>> {
        warn!(
            "No recognition backend installed; returning placeholder subtitles for {}",
            audio_path.display()
        );

        Ok(vec![
            Segment {
                start: 0.0,
                text: "Welcome to the subtitle extraction service".to_string(),
            },
            Segment {
                start: 3.0,
                text: "This is demo subtitle content".to_string(),
            },
            Segment {
                start: 6.0,
                text: "Install whisper to enable real speech recognition".to_string(),
            },
        ])
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_returns_fixed_three_entries() {
        let backend = PlaceholderTranscriber;
        let segments = backend
            .transcribe(Path::new("/tmp/never-read.mp3"), "zh")
            .await
            .unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[1].start, 3.0);
        assert_eq!(segments[2].start, 6.0);
    }
}
