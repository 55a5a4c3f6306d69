use serde::{Deserialize, Serialize};

/// A single timestamped line of recognized speech.
///
/// Entries are ordered by their appearance in the source audio; that order
/// is preserved all the way into the response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    /// Start of the line, formatted as `MM:SS`.
    pub timestamp: String,
    pub text: String,
}

/// Response payload for a single extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    /// Media duration as `MM:SS`, or `"--:--"` when unknown.
    pub duration: String,
    pub platform: String,
    pub thumbnail: Option<String>,
    pub subtitles: Vec<SubtitleEntry>,
    pub summary: Option<String>,
}

const NO_SUMMARY: &str = "No summary available";
const SUMMARY_LEAD_ENTRIES: usize = 3;

/// Build a naive extractive summary from the leading subtitle entries.
///
/// Takes the text of the first three entries (fewer if the list is
/// shorter), space-joined, wrapped in a fixed template. No language model
/// is involved.
pub fn summarize(subtitles: &[SubtitleEntry]) -> String {
    if subtitles.is_empty() {
        return NO_SUMMARY.to_string();
    }

    let lead = subtitles
        .iter()
        .take(SUMMARY_LEAD_ENTRIES)
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    format!("Main content: {}...", lead)
}
