use std::fmt;

/// Source platform detected from a video URL.
///
/// Detection is a substring match against known domains, checked in a
/// fixed priority order; the first match wins and unmatched input maps
/// to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Bilibili,
    Douyin,
    Xiaohongshu,
    YouTube,
    Unknown,
}

impl Platform {
    pub fn detect(url: &str) -> Self {
        if url.contains("bilibili.com") || url.contains("b23.tv") {
            Platform::Bilibili
        } else if url.contains("douyin.com") {
            Platform::Douyin
        } else if url.contains("xiaohongshu.com") || url.contains("xhslink.com") {
            Platform::Xiaohongshu
        } else if url.contains("youtube.com") || url.contains("youtu.be") {
            Platform::YouTube
        } else {
            Platform::Unknown
        }
    }

    /// Human-readable label used in the response payload.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Bilibili => "Bilibili",
            Platform::Douyin => "Douyin",
            Platform::Xiaohongshu => "Xiaohongshu",
            Platform::YouTube => "YouTube",
            Platform::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
