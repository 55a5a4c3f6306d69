//! Zimu - Video Subtitle Extraction Service
//!
//! Extracts spoken-content subtitles from online videos or uploaded media
//! files by orchestrating yt-dlp, ffmpeg, and whisper, and serves the
//! results over a small JSON HTTP API.

pub mod cli;
pub mod clock;
pub mod config;
pub mod download;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod platform;
pub mod server;
pub mod subtitle;
pub mod transcribe;
