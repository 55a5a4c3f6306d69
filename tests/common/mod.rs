//! Shared helpers for integration tests: stub executables standing in for
//! yt-dlp / ffmpeg / whisper, plus a config wired to them.

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use zimu::config::Config;

/// yt-dlp stand-in: answers the metadata probe with fixed JSON and writes
/// a fake audio file at the requested --output path.
pub const YTDLP_OK: &str = r#"#!/bin/sh
if [ "$1" = "--dump-json" ]; then
  printf '%s\n' '{"title":"t","duration":125,"thumbnail":"http://example.com/t.jpg"}'
  exit 0
fi
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  prev="$arg"
done
printf 'fake-audio' > "$out"
"#;

/// yt-dlp stand-in whose audio download step fails.
pub const YTDLP_DOWNLOAD_FAILS: &str = r#"#!/bin/sh
if [ "$1" = "--dump-json" ]; then
  printf '%s\n' '{"title":"t","duration":125}'
  exit 0
fi
echo "simulated download failure" >&2
exit 1
"#;

/// yt-dlp stand-in whose metadata probe fails but download succeeds.
pub const YTDLP_PROBE_FAILS: &str = r#"#!/bin/sh
if [ "$1" = "--dump-json" ]; then
  echo "simulated probe failure" >&2
  exit 1
fi
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  prev="$arg"
done
printf 'fake-audio' > "$out"
"#;

/// yt-dlp stand-in whose audio download step hangs past any short timeout.
pub const YTDLP_DOWNLOAD_HANGS: &str = r#"#!/bin/sh
if [ "$1" = "--dump-json" ]; then
  printf '%s\n' '{"title":"t","duration":125}'
  exit 0
fi
sleep 30
"#;

/// whisper stand-in: emits one segment with untrimmed text.
pub const WHISPER_OK: &str = r#"#!/bin/sh
if [ "$1" = "--help" ]; then exit 0; fi
audio="$1"
dir=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "--output_dir" ]; then dir="$arg"; fi
  prev="$arg"
done
stem=$(basename "$audio")
stem="${stem%.*}"
printf '%s\n' '{"segments":[{"start":0.0,"end":2.0,"text":" hi "}]}' > "$dir/$stem.json"
"#;

/// ffmpeg stand-in: answers the version check and writes a fake audio
/// file at the last argument.
pub const FFMPEG_OK: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "ffmpeg version 6.0-stub"
  exit 0
fi
for arg in "$@"; do out="$arg"; done
printf 'fake-audio' > "$out"
"#;

/// ffmpeg stand-in that always fails.
pub const FFMPEG_FAILS: &str = r#"#!/bin/sh
echo "simulated transcode failure" >&2
exit 1
"#;

pub fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Config pointing every external binary at a stub in `bin_dir`, with
/// scratch space pinned under `scratch_root` so tests can inspect it.
pub fn stub_config(bin_dir: &Path, scratch_root: &Path) -> Config {
    let mut config = Config::default();
    config.server.scratch_dir = Some(scratch_root.to_path_buf());
    config.download.binary_path = bin_dir.join("yt-dlp").to_string_lossy().into_owned();
    config.download.metadata_timeout_secs = 10;
    config.download.download_timeout_secs = 10;
    config.media.binary_path = bin_dir.join("ffmpeg").to_string_lossy().into_owned();
    config.media.transcode_timeout_secs = 10;
    config.transcriber.binary_path = bin_dir.join("whisper").to_string_lossy().into_owned();
    config.transcriber.timeout_secs = 10;
    config
}

/// The resource-lifetime invariant: no request leaves anything behind in
/// the scratch root.
pub fn assert_scratch_empty(scratch_root: &Path) {
    let leftovers: Vec<_> = fs::read_dir(scratch_root)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert!(
        leftovers.is_empty(),
        "scratch root not cleaned up: {:?}",
        leftovers
    );
}
