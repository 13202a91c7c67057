//! Track probing through the `mediainfo` command line tool.

use super::{PhysicalTrack, TrackKind, TrackProber};
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Probes files with `mediainfo --Output=JSON`
#[derive(Debug, Clone)]
pub struct MediaInfoProber {
    program: PathBuf,
}

impl MediaInfoProber {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use a configured executable or look `mediainfo` up on PATH
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        match configured {
            Some(path) => Ok(Self::new(path)),
            None => which::which("mediainfo")
                .map(Self::new)
                .map_err(|_| AppError::tool_not_found("mediainfo")),
        }
    }
}

impl TrackProber for MediaInfoProber {
    fn probe(&self, path: &Path) -> Result<Vec<PhysicalTrack>> {
        let output = Command::new(&self.program)
            .arg("--Output=JSON")
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::tool_not_found("mediainfo")
                } else {
                    AppError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::tool_failed("mediainfo", stderr.trim()));
        }

        let json = String::from_utf8(output.stdout)
            .map_err(|e| AppError::Probe(format!("invalid UTF-8 in mediainfo output: {}", e)))?;
        let tracks = parse_tracks(&json)?;
        debug!("Probed {} tracks in {}", tracks.len(), path.display());
        Ok(tracks)
    }
}

#[derive(Debug, Deserialize)]
struct MediaInfoOutput {
    media: Option<MediaInfoMedia>,
}

#[derive(Debug, Deserialize)]
struct MediaInfoMedia {
    #[serde(default)]
    track: Vec<MediaInfoTrack>,
}

#[derive(Debug, Deserialize)]
struct MediaInfoTrack {
    #[serde(rename = "@type")]
    track_type: String,
    #[serde(rename = "ID")]
    id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Language")]
    language: Option<String>,
}

/// Convert mediainfo JSON into physical tracks
fn parse_tracks(json: &str) -> Result<Vec<PhysicalTrack>> {
    let output: MediaInfoOutput = serde_json::from_str(json)
        .map_err(|e| AppError::Probe(format!("failed to parse mediainfo output: {}", e)))?;

    let Some(media) = output.media else {
        return Ok(Vec::new());
    };

    let mut tracks = Vec::new();
    let mut ordinal = 0u32;

    for track in media.track {
        if track.track_type == "General" {
            continue;
        }
        ordinal += 1;

        let kind = match track.track_type.as_str() {
            "Video" => TrackKind::Video,
            "Audio" => TrackKind::Audio,
            "Text" => TrackKind::Subtitle,
            _ => continue,
        };

        // Text files carry no ID, their position is the ordinal
        let position = track
            .id
            .as_deref()
            .and_then(parse_leading_number)
            .unwrap_or(ordinal);

        tracks.push(PhysicalTrack {
            position,
            kind,
            title: track.title.filter(|t| !t.is_empty()),
            language: track.language.filter(|l| !l.is_empty()),
        });
    }

    Ok(tracks)
}

/// Leading digits of an ID such as `"2"` or `"2-CC1"`
fn parse_leading_number(id: &str) -> Option<u32> {
    let digits: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
