pub mod mediainfo;

pub use mediainfo::MediaInfoProber;

use crate::error::Result;
use std::path::Path;

/// Kind of a physical track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

/// A track as reported by a prober
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalTrack {
    /// 1-based position inside the file
    pub position: u32,
    pub kind: TrackKind,
    pub title: Option<String>,
    pub language: Option<String>,
}

impl PhysicalTrack {
    /// 0-based id used to address the track in a remux
    pub fn track_id(&self) -> u32 {
        self.position.saturating_sub(1)
    }
}

/// Lists the tracks of a media file in file order
pub trait TrackProber {
    fn probe(&self, path: &Path) -> Result<Vec<PhysicalTrack>>;
}
