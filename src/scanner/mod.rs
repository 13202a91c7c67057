pub mod resolver;

pub use resolver::{resolve, resolve_by_episode, resolve_flat};

use crate::error::{AppError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A candidate file and the slot its name matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub path: PathBuf,
    /// Slot 0 is the primary, video-bearing file
    pub slot: u32,
}

/// Resolved files, each group sorted by slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFiles {
    /// All files of a movie
    Flat(Vec<ResolvedFile>),
    /// Files of a season, keyed by episode number
    ByEpisode(BTreeMap<u32, Vec<ResolvedFile>>),
}

impl ResolvedFiles {
    pub fn file_count(&self) -> usize {
        match self {
            ResolvedFiles::Flat(files) => files.len(),
            ResolvedFiles::ByEpisode(episodes) => episodes.values().map(Vec::len).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// Movie
    Flat,
    /// Season, bucketed by the episode number in each file name
    ByEpisode,
}

/// Which file extensions a scan considers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixFilter {
    Media,
    Subtitle,
}

impl SuffixFilter {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SuffixFilter::Media => &["mkv", "m4v", "mp4", "mka"],
            SuffixFilter::Subtitle => &["srt", "mks", "idx", "sub"],
        }
    }

    /// Check the extension of a path, ignoring case
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions().contains(&e.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// File name patterns and the slot each one assigns, in declaration order
#[derive(Debug, Clone, Default)]
pub struct SlotPatterns {
    patterns: Vec<(Regex, u32)>,
}

impl SlotPatterns {
    pub fn new(patterns: Vec<(Regex, u32)>) -> Self {
        Self { patterns }
    }

    /// Compile `(pattern, slot)` pairs
    pub fn compile<'a>(pairs: impl IntoIterator<Item = (&'a str, u32)>) -> Result<Self> {
        let patterns = pairs
            .into_iter()
            .map(|(pattern, slot)| {
                if pattern.is_empty() {
                    return Err(AppError::InvalidInput(
                        "file search patterns must not be empty".to_string(),
                    ));
                }
                Ok((Regex::new(pattern)?, slot))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Parse a JSON object such as `{"\\.mkv": 0, "\\.mka": 1}`, keeping key order
    pub fn parse_json(json: &str) -> Result<Self> {
        let object: Map<String, Value> = serde_json::from_str(json)?;
        let mut pairs = Vec::with_capacity(object.len());
        for (pattern, slot) in &object {
            let slot = slot
                .as_u64()
                .and_then(|s| u32::try_from(s).ok())
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("slot of {:?} is not a file id: {}", pattern, slot))
                })?;
            pairs.push((pattern.as_str(), slot));
        }
        Self::compile(pairs)
    }

    /// Slot of the first pattern found in `name`
    pub fn slot_for(&self, name: &str) -> Option<u32> {
        self.patterns
            .iter()
            .find(|(pattern, _)| pattern.is_match(name))
            .map(|(_, slot)| *slot)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
