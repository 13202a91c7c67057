use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TMDB access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key, saved with `save tmdb-info`
    pub api_key: Option<String>,
    /// Base URL of the v3 REST API
    pub base_url: String,
    /// Language used for titles and episode names
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            language: "en-US".to_string(),
        }
    }
}

/// Collection root directories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub movies_directory: Option<PathBuf>,
    pub tvshows_directory: Option<PathBuf>,
}

impl CollectionConfig {
    /// Whether `save collection-info` has been run
    pub fn is_saved(&self) -> bool {
        self.movies_directory.is_some() || self.tvshows_directory.is_some()
    }
}

/// External tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// mkvmerge executable, looked up on PATH when unset
    pub mkvmerge: Option<PathBuf>,
    /// mediainfo executable, looked up on PATH when unset
    pub mediainfo: Option<PathBuf>,
    /// Kill a remux that runs longer than this (no limit when unset)
    pub remux_timeout_secs: Option<u64>,
}

/// Subtitle remux configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    /// Character set declared for external text subtitles
    pub charset: String,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            charset: "WINDOWS-1256".to_string(),
        }
    }
}
