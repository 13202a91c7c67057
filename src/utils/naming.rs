//! Canonical names for movies, episodes and their output locations.

use crate::error::{AppError, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static EPISODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)e(\d{2})").expect("episode marker pattern is valid")
});

/// Replace characters that can not appear in a path component
pub fn sanitize(name: &str) -> String {
    name.replace([':', '/'], " ")
}

/// Year part of a `YYYY-MM-DD` release date
pub fn release_year(release_date: &str) -> String {
    match NaiveDate::parse_from_str(release_date.trim(), "%Y-%m-%d") {
        Ok(date) => format!("{:04}", date.year()),
        Err(_) => release_date.chars().take(4).collect(),
    }
}

/// `"{title} - {year}"`, used as both directory and file name
pub fn movie_name(title: &str, release_date: &str) -> String {
    format!("{} - {}", sanitize(title), release_year(release_date))
}

/// `"{show} - S{season:02}E{episode:02} - {episode name}"`
pub fn episode_name(show: &str, season: u32, episode: u32, name: &str) -> String {
    format!(
        "{} - S{:02}E{:02} - {}",
        sanitize(show),
        season,
        episode,
        sanitize(name)
    )
}

/// The `" Edited"` sibling of a directory
pub fn edited_sibling(directory: &Path) -> PathBuf {
    let mut name = directory.as_os_str().to_os_string();
    name.push(" Edited");
    PathBuf::from(name)
}

/// Episode number from the two digits following an `E`/`e`
pub fn extract_episode_number(file_name: &str) -> Result<u32> {
    EPISODE_MARKER
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| AppError::EpisodeNumberUnparseable {
            file: file_name.to_string(),
        })
}
