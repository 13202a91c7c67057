pub mod language;
pub mod matcher;

pub use matcher::{MatchOutcome, TrackMatcher};

use crate::error::{AppError, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// Role a supplier plays inside a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Audio,
    Subtitle,
}

impl Role {
    /// Roles in remux order
    pub const ALL: [Role; 2] = [Role::Audio, Role::Subtitle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Audio => "audio",
            Role::Subtitle => "subtitle",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared source of one dub's audio and/or subtitle
#[derive(Debug, Clone)]
pub struct Supplier {
    /// Display name; the first supplier is left unnamed in the output
    pub name: String,
    /// Slot of the file holding this supplier's tracks
    pub slot: u32,
    /// Language written to the output tracks
    pub correct_language_code: String,
    /// Language the audio track currently carries
    pub audio_language_code: Option<String>,
    /// Language the subtitle track currently carries
    pub subtitle_language_code: Option<String>,
    pub audio_search_pattern: Option<Regex>,
    pub subtitle_search_pattern: Option<Regex>,
}

impl Supplier {
    /// Supplier without any current language or pattern
    pub fn new(name: impl Into<String>, slot: u32, correct_language_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot,
            correct_language_code: correct_language_code.into(),
            audio_language_code: None,
            subtitle_language_code: None,
            audio_search_pattern: None,
            subtitle_search_pattern: None,
        }
    }

    pub fn search_pattern(&self, role: Role) -> Option<&Regex> {
        match role {
            Role::Audio => self.audio_search_pattern.as_ref(),
            Role::Subtitle => self.subtitle_search_pattern.as_ref(),
        }
    }

    pub fn current_language_code(&self, role: Role) -> Option<&str> {
        match role {
            Role::Audio => self.audio_language_code.as_deref(),
            Role::Subtitle => self.subtitle_language_code.as_deref(),
        }
    }

    /// Parse a JSON list of supplier declarations
    ///
    /// Elements are either objects keyed by field name or positional arrays
    /// in field order, e.g. `["TinyMoviez", 1, "per", null, null, "Tiny"]`.
    pub fn parse_list(json: &str) -> Result<Vec<Supplier>> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        values
            .into_iter()
            .map(|value| Supplier::try_from(SupplierSpec::from_value(value)?))
            .collect()
    }
}

/// Serialized form of a supplier declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierSpec {
    pub name: String,
    pub file_id: u32,
    pub correct_language_code: String,
    #[serde(default)]
    pub audio_language_code: Option<String>,
    #[serde(default)]
    pub subtitle_language_code: Option<String>,
    #[serde(default)]
    pub audio_search_pattern: Option<String>,
    #[serde(default)]
    pub subtitle_search_pattern: Option<String>,
}

impl SupplierSpec {
    const FIELDS: [&'static str; 7] = [
        "name",
        "file_id",
        "correct_language_code",
        "audio_language_code",
        "subtitle_language_code",
        "audio_search_pattern",
        "subtitle_search_pattern",
    ];

    fn from_value(value: Value) -> Result<Self> {
        let value = match value {
            Value::Array(items) => {
                if items.len() > Self::FIELDS.len() {
                    return Err(AppError::InvalidInput(format!(
                        "a supplier has at most {} fields, got {}",
                        Self::FIELDS.len(),
                        items.len()
                    )));
                }
                let object = Self::FIELDS
                    .iter()
                    .map(|field| field.to_string())
                    .zip(items)
                    .collect();
                Value::Object(object)
            }
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }
}

impl TryFrom<SupplierSpec> for Supplier {
    type Error = AppError;

    fn try_from(spec: SupplierSpec) -> Result<Self> {
        let compile = |pattern: Option<String>| pattern.map(|p| Regex::new(&p)).transpose();

        Ok(Self {
            name: spec.name,
            slot: spec.file_id,
            correct_language_code: spec.correct_language_code,
            audio_language_code: spec.audio_language_code,
            subtitle_language_code: spec.subtitle_language_code,
            audio_search_pattern: compile(spec.audio_search_pattern)?,
            subtitle_search_pattern: compile(spec.subtitle_search_pattern)?,
        })
    }
}

/// Track a supplier's role has been matched to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Unresolved,
    /// 0-based track id inside the supplier's file
    Resolved(u32),
}

impl Resolution {
    pub fn track_id(&self) -> Option<u32> {
        match self {
            Resolution::Unresolved => None,
            Resolution::Resolved(id) => Some(*id),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Per-group resolution of one supplier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupplierResolution {
    pub audio: Resolution,
    pub subtitle: Resolution,
}

impl SupplierResolution {
    pub fn get(&self, role: Role) -> Resolution {
        match role {
            Role::Audio => self.audio,
            Role::Subtitle => self.subtitle,
        }
    }

    pub fn set(&mut self, role: Role, resolution: Resolution) {
        match role {
            Role::Audio => self.audio = resolution,
            Role::Subtitle => self.subtitle = resolution,
        }
    }
}
