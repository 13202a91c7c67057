use std::path::PathBuf;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A season file name carries no `E<nn>` marker
    #[error("file name did not match with episode number pattern: {file}")]
    EpisodeNumberUnparseable { file: String },

    #[error("{kind} directory has not been given")]
    MissingRequiredDirectory { kind: &'static str },

    #[error("season number has not been given for a tv show")]
    MissingSeasonNumber,

    /// Full information was requested for a subtitle format that has none to keep
    #[error("can not include full information for {}", .path.display())]
    UnsupportedSubtitleCarrier { path: PathBuf },

    #[error("directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("no video track found in {}", .path.display())]
    MissingVideoTrack { path: PathBuf },

    #[error("source and release format must be given to include full information")]
    MissingSubtitleDetails,

    #[error("no movie or tv show found for {id}")]
    NotFound { id: String },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A persisted section is missing; `name` is the user-facing section name
    #[error(
        "no {name} info found. You need to save your {name} info with `save {lower}-info` command.",
        lower = .name.to_lowercase()
    )]
    NoInfo { name: &'static str },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("metadata lookup failed: {0}")]
    Metadata(String),

    #[error("probe failed: {0}")]
    Probe(String),

    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
