pub mod types;

pub use types::*;

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// TMDB settings
    pub tmdb: TmdbConfig,
    /// Movies and tv shows roots
    pub collection: CollectionConfig,
    /// External tools
    pub tools: ToolsConfig,
    /// Subtitle settings
    pub subtitle: SubtitleConfig,
}

impl AppConfig {
    /// Load configuration from the default location, or defaults if not found
    pub fn load() -> Self {
        let config_path = Self::config_path();

        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config: {}. Using defaults.", e);
                }
            }
        }

        Self::default()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config file: {}", e)))?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(config_path, toml_string)
            .map_err(|e| AppError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medicure")
            .join("config.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.tools.remux_timeout_secs == Some(0) {
            return Err(AppError::Config(
                "remux timeout must be greater than zero".to_string(),
            ));
        }
        if self.subtitle.charset.trim().is_empty() {
            return Err(AppError::Config(
                "subtitle charset must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The saved TMDB API key
    pub fn tmdb_api_key(&self) -> Result<&str> {
        self.tmdb
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AppError::NoInfo { name: "TMDB" })
    }

    /// The saved collection directories
    pub fn collection(&self) -> Result<&CollectionConfig> {
        if self.collection.is_saved() {
            Ok(&self.collection)
        } else {
            Err(AppError::NoInfo { name: "Collection" })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.tmdb.api_key = Some("secret".to_string());
        config.collection.movies_directory = Some(PathBuf::from("/media/Movies"));
        config.tools.remux_timeout_secs = Some(600);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.tmdb_api_key().unwrap(), "secret");
        assert_eq!(
            loaded.collection.movies_directory,
            Some(PathBuf::from("/media/Movies"))
        );
        assert_eq!(loaded.collection.tvshows_directory, None);
        assert_eq!(loaded.tools.remux_timeout_secs, Some(600));
        assert_eq!(loaded.subtitle.charset, "WINDOWS-1256");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str("[tmdb]\napi_key = \"k\"\n").unwrap();
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.subtitle.charset, "WINDOWS-1256");
    }

    #[test]
    fn test_missing_sections_report_no_info() {
        let config = AppConfig::default();
        assert_matches!(config.tmdb_api_key(), Err(AppError::NoInfo { name: "TMDB" }));
        assert_matches!(
            config.collection(),
            Err(AppError::NoInfo { name: "Collection" })
        );
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.tools.remux_timeout_secs = Some(0);
        assert_matches!(config.validate(), Err(AppError::Config(_)));

        config.tools.remux_timeout_secs = None;
        config.subtitle.charset = "  ".to_string();
        assert_matches!(config.validate(), Err(AppError::Config(_)));
    }
}
