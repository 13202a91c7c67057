use crate::config::ToolsConfig;
use std::path::{Path, PathBuf};

/// Availability of one external tool
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: &'static str,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

/// Status of the tools needed to treat media
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub mkvmerge: ToolStatus,
    pub mediainfo: ToolStatus,
}

impl DependencyStatus {
    /// Check all dependencies
    pub fn check(tools: &ToolsConfig) -> Self {
        Self {
            mkvmerge: locate("mkvmerge", tools.mkvmerge.as_deref()),
            mediainfo: locate("mediainfo", tools.mediainfo.as_deref()),
        }
    }

    pub fn all_available(&self) -> bool {
        self.mkvmerge.available() && self.mediainfo.available()
    }

    pub fn tools(&self) -> [&ToolStatus; 2] {
        [&self.mkvmerge, &self.mediainfo]
    }
}

/// Find a tool, preferring a configured path over a PATH lookup
fn locate(name: &'static str, configured: Option<&Path>) -> ToolStatus {
    let path = match configured {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(_) => None,
        None => which::which(name).ok(),
    };
    ToolStatus { name, path }
}
