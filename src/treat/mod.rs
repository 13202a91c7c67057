//! Treatment of a catalog entry's files: media remux and subtitle fixes.

pub mod media;
pub mod subtitle;

pub use media::MediaRequest;
pub use subtitle::SubtitleRequest;

use crate::analyzer::TrackProber;
use crate::config::CollectionConfig;
use crate::error::{AppError, Result};
use crate::metadata::{CatalogEntry, MetadataProvider, Season};
use crate::remux::{RemuxExecutor, RemuxPlan};
use crate::utils::naming::{movie_name, sanitize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Collaborators and settings shared by every treatment
pub struct Treatment<'a> {
    pub collection: &'a CollectionConfig,
    pub metadata: &'a dyn MetadataProvider,
    pub prober: &'a dyn TrackProber,
    pub executor: &'a dyn RemuxExecutor,
    /// Character set declared for external subtitles
    pub charset: String,
    /// Print plans and file operations instead of running them
    pub dry_run: bool,
}

/// Where the files of a catalog entry live
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Movie {
        name: String,
        directory: PathBuf,
    },
    Season {
        show: String,
        number: u32,
        season: Season,
        directory: PathBuf,
    },
}

impl Treatment<'_> {
    fn locate(&self, id: &str, season_number: Option<u32>) -> Result<Target> {
        match self.metadata.find_by_external_id(id)? {
            CatalogEntry::Movie {
                title,
                release_date,
            } => {
                let root = self
                    .collection
                    .movies_directory
                    .as_ref()
                    .ok_or(AppError::MissingRequiredDirectory { kind: "movies" })?;
                let name = movie_name(&title, &release_date);
                let directory = root.join(&name);
                info!("{} is the movie {}", id, name);
                Ok(Target::Movie { name, directory })
            }
            CatalogEntry::Show { name, id: show_id } => {
                let root = self
                    .collection
                    .tvshows_directory
                    .as_ref()
                    .ok_or(AppError::MissingRequiredDirectory { kind: "tv shows" })?;
                let number = season_number.ok_or(AppError::MissingSeasonNumber)?;
                let season = self.metadata.get_season(show_id, number)?;
                let directory = root.join(sanitize(&name)).join(sanitize(&season.name));
                info!("{} is the tv show {}, {}", id, name, season.name);
                Ok(Target::Season {
                    show: name,
                    number,
                    season,
                    directory,
                })
            }
        }
    }

    fn create_directory(&self, directory: &Path) -> Result<()> {
        if self.dry_run || directory.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(directory)?;
        info!("Created {}", directory.display());
        Ok(())
    }

    fn run_plan(&self, output: &Path, plan: &RemuxPlan) -> Result<()> {
        if self.dry_run {
            println!("mkvmerge -o \"{}\" {}", output.display(), plan);
            return Ok(());
        }
        self.executor.remux(output, plan)
    }

    /// Copy, or rename when `in_place`, a file to `destination`
    fn place_file(&self, source: &Path, destination: &Path, in_place: bool) -> Result<()> {
        let (verb, done) = if in_place {
            ("rename", "renamed")
        } else {
            ("copy", "copied")
        };
        if self.dry_run {
            println!("{} \"{}\" -> \"{}\"", verb, source.display(), destination.display());
            return Ok(());
        }
        if in_place {
            fs::rename(source, destination)?;
        } else {
            fs::copy(source, destination)?;
        }
        info!("The file {} {} to {}", source.display(), done, destination.display());
        Ok(())
    }
}
