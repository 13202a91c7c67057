use super::{Target, Treatment};
use crate::error::{AppError, Result};
use crate::remux::{VideoSettings, build_media_plan};
use crate::scanner::{ResolvedFile, SlotPatterns, SuffixFilter, resolve_by_episode, resolve_flat};
use crate::tracks::{Role, Supplier, TrackMatcher};
use crate::utils::naming::{edited_sibling, episode_name};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything needed to remux the files of one catalog entry
#[derive(Debug, Clone)]
pub struct MediaRequest {
    /// IMDb id of the movie or show
    pub id: String,
    pub patterns: SlotPatterns,
    pub video: VideoSettings,
    pub suppliers: Vec<Supplier>,
    pub season_number: Option<u32>,
}

impl Treatment<'_> {
    /// Remux a movie, or every episode of a season, into the `" Edited"`
    /// directory. Returns the outputs in the order they were produced.
    pub fn treat_media(&self, request: &MediaRequest) -> Result<Vec<PathBuf>> {
        let mut outputs = Vec::new();

        match self.locate(&request.id, request.season_number)? {
            Target::Movie { name, directory } => {
                let files = resolve_flat(&directory, &request.patterns, SuffixFilter::Media)?;

                let destination = edited_sibling(&directory);
                self.create_directory(&destination)?;
                let output = destination.join(format!("{}.mkv", name));
                self.remux_group(&directory, &files, request, &output)?;
                outputs.push(output);
            }
            Target::Season {
                show,
                number,
                season,
                directory,
            } => {
                let episodes =
                    resolve_by_episode(&directory, &request.patterns, SuffixFilter::Media)?;

                let destination = edited_sibling(&directory);
                self.create_directory(&destination)?;

                for episode in &season.episodes {
                    let Some(files) = episodes.get(&episode.number) else {
                        debug!("No files for episode {}", episode.number);
                        continue;
                    };
                    let name = episode_name(&show, number, episode.number, &episode.name);
                    let output = destination.join(format!("{}.mkv", name));
                    self.remux_group(&directory, files, request, &output)?;
                    outputs.push(output);
                }
            }
        }

        Ok(outputs)
    }

    /// Probe, match and remux one file group with a fresh resolution
    fn remux_group(
        &self,
        directory: &Path,
        files: &[ResolvedFile],
        request: &MediaRequest,
        output: &Path,
    ) -> Result<()> {
        let mut matcher = TrackMatcher::new(&request.suppliers);
        for file in files {
            let tracks = self.prober.probe(&file.path)?;
            matcher.match_file(file.slot, &tracks);
        }
        let outcome = matcher.into_outcome();

        let video_track_id = outcome.video_track_id.ok_or_else(|| AppError::MissingVideoTrack {
            path: files
                .first()
                .map(|f| f.path.clone())
                .unwrap_or_else(|| directory.to_path_buf()),
        })?;

        for (supplier, resolution) in request.suppliers.iter().zip(&outcome.resolutions) {
            for role in Role::ALL {
                if !resolution.get(role).is_resolved() {
                    debug!("{} has no {} track for {}", supplier.name, role, output.display());
                }
            }
        }

        let plan = build_media_plan(
            files,
            &request.suppliers,
            &outcome.resolutions,
            video_track_id,
            &request.video,
        );
        debug!("Plan for {}: {}", output.display(), plan);

        self.run_plan(output, &plan)?;
        info!("Treated {}", output.display());
        Ok(())
    }
}
