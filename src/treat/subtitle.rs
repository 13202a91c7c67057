use super::{Target, Treatment};
use crate::error::{AppError, Result};
use crate::remux::{SubtitleSettings, build_subtitle_plan};
use crate::scanner::{ResolvedFile, SlotPatterns, SuffixFilter, resolve_by_episode, resolve_flat};
use crate::utils::naming::{edited_sibling, episode_name};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything needed to fix the subtitles of one catalog entry
#[derive(Debug, Clone)]
pub struct SubtitleRequest {
    pub id: String,
    pub patterns: SlotPatterns,
    pub language_code: String,
    /// Author or website of the subtitle
    pub source: Option<String>,
    /// Release the subtitle is synced with
    pub release_format: Option<String>,
    /// Remux into `.mks` with a named track instead of copying
    pub include_full_information: bool,
    /// Rename inside the source directory instead of copying
    pub in_place: bool,
    pub season_number: Option<u32>,
}

impl SubtitleRequest {
    fn settings(&self, charset: &str) -> Result<SubtitleSettings> {
        match (&self.source, &self.release_format) {
            (Some(source), Some(release_format)) => Ok(SubtitleSettings {
                language_code: self.language_code.clone(),
                source: source.clone(),
                release_format: release_format.clone(),
                charset: charset.to_string(),
            }),
            _ => Err(AppError::MissingSubtitleDetails),
        }
    }
}

impl Treatment<'_> {
    /// Give the subtitles of a movie, or of every episode of a season, their
    /// canonical names. Returns the files produced.
    pub fn treat_subtitle(&self, request: &SubtitleRequest) -> Result<Vec<PathBuf>> {
        let settings = if request.include_full_information {
            Some(request.settings(&self.charset)?)
        } else {
            None
        };

        let mut outputs = Vec::new();
        match self.locate(&request.id, request.season_number)? {
            Target::Movie { name, directory } => {
                let files = resolve_flat(&directory, &request.patterns, SuffixFilter::Subtitle)?;
                if files.is_empty() {
                    debug!("No subtitle found in {}", directory.display());
                    return Ok(outputs);
                }

                let destination = self.destination(&directory, request)?;
                let base = format!("{}.{}", name, request.language_code);
                outputs.extend(self.treat_group(
                    &files,
                    &destination.join(base),
                    request,
                    settings.as_ref(),
                )?);
            }
            Target::Season {
                show,
                number,
                season,
                directory,
            } => {
                let episodes =
                    resolve_by_episode(&directory, &request.patterns, SuffixFilter::Subtitle)?;

                let destination = self.destination(&directory, request)?;
                for episode in &season.episodes {
                    let Some(files) = episodes.get(&episode.number) else {
                        debug!("No subtitle for episode {}", episode.number);
                        continue;
                    };
                    let name = episode_name(&show, number, episode.number, &episode.name);
                    let base = format!("{}.{}", name, request.language_code);
                    outputs.extend(self.treat_group(
                        files,
                        &destination.join(base),
                        request,
                        settings.as_ref(),
                    )?);
                }
            }
        }

        Ok(outputs)
    }

    fn destination(&self, directory: &Path, request: &SubtitleRequest) -> Result<PathBuf> {
        if request.in_place && !request.include_full_information {
            return Ok(directory.to_path_buf());
        }
        let destination = edited_sibling(directory);
        self.create_directory(&destination)?;
        Ok(destination)
    }

    /// `base` is the output path without extension
    fn treat_group(
        &self,
        files: &[ResolvedFile],
        base: &Path,
        request: &SubtitleRequest,
        settings: Option<&SubtitleSettings>,
    ) -> Result<Vec<PathBuf>> {
        match settings {
            Some(settings) => {
                let Some(first) = files.first() else {
                    return Ok(Vec::new());
                };
                if has_extension(&first.path, "sub") {
                    return Err(AppError::UnsupportedSubtitleCarrier {
                        path: first.path.clone(),
                    });
                }
                let output = with_extension(base, "mks");
                let plan = build_subtitle_plan(first.path.clone(), settings);
                self.run_plan(&output, &plan)?;
                Ok(vec![output])
            }
            None => {
                let mut outputs = Vec::new();
                for file in files {
                    let extension = file
                        .path
                        .extension()
                        .map(|e| e.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let output = with_extension(base, &extension);
                    // One subtitle per extension, later ones would overwrite it
                    if outputs.contains(&output) {
                        warn!(
                            "Skipping {}, {} is already taken",
                            file.path.display(),
                            output.display()
                        );
                        continue;
                    }
                    self.place_file(&file.path, &output, request.in_place)?;
                    outputs.push(output);
                }
                Ok(outputs)
            }
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
}

/// Append an extension; `base` already ends in the language code
fn with_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
