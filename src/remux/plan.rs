//! Remux plan synthesis.
//!
//! A plan is a list of typed [`Clause`]s. Rendering to mkvmerge arguments
//! happens last, in [`RemuxPlan::to_args`] and the `Display` impl.

use crate::scanner::ResolvedFile;
use crate::tracks::{Role, Supplier, SupplierResolution};
use std::fmt;
use std::path::PathBuf;

/// Video settings applied to the primary file
#[derive(Debug, Clone)]
pub struct VideoSettings {
    pub language_code: String,
    /// Encoder or website the video comes from
    pub source: String,
    /// Blu-ray, WEBRip, ...
    pub release_format: String,
}

impl VideoSettings {
    pub fn track_name(&self) -> String {
        format!("{} {}", self.source, self.release_format)
    }
}

/// One option of the remux command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `(slot, track id)` pairs in output order
    TrackOrder(Vec<(u32, u32)>),
    Language { track: u32, code: String },
    DefaultTrack { track: u32, flag: bool },
    ForcedTrack { track: u32, flag: bool },
    TrackName { track: u32, name: String },
    SubCharset { track: u32, charset: String },
    /// Keep only these tracks of a kind from the next input
    Include { role: Role, tracks: Vec<u32> },
    /// Drop every track of a kind from the next input
    Exclude { role: Role },
    Input(PathBuf),
}

impl Clause {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Clause::TrackOrder(order) => {
                let order = order
                    .iter()
                    .map(|(slot, track)| format!("{}:{}", slot, track))
                    .collect::<Vec<_>>()
                    .join(",");
                args.extend(["--track-order".to_string(), order]);
            }
            Clause::Language { track, code } => {
                args.extend(["--language".to_string(), format!("{}:{}", track, code)]);
            }
            Clause::DefaultTrack { track, flag } => {
                args.extend(["--default-track".to_string(), format!("{}:{}", track, *flag as u8)]);
            }
            Clause::ForcedTrack { track, flag } => {
                args.extend(["--forced-track".to_string(), format!("{}:{}", track, *flag as u8)]);
            }
            Clause::TrackName { track, name } => {
                args.extend(["--track-name".to_string(), format!("{}:{}", track, name)]);
            }
            Clause::SubCharset { track, charset } => {
                args.extend(["--sub-charset".to_string(), format!("{}:{}", track, charset)]);
            }
            Clause::Include { role, tracks } => {
                let tracks = tracks
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                args.extend([format!("--{}-tracks", role), tracks]);
            }
            Clause::Exclude { role } => args.push(exclusion_option(*role).to_string()),
            Clause::Input(path) => args.push(path.to_string_lossy().into_owned()),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::TrackName { track, name } => write!(f, "--track-name {}:\"{}\"", track, name),
            Clause::Input(path) => write!(f, "\"{}\"", path.display()),
            other => {
                let mut args = Vec::new();
                other.push_args(&mut args);
                f.write_str(&args.join(" "))
            }
        }
    }
}

fn exclusion_option(role: Role) -> &'static str {
    match role {
        Role::Audio => "--no-audio",
        Role::Subtitle => "--no-subtitles",
    }
}

/// Ordered clauses for one output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemuxPlan {
    clauses: Vec<Clause>,
}

impl RemuxPlan {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Input paths in the order they appear
    pub fn inputs(&self) -> Vec<&PathBuf> {
        self.clauses
            .iter()
            .filter_map(|c| match c {
                Clause::Input(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Argument vector, without the output option
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for clause in &self.clauses {
            clause.push_args(&mut args);
        }
        args
    }
}

impl fmt::Display for RemuxPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(Clause::to_string).collect();
        f.write_str(&rendered.join(" "))
    }
}

/// Whether a supplier is the canonical one: the first declaration, or one
/// sharing its name
fn is_canonical(suppliers: &[Supplier], supplier: &Supplier) -> bool {
    suppliers
        .first()
        .is_some_and(|first| first.name == supplier.name)
}

/// Build the plan that merges a file group into one container
///
/// `files` must be sorted by slot and `resolutions` indexed like `suppliers`.
/// Unresolved supplier roles contribute nothing.
pub fn build_media_plan(
    files: &[ResolvedFile],
    suppliers: &[Supplier],
    resolutions: &[SupplierResolution],
    video_track_id: u32,
    video: &VideoSettings,
) -> RemuxPlan {
    let mut clauses = Vec::new();

    let mut order = vec![(0, video_track_id)];
    for role in Role::ALL {
        for (supplier, resolution) in suppliers.iter().zip(resolutions) {
            if let Some(track) = resolution.get(role).track_id() {
                order.push((supplier.slot, track));
            }
        }
    }
    clauses.push(Clause::TrackOrder(order));

    for file in files {
        if file.slot == 0 {
            clauses.extend([
                Clause::Language {
                    track: video_track_id,
                    code: video.language_code.clone(),
                },
                Clause::DefaultTrack {
                    track: video_track_id,
                    flag: true,
                },
                Clause::ForcedTrack {
                    track: video_track_id,
                    flag: false,
                },
                Clause::TrackName {
                    track: video_track_id,
                    name: video.track_name(),
                },
            ]);
        }

        let mut audio_tracks = Vec::new();
        let mut subtitle_tracks = Vec::new();

        for (supplier, resolution) in suppliers.iter().zip(resolutions) {
            if supplier.slot != file.slot {
                continue;
            }
            let canonical = is_canonical(suppliers, supplier);

            for role in Role::ALL {
                let Some(track) = resolution.get(role).track_id() else {
                    continue;
                };
                clauses.extend([
                    Clause::Language {
                        track,
                        code: supplier.correct_language_code.clone(),
                    },
                    Clause::DefaultTrack {
                        track,
                        flag: canonical && role == Role::Audio,
                    },
                    Clause::ForcedTrack { track, flag: false },
                    Clause::TrackName {
                        track,
                        name: if canonical {
                            String::new()
                        } else {
                            supplier.name.clone()
                        },
                    },
                ]);
                match role {
                    Role::Audio => audio_tracks.push(track),
                    Role::Subtitle => subtitle_tracks.push(track),
                }
            }
        }

        for (role, tracks) in [(Role::Audio, audio_tracks), (Role::Subtitle, subtitle_tracks)] {
            if tracks.is_empty() {
                clauses.push(Clause::Exclude { role });
            } else {
                clauses.push(Clause::Include { role, tracks });
            }
        }

        clauses.push(Clause::Input(file.path.clone()));
    }

    RemuxPlan { clauses }
}

/// Settings of a single external subtitle track
#[derive(Debug, Clone)]
pub struct SubtitleSettings {
    pub language_code: String,
    pub source: String,
    pub release_format: String,
    pub charset: String,
}

/// Plan for track 0 of one external subtitle file
pub fn build_subtitle_plan(input: PathBuf, settings: &SubtitleSettings) -> RemuxPlan {
    RemuxPlan {
        clauses: vec![
            Clause::Language {
                track: 0,
                code: settings.language_code.clone(),
            },
            Clause::TrackName {
                track: 0,
                name: format!("{} {}", settings.source, settings.release_format),
            },
            Clause::SubCharset {
                track: 0,
                charset: settings.charset.clone(),
            },
            Clause::DefaultTrack { track: 0, flag: true },
            Clause::ForcedTrack { track: 0, flag: false },
            Clause::Input(input),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::Resolution;

    fn video() -> VideoSettings {
        VideoSettings {
            language_code: "eng".to_string(),
            source: "PSA".to_string(),
            release_format: "WEB-DL".to_string(),
        }
    }

    fn file(path: &str, slot: u32) -> ResolvedFile {
        ResolvedFile {
            path: PathBuf::from(path),
            slot,
        }
    }

    fn resolved(audio: Option<u32>, subtitle: Option<u32>) -> SupplierResolution {
        let to_resolution = |id: Option<u32>| id.map_or(Resolution::Unresolved, Resolution::Resolved);
        SupplierResolution {
            audio: to_resolution(audio),
            subtitle: to_resolution(subtitle),
        }
    }

    #[test]
    fn test_single_primary_file() {
        let suppliers = vec![Supplier::new("original", 0, "eng")];
        let plan = build_media_plan(
            &[file("/m/Movie.mkv", 0)],
            &suppliers,
            &[resolved(Some(1), Some(2))],
            0,
            &video(),
        );

        assert_eq!(
            plan.to_string(),
            "--track-order 0:0,0:1,0:2 \
             --language 0:eng --default-track 0:1 --forced-track 0:0 --track-name 0:\"PSA WEB-DL\" \
             --language 1:eng --default-track 1:1 --forced-track 1:0 --track-name 1:\"\" \
             --language 2:eng --default-track 2:0 --forced-track 2:0 --track-name 2:\"\" \
             --audio-tracks 1 --subtitle-tracks 2 \"/m/Movie.mkv\""
        );
    }

    #[test]
    fn test_track_order_puts_audio_before_subtitles() {
        let suppliers = vec![
            Supplier::new("original", 0, "eng"),
            Supplier::new("TinyMoviez", 1, "per"),
            Supplier::new("Subs", 2, "per"),
        ];
        let resolutions = vec![
            resolved(Some(1), Some(2)),
            resolved(Some(0), None),
            resolved(None, Some(0)),
        ];
        let plan = build_media_plan(
            &[file("a.mkv", 0), file("b.mka", 1), file("c.srt", 2)],
            &suppliers,
            &resolutions,
            0,
            &video(),
        );

        assert_eq!(
            plan.clauses()[0],
            Clause::TrackOrder(vec![(0, 0), (0, 1), (1, 0), (0, 2), (2, 0)])
        );
        let inputs: Vec<_> = plan.inputs().into_iter().cloned().collect();
        assert_eq!(
            inputs,
            vec![PathBuf::from("a.mkv"), PathBuf::from("b.mka"), PathBuf::from("c.srt")]
        );
    }

    #[test]
    fn test_only_canonical_audio_is_default_and_unnamed() {
        let suppliers = vec![
            Supplier::new("original", 0, "eng"),
            Supplier::new("TinyMoviez", 1, "per"),
        ];
        let resolutions = vec![resolved(Some(1), Some(2)), resolved(Some(0), Some(1))];
        let plan = build_media_plan(
            &[file("a.mkv", 0), file("b.mka", 1)],
            &suppliers,
            &resolutions,
            0,
            &video(),
        );

        let defaults: Vec<(u32, bool)> = plan
            .clauses()
            .iter()
            .filter_map(|c| match c {
                Clause::DefaultTrack { track, flag } => Some((*track, *flag)),
                _ => None,
            })
            .collect();
        // video, original audio, original subtitle, dub audio, dub subtitle
        assert_eq!(defaults, vec![(0, true), (1, true), (2, false), (0, false), (1, false)]);

        assert!(plan.clauses().iter().all(|c| !matches!(
            c,
            Clause::ForcedTrack { flag: true, .. }
        )));
        assert!(plan.clauses().contains(&Clause::TrackName {
            track: 0,
            name: "TinyMoviez".to_string()
        }));
        assert!(plan.clauses().contains(&Clause::TrackName {
            track: 1,
            name: String::new()
        }));
    }

    #[test]
    fn test_unresolved_slot_falls_back_to_exclusion() {
        let suppliers = vec![
            Supplier::new("original", 0, "eng"),
            Supplier::new("Dubbed", 1, "per"),
        ];
        let resolutions = vec![resolved(Some(1), None), resolved(None, None)];
        let plan = build_media_plan(&[file("a.mkv", 0)], &suppliers, &resolutions, 0, &video());

        assert_eq!(plan.clauses()[0], Clause::TrackOrder(vec![(0, 0), (0, 1)]));
        assert!(plan.clauses().contains(&Clause::Include {
            role: Role::Audio,
            tracks: vec![1]
        }));
        assert!(plan.clauses().contains(&Clause::Exclude {
            role: Role::Subtitle
        }));
        assert_eq!(
            plan.to_args()[plan.to_args().len() - 2..],
            ["--no-subtitles".to_string(), "a.mkv".to_string()]
        );
    }

    #[test]
    fn test_args_keep_names_unquoted() {
        let suppliers = vec![Supplier::new("original", 0, "eng")];
        let plan = build_media_plan(
            &[file("/m/My Movie.mkv", 0)],
            &suppliers,
            &[resolved(None, None)],
            3,
            &video(),
        );
        let args = plan.to_args();
        assert_eq!(&args[..2], ["--track-order", "0:3"]);
        assert!(args.contains(&"3:PSA WEB-DL".to_string()));
        assert_eq!(args.last().unwrap(), "/m/My Movie.mkv");
    }

    #[test]
    fn test_subtitle_plan() {
        let plan = build_subtitle_plan(
            PathBuf::from("/m/sub.srt"),
            &SubtitleSettings {
                language_code: "per".to_string(),
                source: "TinyMoviez".to_string(),
                release_format: "WEB-DL".to_string(),
                charset: "WINDOWS-1256".to_string(),
            },
        );
        assert_eq!(
            plan.to_string(),
            "--language 0:per --track-name 0:\"TinyMoviez WEB-DL\" --sub-charset 0:WINDOWS-1256 \
             --default-track 0:1 --forced-track 0:0 \"/m/sub.srt\""
        );
    }
}
