use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medicure")]
#[command(author, version, about = "Fix file names, track names and languages of your media")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Treat the files of a movie or a tv show season
    #[command(subcommand)]
    Treat(TreatCommand),

    /// Save settings for later runs
    #[command(subcommand)]
    Save(SaveCommand),

    /// Check that required external tools are available
    CheckTools,
}

#[derive(Subcommand)]
pub enum TreatCommand {
    /// Remux video, audio and subtitle tracks into one file
    Media {
        /// IMDb id of the movie or tv show
        id: String,

        /// JSON object of file search pattern to file id, e.g. '{"\\.mkv$": 0, "Dub": 1}'
        file_search_patterns: String,

        /// 3-letter language code of the video track
        video_language_code: String,

        /// Encoder or website the video comes from
        video_source: String,

        /// Release format of the video, e.g. Blu-ray or WEBRip
        video_release_format: String,

        /// JSON list of dubbing suppliers, as objects or positional arrays
        dubbing_suppliers: String,

        /// Season to treat when the id is a tv show
        #[arg(short, long)]
        season_number: Option<u32>,

        /// Show what would be done without executing
        #[arg(long)]
        dry_run: bool,
    },

    /// Rename or remux external subtitles
    Subtitle {
        /// IMDb id of the movie or tv show
        id: String,

        /// JSON object of file search pattern to file id
        file_search_patterns: String,

        /// 3-letter language code of the subtitle
        language_code: String,

        /// Author or website of the subtitle
        #[arg(long)]
        source: Option<String>,

        /// Release format the subtitle is synced with
        #[arg(long)]
        release_format: Option<String>,

        /// Remux into .mks with source and release format as the track name
        #[arg(long)]
        include_full_information: bool,

        /// Rename inside the source directory instead of copying
        #[arg(long)]
        in_place: bool,

        /// Season to treat when the id is a tv show
        #[arg(short, long)]
        season_number: Option<u32>,

        /// Show what would be done without executing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum SaveCommand {
    /// Save the TMDB API key
    TmdbInfo {
        api_key: String,
    },

    /// Save the movies and tv shows directories
    CollectionInfo {
        movies_directory: PathBuf,
        tvshows_directory: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_treat_media() {
        let cli = Cli::try_parse_from([
            "medicure",
            "-v",
            "treat",
            "media",
            "tt1877830",
            r#"{"\\.mkv$": 0}"#,
            "eng",
            "PSA",
            "WEB-DL",
            r#"[["original", 0, "eng"]]"#,
            "--season-number",
            "2",
            "--dry-run",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Treat(TreatCommand::Media {
            id,
            season_number,
            dry_run,
            ..
        }) = cli.command
        else {
            panic!("expected treat media");
        };
        assert_eq!(id, "tt1877830");
        assert_eq!(season_number, Some(2));
        assert!(dry_run);
    }

    #[test]
    fn test_parse_save_collection() {
        let cli = Cli::try_parse_from([
            "medicure",
            "save",
            "collection-info",
            "/media/Movies",
            "/media/TV",
            "--config",
            "/tmp/medicure.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/medicure.toml")));
        assert!(matches!(
            cli.command,
            Commands::Save(SaveCommand::CollectionInfo { .. })
        ));
    }

    #[test]
    fn test_media_requires_suppliers() {
        assert!(
            Cli::try_parse_from(["medicure", "treat", "media", "tt1", "{}", "eng", "PSA", "WEB-DL"])
                .is_err()
        );
    }
}
