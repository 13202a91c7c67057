mod cli;

use medicure::analyzer::MediaInfoProber;
use medicure::config::AppConfig;
use medicure::error::AppError;
use medicure::metadata::TmdbProvider;
use medicure::remux::{Mkvmerge, VideoSettings};
use medicure::scanner::SlotPatterns;
use medicure::tracks::Supplier;
use medicure::treat::{MediaRequest, SubtitleRequest, Treatment};
use medicure::utils::{DependencyStatus, init_logging};

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands, SaveCommand, TreatCommand};
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = match &cli.config {
        Some(path) if path.exists() => AppConfig::load_from(path)?,
        Some(_) => AppConfig::default(),
        None => AppConfig::load(),
    };
    config.validate()?;

    match cli.command {
        Commands::Treat(command) => treat(&config, command),
        Commands::Save(SaveCommand::TmdbInfo { api_key }) => {
            config.tmdb.api_key = Some(api_key);
            config.save_to(&config_path)?;
            println!("TMDB info saved to {}", config_path.display());
            Ok(())
        }
        Commands::Save(SaveCommand::CollectionInfo {
            movies_directory,
            tvshows_directory,
        }) => {
            config.collection.movies_directory = Some(existing_directory(movies_directory)?);
            config.collection.tvshows_directory = Some(existing_directory(tvshows_directory)?);
            config.save_to(&config_path)?;
            println!("Collection info saved to {}", config_path.display());
            Ok(())
        }
        Commands::CheckTools => check_tools(&config),
    }
}

fn treat(config: &AppConfig, command: TreatCommand) -> Result<()> {
    let api_key = config.tmdb_api_key()?;
    let collection = config.collection()?;
    let metadata = TmdbProvider::new(api_key, &config.tmdb)?;

    let outputs = match command {
        TreatCommand::Media {
            id,
            file_search_patterns,
            video_language_code,
            video_source,
            video_release_format,
            dubbing_suppliers,
            season_number,
            dry_run,
        } => {
            let request = MediaRequest {
                id,
                patterns: SlotPatterns::parse_json(&file_search_patterns)?,
                video: VideoSettings {
                    language_code: video_language_code,
                    source: video_source,
                    release_format: video_release_format,
                },
                suppliers: Supplier::parse_list(&dubbing_suppliers)?,
                season_number,
            };
            let prober = MediaInfoProber::locate(config.tools.mediainfo.as_deref())?;
            let executor = executor(config, dry_run)?;
            let treatment = Treatment {
                collection,
                metadata: &metadata,
                prober: &prober,
                executor: &executor,
                charset: config.subtitle.charset.clone(),
                dry_run,
            };
            treatment.treat_media(&request)?
        }
        TreatCommand::Subtitle {
            id,
            file_search_patterns,
            language_code,
            source,
            release_format,
            include_full_information,
            in_place,
            season_number,
            dry_run,
        } => {
            let request = SubtitleRequest {
                id,
                patterns: SlotPatterns::parse_json(&file_search_patterns)?,
                language_code,
                source,
                release_format,
                include_full_information,
                in_place,
                season_number,
            };
            // Subtitles are never probed
            let prober = MediaInfoProber::new(
                config
                    .tools
                    .mediainfo
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("mediainfo")),
            );
            let executor = executor(config, dry_run || !include_full_information)?;
            let treatment = Treatment {
                collection,
                metadata: &metadata,
                prober: &prober,
                executor: &executor,
                charset: config.subtitle.charset.clone(),
                dry_run,
            };
            treatment.treat_subtitle(&request)?
        }
    };

    if outputs.is_empty() {
        println!("Nothing to treat");
    }
    for output in &outputs {
        println!("{}", output.display());
    }
    Ok(())
}

/// mkvmerge is only looked up when it is going to run
fn executor(config: &AppConfig, skip_lookup: bool) -> Result<Mkvmerge> {
    let timeout = config.tools.remux_timeout_secs.map(Duration::from_secs);
    let mkvmerge = if skip_lookup {
        Mkvmerge::new(
            config
                .tools
                .mkvmerge
                .clone()
                .unwrap_or_else(|| PathBuf::from("mkvmerge")),
        )
    } else {
        Mkvmerge::locate(config.tools.mkvmerge.as_deref())?
    };
    Ok(mkvmerge.with_timeout(timeout))
}

fn existing_directory(path: PathBuf) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(AppError::DirectoryNotFound { path }.into());
    }
    Ok(std::path::absolute(&path).unwrap_or(path))
}

fn check_tools(config: &AppConfig) -> Result<()> {
    println!("Checking external tools...\n");

    let status = DependencyStatus::check(&config.tools);
    for tool in status.tools() {
        let mark = if tool.available() { "✓" } else { "✗" };
        print!("{} {}", mark, tool.name);
        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }
        println!();
    }

    println!();
    if !status.all_available() {
        bail!("some tools are missing, install them to treat media");
    }
    println!("All required tools are available!");
    Ok(())
}
