use super::{GroupingMode, ResolvedFile, ResolvedFiles, SlotPatterns, SuffixFilter};
use crate::error::{AppError, Result};
use crate::utils::naming::extract_episode_number;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Find the files of `directory` whose suffix passes `filter` and whose name
/// matches one of `patterns`, grouped according to `mode`
pub fn resolve(
    directory: &Path,
    patterns: &SlotPatterns,
    mode: GroupingMode,
    filter: SuffixFilter,
) -> Result<ResolvedFiles> {
    Ok(match mode {
        GroupingMode::Flat => ResolvedFiles::Flat(resolve_flat(directory, patterns, filter)?),
        GroupingMode::ByEpisode => {
            ResolvedFiles::ByEpisode(resolve_by_episode(directory, patterns, filter)?)
        }
    })
}

/// The files of a movie, sorted by slot
pub fn resolve_flat(
    directory: &Path,
    patterns: &SlotPatterns,
    filter: SuffixFilter,
) -> Result<Vec<ResolvedFile>> {
    let mut files = Vec::new();
    scan(directory, filter, |name, path| {
        if let Some(file) = matched(name, path, patterns) {
            files.push(file);
        }
        Ok(())
    })?;

    // Stable sort keeps name order for duplicate slots
    files.sort_by_key(|f| f.slot);
    Ok(files)
}

/// The files of a season keyed by episode number, each group sorted by slot
///
/// Every eligible file must carry an episode marker, a single file without
/// one fails the whole scan.
pub fn resolve_by_episode(
    directory: &Path,
    patterns: &SlotPatterns,
    filter: SuffixFilter,
) -> Result<BTreeMap<u32, Vec<ResolvedFile>>> {
    let mut episodes: BTreeMap<u32, Vec<ResolvedFile>> = BTreeMap::new();
    scan(directory, filter, |name, path| {
        let number = extract_episode_number(name)?;
        if let Some(file) = matched(name, path, patterns) {
            episodes.entry(number).or_default().push(file);
        }
        Ok(())
    })?;

    for files in episodes.values_mut() {
        files.sort_by_key(|f| f.slot);
    }
    Ok(episodes)
}

/// Visit the regular files of `directory` accepted by `filter`, in name order
fn scan(
    directory: &Path,
    filter: SuffixFilter,
    mut visit: impl FnMut(&str, &Path) -> Result<()>,
) -> Result<()> {
    if !directory.is_dir() {
        return Err(AppError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let entries = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|e| AppError::Io(e.into()))?;
        if !entry.file_type().is_file() || !filter.accepts(entry.path()) {
            continue;
        }
        visit(&entry.file_name().to_string_lossy(), entry.path())?;
    }
    Ok(())
}

fn matched(name: &str, path: &Path, patterns: &SlotPatterns) -> Option<ResolvedFile> {
    let slot = patterns.slot_for(name)?;
    debug!("Resolved {} to slot {}", path.display(), slot);
    Some(ResolvedFile {
        path: path.to_path_buf(),
        slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn names(files: &[ResolvedFile]) -> Vec<(String, u32)> {
        files
            .iter()
            .map(|f| (f.path.file_name().unwrap().to_string_lossy().to_string(), f.slot))
            .collect()
    }

    #[test]
    fn test_flat_scan_sorts_by_slot() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &["a.srt", "b.mka", "c.mkv", "notes.txt", "d.nfo"],
        );
        let patterns =
            SlotPatterns::compile([(r"\.mka", 1), (r"\.mkv", 0), (r"\.srt", 2)]).unwrap();

        let resolved = resolve(dir.path(), &patterns, GroupingMode::Flat, SuffixFilter::Media).unwrap();
        let ResolvedFiles::Flat(files) = resolved else {
            panic!("expected flat files");
        };
        // .srt is filtered by suffix before patterns are tested
        assert_eq!(names(&files), vec![("c.mkv".to_string(), 0), ("b.mka".to_string(), 1)]);
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["Movie.Dub.mka"]);
        let patterns = SlotPatterns::compile([(r"Dub", 2), (r"\.mka", 1)]).unwrap();

        let resolved = resolve(dir.path(), &patterns, GroupingMode::Flat, SuffixFilter::Media).unwrap();
        assert_eq!(resolved.file_count(), 1);
        let ResolvedFiles::Flat(files) = resolved else {
            panic!("expected flat files");
        };
        assert_eq!(files[0].slot, 2);
    }

    #[test]
    fn test_unmatched_files_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["Movie.mkv", "Sample.mp4"]);
        let patterns = SlotPatterns::compile([(r"\.mkv", 0)]).unwrap();

        let resolved = resolve(dir.path(), &patterns, GroupingMode::Flat, SuffixFilter::Media).unwrap();
        assert_eq!(resolved.file_count(), 1);
    }

    #[test]
    fn test_by_episode_scan() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "Show.S01E02.mka",
                "Show.S01E01.mkv",
                "Show.S01E02.mkv",
                "Show.S01E01.srt",
            ],
        );
        let patterns = SlotPatterns::compile([(r"\.mkv", 0), (r"\.mka", 1)]).unwrap();

        let resolved =
            resolve(dir.path(), &patterns, GroupingMode::ByEpisode, SuffixFilter::Media).unwrap();
        let ResolvedFiles::ByEpisode(episodes) = resolved else {
            panic!("expected episodes");
        };
        assert_eq!(episodes.len(), 2);
        assert_eq!(names(&episodes[&1]), vec![("Show.S01E01.mkv".to_string(), 0)]);
        assert_eq!(
            names(&episodes[&2]),
            vec![("Show.S01E02.mkv".to_string(), 0), ("Show.S01E02.mka".to_string(), 1)]
        );
    }

    #[test]
    fn test_missing_episode_marker_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["Show.S01E01.mkv", "Show.Extras.mkv"]);
        let patterns = SlotPatterns::compile([(r"\.mkv", 0)]).unwrap();

        assert_matches!(
            resolve(dir.path(), &patterns, GroupingMode::ByEpisode, SuffixFilter::Media),
            Err(AppError::EpisodeNumberUnparseable { .. })
        );
    }

    #[test]
    fn test_duplicate_slots_keep_name_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["b.Dub.mka", "Movie.mkv", "a.Dub.mka", "c.Dub.mka"]);
        let patterns = SlotPatterns::compile([(r"\.mkv", 0), (r"Dub", 1)]).unwrap();

        let files = resolve_flat(dir.path(), &patterns, SuffixFilter::Media).unwrap();
        assert_eq!(
            names(&files),
            vec![
                ("Movie.mkv".to_string(), 0),
                ("a.Dub.mka".to_string(), 1),
                ("b.Dub.mka".to_string(), 1),
                ("c.Dub.mka".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_slots_keep_name_order_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        touch(
            dir.path(),
            &[
                "Show.S01E01.Studio2.mka",
                "Show.S01E01.mkv",
                "Show.S01E01.Studio1.mka",
                "Show.S01E02.Studio2.mka",
                "Show.S01E02.mkv",
            ],
        );
        let patterns = SlotPatterns::compile([(r"\.mkv", 0), (r"Studio", 1)]).unwrap();

        let episodes = resolve_by_episode(dir.path(), &patterns, SuffixFilter::Media).unwrap();
        assert_eq!(
            names(&episodes[&1]),
            vec![
                ("Show.S01E01.mkv".to_string(), 0),
                ("Show.S01E01.Studio1.mka".to_string(), 1),
                ("Show.S01E01.Studio2.mka".to_string(), 1),
            ]
        );
        assert_eq!(
            names(&episodes[&2]),
            vec![
                ("Show.S01E02.mkv".to_string(), 0),
                ("Show.S01E02.Studio2.mka".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let patterns = SlotPatterns::compile([(r"\.mkv", 0)]).unwrap();
        assert_matches!(
            resolve(&dir.path().join("nope"), &patterns, GroupingMode::Flat, SuffixFilter::Media),
            Err(AppError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Extras.mkv")).unwrap();
        touch(dir.path(), &["Movie.mkv"]);
        let patterns = SlotPatterns::compile([(r"\.mkv", 0)]).unwrap();

        let resolved = resolve(dir.path(), &patterns, GroupingMode::Flat, SuffixFilter::Media).unwrap();
        assert_eq!(resolved.file_count(), 1);
    }
}
