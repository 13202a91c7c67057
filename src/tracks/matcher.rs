//! Assigns physical tracks to declared suppliers.
//!
//! Declarations are never mutated: every file group gets its own list of
//! [`SupplierResolution`]s, indexed like the supplier slice.

use super::language::normalize_language_code;
use super::{Resolution, Role, Supplier, SupplierResolution};
use crate::analyzer::{PhysicalTrack, TrackKind};
use tracing::debug;

/// Result of matching one file group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// 0-based id of the last video track seen
    pub video_track_id: Option<u32>,
    /// One entry per supplier, in declaration order
    pub resolutions: Vec<SupplierResolution>,
}

/// Matches the tracks of a file group against supplier declarations
#[derive(Debug)]
pub struct TrackMatcher<'a> {
    suppliers: &'a [Supplier],
    outcome: MatchOutcome,
}

impl<'a> TrackMatcher<'a> {
    /// Matcher with every supplier role unresolved
    pub fn new(suppliers: &'a [Supplier]) -> Self {
        Self {
            suppliers,
            outcome: MatchOutcome {
                video_track_id: None,
                resolutions: vec![SupplierResolution::default(); suppliers.len()],
            },
        }
    }

    /// Clear every resolution so the matcher can serve another group
    pub fn reset(&mut self) {
        self.outcome.video_track_id = None;
        self.outcome
            .resolutions
            .iter_mut()
            .for_each(|r| *r = SupplierResolution::default());
    }

    /// Match the tracks of the file in `slot`, in probe order
    pub fn match_file(&mut self, slot: u32, tracks: &[PhysicalTrack]) {
        for track in tracks {
            let role = match track.kind {
                TrackKind::Video => {
                    self.outcome.video_track_id = Some(track.track_id());
                    continue;
                }
                TrackKind::Audio => Role::Audio,
                TrackKind::Subtitle => Role::Subtitle,
            };

            let claimant = self
                .suppliers
                .iter()
                .zip(self.outcome.resolutions.iter_mut())
                .find(|(supplier, resolution)| {
                    !resolution.get(role).is_resolved()
                        && supplier.slot == slot
                        && content_matches(supplier, role, track)
                });

            if let Some((supplier, resolution)) = claimant {
                resolution.set(role, Resolution::Resolved(track.track_id()));
                debug!(
                    "{} {} of slot {} resolved to track {}",
                    supplier.name,
                    role,
                    slot,
                    track.track_id()
                );
            }
        }
    }

    pub fn video_track_id(&self) -> Option<u32> {
        self.outcome.video_track_id
    }

    pub fn resolutions(&self) -> &[SupplierResolution] {
        &self.outcome.resolutions
    }

    pub fn into_outcome(self) -> MatchOutcome {
        self.outcome
    }
}

/// Title and language criteria must both hold
fn content_matches(supplier: &Supplier, role: Role, track: &PhysicalTrack) -> bool {
    let title_matches = match (supplier.search_pattern(role), track.title.as_deref()) {
        (Some(pattern), Some(title)) => pattern.is_match(title),
        (None, None) => true,
        _ => false,
    };

    let wanted = supplier
        .current_language_code(role)
        .and_then(normalize_language_code);
    let actual = track.language.as_deref().and_then(normalize_language_code);

    title_matches && wanted == actual
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn track(position: u32, kind: TrackKind, title: Option<&str>, language: Option<&str>) -> PhysicalTrack {
        PhysicalTrack {
            position,
            kind,
            title: title.map(String::from),
            language: language.map(String::from),
        }
    }

    fn original() -> Supplier {
        Supplier {
            audio_language_code: Some("eng".to_string()),
            subtitle_language_code: Some("eng".to_string()),
            ..Supplier::new("original", 0, "eng")
        }
    }

    fn primary_tracks() -> Vec<PhysicalTrack> {
        vec![
            track(1, TrackKind::Video, Some("PSA WEB-DL"), Some("en")),
            track(2, TrackKind::Audio, None, Some("en")),
            track(3, TrackKind::Subtitle, None, Some("en")),
        ]
    }

    #[test]
    fn test_single_primary_file() {
        let suppliers = vec![original()];
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &primary_tracks());

        assert_eq!(matcher.video_track_id(), Some(0));
        assert_eq!(matcher.resolutions()[0].audio, Resolution::Resolved(1));
        assert_eq!(matcher.resolutions()[0].subtitle, Resolution::Resolved(2));
    }

    #[test]
    fn test_both_null_title_matches_but_one_null_does_not() {
        let mut with_pattern = original();
        with_pattern.audio_search_pattern = Some(Regex::new("Dub").unwrap());
        let suppliers = vec![with_pattern];

        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &primary_tracks());
        // Pattern present, title absent
        assert_eq!(matcher.resolutions()[0].audio, Resolution::Unresolved);
        // Pattern absent, title absent
        assert_eq!(matcher.resolutions()[0].subtitle, Resolution::Resolved(2));

        let suppliers = vec![original()];
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &[track(2, TrackKind::Audio, Some("Main"), Some("en"))]);
        // Pattern absent, title present
        assert_eq!(matcher.resolutions()[0].audio, Resolution::Unresolved);
    }

    #[test]
    fn test_language_criterion_is_required() {
        // No current language, track labelled: no match
        let suppliers = vec![Supplier::new("dummy", 0, "eng")];
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &primary_tracks());
        assert_eq!(matcher.resolutions()[0], SupplierResolution::default());

        // No current language, track unlabelled: match
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &[track(1, TrackKind::Audio, None, None)]);
        assert_eq!(matcher.resolutions()[0].audio, Resolution::Resolved(0));
    }

    #[test]
    fn test_earlier_declaration_wins_and_track_is_consumed() {
        let suppliers = vec![original(), original()];
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &primary_tracks());

        assert_eq!(matcher.resolutions()[0].audio, Resolution::Resolved(1));
        assert_eq!(matcher.resolutions()[1].audio, Resolution::Unresolved);
        assert_eq!(matcher.resolutions()[1].subtitle, Resolution::Unresolved);
    }

    #[test]
    fn test_each_supplier_role_takes_one_track() {
        let suppliers = vec![original(), original()];
        let tracks = vec![
            track(1, TrackKind::Audio, None, Some("en")),
            track(2, TrackKind::Audio, None, Some("en")),
            track(3, TrackKind::Audio, None, Some("en")),
        ];
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &tracks);

        assert_eq!(matcher.resolutions()[0].audio, Resolution::Resolved(0));
        assert_eq!(matcher.resolutions()[1].audio, Resolution::Resolved(1));
    }

    #[test]
    fn test_supplier_in_other_slot_is_not_eligible() {
        let mut dubbed = Supplier::new("Dubbed", 1, "per");
        dubbed.audio_language_code = Some("eng".to_string());
        let suppliers = vec![dubbed];

        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &primary_tracks());
        assert_eq!(matcher.resolutions()[0], SupplierResolution::default());
    }

    #[test]
    fn test_pattern_and_language_in_extra_file() {
        let dubbed = Supplier {
            audio_language_code: Some("per".to_string()),
            audio_search_pattern: Some(Regex::new(r"TinyMoviez").unwrap()),
            ..Supplier::new("TinyMoviez", 1, "per")
        };
        let suppliers = vec![original(), dubbed];
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(0, &primary_tracks());
        matcher.match_file(1, &[track(1, TrackKind::Audio, Some("TinyMoviez.co"), Some("fa"))]);

        assert_eq!(matcher.resolutions()[1].audio, Resolution::Resolved(0));
        assert_eq!(matcher.resolutions()[1].subtitle, Resolution::Unresolved);
    }

    #[test]
    fn test_later_video_track_overwrites() {
        let suppliers: Vec<Supplier> = Vec::new();
        let mut matcher = TrackMatcher::new(&suppliers);
        matcher.match_file(
            0,
            &[track(1, TrackKind::Video, None, None), track(2, TrackKind::Video, None, None)],
        );
        assert_eq!(matcher.video_track_id(), Some(1));
    }

    #[test]
    fn test_reset_then_match_is_idempotent() {
        let suppliers = vec![original(), Supplier::new("dummy", 0, "eng")];
        let mut matcher = TrackMatcher::new(&suppliers);

        matcher.reset();
        matcher.match_file(0, &primary_tracks());
        let first = matcher.resolutions().to_vec();

        matcher.reset();
        matcher.match_file(0, &primary_tracks());
        assert_eq!(matcher.resolutions(), first.as_slice());
        assert_eq!(matcher.video_track_id(), Some(0));
    }
}
