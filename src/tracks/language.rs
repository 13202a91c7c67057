/// ISO 639-1 codes and their ISO 639-2/B equivalents, as mkvmerge expects them
const PART1_TO_PART2B: &[(&str, &str)] = &[
    ("ar", "ara"),
    ("bg", "bul"),
    ("bn", "ben"),
    ("ca", "cat"),
    ("cs", "cze"),
    ("da", "dan"),
    ("de", "ger"),
    ("el", "gre"),
    ("en", "eng"),
    ("es", "spa"),
    ("et", "est"),
    ("fa", "per"),
    ("fi", "fin"),
    ("fr", "fre"),
    ("he", "heb"),
    ("hi", "hin"),
    ("hr", "hrv"),
    ("hu", "hun"),
    ("hy", "arm"),
    ("id", "ind"),
    ("is", "ice"),
    ("it", "ita"),
    ("ja", "jpn"),
    ("ka", "geo"),
    ("kk", "kaz"),
    ("ko", "kor"),
    ("ku", "kur"),
    ("lt", "lit"),
    ("lv", "lav"),
    ("mk", "mac"),
    ("ms", "may"),
    ("nl", "dut"),
    ("no", "nor"),
    ("pl", "pol"),
    ("ps", "pus"),
    ("pt", "por"),
    ("ro", "rum"),
    ("ru", "rus"),
    ("sk", "slo"),
    ("sl", "slv"),
    ("sq", "alb"),
    ("sr", "srp"),
    ("sv", "swe"),
    ("th", "tha"),
    ("tr", "tur"),
    ("uk", "ukr"),
    ("ur", "urd"),
    ("zh", "chi"),
];

/// ISO 639-2/T codes that differ from their bibliographic form
const PART2T_TO_PART2B: &[(&str, &str)] = &[
    ("bod", "tib"),
    ("ces", "cze"),
    ("cym", "wel"),
    ("deu", "ger"),
    ("ell", "gre"),
    ("eus", "baq"),
    ("fas", "per"),
    ("fra", "fre"),
    ("hye", "arm"),
    ("isl", "ice"),
    ("kat", "geo"),
    ("mkd", "mac"),
    ("mri", "mao"),
    ("msa", "may"),
    ("mya", "bur"),
    ("nld", "dut"),
    ("ron", "rum"),
    ("slk", "slo"),
    ("sqi", "alb"),
    ("zho", "chi"),
];

/// Normalize a language tag to a 3-letter ISO 639-2/B code
///
/// Only the primary subtag is kept (`en-US` becomes `en`). Two-letter codes
/// are mapped through the ISO 639-1 table and terminology codes such as
/// `deu` become their bibliographic form. Other codes pass through
/// lower-cased. Unknown two-letter codes are returned lower-cased so they can
/// still compare equal to themselves.
pub fn normalize_language_code(tag: &str) -> Option<String> {
    let primary = tag
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if primary.is_empty() {
        return None;
    }

    let code = PART1_TO_PART2B
        .iter()
        .chain(PART2T_TO_PART2B)
        .find(|(alias, _)| *alias == primary)
        .map(|(_, part2b)| part2b.to_string())
        .unwrap_or(primary);

    Some(code)
}
