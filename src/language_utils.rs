use isolang::Language;

/// Language and text normalization utilities
///
/// This module canonicalizes incoming language codes to ISO 639-1 where a
/// mapping is known and bounds the length of incoming text.
/// Maximum number of characters kept from the input text
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Colloquial or three-letter codes with a fixed canonical form
const LANGUAGE_SYNONYMS: &[(&str, &str)] = &[
    ("kr", "ko"),
    ("kor", "ko"),
    ("eng", "en"),
];

/// Map an ISO 639-2/B code to its ISO 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    let part2t = match code {
        "fre" => "fra", // French
        "ger" => "deu", // German
        "dut" => "nld", // Dutch
        "gre" => "ell", // Greek
        "chi" => "zho", // Chinese
        "cze" => "ces", // Czech
        "ice" => "isl", // Icelandic
        "alb" => "sqi", // Albanian
        "arm" => "hye", // Armenian
        "baq" => "eus", // Basque
        "bur" => "mya", // Burmese
        "per" => "fas", // Persian
        "geo" => "kat", // Georgian
        "may" => "msa", // Malay
        "mac" => "mkd", // Macedonian
        "rum" => "ron", // Romanian
        "slo" => "slk", // Slovak
        "wel" => "cym", // Welsh
        _ => return None,
    };
    Some(part2t)
}

/// Normalize a language code to its canonical short form
///
/// The code is trimmed and lower-cased, the region subtag is dropped
/// ("ko-KR" -> "ko"), the synonym table is applied, and three-letter ISO
/// codes with an ISO 639-1 equivalent are shortened. Unknown codes pass
/// through unchanged and empty input yields an empty string.
pub fn normalize_language(code: &str) -> String {
    let lowered = code.trim().to_lowercase();
    let primary = lowered
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    if primary.is_empty() {
        return String::new();
    }

    if let Some((_, canonical)) = LANGUAGE_SYNONYMS.iter().find(|(alias, _)| *alias == primary) {
        return (*canonical).to_string();
    }

    if primary.len() == 3 {
        let part2t = part2b_to_part2t(primary).unwrap_or(primary);
        if let Some(part1) = Language::from_639_3(part2t).and_then(|lang| lang.to_639_1()) {
            return part1.to_string();
        }
    }

    primary.to_string()
}

/// Bound the input text to [`MAX_TEXT_LENGTH`] characters
///
/// Text over the cap is cut to the cap and then trimmed; text at or under
/// the cap is returned unchanged.
pub fn normalize_text(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_LENGTH {
        return text.to_string();
    }

    let truncated: String = text.chars().take(MAX_TEXT_LENGTH).collect();
    truncated.trim().to_string()
}

/// Get a human-readable language name for prompts, falling back to the code
pub fn language_display_name(code: &str) -> String {
    let lang = match code.len() {
        2 => Language::from_639_1(code),
        3 => Language::from_639_3(part2b_to_part2t(code).unwrap_or(code)),
        _ => None,
    };

    lang.map(|l| l.to_name().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Whether a code is a known ISO 639-1 or ISO 639-3 code
pub fn is_known_language(code: &str) -> bool {
    let normalized = normalize_language(code);
    match normalized.len() {
        2 => Language::from_639_1(&normalized).is_some(),
        3 => Language::from_639_3(&normalized).is_some(),
        _ => false,
    }
}
