/*!
 * Tests for language and text normalization
 */

use transguard::language_utils::{
    is_known_language, language_display_name, normalize_language, normalize_text, MAX_TEXT_LENGTH,
};

#[test]
fn test_normalizeLanguage_withDocumentedExamples_shouldMatch() {
    assert_eq!(normalize_language("KR"), "ko");
    assert_eq!(normalize_language("ko-KR"), "ko");
    assert_eq!(normalize_language("en-US"), "en");
    assert_eq!(normalize_language("kor"), "ko");
    assert_eq!(normalize_language(""), "");
}

#[test]
fn test_normalizeLanguage_withWhitespaceAndCase_shouldCanonicalize() {
    assert_eq!(normalize_language("  FR "), "fr");
    assert_eq!(normalize_language("zh_Hant_TW"), "zh");
    assert_eq!(normalize_language("deu"), "de");
}

#[test]
fn test_normalizeLanguage_withUnknownCode_shouldPassThrough() {
    assert_eq!(normalize_language("xyz"), "xyz");
    assert_eq!(normalize_language("klingon"), "klingon");
}

#[test]
fn test_normalizeLanguage_shouldBeIdempotent() {
    for code in ["KR", "en-US", "kor", "fre", "pt_BR", "xyz", ""] {
        let once = normalize_language(code);
        assert_eq!(normalize_language(&once), once, "{code}");
    }
}

#[test]
fn test_normalizeText_underCap_shouldBeUnchanged() {
    let text = "  leading and trailing spaces  ";
    assert_eq!(normalize_text(text), text);
    assert_eq!(normalize_text(""), "");
}

#[test]
fn test_normalizeText_overCap_shouldTruncateThenTrim() {
    let text = format!("{}{}", "a".repeat(MAX_TEXT_LENGTH - 2), "   bbb");
    let normalized = normalize_text(&text);

    assert_eq!(normalized, "a".repeat(MAX_TEXT_LENGTH - 2));
}

#[test]
fn test_normalizeText_withMultibyteText_shouldCountCharacters() {
    let text = "가".repeat(MAX_TEXT_LENGTH + 10);
    let normalized = normalize_text(&text);

    assert_eq!(normalized.chars().count(), MAX_TEXT_LENGTH);
    assert!(normalized.len() > MAX_TEXT_LENGTH);
}

#[test]
fn test_languageDisplayName_shouldFallBackToCode() {
    assert_eq!(language_display_name("ko"), "Korean");
    assert_eq!(language_display_name("fr"), "French");
    assert_eq!(language_display_name("xyz"), "xyz");
    assert_eq!(language_display_name(""), "");
}

#[test]
fn test_isKnownLanguage_shouldRecognizeIsoCodes() {
    assert!(is_known_language("en"));
    assert!(is_known_language("KR"));
    assert!(!is_known_language("xyz"));
    assert!(!is_known_language(""));
}
