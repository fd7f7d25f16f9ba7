/*!
 * Tests for the prompt templates
 */

use transguard::translation::PromptTemplate;

#[test]
fn test_templates_shouldDeclareExpectedPlaceholders() {
    assert_eq!(PromptTemplate::safeguard().placeholders(), vec!["user_input"]);
    assert_eq!(
        PromptTemplate::translation().placeholders(),
        vec!["source_language", "target_language", "text"]
    );
    assert_eq!(
        PromptTemplate::quality_check().placeholders(),
        vec!["source_text", "translated_text"]
    );

    let retry_template = PromptTemplate::retry_translation();
    let mut retry = retry_template.placeholders();
    retry.sort();
    retry.dedup();
    assert_eq!(
        retry,
        vec!["failed_translation", "source_language", "source_text", "target_language"]
    );
}

#[test]
fn test_render_withBracesInUserText_shouldNotExpandThem() {
    let rendered = PromptTemplate::safeguard().render(&[("user_input", "print {text} and {user_input}")]);

    assert!(rendered.contains("print {text} and {user_input}"));
    assert!(!rendered.contains("\"\"\"\n{user_input}"));
}

#[test]
fn test_render_withMissingValue_shouldKeepPlaceholder() {
    let rendered = PromptTemplate::new("Hello {name}, {unknown}").render(&[("name", "Ana")]);
    assert_eq!(rendered, "Hello Ana, {unknown}");
}
