/*!
 * Tests for provider implementations
 */

use transguard::errors::ProviderError;
use transguard::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use transguard::providers::mock::{MockProvider, MockReply};
use transguard::providers::ollama::{backoff_delay_ms, parse_generation_body, GenerationRequest, Ollama};
use transguard::providers::{ModelInvoker, Provider};

#[test]
fn test_ollama_generationRequest_shouldSerializeTemperatureAndDisableStreaming() {
    let request = GenerationRequest::new("llama3.2:3b", "Translate this").temperature(0.3);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "llama3.2:3b");
    assert_eq!(json["prompt"], "Translate this");
    assert_eq!(json["stream"], false);
    assert!((json["options"]["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert_eq!(json["options"].as_object().unwrap().len(), 1);
}

#[test]
fn test_ollama_parseGenerationBody_withJsonl_shouldConcatenate() {
    let body = concat!(
        "{\"model\":\"m\",\"response\":\"Hel\",\"done\":false}\n",
        "{\"model\":\"m\",\"response\":\"lo\",\"done\":true,\"eval_count\":2}\n",
    );
    let response = parse_generation_body(body).unwrap();

    assert_eq!(response.response, "Hello");
    assert!(response.done);
    assert_eq!(response.eval_count, Some(2));
    assert_eq!(Ollama::extract_text(&response), "Hello");
}

#[test]
fn test_ollama_parseGenerationBody_withGarbage_shouldBeParseError() {
    assert!(matches!(parse_generation_body("<html>"), Err(ProviderError::ParseError(_))));
    assert!(matches!(parse_generation_body(""), Err(ProviderError::ParseError(_))));
}

#[test]
fn test_ollama_backoffDelay_shouldDoubleAndSaturate() {
    assert_eq!(backoff_delay_ms(1000, 1), 1000);
    assert_eq!(backoff_delay_ms(1000, 3), 4000);
    assert_eq!(backoff_delay_ms(1000, 64), u64::MAX);
    assert_eq!(backoff_delay_ms(1000, u32::MAX), u64::MAX);
    assert_eq!(backoff_delay_ms(0, 80), 0);
}

#[tokio::test]
async fn test_ollama_invoke_withUnreachableServer_shouldBeConnectionError() {
    let client = Ollama::new_with_config("http://127.0.0.1:9", "llama3.2:3b", 2, 0, 1);

    let error = client.invoke("hello", 0.0).await.unwrap_err();

    assert!(matches!(error, ProviderError::ConnectionError(_)));
    assert!(error.is_transient());
}

#[test]
fn test_anthropic_extractText_shouldJoinTextBlocks() {
    let json = r#"{
        "content": [
            { "type": "text", "text": "Bonjour" },
            { "type": "tool_use" },
            { "type": "text", "text": " le monde" }
        ],
        "usage": { "input_tokens": 12, "output_tokens": 4 }
    }"#;
    let response: AnthropicResponse = serde_json::from_str(json).unwrap();

    assert_eq!(Anthropic::extract_text(&response), "Bonjour le monde");
    assert_eq!(response.usage.output_tokens, 4);
}

#[test]
fn test_anthropic_buildRequest_shouldSendSingleUserMessage() {
    let client = Anthropic::new_with_config("sk-test", "https://api.anthropic.com", "claude-3-haiku-20240307", 30);
    let request: AnthropicRequest = client.build_request("Translate this", 0.0);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "claude-3-haiku-20240307");
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["content"], "Translate this");
    assert_eq!(json["temperature"], 0.0);
}

#[tokio::test]
async fn test_mock_scripted_shouldReplyInOrderAndRecordCalls() {
    let provider = MockProvider::scripted_replies([
        MockReply::text("PASS"),
        MockReply::Fail(429),
    ]);

    assert_eq!(provider.invoke("first", 0.0).await.unwrap(), "PASS");
    assert!(provider.invoke("second", 0.3).await.is_err());
    assert!(provider.invoke("third", 0.3).await.is_err());

    let calls = provider.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].prompt, "second");
    assert_eq!(calls[1].temperature, 0.3);
    assert_eq!(provider.remaining_script(), 0);
}
