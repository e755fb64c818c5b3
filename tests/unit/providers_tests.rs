/*!
 * Tests for provider request building and response handling
 */

use serde_json::json;

use yasrai::providers::Provider;
use yasrai::providers::anthropic::{Anthropic, AnthropicResponse};
use yasrai::providers::ollama::{ChatMessage, ChatRequest, ChatResponse, Ollama};
use yasrai::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use yasrai::reconcile::prompts::{AlignmentContract, OracleContract, TranslationContract};

#[test]
fn test_openAIRequest_withResponseFormat_shouldSerializeStrictSchema() {
    let request = OpenAIRequest::new("gpt-4o")
        .add_message("user", "match these")
        .temperature(0.0)
        .response_format(AlignmentContract::schema().openai_response_format());

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], "gpt-4o");
    assert_eq!(value["messages"][0]["role"], "user");
    assert_eq!(value["response_format"]["json_schema"]["strict"], true);
    assert!(value.get("max_tokens").is_none());
}

#[test]
fn test_openAIResponse_extractText_shouldReadFirstChoice() {
    let response: OpenAIResponse = serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": "{\"translated_subtitles\":[]}" } }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    }))
    .unwrap();

    assert_eq!(OpenAI::extract_text(&response), "{\"translated_subtitles\":[]}");
}

#[test]
fn test_ollamaRequest_withSchemaFormat_shouldDisableStreaming() {
    let messages = vec![ChatMessage { role: "user".into(), content: "hi".into() }];
    let request = ChatRequest::new("llama3.1", messages)
        .format(TranslationContract::schema().json_schema())
        .num_predict(256);

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["stream"], false);
    assert_eq!(value["format"]["required"][0], "translated_subtitles");
    assert_eq!(value["options"]["num_predict"], 256);
}

#[test]
fn test_ollamaResponse_extractText_shouldReturnMessageContent() {
    let response: ChatResponse = serde_json::from_value(json!({
        "model": "llama3.1",
        "message": { "role": "assistant", "content": "{}" },
        "done": true
    }))
    .unwrap();

    assert_eq!(Ollama::extract_text(&response), "{}");
}

#[test]
fn test_anthropicResponse_extractText_shouldJoinTextBlocks() {
    let response: AnthropicResponse = serde_json::from_value(json!({
        "content": [
            { "type": "text", "text": "{\"corresponding_subtitles\":" },
            { "type": "tool_use" },
            { "type": "text", "text": "[]}" }
        ],
        "usage": { "input_tokens": 3, "output_tokens": 2 }
    }))
    .unwrap();

    assert_eq!(Anthropic::extract_text(&response), "{\"corresponding_subtitles\":[]}");
}

#[test]
fn test_mockOracle_withFencedAnswer_shouldParseJson() {
    use yasrai::errors::ProviderError;
    use yasrai::providers::mock::{MockProvider, MockReply};
    use yasrai::reconcile::Oracle;

    let schema = AlignmentContract::schema();
    let mock = MockProvider::scripted(vec![
        MockReply::Text("```json\n{\"corresponding_subtitles\": [[1, 2]]}\n```".to_string()),
        MockReply::Text("Sorry, I cannot help with that.".to_string()),
    ]);

    let (first, second) = tokio_test::block_on(async {
        let first = Oracle::complete(&mock, "round 1", &schema).await;
        let second = Oracle::complete(&mock, "round 2", &schema).await;
        (first, second)
    });

    assert_eq!(first.unwrap()["corresponding_subtitles"][0][1], 2);
    assert!(matches!(second, Err(ProviderError::InvalidCompletion(_))));
    assert_eq!(mock.prompts(), vec!["round 1", "round 2"]);
}
