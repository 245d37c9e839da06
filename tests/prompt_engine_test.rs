use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Map, Value, json};

use podsmith::application::ports::{ChatCompletion, LlmClient, LlmClientError, ModelOptions};
use podsmith::application::prompts::podcast_script_prompt;
use podsmith::application::services::{PromptEngine, PromptEngineError};

struct CannedLlmClient {
    response: String,
    calls: AtomicUsize,
}

impl CannedLlmClient {
    fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for CannedLlmClient {
    async fn chat_completion(
        &self,
        _prompt: &str,
        _options: &ModelOptions,
    ) -> Result<ChatCompletion, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ChatCompletion {
            content: self.response.clone(),
            usage: None,
        })
    }
}

struct FailingLlmClient;

#[async_trait::async_trait]
impl LlmClient for FailingLlmClient {
    async fn chat_completion(
        &self,
        _prompt: &str,
        _options: &ModelOptions,
    ) -> Result<ChatCompletion, LlmClientError> {
        Err(LlmClientError::ApiRequestFailed("boom".to_string()))
    }
}

fn valid_params() -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("content".to_string(), json!("An article about honeybees."));
    params.insert("host_name".to_string(), json!("Nova"));
    params.insert("host_description".to_string(), json!("Curious lead host"));
    params.insert("cohost_name".to_string(), json!("Orion"));
    params.insert("cohost_description".to_string(), json!("Dry analyst"));
    params
}

fn valid_script() -> Value {
    json!({
        "title": "The Secret Life of Honeybees",
        "summary": "Nova and Orion dig into how hives actually work.",
        "tags": ["bees", "biology"],
        "dialogue": [
            {"speaker": "Nova", "line": "Did you know bees vote?"},
            {"speaker": "Orion", "line": "They do not vote. They quorum-sense."}
        ]
    })
}

#[tokio::test]
async fn given_missing_required_param_when_running_then_input_validation_error_without_model_call()
{
    let llm = Arc::new(CannedLlmClient::new(valid_script().to_string()));
    let engine = PromptEngine::new(llm.clone());
    let definition = podcast_script_prompt();

    let mut params = valid_params();
    params.remove("content");

    let result = engine.run(&definition, &params, None).await;

    match result {
        Err(PromptEngineError::InputValidation { fields }) => {
            assert!(fields.iter().any(|f| f.path == "content"));
        }
        other => panic!("expected InputValidation, got {:?}", other.map(|_| ())),
    }
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_wrongly_typed_param_when_running_then_input_validation_error() {
    let llm = Arc::new(CannedLlmClient::new(valid_script().to_string()));
    let engine = PromptEngine::new(llm.clone());
    let definition = podcast_script_prompt();

    let mut params = valid_params();
    params.insert("content".to_string(), json!(42));

    let result = engine.run(&definition, &params, None).await;

    assert!(matches!(
        result,
        Err(PromptEngineError::InputValidation { .. })
    ));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_plain_json_reply_when_running_then_returns_structured_value() {
    let llm = Arc::new(CannedLlmClient::new(valid_script().to_string()));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let value = engine
        .run(&definition, &valid_params(), None)
        .await
        .unwrap();

    assert_eq!(value, valid_script());
}

#[tokio::test]
async fn given_fenced_reply_with_language_tag_when_running_then_fence_is_stripped() {
    let fenced = format!("```json\n{}\n```", valid_script());
    let llm = Arc::new(CannedLlmClient::new(fenced));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let value = engine
        .run(&definition, &valid_params(), None)
        .await
        .unwrap();

    assert_eq!(value, valid_script());
}

#[tokio::test]
async fn given_fenced_reply_without_language_tag_when_running_then_fence_is_stripped() {
    let fenced = format!("```\n{}\n```", valid_script());
    let llm = Arc::new(CannedLlmClient::new(fenced));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let value = engine
        .run(&definition, &valid_params(), None)
        .await
        .unwrap();

    assert_eq!(value, valid_script());
}

#[tokio::test]
async fn given_backticks_inside_string_values_when_running_then_payload_is_untouched() {
    let mut script = valid_script();
    script["dialogue"][0]["line"] = json!("Wrap it in ```code``` fences.");
    let llm = Arc::new(CannedLlmClient::new(script.to_string()));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let value = engine
        .run(&definition, &valid_params(), None)
        .await
        .unwrap();

    assert_eq!(
        value["dialogue"][0]["line"],
        json!("Wrap it in ```code``` fences.")
    );
}

#[tokio::test]
async fn given_unterminated_fence_when_running_then_parse_error() {
    let broken = format!("```json\n{}", valid_script());
    let llm = Arc::new(CannedLlmClient::new(broken));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    assert!(matches!(result, Err(PromptEngineError::Parse { .. })));
}

#[tokio::test]
async fn given_empty_model_reply_when_running_then_model_error() {
    let llm = Arc::new(CannedLlmClient::new("   \n  "));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    assert!(matches!(result, Err(PromptEngineError::Model(_))));
}

#[tokio::test]
async fn given_collaborator_failure_when_running_then_model_error() {
    let engine = PromptEngine::new(Arc::new(FailingLlmClient));
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    assert!(matches!(result, Err(PromptEngineError::Model(_))));
}

#[tokio::test]
async fn given_unparseable_reply_when_running_then_parse_error_carries_snippet() {
    let llm = Arc::new(CannedLlmClient::new("The episode should cover..."));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    match result {
        Err(PromptEngineError::Parse { snippet, .. }) => {
            assert!(snippet.contains("The episode should cover"));
        }
        other => panic!("expected Parse, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn given_reply_missing_dialogue_when_running_then_output_validation_error() {
    let mut script = valid_script();
    script.as_object_mut().unwrap().remove("dialogue");
    let llm = Arc::new(CannedLlmClient::new(script.to_string()));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    match result {
        Err(PromptEngineError::OutputValidation { fields }) => {
            assert!(fields.iter().any(|f| f.path == "dialogue"));
        }
        other => panic!("expected OutputValidation, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn given_reply_with_empty_dialogue_when_running_then_output_validation_error() {
    let mut script = valid_script();
    script["dialogue"] = json!([]);
    let llm = Arc::new(CannedLlmClient::new(script.to_string()));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    assert!(matches!(
        result,
        Err(PromptEngineError::OutputValidation { .. })
    ));
}

#[tokio::test]
async fn given_reply_with_malformed_segment_when_running_then_error_names_the_field_path() {
    let mut script = valid_script();
    script["dialogue"][1]["line"] = json!("");
    let llm = Arc::new(CannedLlmClient::new(script.to_string()));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let result = engine.run(&definition, &valid_params(), None).await;

    match result {
        Err(PromptEngineError::OutputValidation { fields }) => {
            assert!(fields.iter().any(|f| f.path == "dialogue[1].line"));
        }
        other => panic!("expected OutputValidation, got {:?}", other.map(|_| ())),
    }
}

// Round trip: any object satisfying the schema, rendered as fenced JSON,
// comes back out equal.
#[tokio::test]
async fn given_schema_conforming_object_when_fenced_and_rerun_then_round_trips_equal() {
    let original = valid_script();
    let fenced = format!("```json\n{}\n```", original);
    let llm = Arc::new(CannedLlmClient::new(fenced));
    let engine = PromptEngine::new(llm);
    let definition = podcast_script_prompt();

    let value = engine
        .run(&definition, &valid_params(), None)
        .await
        .unwrap();

    assert_eq!(value, original);
}
