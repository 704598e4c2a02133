//! OpenAI-compatible chat-completions adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::pharmacy::client::ClientConfig;
use crate::pharmacy::medicine::{MedicineRecord, SchemaDialect};
use crate::pharmacy::provider::{CompletionRequest, Provider, ProviderError, ResponseFormat};
use crate::pharmacy::transport::{Auth, RequestFailure, join_url, post_json};

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

pub(crate) fn endpoint(config: &ClientConfig) -> String {
    join_url(config.base_url(), "chat/completions")
}

pub(crate) fn request_body(
    config: &ClientConfig,
    request: &CompletionRequest,
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.turns.len() + 1);
    messages.push(ChatMessage {
        role: "system",
        content: request.system.clone(),
    });
    messages.extend(request.turns.iter().map(|turn| ChatMessage {
        role: turn.role.as_str(),
        content: turn.text.clone(),
    }));

    let response_format = match request.format {
        ResponseFormat::Text => None,
        ResponseFormat::MedicineRecord => Some(json!({
            "type": "json_schema",
            "json_schema": {
                "name": "medicine_record",
                "strict": true,
                "schema": MedicineRecord::response_schema(SchemaDialect::JsonSchema),
            }
        })),
    };

    ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format,
    }
}

pub(crate) async fn complete(
    http: &reqwest::Client,
    config: &ClientConfig,
    api_key: &str,
    request: &CompletionRequest,
) -> Result<Option<String>, ProviderError> {
    let provider = Provider::Openai;
    let payload = request_body(config, request);

    let response = post_json(
        http,
        &endpoint(config),
        Auth::Bearer(api_key),
        &payload,
        config.timeout_secs,
    )
    .await
    .map_err(|failure| match failure {
        RequestFailure::Request(source) => ProviderError::Request { provider, source },
        RequestFailure::Api { status, body } => ProviderError::Api {
            provider,
            status,
            body,
        },
    })?;

    let body: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty());

    Ok(content)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{endpoint, request_body};
    use crate::pharmacy::chat::ChatTurn;
    use crate::pharmacy::client::ClientConfig;
    use crate::pharmacy::provider::{CompletionRequest, Provider, ResponseFormat};

    #[test]
    fn system_directive_leads_the_messages() {
        let config = ClientConfig::new(Provider::Openai);
        let request = CompletionRequest {
            system: "directive".to_string(),
            turns: vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")],
            temperature: None,
            max_tokens: Some(64),
            format: ResponseFormat::MedicineRecord,
        };

        let body = serde_json::to_value(request_body(&config, &request)).expect("serializes");
        assert_eq!(body["model"], json!("gpt-4o-mini"));
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "directive"}));
        assert_eq!(body["messages"][2]["role"], json!("assistant"));
        assert_eq!(body["max_tokens"], json!(64));
        assert!(body.get("temperature").is_none());
        assert_eq!(body["response_format"]["json_schema"]["strict"], json!(true));
        assert_eq!(endpoint(&config), "https://api.openai.com/v1/chat/completions");
    }
}
