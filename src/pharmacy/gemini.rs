//! Google Gemini `generateContent` adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pharmacy::chat::{ChatTurn, Role};
use crate::pharmacy::client::ClientConfig;
use crate::pharmacy::medicine::{MedicineRecord, SchemaDialect};
use crate::pharmacy::provider::{CompletionRequest, Provider, ProviderError, ResponseFormat};
use crate::pharmacy::transport::{Auth, RequestFailure, join_url, post_json};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// Gemini calls the assistant side of a conversation "model".
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn content_from_turn(turn: &ChatTurn) -> Content {
    Content {
        role: Some(wire_role(turn.role)),
        parts: vec![Part {
            text: turn.text.clone(),
        }],
    }
}

pub(crate) fn endpoint(config: &ClientConfig) -> String {
    join_url(
        config.base_url(),
        &format!("models/{}:generateContent", config.model),
    )
}

pub(crate) fn request_body(request: &CompletionRequest) -> GenerateContentRequest {
    let (response_mime_type, response_schema) = match request.format {
        ResponseFormat::Text => (None, None),
        ResponseFormat::MedicineRecord => (
            Some("application/json"),
            Some(MedicineRecord::response_schema(SchemaDialect::Gemini)),
        ),
    };

    GenerateContentRequest {
        contents: request.turns.iter().map(content_from_turn).collect(),
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.system.clone(),
            }],
        },
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
            response_mime_type,
            response_schema,
        },
    }
}

pub(crate) async fn complete(
    http: &reqwest::Client,
    config: &ClientConfig,
    api_key: &str,
    request: &CompletionRequest,
) -> Result<Option<String>, ProviderError> {
    let provider = Provider::Gemini;
    let payload = request_body(request);

    let response = post_json(
        http,
        &endpoint(config),
        Auth::Header(API_KEY_HEADER, api_key),
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

    let body: GenerateContentResponse = response
        .json()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    let text = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty());

    Ok(text)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{endpoint, request_body};
    use crate::pharmacy::chat::ChatTurn;
    use crate::pharmacy::client::ClientConfig;
    use crate::pharmacy::provider::{CompletionRequest, Provider, ResponseFormat};

    fn request(format: ResponseFormat) -> CompletionRequest {
        CompletionRequest {
            system: "be careful".to_string(),
            turns: vec![
                ChatTurn::assistant("Hello, how can I help?"),
                ChatTurn::user("What is ORS?"),
            ],
            temperature: Some(0.7),
            max_tokens: None,
            format,
        }
    }

    #[test]
    fn assistant_turns_use_model_role() {
        let body = serde_json::to_value(request_body(&request(ResponseFormat::Text)))
            .expect("body serializes");
        assert_eq!(body["contents"][0]["role"], json!("model"));
        assert_eq!(body["contents"][1]["role"], json!("user"));
        assert_eq!(body["contents"][1]["parts"][0]["text"], json!("What is ORS?"));
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], json!("be careful"));
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn structured_request_carries_schema() {
        let body = serde_json::to_value(request_body(&request(ResponseFormat::MedicineRecord)))
            .expect("body serializes");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            json!("application/json")
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], json!("OBJECT"));
    }

    #[test]
    fn endpoint_embeds_model() {
        let config = ClientConfig::new(Provider::Gemini).with_base_url("http://localhost:9/v1beta/");
        assert_eq!(
            endpoint(&config),
            "http://localhost:9/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }
}
