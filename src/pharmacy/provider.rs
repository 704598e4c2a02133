use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

use crate::pharmacy::chat::ChatTurn;
use crate::pharmacy::client::ClientConfig;
use crate::pharmacy::{gemini, openai};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    Openai,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Openai => "openai",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Openai => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-3-flash-preview",
            Self::Openai => "gpt-4o-mini",
        }
    }

    /// Environment variable the CLI reads the credential from.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Openai => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::Openai),
            other => Err(format!(
                "Unsupported provider '{other}'. Supported values: gemini, openai."
            )),
        }
    }
}

/// Shape the provider is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free prose.
    Text,
    /// JSON constrained to the medicine record schema.
    MedicineRecord,
}

/// Provider-neutral completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub turns: Vec<ChatTurn>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub format: ResponseFormat,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Request {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: Provider,
        status: StatusCode,
        body: String,
    },
}

/// Sends one completion request and returns the reply text, if any.
pub(crate) async fn complete(
    http: &reqwest::Client,
    config: &ClientConfig,
    api_key: &str,
    request: &CompletionRequest,
) -> Result<Option<String>, ProviderError> {
    match config.provider {
        Provider::Gemini => gemini::complete(http, config, api_key, request).await,
        Provider::Openai => openai::complete(http, config, api_key, request).await,
    }
}

/// Describes the HTTP call `complete` would make, without credentials.
pub fn preview(config: &ClientConfig, request: &CompletionRequest) -> Result<Value, String> {
    let (endpoint, body) = match config.provider {
        Provider::Gemini => (
            gemini::endpoint(config),
            serde_json::to_value(gemini::request_body(request)),
        ),
        Provider::Openai => (
            openai::endpoint(config),
            serde_json::to_value(openai::request_body(config, request)),
        ),
    };
    let body = body.map_err(|err| format!("Failed to serialize request: {err}"))?;

    Ok(json!({
        "provider": config.provider.as_str(),
        "model": config.model,
        "endpoint": endpoint,
        "timeout_secs": config.timeout_secs,
        "body": body,
    }))
}

#[cfg(test)]
mod tests {
    use super::Provider;

    #[test]
    fn provider_parsing_is_case_insensitive() {
        assert_eq!("Gemini".parse::<Provider>(), Ok(Provider::Gemini));
        assert_eq!(" openai ".parse::<Provider>(), Ok(Provider::Openai));
        assert_eq!(
            "fireworks".parse::<Provider>(),
            Err("Unsupported provider 'fireworks'. Supported values: gemini, openai.".to_string())
        );
    }

    #[test]
    fn each_provider_has_its_own_credential_variable() {
        assert_eq!(Provider::Gemini.api_key_env(), "GEMINI_API_KEY");
        assert_eq!(Provider::Openai.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(Provider::default(), Provider::Gemini);
    }
}
