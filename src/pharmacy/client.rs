use std::fmt;

use tracing::{debug, warn};

use crate::pharmacy::chat::ChatTurn;
use crate::pharmacy::error::QueryError;
use crate::pharmacy::language::{Language, Notice};
use crate::pharmacy::medicine::MedicineRecord;
use crate::pharmacy::normalize::normalize;
use crate::pharmacy::provider::{self, CompletionRequest, Provider, ResponseFormat};

const CHAT_TEMPERATURE: f32 = 0.7;

const LOOKUP_DIRECTIVE: &str = "You are a specialized medical information extractor for \
the MedCenter pharmacy app. Return ONLY valid JSON matching the provided schema. Do not \
include any disclaimers about medical advice in the JSON itself, as the app shows its own \
disclaimer.";

/// Everything the client needs to reach a provider.
///
/// The credential is supplied by the caller; the client never looks it up
/// on its own.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Provider defaults, no credential.
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key_present", &self.has_api_key())
            .field("base_url", &self.base_url())
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Chat assistant and medicine explorer on top of one provider.
#[derive(Debug, Clone)]
pub struct MedicalQueryClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl MedicalQueryClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, QueryError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(QueryError::MissingCredential {
                key_env: self.config.provider.api_key_env(),
            })
    }

    /// Request sent by [`converse`](Self::converse): history plus the new
    /// utterance under the assistant directive.
    pub fn chat_request(
        &self,
        utterance: &str,
        history: &[ChatTurn],
        language: Language,
    ) -> CompletionRequest {
        let mut turns = history.to_vec();
        turns.push(ChatTurn::user(utterance));

        CompletionRequest {
            system: chat_directive(language),
            turns,
            temperature: Some(self.config.temperature.unwrap_or(CHAT_TEMPERATURE)),
            max_tokens: self.config.max_tokens,
            format: ResponseFormat::Text,
        }
    }

    /// Request sent by [`lookup`](Self::lookup).
    pub fn lookup_request(&self, medicine: &str, language: Language) -> CompletionRequest {
        let prompt = format!(
            "Provide complete professional details for: {}.\n\
             Target Language for Values: {}.\n\
             CRITICAL: Keep JSON keys in English. Provide values in the target language.",
            medicine.trim(),
            language.display_name()
        );

        CompletionRequest {
            system: LOOKUP_DIRECTIVE.to_string(),
            turns: vec![ChatTurn::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            format: ResponseFormat::MedicineRecord,
        }
    }

    /// Chat with the typed failure taxonomy exposed.
    pub async fn try_converse(
        &self,
        utterance: &str,
        history: &[ChatTurn],
        language: Language,
    ) -> Result<String, QueryError> {
        let api_key = self.api_key()?;
        let request = self.chat_request(utterance, history, language);
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            turns = request.turns.len(),
            "sending chat request"
        );

        provider::complete(&self.http, &self.config, api_key, &request)
            .await
            .map_err(|err| QueryError::from_provider(err, language))?
            .ok_or(QueryError::EmptyResponse)
    }

    /// Chat reply that is always displayable. Failures become a localized
    /// sentence and are logged.
    pub async fn converse(
        &self,
        utterance: &str,
        history: &[ChatTurn],
        language: Language,
    ) -> String {
        match self.try_converse(utterance, history, language).await {
            Ok(text) => text,
            Err(QueryError::MissingCredential { key_env }) => {
                warn!(key_env, "chat requested without a configured credential");
                language.notice(Notice::NotConfigured).to_string()
            }
            Err(QueryError::EmptyResponse) => {
                warn!("chat provider returned no text");
                language.notice(Notice::NoReply).to_string()
            }
            Err(err) => {
                warn!(error = %err, cause = ?std::error::Error::source(&err), "chat request failed");
                language.notice(Notice::ConnectionError).to_string()
            }
        }
    }

    /// Looks up a medicine and validates the reply against the record
    /// schema.
    pub async fn lookup(
        &self,
        medicine: &str,
        language: Language,
    ) -> Result<MedicineRecord, QueryError> {
        let api_key = self.api_key()?;
        let request = self.lookup_request(medicine, language);
        debug!(
            provider = %self.config.provider,
            model = %self.config.model,
            medicine = medicine.trim(),
            "sending medicine lookup"
        );

        let text = provider::complete(&self.http, &self.config, api_key, &request)
            .await
            .map_err(|err| {
                warn!(error = %err, "medicine lookup failed");
                QueryError::from_provider(err, language)
            })?
            .ok_or(QueryError::EmptyResponse)?;

        let record = normalize(&text).and_then(MedicineRecord::from_value);
        if let Err(err) = &record {
            warn!(error = %err, "medicine lookup returned an unusable record");
        }
        record
    }
}

fn chat_directive(language: Language) -> String {
    format!(
        "You are a helpful AI Medical Assistant for MedCenter, a local pharmacy. \
         Your task is to provide general pharmaceutical information and health tips.\n\
         Language: {}\n\
         IMPORTANT: Start by stating that you are an AI, not a doctor or licensed medical \
         professional. Always advise consulting a qualified doctor or pharmacist.\n\
         Focus on being helpful and accurate.",
        language.reply_rule()
    )
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, MedicalQueryClient};
    use crate::pharmacy::chat::{ChatTurn, Role};
    use crate::pharmacy::error::QueryError;
    use crate::pharmacy::language::{Language, Notice};
    use crate::pharmacy::provider::{Provider, ResponseFormat};

    #[test]
    fn chat_request_appends_utterance_after_history() {
        let client = MedicalQueryClient::new(ClientConfig::new(Provider::Gemini));
        let history = vec![ChatTurn::user("hello"), ChatTurn::assistant("hi there")];
        let request = client.chat_request("Is ibuprofen safe?", &history, Language::Hi);

        assert_eq!(request.turns.len(), 3);
        assert_eq!(request.turns[2].role, Role::User);
        assert_eq!(request.turns[2].text, "Is ibuprofen safe?");
        assert_eq!(request.temperature, Some(0.7));
        assert!(request.system.contains("Hindi (Devanagari script)"));
        assert!(request.system.contains("not a doctor"));
        assert!(request.system.contains("consulting a qualified doctor"));
    }

    #[test]
    fn lookup_request_is_schema_constrained() {
        let client = MedicalQueryClient::new(ClientConfig::new(Provider::Openai));
        let request = client.lookup_request("  Crocin ", Language::En);

        assert_eq!(request.format, ResponseFormat::MedicineRecord);
        assert!(request.turns[0].text.contains("details for: Crocin."));
        assert!(request.turns[0].text.contains("Target Language for Values: English."));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let config = ClientConfig::new(Provider::Gemini).with_api_key("very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("api_key_present: true"));
    }

    #[tokio::test]
    async fn blank_key_counts_as_missing() {
        let client = MedicalQueryClient::new(ClientConfig::new(Provider::Gemini).with_api_key("   "));
        let err = client
            .lookup("Paracetamol", Language::En)
            .await
            .expect_err("blank key should fail");
        assert!(matches!(
            err,
            QueryError::MissingCredential {
                key_env: "GEMINI_API_KEY"
            }
        ));
    }

    #[tokio::test]
    async fn chat_without_key_returns_setup_notice() {
        let client = MedicalQueryClient::new(ClientConfig::new(Provider::Openai));
        let reply = client.converse("hello", &[], Language::Hi).await;
        assert_eq!(reply, Language::Hi.notice(Notice::NotConfigured));
    }
}
