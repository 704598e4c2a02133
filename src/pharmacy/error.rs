use reqwest::StatusCode;
use thiserror::Error;

use crate::pharmacy::language::{Language, Notice};
use crate::pharmacy::provider::ProviderError;

/// Failure of a structured lookup (and of the typed chat path).
///
/// Every variant is recoverable: the caller shows a message and lets the
/// user submit again.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No provider credential configured. Raised before any network call.
    #[error("{key_env} is not set; configure a provider credential")]
    MissingCredential { key_env: &'static str },

    /// The provider answered without any text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Text came back but is not a usable medicine record.
    ///
    /// `raw` keeps the offending text for diagnostics only.
    #[error("provider response is not a valid medicine record: {reason}")]
    MalformedResponse { reason: String, raw: String },

    /// Transport, HTTP status or authorization failure from the provider.
    #[error("{message}")]
    Provider {
        notice: Notice,
        message: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl QueryError {
    pub(crate) fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Wraps a provider failure with a localized message picked from the
    /// status code and error body.
    pub fn from_provider(source: ProviderError, language: Language) -> Self {
        let notice = classify(&source);
        Self::Provider {
            notice,
            message: language.notice(notice),
            source,
        }
    }

    /// Stable identifier for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => "missing_credential",
            Self::EmptyResponse => "empty_response",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Provider { .. } => "provider_error",
        }
    }

    /// Sentence suitable for showing to the end user.
    pub fn user_message(&self, language: Language) -> &'static str {
        let notice = match self {
            Self::MissingCredential { .. } => Notice::NotConfigured,
            Self::EmptyResponse => Notice::EmptyRecord,
            Self::MalformedResponse { .. } => Notice::InvalidFormat,
            Self::Provider { notice, .. } => *notice,
        };
        language.notice(notice)
    }
}

fn classify(error: &ProviderError) -> Notice {
    match error {
        ProviderError::Api { status, body, .. } => {
            if *status == StatusCode::UNAUTHORIZED
                || *status == StatusCode::FORBIDDEN
                || body.contains("API_KEY_INVALID")
            {
                Notice::CredentialRejected
            } else if *status == StatusCode::TOO_MANY_REQUESTS
                || body.contains("RESOURCE_EXHAUSTED")
            {
                Notice::RateLimited
            } else {
                Notice::NotFound
            }
        }
        ProviderError::Request { .. } => Notice::NotFound,
    }
}
