use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used for model responses and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Hindi, written in Devanagari script.
    Hi,
}

/// Fixed user-facing sentences, available in every [`Language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The model answered without any text.
    NoReply,
    /// Transport-level failure while chatting.
    ConnectionError,
    /// No provider credential configured.
    NotConfigured,
    /// The provider refused the configured credential.
    CredentialRejected,
    /// The provider is throttling requests.
    RateLimited,
    /// Lookup failed for any other provider reason.
    NotFound,
    /// The provider returned no text for a lookup.
    EmptyRecord,
    /// The provider returned text that is not a medicine record.
    InvalidFormat,
    /// Shown under every medicine record.
    Disclaimer,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Human name used inside prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hindi",
        }
    }

    /// Sentence appended to the chat directive to pin the reply language.
    pub fn reply_rule(self) -> &'static str {
        match self {
            Self::En => "Respond ONLY in English.",
            Self::Hi => "Respond ONLY in Hindi (Devanagari script).",
        }
    }

    pub fn notice(self, notice: Notice) -> &'static str {
        match (self, notice) {
            (Self::En, Notice::NoReply) => "I'm sorry, I couldn't generate a response.",
            (Self::Hi, Notice::NoReply) => "क्षमा करें, मैं अभी जवाब नहीं दे पा रहा हूँ।",
            (Self::En, Notice::ConnectionError) => {
                "Connection error. Please check your internet and try again."
            }
            (Self::Hi, Notice::ConnectionError) => "कनेक्शन एरर। कृपया बाद में प्रयास करें।",
            (Self::En, Notice::NotConfigured) => {
                "The AI assistant is not configured yet. Please set an API key and try again."
            }
            (Self::Hi, Notice::NotConfigured) => {
                "AI सहायक अभी कॉन्फ़िगर नहीं है। कृपया API की सेट करें और दोबारा प्रयास करें।"
            }
            (Self::En, Notice::CredentialRejected) => {
                "API Key error. Please verify integration."
            }
            (Self::Hi, Notice::CredentialRejected) => "API की समस्या। कृपया एडमिन से संपर्क करें।",
            (Self::En, Notice::RateLimited) => {
                "The medical database is busy right now. Please try again in a moment."
            }
            (Self::Hi, Notice::RateLimited) => {
                "मेडिकल डेटाबेस अभी व्यस्त है। कृपया थोड़ी देर बाद प्रयास करें।"
            }
            (Self::En, Notice::NotFound) => "Medicine not found in database. Check spelling.",
            (Self::Hi, Notice::NotFound) => {
                "दवाई की जानकारी नहीं मिली। कृपया नाम दोबारा चेक करें।"
            }
            (Self::En, Notice::EmptyRecord) => "Empty response from medical database.",
            (Self::Hi, Notice::EmptyRecord) => "मेडिकल डेटाबेस से कोई जवाब नहीं मिला।",
            (Self::En, Notice::InvalidFormat) => {
                "Invalid response format. Please try searching again."
            }
            (Self::Hi, Notice::InvalidFormat) => {
                "जवाब का फ़ॉर्मेट सही नहीं है। कृपया दोबारा खोजें।"
            }
            (Self::En, Notice::Disclaimer) => "Always consult a qualified doctor before medication.",
            (Self::Hi, Notice::Disclaimer) => "दवाई लेने से पहले हमेशा डॉक्टर से सलाह लें।",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "hi" | "hindi" => Ok(Self::Hi),
            other => Err(format!(
                "Unsupported language '{other}'. Supported values: en, hi."
            )),
        }
    }
}
