use std::env;
use std::str::FromStr;

use clap::Args;
use tracing::debug;

use crate::config::{self, ProfileConfig};
use crate::pharmacy::{ClientConfig, Language, Provider};

/// Provider flags shared by `ask` and `lookup`.
#[derive(Debug, Args, Clone, Default)]
pub struct QueryArgs {
    #[arg(long, help = "Provider: gemini or openai (env: MC_PROVIDER)")]
    pub provider: Option<String>,
    #[arg(long, help = "Model id (env: MC_MODEL)")]
    pub model: Option<String>,
    #[arg(long, help = "Profile name from the config file")]
    pub profile: Option<String>,
    #[arg(long, help = "Response language: en or hi (env: MC_LANG)")]
    pub lang: Option<String>,
    #[arg(long, help = "Override the provider API base URL (env: MC_BASE_URL)")]
    pub base_url: Option<String>,
    #[arg(long, help = "Sampling temperature (env: MC_TEMPERATURE)")]
    pub temperature: Option<f32>,
    #[arg(long, help = "Maximum tokens in the reply")]
    pub max_tokens: Option<u32>,
    #[arg(long, help = "Request timeout in seconds (env: MC_TIMEOUT)")]
    pub timeout: Option<u64>,
    #[arg(long, help = "Print the provider request instead of sending it")]
    pub dry_run: bool,
    #[arg(long, help = "Shortcut for --output json")]
    pub json: bool,
    #[arg(long, value_parser = ["text", "json"], help = "Output format")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Settings after applying CLI > environment > profile > defaults.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub client: ClientConfig,
    pub language: Language,
    pub output: OutputMode,
    pub dry_run: bool,
}

fn env_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: FromStr>(key: &str) -> Result<Option<T>, String> {
    env_value(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| format!("Invalid {key} '{raw}'."))
        })
        .transpose()
}

pub(crate) fn resolve(args: &QueryArgs) -> Result<Resolved, String> {
    let profile = match args.profile.as_deref() {
        Some(name) => config::load_profile(name)?,
        None => ProfileConfig::default(),
    };

    let provider = match args.provider.as_deref() {
        Some(raw) => raw.parse::<Provider>()?,
        None => match env_value("MC_PROVIDER") {
            Some(raw) => raw.parse::<Provider>().map_err(|_| {
                format!("Invalid MC_PROVIDER '{raw}'. Supported values: gemini, openai.")
            })?,
            None => match profile.provider.as_deref() {
                Some(raw) => raw.parse::<Provider>()?,
                None => Provider::default(),
            },
        },
    };

    let language = match args.lang.as_deref() {
        Some(raw) => raw.parse::<Language>()?,
        None => match env_value("MC_LANG") {
            Some(raw) => raw.parse::<Language>().map_err(|_| {
                format!("Invalid MC_LANG '{raw}'. Supported values: en, hi.")
            })?,
            None => match profile.language.as_deref() {
                Some(raw) => raw.parse::<Language>()?,
                None => Language::default(),
            },
        },
    };

    let model = args
        .model
        .clone()
        .or_else(|| env_value("MC_MODEL"))
        .or(profile.model)
        .unwrap_or_else(|| provider.default_model().to_string());

    let base_url = args
        .base_url
        .clone()
        .or_else(|| env_value("MC_BASE_URL"))
        .or(profile.base_url);

    let temperature = match args.temperature {
        Some(value) => Some(value),
        None => env_parsed::<f32>("MC_TEMPERATURE")?.or(profile.temperature),
    };

    let timeout_secs = match args.timeout {
        Some(value) => Some(value),
        None => env_parsed::<u64>("MC_TIMEOUT")?.or(profile.timeout),
    };

    let max_tokens = args.max_tokens.or(profile.max_tokens);

    let output = if args.json {
        OutputMode::Json
    } else {
        match args.output.as_deref().or(profile.output.as_deref()) {
            Some("json") => OutputMode::Json,
            _ => OutputMode::Text,
        }
    };

    let api_key = env_value(provider.api_key_env());
    debug!(
        provider = %provider,
        model = %model,
        language = %language,
        api_key_present = api_key.is_some(),
        "resolved provider settings"
    );

    Ok(Resolved {
        client: ClientConfig {
            provider,
            model,
            api_key,
            base_url,
            temperature,
            max_tokens,
            timeout_secs,
        },
        language,
        output,
        dry_run: args.dry_run,
    })
}
