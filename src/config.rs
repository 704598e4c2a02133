use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::pharmacy::{Language, Provider};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProfileConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<u64>,
    pub output: Option<String>,
}

/// `[pharmacy]` section: settings of the order form.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PharmacyConfig {
    pub whatsapp_number: Option<String>,
    pub default_address: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    profiles: Option<HashMap<String, ProfileConfig>>,
    pharmacy: Option<PharmacyConfig>,
}

pub fn load_profile(name: &str) -> Result<ProfileConfig, String> {
    let path = config_path()?;
    let config = read_config(&path)?;

    let profiles = config.profiles.ok_or_else(|| {
        format!(
            "Config file '{}' does not contain a [profiles] section.",
            path.display()
        )
    })?;

    let profile = profiles.get(name).cloned().ok_or_else(|| {
        format!(
            "Profile '{}' not found in config file '{}'.",
            name,
            path.display()
        )
    })?;
    validate_profile(name, &profile)?;
    Ok(profile)
}

/// Reads the `[pharmacy]` section. A missing config file, or no resolvable
/// config location at all, is not an error.
pub fn load_pharmacy() -> Result<PharmacyConfig, String> {
    let Ok(path) = config_path() else {
        debug!("no config location resolvable; using pharmacy defaults");
        return Ok(PharmacyConfig::default());
    };
    if let Err(err) = fs::metadata(&path) {
        if err.kind() == io::ErrorKind::NotFound {
            return Ok(PharmacyConfig::default());
        }
    }
    Ok(read_config(&path)?.pharmacy.unwrap_or_default())
}

/// Outcome of a successful `validate_config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    pub path: PathBuf,
    /// Names of the validated profiles, sorted.
    pub profiles: Vec<String>,
    pub whatsapp_number: Option<String>,
}

/// Parses the config file and checks every profile (or only `profile`).
pub fn validate_config(profile: Option<&str>) -> Result<ConfigReport, String> {
    let path = config_path()?;
    let config = read_config(&path)?;
    let profiles = config.profiles.unwrap_or_default();

    match profile {
        Some(name) => {
            let selected = profiles.get(name).ok_or_else(|| {
                format!(
                    "Profile '{}' not found in config file '{}'.",
                    name,
                    path.display()
                )
            })?;
            validate_profile(name, selected)?;
        }
        None => {
            let mut names = profiles.keys().collect::<Vec<_>>();
            names.sort();
            for name in names {
                validate_profile(name, &profiles[name])?;
            }
        }
    }

    let whatsapp_number = config
        .pharmacy
        .and_then(|pharmacy| pharmacy.whatsapp_number)
        .map(|number| {
            crate::pharmacy::order::normalize_recipient(&number)
                .map_err(|err| format!("Invalid [pharmacy] whatsapp_number: {err}"))
        })
        .transpose()?;

    let mut names = match profile {
        Some(name) => vec![name.to_string()],
        None => profiles.into_keys().collect::<Vec<_>>(),
    };
    names.sort();

    Ok(ConfigReport {
        path,
        profiles: names,
        whatsapp_number,
    })
}

fn validate_profile(name: &str, profile: &ProfileConfig) -> Result<(), String> {
    if let Some(provider) = profile.provider.as_deref() {
        provider.parse::<Provider>().map_err(|_| {
            format!(
                "Invalid profile provider '{provider}' in profile '{name}'. Supported values: gemini, openai."
            )
        })?;
    }
    if let Some(language) = profile.language.as_deref() {
        language.parse::<Language>().map_err(|_| {
            format!(
                "Invalid profile language '{language}' in profile '{name}'. Supported values: en, hi."
            )
        })?;
    }
    if let Some(output) = profile.output.as_deref() {
        if !matches!(output, "text" | "json") {
            return Err(format!(
                "Invalid profile output '{output}' in profile '{name}'. Supported values: text, json."
            ));
        }
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config file '{}': {err}", path.display()))?;

    toml::from_str(&raw)
        .map_err(|err| format!("Failed to parse config file '{}': {err}", path.display()))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Location of the config file, whether or not it exists.
pub fn config_path() -> Result<PathBuf, String> {
    if let Some(path) = non_empty_env("MC_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Some(xdg) = non_empty_env("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("medcenter").join("config.toml"));
    }

    let home = env::var("HOME").map_err(|_| {
        "Cannot resolve config path: set MC_CONFIG or HOME/XDG_CONFIG_HOME.".to_string()
    })?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("medcenter")
        .join("config.toml"))
}

/// Directory holding local state such as the reminder list.
pub fn data_dir() -> Result<PathBuf, String> {
    if let Some(path) = non_empty_env("MC_DATA_DIR") {
        return Ok(PathBuf::from(path));
    }

    if let Some(xdg) = non_empty_env("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg).join("medcenter"));
    }

    let home = env::var("HOME").map_err(|_| {
        "Cannot resolve data directory: set MC_DATA_DIR or HOME/XDG_DATA_HOME.".to_string()
    })?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("medcenter"))
}

#[cfg(test)]
mod tests {
    use super::{ProfileConfig, validate_profile};

    #[test]
    fn known_values_pass_validation() {
        let profile = ProfileConfig {
            provider: Some("openai".to_string()),
            language: Some("hi".to_string()),
            output: Some("json".to_string()),
            ..ProfileConfig::default()
        };
        assert!(validate_profile("p", &profile).is_ok());
    }

    #[test]
    fn unknown_values_are_reported_with_profile_name() {
        let profile = ProfileConfig {
            output: Some("yaml".to_string()),
            ..ProfileConfig::default()
        };
        let err = validate_profile("bad", &profile).expect_err("yaml is not an output");
        assert!(err.contains("Invalid profile output 'yaml'"));
        assert!(err.contains("'bad'"));
    }
}
