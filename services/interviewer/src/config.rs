//! Application Configuration Module
//!
//! Loads the interviewer settings from environment variables (and an
//! optional `.env` file) into a single struct shared by the terminal and
//! HTTP front ends.

use interview_core::model::PREFERRED_MODELS;
use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use tracing::Level;

/// Directory searched for prompt overrides when `PROMPTS_DIR` is unset.
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

#[derive(Debug, Clone, PartialEq)]
pub enum Provider {
    Gemini,
    Offline,
}

/// Holds all configuration loaded from the environment.
#[derive(Debug)]
pub struct Config {
    pub provider: Provider,
    pub gemini_api_key: Option<SecretString>,
    pub preferred_model: Option<String>,
    pub prompts_dir: PathBuf,
    pub log_level: Level,
}

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// *   `INTERVIEW_PROVIDER`: "gemini" or "offline". Defaults to "gemini"; anything else is rejected.
    /// *   `GEMINI_API_KEY`: Required if provider is "gemini".
    /// *   `GEMINI_MODEL`: (Optional) Model tried before the built-in preference list.
    /// *   `PROMPTS_DIR`: (Optional) Directory of `*.md` prompt overrides. Defaults to "prompts".
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file. This is useful for local development and is ignored if not present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider_str = lookup("INTERVIEW_PROVIDER").unwrap_or_else(|| "gemini".to_string());
        let provider = match provider_str.trim().to_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            "offline" => Provider::Offline,
            other => {
                return Err(ConfigError::InvalidValue(
                    "INTERVIEW_PROVIDER".to_string(),
                    format!("'{other}' is not one of: gemini, offline"),
                ));
            }
        };

        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);
        let preferred_model = lookup("GEMINI_MODEL")
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .map(|m| {
                if m.starts_with("models/") {
                    m
                } else {
                    format!("models/{m}")
                }
            });

        let prompts_dir = lookup("PROMPTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPTS_DIR));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // Validate that the required API key is present for the selected provider.
        if provider == Provider::Gemini && gemini_api_key.is_none() {
            return Err(ConfigError::MissingVar(
                "GEMINI_API_KEY must be set for 'gemini' provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            gemini_api_key,
            preferred_model,
            prompts_dir,
            log_level,
        })
    }

    /// Model names in the order they should be tried.
    pub fn preferred_models(&self) -> Vec<String> {
        self.preferred_model
            .iter()
            .cloned()
            .chain(PREFERRED_MODELS.iter().map(|m| m.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let result = Config::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn test_offline_needs_no_key() {
        let config = Config::from_lookup(lookup(&[("INTERVIEW_PROVIDER", "Offline")])).unwrap();
        assert_eq!(config.provider, Provider::Offline);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.prompts_dir, PathBuf::from(DEFAULT_PROMPTS_DIR));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("INTERVIEW_PROVIDER", "gemnii"),
            ("GEMINI_API_KEY", "secret"),
        ]));
        assert!(
            matches!(result, Err(ConfigError::InvalidValue(var, _)) if var == "INTERVIEW_PROVIDER")
        );
    }

    #[test]
    fn test_configured_model_goes_first() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ]))
        .unwrap();
        let models = config.preferred_models();
        assert_eq!(models[0], "models/gemini-2.0-flash");
        assert_eq!(models.len(), PREFERRED_MODELS.len() + 1);
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("INTERVIEW_PROVIDER", "offline"),
            ("RUST_LOG", "chatty"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"));
    }

    #[test]
    fn test_api_key_is_redacted_in_debug_output() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "top-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
