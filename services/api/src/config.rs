use interview_service::config::{Config, ConfigError};
use std::net::SocketAddr;
use std::time::Duration;

/// Holds all configuration loaded from the environment at startup.
#[derive(Debug)]
pub struct ApiConfig {
    pub bind_address: SocketAddr,
    pub session_idle_timeout: Duration,
    pub interviewer: Config,
}

impl ApiConfig {
    /// Loads configuration from environment variables.
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:3000".
    /// *   `SESSION_IDLE_TIMEOUT_SECS`: (Optional) Seconds before an untouched session is dropped. Defaults to 3600.
    ///
    /// Everything else (`INTERVIEW_PROVIDER`, `GEMINI_API_KEY`, `GEMINI_MODEL`,
    /// `PROMPTS_DIR`, `RUST_LOG`) is shared with the terminal interviewer.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let idle_str =
            lookup("SESSION_IDLE_TIMEOUT_SECS").unwrap_or_else(|| "3600".to_string());
        let idle_secs = idle_str
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SESSION_IDLE_TIMEOUT_SECS".to_string(),
                    format!("'{idle_str}' is not a positive number of seconds"),
                )
            })?;

        Ok(Self {
            bind_address,
            session_idle_timeout: Duration::from_secs(idle_secs),
            interviewer: Config::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_bind_address() {
        let config = ApiConfig::from_lookup(|key| match key {
            "INTERVIEW_PROVIDER" => Some("offline".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.session_idle_timeout, Duration::from_secs(3600));
    }

    #[test]
    fn test_rejects_zero_idle_timeout() {
        let result = ApiConfig::from_lookup(|key| match key {
            "INTERVIEW_PROVIDER" => Some("offline".to_string()),
            "SESSION_IDLE_TIMEOUT_SECS" => Some("0".to_string()),
            _ => None,
        });
        assert!(
            matches!(result, Err(ConfigError::InvalidValue(var, _)) if var == "SESSION_IDLE_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let result = ApiConfig::from_lookup(|key| match key {
            "INTERVIEW_PROVIDER" => Some("offline".to_string()),
            "BIND_ADDRESS" => Some("not-an-address".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(var, _)) if var == "BIND_ADDRESS"));
    }
}
