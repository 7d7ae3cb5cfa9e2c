use crate::config::{Config, Provider};
use crate::prompt_loader::prompts_from_dir;
use anyhow::{Context, Result};
use interview_core::gemini::GeminiClient;
use interview_core::offline::OfflineInterviewer;
use interview_core::{Interviewer, InterviewerClient};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Builds the interviewer for the configured provider. For Gemini this lists
/// the account's models and fails if none can generate content.
pub async fn build_interviewer(config: &Config) -> Result<Arc<dyn Interviewer>> {
    match config.provider {
        Provider::Offline => {
            tracing::info!("Using the offline interviewer; no model calls will be made");
            Ok(Arc::new(OfflineInterviewer))
        }
        Provider::Gemini => {
            let api_key = config
                .gemini_api_key
                .as_ref()
                .context("GEMINI_API_KEY must be set for 'gemini' provider")?;
            let prompts = prompts_from_dir(&config.prompts_dir)
                .context("Failed to load LLM prompts")?;
            let client = GeminiClient::connect(
                SecretString::from(api_key.expose_secret().to_owned()),
                &config.preferred_models(),
            )
            .await
            .context("Failed to select a Gemini model")?;
            Ok(Arc::new(InterviewerClient::new(client, prompts)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::{InterviewConfig, InterviewType, NextQuestion};

    #[tokio::test]
    async fn test_offline_provider_builds_without_network() {
        let config = Config::from_lookup(|key| match key {
            "INTERVIEW_PROVIDER" => Some("offline".to_string()),
            _ => None,
        })
        .unwrap();

        let interviewer = build_interviewer(&config).await.unwrap();
        let interview = InterviewConfig::new("Data Analyst", InterviewType::Technical, 3).unwrap();
        let next = interviewer.next_question(&interview, &[], 1).await.unwrap();
        assert!(matches!(next, NextQuestion::Ask(_)));
    }
}
