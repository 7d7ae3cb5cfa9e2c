use crate::model::{ModelService, select_model};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::BTreeSet;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const GENERATE_CONTENT: &str = "generateContent";
const LIST_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Result<String> {
        let content = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .ok_or_else(|| anyhow::anyhow!("No response from model"))?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Ok(text)
    }
}

/// Text-completion client for the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Lists the account's models and keeps the first supported one from
    /// `preferred`, falling back to any model that can generate content.
    pub async fn connect<S: AsRef<str>>(api_key: SecretString, preferred: &[S]) -> Result<Self> {
        let mut client = Self::new(api_key, String::new());
        let available = client
            .list_generation_models()
            .await
            .context("Failed to list Gemini models")?;
        tracing::debug!("Models supporting {}: {:?}", GENERATE_CONTENT, available);
        client.model = select_model(&available, preferred)?;
        tracing::info!("Using model: {}", client.model);
        Ok(client)
    }

    /// Names of all models that support content generation.
    pub async fn list_generation_models(&self) -> Result<BTreeSet<String>> {
        let mut available = BTreeSet::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .header("x-goog-api-key", self.api_key.expose_secret())
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page = request
                .send()
                .await?
                .error_for_status()?
                .json::<ModelList>()
                .await?;

            available.extend(
                page.models
                    .into_iter()
                    .filter(ModelInfo::supports_generation)
                    .map(|m| m.name),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(available)
    }
}

#[async_trait]
impl ModelService for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/{}:{}", self.base_url, self.model, GENERATE_CONTENT))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Gemini rejected request for {}", self.model))?
            .json::<GenerateResponse>()
            .await?;

        resp.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_model_list_filters_generation_support() {
        let json = r#"{
            "models": [
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]},
                {"name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/bare"}
            ],
            "nextPageToken": "abc"
        }"#;
        let list: ModelList = serde_json::from_str(json).unwrap();
        let names: Vec<_> = list
            .models
            .iter()
            .filter(|m| m.supports_generation())
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["models/gemini-1.5-flash"]);
        assert_eq!(list.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_generate_response_joins_parts() {
        let json = r#"{"candidates": [{"content": {"parts": [{"text": "Tell me "}, {"text": "about yourself."}]}}]}"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text().unwrap(), "Tell me about yourself.");
    }

    #[test]
    fn test_generate_response_without_candidates_is_error() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert!(resp.text().is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new(SecretString::from("key".to_string()), "models/x")
            .with_base_url("http://localhost:8080/v1beta/");
        assert_eq!(client.base_url, "http://localhost:8080/v1beta");
        assert_eq!(client.model(), "models/x");
    }

    // Live call against the Gemini API. Run with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_connect_and_complete() {
        dotenvy::dotenv_override().ok();
        let api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY not set");
        let client = GeminiClient::connect(SecretString::from(api_key), crate::model::PREFERRED_MODELS)
            .await
            .expect("model selection should succeed");
        let text = client
            .complete("Reply with the single word: ready")
            .await
            .expect("completion should succeed");
        assert!(!text.trim().is_empty());
    }
}
