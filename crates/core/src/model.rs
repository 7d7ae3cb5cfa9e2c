use crate::error::InterviewError;
use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::collections::BTreeSet;

/// Models tried in order before falling back to any available one.
pub const PREFERRED_MODELS: &[&str] = &[
    "models/gemini-1.5-flash",
    "models/gemini-1.5-flash-latest",
    "models/gemini-1.5-pro",
    "models/gemini-1.5-pro-latest",
    "models/gemini-1.0-pro",
    "models/gemini-1.0-pro-001",
];

// A plain text-completion service. Implementations may be slow and may fail;
// callers get exactly one attempt per call with no retry or caching.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Picks the model to use from those that support content generation.
///
/// The first entry of `preferred` that is available wins. Otherwise the
/// lexicographically first available model is used.
pub fn select_model<S: AsRef<str>>(
    available: &BTreeSet<String>,
    preferred: &[S],
) -> Result<String, InterviewError> {
    if let Some(hit) = preferred
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| available.contains(*candidate))
    {
        return Ok(hit.to_string());
    }
    available
        .iter()
        .next()
        .cloned()
        .ok_or(InterviewError::ModelUnavailable)
}
