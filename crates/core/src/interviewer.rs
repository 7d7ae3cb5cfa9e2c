use crate::feedback::{Feedback, ParsedFeedback, parse_feedback};
use crate::interview::{InterviewConfig, InterviewType, QaRecord};
use crate::model::ModelService;
use crate::prompts::{INTERVIEW_COMPLETE, Prompts};
use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

/// What the interviewer wants to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum NextQuestion {
    Ask(String),
    Complete,
}

// The two model-backed operations an interview session depends on. Sessions
// are generic over this trait so they can run against Gemini, the offline
// interviewer, or a mock in tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Interviewer: Send + Sync {
    /// Produces question `question_number` (1-based) or signals completion.
    /// Never mutates `history`.
    async fn next_question(
        &self,
        config: &InterviewConfig,
        history: &[QaRecord],
        question_number: u32,
    ) -> Result<NextQuestion>;

    /// Evaluates the whole interview. Unparseable model output yields a
    /// degenerate report instead of an error.
    async fn synthesize_feedback(
        &self,
        config: &InterviewConfig,
        history: &[QaRecord],
    ) -> Result<Feedback>;
}

#[derive(Serialize)]
struct QuestionRequest<'a> {
    history: &'a [QaRecord],
    question_number: u32,
    max_questions: u32,
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    role: &'a str,
    interview_type: InterviewType,
    history: &'a [QaRecord],
}

/// An [`Interviewer`] that turns each operation into one prompt for a
/// [`ModelService`].
pub struct InterviewerClient<M> {
    model: M,
    prompts: Prompts,
}

impl<M: ModelService> InterviewerClient<M> {
    pub fn new(model: M, prompts: Prompts) -> Self {
        Self { model, prompts }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

fn with_user_data<T: Serialize>(instructions: &str, data: &T) -> Result<String> {
    let user_data = serde_json::to_string(data).context("Failed to serialize prompt data")?;
    Ok(format!("{instructions}\n\nUser Data:\n{user_data}"))
}

/// Interprets the model's reply to a question request.
pub fn parse_question(text: &str) -> Result<NextQuestion> {
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Model returned an empty question");
    }
    let bare = text.trim_matches(|c: char| !c.is_alphanumeric() && c != '_');
    if bare == INTERVIEW_COMPLETE {
        return Ok(NextQuestion::Complete);
    }
    Ok(NextQuestion::Ask(text.to_string()))
}

#[async_trait]
impl<M: ModelService> Interviewer for InterviewerClient<M> {
    async fn next_question(
        &self,
        config: &InterviewConfig,
        history: &[QaRecord],
        question_number: u32,
    ) -> Result<NextQuestion> {
        if question_number > config.max_questions {
            return Ok(NextQuestion::Complete);
        }

        let prompt = with_user_data(
            &self.prompts.interviewer_for(config),
            &QuestionRequest {
                history,
                question_number,
                max_questions: config.max_questions,
            },
        )?;

        tracing::debug!("Requesting question {}/{}", question_number, config.max_questions);
        let text = self
            .model
            .complete(&prompt)
            .await
            .context("Model failed to produce the next question")?;
        parse_question(&text)
    }

    async fn synthesize_feedback(
        &self,
        config: &InterviewConfig,
        history: &[QaRecord],
    ) -> Result<Feedback> {
        let prompt = with_user_data(
            &self.prompts.feedback_for(config),
            &FeedbackRequest {
                role: &config.role,
                interview_type: config.interview_type,
                history,
            },
        )?;

        tracing::debug!("Requesting feedback over {} answers", history.len());
        let raw = self
            .model
            .complete(&prompt)
            .await
            .context("Model failed to produce feedback")?;

        match parse_feedback(raw.trim()) {
            ParsedFeedback::Structured(feedback) => Ok(feedback),
            ParsedFeedback::Degenerate(text) => {
                tracing::warn!("Feedback response was not JSON; passing raw text through");
                Ok(Feedback::degenerate(text))
            }
        }
    }
}
