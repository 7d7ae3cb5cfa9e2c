use crate::interview::InterviewConfig;
use std::collections::HashMap;

/// Key of the question-generation prompt in a loaded prompt map.
pub const INTERVIEWER_KEY: &str = "interviewer";
/// Key of the feedback prompt in a loaded prompt map.
pub const FEEDBACK_KEY: &str = "feedback";

/// Marker the interviewer prompt asks the model to return once enough
/// questions have been asked.
pub const INTERVIEW_COMPLETE: &str = "INTERVIEW_COMPLETE";

const DEFAULT_INTERVIEWER_PROMPT: &str = r#"
You are a professional job interviewer.

- Role: {role}
- Interview type: {interview_type} (Technical / Behavioral / Mixed)

Ask exactly one interview question at a time. Build on the candidate's
previous answers with natural follow-ups, keep questions concise and
realistic, and never answer a question yourself.

The user data below contains the conversation history, the number of the
question you are about to ask and the maximum number of questions.

If question_number <= max_questions, return ONLY the text of the next question.
If question_number > max_questions, return exactly: INTERVIEW_COMPLETE
"#;

const DEFAULT_FEEDBACK_PROMPT: &str = r#"
You are an expert interview coach. You will be given the role, the interview
type, and every question asked together with the candidate's answer.

Score the candidate from 0 to 10 on communication, technical_depth,
structure and confidence, then write:
- overall_summary: 3-5 sentences
- strengths: 2-4 items
- areas_to_improve: 3-5 items
- next_practice_tasks: 2-4 specific practice suggestions

Return a single valid JSON object and nothing else, shaped like:
{
  "overall_summary": "...",
  "scores": {"communication": 7, "technical_depth": 6, "structure": 5, "confidence": 8},
  "strengths": ["..."],
  "areas_to_improve": ["..."],
  "next_practice_tasks": ["..."]
}
"#;

/// Prompt templates sent to the model service.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompts {
    pub interviewer: String,
    pub feedback: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            interviewer: DEFAULT_INTERVIEWER_PROMPT.to_string(),
            feedback: DEFAULT_FEEDBACK_PROMPT.to_string(),
        }
    }
}

impl Prompts {
    /// Takes overrides from a loaded prompt map, keeping the built-in text for
    /// any key that is absent.
    pub fn from_map(mut prompts: HashMap<String, String>) -> Self {
        let mut out = Self::default();
        if let Some(text) = prompts.remove(INTERVIEWER_KEY) {
            out.interviewer = text;
        }
        if let Some(text) = prompts.remove(FEEDBACK_KEY) {
            out.feedback = text;
        }
        for unused in prompts.keys() {
            tracing::warn!("Ignoring unknown prompt '{}'", unused);
        }
        out
    }

    /// Interviewer instructions with `{role}` and `{interview_type}` filled in.
    pub fn interviewer_for(&self, config: &InterviewConfig) -> String {
        self.interviewer
            .replace("{role}", &config.role)
            .replace("{interview_type}", config.interview_type.as_str())
    }

    pub fn feedback_for(&self, config: &InterviewConfig) -> String {
        self.feedback
            .replace("{role}", &config.role)
            .replace("{interview_type}", config.interview_type.as_str())
    }
}
