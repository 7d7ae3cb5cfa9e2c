use crate::session::SessionStatus;

/// Failures surfaced by interview sessions and model selection.
///
/// Malformed feedback is not an error; [`crate::feedback::parse_feedback`]
/// always yields a renderable value.
#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error("no model supporting content generation is available")]
    ModelUnavailable,
    #[error("model call failed: {0:#}")]
    ModelCall(#[source] anyhow::Error),
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("cannot {action} while the interview is {status}")]
    IllegalTransition {
        action: &'static str,
        status: SessionStatus,
    },
    #[error("invalid interview configuration: {0}")]
    InvalidConfig(String),
}
