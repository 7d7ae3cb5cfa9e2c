pub mod error;
pub mod feedback;
pub mod gemini;
pub mod interview;
pub mod interviewer;
pub mod model;
pub mod offline;
pub mod prompts;
pub mod session;

pub use error::InterviewError;
pub use feedback::{Feedback, Metric, Scores};
pub use interview::{InterviewConfig, InterviewType, QaRecord};
pub use interviewer::{Interviewer, InterviewerClient, NextQuestion};
pub use session::{InterviewSession, SessionStatus};
