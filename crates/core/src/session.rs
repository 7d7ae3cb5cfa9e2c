use crate::error::InterviewError;
use crate::feedback::Feedback;
use crate::interview::{InterviewConfig, QaRecord};
use crate::interviewer::{Interviewer, NextQuestion};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;

const NO_ANSWERS_SUMMARY: &str =
    "No answers were recorded in this interview, so there is nothing to evaluate.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStatus::NotStarted => "not started",
            SessionStatus::InProgress => "in progress",
            SessionStatus::Finished => "finished",
        })
    }
}

/// One user's interview, from configuration to feedback.
///
/// Every user action maps to one method. A method either completes its
/// transition or returns an error and leaves the session as it found it, so
/// a failed model call can simply be retried. At most one model call is made
/// per transition.
#[derive(Debug)]
pub struct InterviewSession {
    config: InterviewConfig,
    status: SessionStatus,
    question_number: u32,
    current_question: String,
    history: Vec<QaRecord>,
    feedback: Option<Feedback>,
    question_started_at: Option<Instant>,
}

impl InterviewSession {
    pub fn new(config: InterviewConfig) -> Self {
        Self {
            config,
            status: SessionStatus::NotStarted,
            question_number: 0,
            current_question: String::new(),
            history: Vec::new(),
            feedback: None,
            question_started_at: None,
        }
    }

    pub fn config(&self) -> &InterviewConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Number of questions asked so far, including the one on screen.
    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    /// The question awaiting an answer, if the interview is in progress.
    pub fn current_question(&self) -> Option<&str> {
        match self.status {
            SessionStatus::InProgress => Some(&self.current_question),
            _ => None,
        }
    }

    pub fn history(&self) -> &[QaRecord] {
        &self.history
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Questions that were closed without an answer. Skips leave no record in
    /// the history, so this is the gap between asked and answered questions.
    pub fn skipped(&self) -> u32 {
        let closed = match self.status {
            SessionStatus::InProgress => self.question_number.saturating_sub(1),
            _ => self.question_number,
        };
        closed.saturating_sub(self.history.len() as u32)
    }

    /// Replaces the configuration. Only allowed before the interview starts.
    pub fn reconfigure(&mut self, config: InterviewConfig) -> Result<(), InterviewError> {
        self.require("reconfigure", SessionStatus::NotStarted)?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn require(&self, action: &'static str, status: SessionStatus) -> Result<(), InterviewError> {
        if self.status != status {
            return Err(InterviewError::IllegalTransition {
                action,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Asks for the first question and starts the answer timer.
    pub async fn start<I: Interviewer + ?Sized>(
        &mut self,
        interviewer: &I,
    ) -> Result<(), InterviewError> {
        self.require("start", SessionStatus::NotStarted)?;
        self.config.validate()?;

        let next = interviewer
            .next_question(&self.config, &self.history, 1)
            .await
            .map_err(InterviewError::ModelCall)?;

        tracing::info!(
            "Starting {} interview for '{}' with {} questions",
            self.config.interview_type,
            self.config.role,
            self.config.max_questions
        );
        match next {
            NextQuestion::Ask(question) => {
                self.status = SessionStatus::InProgress;
                self.ask(question);
            }
            NextQuestion::Complete => {
                tracing::warn!("Interviewer had no questions to ask; finishing immediately");
                self.finish();
            }
        }
        Ok(())
    }

    /// Records an answer to the current question and moves on.
    ///
    /// Blank answers are rejected without touching the session.
    pub async fn submit<I: Interviewer + ?Sized>(
        &mut self,
        interviewer: &I,
        answer: &str,
    ) -> Result<(), InterviewError> {
        self.require("submit an answer", SessionStatus::InProgress)?;
        if answer.trim().is_empty() {
            return Err(InterviewError::EmptyAnswer);
        }

        let elapsed = self.question_started_at.map(|t| t.elapsed());
        let record = QaRecord::new(self.current_question.clone(), answer, elapsed);
        tracing::debug!(
            "Answer to question {} recorded ({} words)",
            self.question_number,
            record.answer_word_count
        );
        self.advance(interviewer, Some(record)).await
    }

    /// Moves past the current question. Skipped questions are not recorded,
    /// so afterwards the history is shorter than `question_number`.
    pub async fn skip<I: Interviewer + ?Sized>(
        &mut self,
        interviewer: &I,
    ) -> Result<(), InterviewError> {
        self.require("skip a question", SessionStatus::InProgress)?;
        tracing::debug!("Question {} skipped", self.question_number);
        self.advance(interviewer, None).await
    }

    async fn advance<I: Interviewer + ?Sized>(
        &mut self,
        interviewer: &I,
        record: Option<QaRecord>,
    ) -> Result<(), InterviewError> {
        let answered = record.is_some();
        self.history.extend(record);

        if self.question_number >= self.config.max_questions {
            self.finish();
            return Ok(());
        }

        let next = interviewer
            .next_question(&self.config, &self.history, self.question_number + 1)
            .await;

        match next {
            Ok(NextQuestion::Ask(question)) => {
                self.question_number += 1;
                self.ask(question);
            }
            Ok(NextQuestion::Complete) => {
                tracing::info!(
                    "Interviewer ended the interview after {} of {} questions",
                    self.question_number,
                    self.config.max_questions
                );
                self.finish();
            }
            Err(e) => {
                if answered {
                    self.history.pop();
                }
                return Err(InterviewError::ModelCall(e));
            }
        }
        Ok(())
    }

    /// Produces the evaluation once and returns the stored value on every
    /// later call.
    ///
    /// A session where every question was skipped has nothing to evaluate:
    /// it gets a degenerate report without reaching the interviewer. A failed
    /// model call stores nothing, so the call can be retried.
    pub async fn generate_feedback<I: Interviewer + ?Sized>(
        &mut self,
        interviewer: &I,
    ) -> Result<&Feedback, InterviewError> {
        self.require("generate feedback", SessionStatus::Finished)?;

        let feedback = match self.feedback.take() {
            Some(feedback) => feedback,
            None if self.history.is_empty() => Feedback::degenerate(NO_ANSWERS_SUMMARY),
            None => {
                tracing::info!("Generating feedback over {} answers", self.history.len());
                interviewer
                    .synthesize_feedback(&self.config, &self.history)
                    .await
                    .map_err(InterviewError::ModelCall)?
            }
        };
        Ok(self.feedback.insert(feedback))
    }

    /// Clears everything but the configuration, from any state.
    pub fn restart(&mut self) {
        tracing::info!("Restarting interview (was {})", self.status);
        *self = Self::new(self.config.clone());
    }

    fn ask(&mut self, question: String) {
        if self.question_number == 0 {
            self.question_number = 1;
        }
        self.current_question = question;
        self.question_started_at = Some(Instant::now());
    }

    fn finish(&mut self) {
        tracing::info!(
            "Interview finished: {} answered, {} skipped",
            self.history.len(),
            self.question_number.saturating_sub(self.history.len() as u32)
        );
        self.status = SessionStatus::Finished;
        self.current_question.clear();
        self.question_started_at = None;
    }
}
