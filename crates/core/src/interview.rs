use crate::error::InterviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The flavour of interview the model is asked to conduct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewType {
    Technical,
    Behavioral,
    Mixed,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" | "behavioural" => Ok(InterviewType::Behavioral),
            "mixed" => Ok(InterviewType::Mixed),
            other => Err(InterviewError::InvalidConfig(format!(
                "unknown interview type '{other}' (expected technical, behavioral or mixed)"
            ))),
        }
    }
}

/// Settings chosen before an interview starts. A session never mutates these
/// once it has left the not-started state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub role: String,
    pub interview_type: InterviewType,
    pub max_questions: u32,
}

impl InterviewConfig {
    pub fn new(
        role: impl Into<String>,
        interview_type: InterviewType,
        max_questions: u32,
    ) -> Result<Self, InterviewError> {
        let config = Self {
            role: role.into(),
            interview_type,
            max_questions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that deserialized configs bypass.
    pub fn validate(&self) -> Result<(), InterviewError> {
        if self.max_questions == 0 {
            return Err(InterviewError::InvalidConfig(
                "max_questions must be at least 1".to_string(),
            ));
        }
        if self.role.trim().is_empty() {
            return Err(InterviewError::InvalidConfig(
                "role must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// One answered question. Skipped questions never produce a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub answer_word_count: usize,
    pub response_time_seconds: Option<f64>,
}

impl QaRecord {
    /// Builds a record from raw answer input. The stored answer is trimmed and
    /// the word count is taken over whitespace-separated tokens.
    pub fn new(question: impl Into<String>, answer: &str, response_time: Option<Duration>) -> Self {
        let answer = answer.trim();
        Self {
            question: question.into(),
            answer: answer.to_string(),
            answer_word_count: answer.split_whitespace().count(),
            response_time_seconds: response_time.map(|d| d.as_secs_f64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_trims_and_counts_words() {
        let record = QaRecord::new(
            "Why hash maps?",
            "  I would use a hash map.\n",
            Some(Duration::from_millis(2500)),
        );
        assert_eq!(record.answer, "I would use a hash map.");
        assert_eq!(record.answer_word_count, 6);
        assert_eq!(record.response_time_seconds, Some(2.5));
    }

    #[test]
    fn test_record_counts_tabs_and_newlines_as_separators() {
        let record = QaRecord::new("q", "one\ttwo\n\nthree", None);
        assert_eq!(record.answer_word_count, 3);
        assert_eq!(record.response_time_seconds, None);
    }

    #[test]
    fn test_config_rejects_zero_questions() {
        let result = InterviewConfig::new("Software Engineer", InterviewType::Technical, 0);
        assert!(matches!(result, Err(InterviewError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_blank_role() {
        let result = InterviewConfig::new("   ", InterviewType::Mixed, 3);
        assert!(matches!(result, Err(InterviewError::InvalidConfig(_))));
    }

    #[test]
    fn test_interview_type_parses_case_insensitively() {
        assert_eq!("TECHNICAL".parse::<InterviewType>().ok(), Some(InterviewType::Technical));
        assert_eq!("behavioural".parse::<InterviewType>().ok(), Some(InterviewType::Behavioral));
        assert_eq!(" mixed ".parse::<InterviewType>().ok(), Some(InterviewType::Mixed));
        assert!("panel".parse::<InterviewType>().is_err());
    }
}
