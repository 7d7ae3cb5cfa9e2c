use crate::feedback::{Feedback, MAX_SCORE, MIN_SCORE, Metric, Scores};
use crate::interview::{InterviewConfig, InterviewType, QaRecord};
use crate::interviewer::{Interviewer, NextQuestion};
use anyhow::Result;
use async_trait::async_trait;

const TECHNICAL_QUESTIONS: &[&str] = &[
    "Walk me through a recent {role} project you are proud of and the hardest technical decision in it.",
    "How would you find the bottleneck in a slow system you have never seen before?",
    "Explain a data structure you use often and when you would choose something else.",
    "How do you make sure the work you ship is correct?",
    "Describe how you would design a service that has to handle ten times today's load.",
    "Tell me about a bug that took you a long time to find. How did you track it down?",
];

const BEHAVIORAL_QUESTIONS: &[&str] = &[
    "Tell me about yourself and why you are interested in this {role} position.",
    "Describe a time you disagreed with a teammate. How did you resolve it?",
    "Tell me about a deadline you missed or nearly missed. What did you learn?",
    "Give an example of feedback you received that changed how you work.",
    "Describe a situation where you had to learn something new very quickly.",
    "Tell me about a time you took ownership of a problem nobody else wanted.",
];

/// Words per answer at which an answer counts as developed.
const DEVELOPED_ANSWER_WORDS: usize = 25;
/// Seconds within which a reply is considered prompt.
const PROMPT_REPLY_SECS: f64 = 90.0;

/// A deterministic interviewer that needs no model service. Questions come
/// from a fixed bank and feedback is scored from answer length and timing.
#[derive(Debug, Default, Clone)]
pub struct OfflineInterviewer;

impl OfflineInterviewer {
    fn question(config: &InterviewConfig, question_number: u32) -> String {
        let idx = (question_number.saturating_sub(1)) as usize;
        let bank_question = match config.interview_type {
            InterviewType::Technical => TECHNICAL_QUESTIONS[idx % TECHNICAL_QUESTIONS.len()],
            InterviewType::Behavioral => BEHAVIORAL_QUESTIONS[idx % BEHAVIORAL_QUESTIONS.len()],
            InterviewType::Mixed => {
                let bank = if idx % 2 == 0 {
                    BEHAVIORAL_QUESTIONS
                } else {
                    TECHNICAL_QUESTIONS
                };
                bank[(idx / 2) % bank.len()]
            }
        };
        bank_question.replace("{role}", &config.role)
    }
}

fn round1(v: f64) -> f64 {
    ((v * 10.0).round() / 10.0).clamp(MIN_SCORE, MAX_SCORE)
}

#[async_trait]
impl Interviewer for OfflineInterviewer {
    async fn next_question(
        &self,
        config: &InterviewConfig,
        _history: &[QaRecord],
        question_number: u32,
    ) -> Result<NextQuestion> {
        if question_number == 0 || question_number > config.max_questions {
            return Ok(NextQuestion::Complete);
        }
        Ok(NextQuestion::Ask(Self::question(config, question_number)))
    }

    async fn synthesize_feedback(
        &self,
        config: &InterviewConfig,
        history: &[QaRecord],
    ) -> Result<Feedback> {
        if history.is_empty() {
            return Ok(Feedback::degenerate(
                "No answers were recorded, so there is nothing to evaluate yet.",
            ));
        }

        let answered = history.len() as f64;
        let total_words: usize = history.iter().map(|r| r.answer_word_count).sum();
        let avg_words = total_words as f64 / answered;
        let developed = history
            .iter()
            .filter(|r| r.answer_word_count >= DEVELOPED_ANSWER_WORDS)
            .count() as f64
            / answered;
        let timed: Vec<f64> = history
            .iter()
            .filter_map(|r| r.response_time_seconds)
            .collect();
        let prompt_share = if timed.is_empty() {
            0.5
        } else {
            timed.iter().filter(|t| **t <= PROMPT_REPLY_SECS).count() as f64 / timed.len() as f64
        };

        let mut scores = Scores::default();
        scores.set(Metric::Communication, round1(3.0 + avg_words.min(60.0) / 10.0));
        scores.set(Metric::Structure, round1(3.0 + developed * 6.0));
        scores.set(Metric::Confidence, round1(4.0 + prompt_share * 5.0));
        if config.interview_type != InterviewType::Behavioral {
            scores.set(Metric::TechnicalDepth, round1(2.0 + developed * 5.0 + avg_words.min(80.0) / 40.0));
        }

        let mut strengths = Vec::new();
        let mut areas_to_improve = Vec::new();
        if developed >= 0.5 {
            strengths.push("Most answers were developed beyond a one-line reply.".to_string());
        } else {
            areas_to_improve.push(format!(
                "Aim for at least {DEVELOPED_ANSWER_WORDS} words per answer with a concrete example."
            ));
        }
        if prompt_share >= 0.5 {
            strengths.push("Responded promptly without long pauses.".to_string());
        } else {
            areas_to_improve.push("Take less time to start answering; outline first, then speak.".to_string());
        }
        areas_to_improve.push("Structure answers as situation, action, result.".to_string());

        Ok(Feedback {
            overall_summary: format!(
                "You answered {} question(s) for the {} role with an average of {:.0} words per answer.",
                history.len(),
                config.role,
                avg_words
            ),
            scores,
            strengths,
            areas_to_improve,
            next_practice_tasks: vec![
                format!("Run another {} session and time each answer.", config.interview_type),
                "Write down two stories from past work you can reuse in interviews.".to_string(),
            ],
            degenerate: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_mixed_interview_alternates_banks() {
        let config = InterviewConfig::new("Product Manager", InterviewType::Mixed, 4).unwrap();
        let interviewer = OfflineInterviewer;

        let first = interviewer.next_question(&config, &[], 1).await.unwrap();
        let second = interviewer.next_question(&config, &[], 2).await.unwrap();
        assert_eq!(
            first,
            NextQuestion::Ask(
                "Tell me about yourself and why you are interested in this Product Manager position."
                    .to_string()
            )
        );
        assert!(matches!(second, NextQuestion::Ask(q) if q.starts_with("Walk me through")));
    }

    #[tokio::test]
    async fn test_completes_after_limit() {
        let config = InterviewConfig::new("Sales Associate", InterviewType::Behavioral, 3).unwrap();
        let next = OfflineInterviewer.next_question(&config, &[], 4).await.unwrap();
        assert_eq!(next, NextQuestion::Complete);
    }

    #[tokio::test]
    async fn test_feedback_scores_are_in_range() {
        let config = InterviewConfig::new("Software Engineer", InterviewType::Technical, 2).unwrap();
        let long_answer = "word ".repeat(40);
        let history = vec![
            QaRecord::new("q1", &long_answer, Some(Duration::from_secs(30))),
            QaRecord::new("q2", "short", Some(Duration::from_secs(200))),
        ];
        let feedback = OfflineInterviewer
            .synthesize_feedback(&config, &history)
            .await
            .unwrap();

        assert!(!feedback.degenerate);
        assert_eq!(feedback.scores.iter().count(), 4);
        for (_, value) in feedback.scores.iter() {
            assert!((MIN_SCORE..=MAX_SCORE).contains(&value));
        }
        assert!(feedback.overall_summary.contains("2 question(s)"));
    }

    #[tokio::test]
    async fn test_behavioral_feedback_omits_technical_depth() {
        let config = InterviewConfig::new("Sales Associate", InterviewType::Behavioral, 1).unwrap();
        let history = vec![QaRecord::new("q", "I listened first.", None)];
        let feedback = OfflineInterviewer
            .synthesize_feedback(&config, &history)
            .await
            .unwrap();
        assert_eq!(feedback.scores.technical_depth, None);
        assert!(feedback.scores.communication.is_some());
    }
}
