//! Plain-text rendering of the interview log and the feedback report.

use interview_core::feedback::Metric;
use interview_core::{Feedback, InterviewConfig, QaRecord};
use std::fmt::Write;

/// Characters of each question shown in the interview log.
const LOG_LABEL_CHARS: usize = 60;

pub fn render_question(number: u32, max: u32, question: &str) -> String {
    format!("\nQuestion {number}/{max}\n{question}\n> ")
}

/// The running log of answered questions.
pub fn render_log(history: &[QaRecord]) -> String {
    if history.is_empty() {
        return "Your answers will appear here as you progress.\n".to_string();
    }
    let mut out = String::from("Interview Log\n");
    for (idx, record) in history.iter().enumerate() {
        let label: String = record.question.chars().take(LOG_LABEL_CHARS).collect();
        let _ = writeln!(out, "Q{}: {}...", idx + 1, label);
        let _ = writeln!(out, "  Your answer: {}", record.answer);
        let _ = writeln!(
            out,
            "  Words: {}, Time: {:.1} sec",
            record.answer_word_count,
            record.response_time_seconds.unwrap_or(0.0)
        );
    }
    out
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "\n{title}");
    if items.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

/// The end-of-interview report. Degenerate feedback is shown as its raw text.
pub fn render_feedback(feedback: &Feedback, config: &InterviewConfig, answered: usize) -> String {
    if feedback.degenerate {
        return format!("Feedback\n\n{}\n", feedback.overall_summary);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Session Summary");
    let _ = writeln!(
        out,
        "Role: {} · Type: {} · Questions: {}",
        config.role, config.interview_type, answered
    );

    let _ = writeln!(out, "\nOverall Summary");
    if feedback.overall_summary.trim().is_empty() {
        let _ = writeln!(out, "Summary not available.");
    } else {
        let _ = writeln!(out, "{}", feedback.overall_summary);
    }

    let _ = writeln!(out, "\nScores");
    if feedback.scores.is_empty() {
        let _ = writeln!(out, "  Scores not available.");
    }
    for metric in Metric::ALL {
        if let Some(value) = feedback.scores.get(metric) {
            let _ = writeln!(out, "  {}: {:.1}/10", metric.label(), value);
        }
    }

    render_list(&mut out, "Strengths", &feedback.strengths);
    render_list(&mut out, "Areas to Improve", &feedback.areas_to_improve);
    render_list(&mut out, "Practice Plan", &feedback.next_practice_tasks);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::{InterviewType, Scores};
    use std::time::Duration;

    fn config() -> InterviewConfig {
        InterviewConfig::new("Software Engineer", InterviewType::Mixed, 5).unwrap()
    }

    #[test]
    fn test_log_truncates_questions_and_shows_stats() {
        let long_question = "x".repeat(80);
        let history = vec![
            QaRecord::new(long_question, "short answer here", Some(Duration::from_millis(4260))),
            QaRecord::new("Why?", "Because.", None),
        ];
        let log = render_log(&history);
        assert!(log.contains(&format!("Q1: {}...", "x".repeat(60))));
        assert!(!log.contains(&"x".repeat(61)));
        assert!(log.contains("Words: 3, Time: 4.3 sec"));
        assert!(log.contains("Q2: Why?..."));
        assert!(log.contains("Words: 1, Time: 0.0 sec"));
    }

    #[test]
    fn test_empty_log_has_placeholder() {
        assert!(render_log(&[]).contains("will appear here"));
    }

    #[test]
    fn test_feedback_report_lists_scores_in_order() {
        let mut scores = Scores::default();
        scores.confidence = Some(8.0);
        scores.communication = Some(7.5);
        let feedback = Feedback {
            overall_summary: "Clear and concise.".to_string(),
            scores,
            strengths: vec!["Clarity".to_string()],
            ..Default::default()
        };

        let report = render_feedback(&feedback, &config(), 4);
        assert!(report.contains("Role: Software Engineer · Type: Mixed · Questions: 4"));
        assert!(report.contains("Clear and concise."));
        let comm = report.find("Communication: 7.5/10").unwrap();
        let conf = report.find("Confidence: 8.0/10").unwrap();
        assert!(comm < conf);
        assert!(!report.contains("Technical Depth"));
        assert!(report.contains("  - Clarity"));
        assert!(report.contains("Areas to Improve\n  (none)"));
    }

    #[test]
    fn test_empty_structured_feedback_shows_placeholders() {
        let report = render_feedback(&Feedback::default(), &config(), 0);
        assert!(report.contains("Summary not available."));
        assert!(report.contains("Scores not available."));
    }

    #[test]
    fn test_degenerate_feedback_is_raw_text_only() {
        let report = render_feedback(&Feedback::degenerate("Model said things."), &config(), 2);
        assert_eq!(report, "Feedback\n\nModel said things.\n");
    }
}
