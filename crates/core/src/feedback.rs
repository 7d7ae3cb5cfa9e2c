//! End-of-interview evaluation and the repair ladder that turns untrusted
//! model output into a renderable [`Feedback`].
//!
//! The model is asked for a JSON object, but it may wrap the object in prose
//! or code fences, mistype scores, or ignore the format entirely. Parsing is
//! attempted in order:
//!
//! 1. the whole response as a JSON object,
//! 2. the substring from the first `{` to the last `}`,
//! 3. otherwise the raw text becomes the summary of a degenerate report.
//!
//! None of these steps fail.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// The four sub-scores the feedback prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Communication,
    TechnicalDepth,
    Structure,
    Confidence,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Communication,
        Metric::TechnicalDepth,
        Metric::Structure,
        Metric::Confidence,
    ];

    /// JSON key used by the model.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Communication => "communication",
            Metric::TechnicalDepth => "technical_depth",
            Metric::Structure => "structure",
            Metric::Confidence => "confidence",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Communication => "Communication",
            Metric::TechnicalDepth => "Technical Depth",
            Metric::Structure => "Structure",
            Metric::Confidence => "Confidence",
        }
    }
}

/// Sub-scores in `[0, 10]`. A metric the model left out stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Scores {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Communication => self.communication,
            Metric::TechnicalDepth => self.technical_depth,
            Metric::Structure => self.structure,
            Metric::Confidence => self.confidence,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Communication => &mut self.communication,
            Metric::TechnicalDepth => &mut self.technical_depth,
            Metric::Structure => &mut self.structure,
            Metric::Confidence => &mut self.confidence,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| self.get(*m).is_none())
    }

    /// Present scores in fixed metric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(|m| self.get(m).map(|v| (m, v)))
    }

    fn from_value(value: &Value) -> Self {
        let mut scores = Scores::default();
        let Some(map) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!("Ignoring non-object scores in feedback: {}", value);
            }
            return scores;
        };
        for metric in Metric::ALL {
            if let Some(raw) = map.get(metric.key()) {
                scores.set(metric, coerce_score(metric, raw));
            }
        }
        scores
    }
}

/// Structured evaluation of a finished interview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub overall_summary: String,
    pub scores: Scores,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub next_practice_tasks: Vec<String>,
    /// Set when the model response could not be parsed and `overall_summary`
    /// holds the raw text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degenerate: bool,
}

impl Feedback {
    /// A report carrying only the given text.
    pub fn degenerate(raw_text: impl Into<String>) -> Self {
        Self {
            overall_summary: raw_text.into(),
            degenerate: true,
            ..Default::default()
        }
    }

    /// Normalizes an arbitrary JSON object into the canonical shape. Missing
    /// keys become empty values, list items that are not strings are
    /// stringified.
    pub fn from_object(map: &Map<String, Value>) -> Self {
        Self {
            overall_summary: map.get("overall_summary").map(text_of).unwrap_or_default(),
            scores: map
                .get("scores")
                .map(Scores::from_value)
                .unwrap_or_default(),
            strengths: list_of(map.get("strengths")),
            areas_to_improve: list_of(map.get("areas_to_improve")),
            next_practice_tasks: list_of(map.get("next_practice_tasks")),
            degenerate: false,
        }
    }
}

/// Outcome of running the repair ladder on a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFeedback {
    Structured(Feedback),
    Degenerate(String),
}

impl From<ParsedFeedback> for Feedback {
    fn from(parsed: ParsedFeedback) -> Self {
        match parsed {
            ParsedFeedback::Structured(feedback) => feedback,
            ParsedFeedback::Degenerate(raw) => Feedback::degenerate(raw),
        }
    }
}

/// Runs the repair ladder over a raw model response.
pub fn parse_feedback(raw: &str) -> ParsedFeedback {
    if let Some(map) = parse_object(raw.trim()) {
        return ParsedFeedback::Structured(Feedback::from_object(&map));
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Some(map) = parse_object(&raw[start..=end]) {
                tracing::debug!("Recovered feedback JSON embedded in surrounding text");
                return ParsedFeedback::Structured(Feedback::from_object(&map));
            }
        }
    }

    ParsedFeedback::Degenerate(raw.to_string())
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Coerces a score to a float in `[0, 10]`. Unusable values become 0.
fn coerce_score(metric: Metric, value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let score = match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            tracing::warn!(
                "Non-numeric score for {}: {}; using {}",
                metric.key(),
                value,
                MIN_SCORE
            );
            return MIN_SCORE;
        }
    };
    let clamped = score.clamp(MIN_SCORE, MAX_SCORE);
    if clamped != score {
        tracing::warn!(
            "Score for {} out of range ({}); clamped to {}",
            metric.key(),
            score,
            clamped
        );
    }
    clamped
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn list_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(text_of)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(raw: &str) -> Feedback {
        match parse_feedback(raw) {
            ParsedFeedback::Structured(feedback) => feedback,
            ParsedFeedback::Degenerate(text) => panic!("expected structured feedback, got raw: {text}"),
        }
    }

    #[test]
    fn test_parses_clean_json() {
        let raw = r#"{
            "overall_summary": "Solid answers.",
            "scores": {"communication": 7, "technical_depth": 6, "structure": 5, "confidence": 8},
            "strengths": ["Clear"],
            "areas_to_improve": ["Depth", "Examples"],
            "next_practice_tasks": ["Mock system design"]
        }"#;
        let feedback = structured(raw);
        assert_eq!(feedback.overall_summary, "Solid answers.");
        assert_eq!(feedback.scores.technical_depth, Some(6.0));
        assert_eq!(feedback.scores.confidence, Some(8.0));
        assert_eq!(feedback.areas_to_improve.len(), 2);
        assert!(!feedback.degenerate);
    }

    #[test]
    fn test_extracts_json_wrapped_in_prose() {
        let raw = "Here you go:\n{\"overall_summary\":\"ok\",\"scores\":{\"communication\":7},\"strengths\":[],\"areas_to_improve\":[],\"next_practice_tasks\":[]}\nThanks!";
        let feedback = structured(raw);
        assert_eq!(feedback.overall_summary, "ok");
        assert_eq!(feedback.scores.communication, Some(7.0));
        assert_eq!(feedback.scores.structure, None);
    }

    #[test]
    fn test_extracts_json_from_code_fence() {
        let raw = "```json\n{\"overall_summary\": \"fenced\", \"strengths\": [\"a\"]}\n```";
        let feedback = structured(raw);
        assert_eq!(feedback.overall_summary, "fenced");
        assert_eq!(feedback.strengths, vec!["a".to_string()]);
    }

    #[test]
    fn test_plain_prose_degenerates_to_raw_text() {
        let raw = "You did well overall but should practice more.";
        let parsed = parse_feedback(raw);
        assert_eq!(parsed, ParsedFeedback::Degenerate(raw.to_string()));

        let feedback = Feedback::from(parsed);
        assert_eq!(feedback.overall_summary, raw);
        assert!(feedback.strengths.is_empty());
        assert!(feedback.areas_to_improve.is_empty());
        assert!(feedback.next_practice_tasks.is_empty());
        assert!(feedback.scores.is_empty());
        assert!(feedback.degenerate);
    }

    #[test]
    fn test_unbalanced_braces_degenerate() {
        let raw = "Scores: } then { nothing";
        assert!(matches!(parse_feedback(raw), ParsedFeedback::Degenerate(_)));

        let raw = "{\"overall_summary\": \"cut off";
        assert!(matches!(parse_feedback(raw), ParsedFeedback::Degenerate(_)));
    }

    #[test]
    fn test_top_level_array_is_not_feedback() {
        let raw = r#"["not", "an", "object"]"#;
        assert!(matches!(parse_feedback(raw), ParsedFeedback::Degenerate(_)));
    }

    #[test]
    fn test_scores_are_coerced_and_clamped() {
        let raw = r#"{"scores": {"communication": "8.5", "technical_depth": "great", "structure": 14, "confidence": -2}}"#;
        let feedback = structured(raw);
        assert_eq!(feedback.scores.communication, Some(8.5));
        assert_eq!(feedback.scores.technical_depth, Some(0.0));
        assert_eq!(feedback.scores.structure, Some(10.0));
        assert_eq!(feedback.scores.confidence, Some(0.0));
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let feedback = structured("{}");
        assert_eq!(feedback, Feedback::default());
    }

    #[test]
    fn test_lenient_list_shapes() {
        let raw = r#"{"strengths": "Single string", "areas_to_improve": [1, "two", null], "next_practice_tasks": 3}"#;
        let feedback = structured(raw);
        assert_eq!(feedback.strengths, vec!["Single string".to_string()]);
        assert_eq!(feedback.areas_to_improve, vec!["1".to_string(), "two".to_string()]);
        assert!(feedback.next_practice_tasks.is_empty());
    }

    #[test]
    fn test_scores_iterate_in_metric_order() {
        let mut scores = Scores::default();
        scores.set(Metric::Confidence, 4.0);
        scores.set(Metric::Communication, 9.0);
        let collected: Vec<_> = scores.iter().collect();
        assert_eq!(
            collected,
            vec![(Metric::Communication, 9.0), (Metric::Confidence, 4.0)]
        );
    }
}
