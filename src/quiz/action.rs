use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::quiz::question::{DifficultyFilter, Question};

/// Everything that can move the quiz forward. On the wire an action is
/// `{"type": "<name>", "payload": ...}`, with `payload` omitted for unit actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    QuestionsLoaded(Vec<Question>),
    QuestionsLoadFailed,
    Start,
    AnswerSubmitted(usize),
    AdvanceQuestion,
    Finish,
    Restart,
    Tick,
    SetDifficulty(DifficultyFilter),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("Action unknown: {0:?}")]
    UnknownAction(String),
    #[error("Malformed {action:?} action: {reason}")]
    MalformedAction { action: String, reason: String },
}

impl Action {
    pub const NAMES: [&'static str; 9] = [
        "questionsLoaded",
        "questionsLoadFailed",
        "start",
        "answerSubmitted",
        "advanceQuestion",
        "finish",
        "restart",
        "tick",
        "setDifficulty",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::QuestionsLoaded(_) => "questionsLoaded",
            Action::QuestionsLoadFailed => "questionsLoadFailed",
            Action::Start => "start",
            Action::AnswerSubmitted(_) => "answerSubmitted",
            Action::AdvanceQuestion => "advanceQuestion",
            Action::Finish => "finish",
            Action::Restart => "restart",
            Action::Tick => "tick",
            Action::SetDifficulty(_) => "setDifficulty",
        }
    }

    /// Decode one raw action. An unrecognized `type` is reported as
    /// [`QuizError::UnknownAction`] rather than a generic parse failure.
    pub fn from_json(raw: &str) -> Result<Self, QuizError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| QuizError::MalformedAction {
            action: String::new(),
            reason: e.to_string(),
        })?;

        let name = match value.get("type").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                return Err(QuizError::MalformedAction {
                    action: String::new(),
                    reason: "missing \"type\" discriminator".to_string(),
                });
            }
        };
        if !Self::NAMES.contains(&name.as_str()) {
            return Err(QuizError::UnknownAction(name));
        }

        let action: Action =
            serde_json::from_value(value).map_err(|e| QuizError::MalformedAction {
                action: name.clone(),
                reason: e.to_string(),
            })?;

        if let Action::QuestionsLoaded(ref questions) = action {
            for question in questions {
                question.validate().map_err(|e| QuizError::MalformedAction {
                    action: name.clone(),
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_cover_every_variant() {
        let samples = [
            Action::QuestionsLoaded(Vec::new()),
            Action::QuestionsLoadFailed,
            Action::Start,
            Action::AnswerSubmitted(0),
            Action::AdvanceQuestion,
            Action::Finish,
            Action::Restart,
            Action::Tick,
            Action::SetDifficulty(DifficultyFilter::All),
        ];
        for action in &samples {
            assert!(Action::NAMES.contains(&action.name()), "{}", action.name());
        }
        assert_eq!(samples.len(), Action::NAMES.len());
    }

    #[test]
    fn test_decode_unit_action() {
        assert_eq!(Action::from_json(r#"{"type": "start"}"#).unwrap(), Action::Start);
        assert_eq!(Action::from_json(r#"{"type": "tick"}"#).unwrap(), Action::Tick);
    }

    #[test]
    fn test_decode_payload_actions() {
        assert_eq!(
            Action::from_json(r#"{"type": "answerSubmitted", "payload": 2}"#).unwrap(),
            Action::AnswerSubmitted(2)
        );
        assert_eq!(
            Action::from_json(r#"{"type": "setDifficulty", "payload": "hard"}"#).unwrap(),
            Action::SetDifficulty(DifficultyFilter::Hard)
        );
    }

    #[test]
    fn test_decode_unknown_type() {
        let err = Action::from_json(r#"{"type": "skipQuestion"}"#).unwrap_err();
        assert_eq!(err, QuizError::UnknownAction("skipQuestion".to_string()));
        assert!(err.to_string().contains("Action unknown"));
    }

    #[test]
    fn test_decode_bad_payload_is_malformed_not_unknown() {
        let err = Action::from_json(r#"{"type": "answerSubmitted", "payload": "b"}"#).unwrap_err();
        assert!(matches!(err, QuizError::MalformedAction { ref action, .. } if action == "answerSubmitted"));
    }

    #[test]
    fn test_decode_missing_type() {
        let err = Action::from_json(r#"{"payload": 1}"#).unwrap_err();
        assert!(matches!(err, QuizError::MalformedAction { .. }));
    }

    #[test]
    fn test_decode_loaded_validates_questions() {
        let raw = r#"{"type": "questionsLoaded", "payload": [
            {"question": "q", "options": ["a"], "correctOption": 0, "points": 5, "difficulty": "easy"}
        ]}"#;
        assert!(matches!(
            Action::from_json(raw),
            Err(QuizError::MalformedAction { .. })
        ));
    }

    #[test]
    fn test_encode_matches_wire_form() {
        let json = serde_json::to_value(Action::AnswerSubmitted(3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "answerSubmitted", "payload": 3}));
    }
}
