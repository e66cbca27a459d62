//! crates/quiz_generator_core/src/domain.rs
//!
//! Defines the core request and result types for the three generation flows.
//! Every value here lives for a single request; nothing is persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Requests
//=========================================================================================

/// The kind of questions a quiz is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    TrueOrFalse,
    MultipleChoice,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::TrueOrFalse => "true-or-false",
            QuestionType::MultipleChoice => "multiple-choice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Body of a title generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TitleRequest {
    #[serde(rename = "userInput")]
    pub user_input: String,
}

/// Body of a question generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionsRequest {
    #[serde(rename = "userInput")]
    pub user_input: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    /// Between 1 and 20 inclusive.
    #[serde(rename = "questionAmount")]
    #[schema(minimum = 1, maximum = 20)]
    pub question_amount: u8,
}

/// Body of a deep-dive request. `question` carries the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeepDiveRequest {
    pub question: String,
}

//=========================================================================================
// Results
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TitleResult {
    pub title: String,
    pub description: String,
}

/// A single answer option. For multiple-choice questions the model is asked to
/// mark exactly one answer as correct; this is not checked locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    pub text: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
    #[serde(rename = "counterArgument")]
    pub counter_argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub question: String,
    pub explanation: String,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeepDiveResult {
    pub markdown: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_wire_literals() {
        assert_eq!(
            serde_json::to_value(QuestionType::TrueOrFalse).unwrap(),
            json!("true-or-false")
        );
        assert_eq!(
            serde_json::to_value(QuestionType::MultipleChoice).unwrap(),
            json!(QuestionType::MultipleChoice.as_str())
        );
        assert_eq!(serde_json::to_value(Difficulty::Hard).unwrap(), json!("hard"));
    }

    #[test]
    fn answer_uses_camel_case_fields() {
        let answer = Answer {
            text: "Paris".to_string(),
            is_correct: true,
            counter_argument: "It is stated in the text.".to_string(),
        };
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(value["isCorrect"], json!(true));
        assert_eq!(value["counterArgument"], json!("It is stated in the text."));
    }
}
