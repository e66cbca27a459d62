//! crates/quiz_generator_core/src/lib.rs
//!
//! Core of the quiz generator: request validation, prompts, the completion
//! port and the post-processing applied to model output.

pub mod domain;
pub mod generation;
pub mod ports;
pub mod postprocess;
pub mod prompt;
pub mod schema;
pub mod validation;

pub use domain::{
    Answer, DeepDiveRequest, DeepDiveResult, Difficulty, Question, QuestionSet, QuestionType,
    QuestionsRequest, TitleRequest, TitleResult,
};
pub use generation::{GenerationError, GenerationResult, GenerationSettings, QuizGenerator};
pub use ports::{CompletionGateway, CompletionRequest, OutputSchema, PortError, PortResult};
pub use prompt::PromptPolicy;
pub use validation::ValidationErrors;
