//! crates/quiz_generator_core/src/generation.rs
//!
//! The three generation flows. Each call builds a prompt, performs exactly one
//! bounded completion through the `CompletionGateway` port, parses the output
//! into its typed result and applies any post-processing.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domain::{
    DeepDiveRequest, DeepDiveResult, QuestionSet, QuestionType, QuestionsRequest, TitleRequest,
    TitleResult,
};
use crate::ports::{CompletionGateway, CompletionRequest, OutputSchema, PortError};
use crate::postprocess::{shuffle_answers, shuffle_markdown_choices};
use crate::prompt::{deep_dive_prompt, questions_prompt, title_prompt, Prompt, PromptPolicy};
use crate::schema::{deep_dive_schema, questions_schema, title_schema};

//=========================================================================================
// Errors and Settings
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The model produced no output matching the expected structure.
    #[error("The model returned no usable result")]
    EmptyResult,
    #[error("Completion gateway error: {0}")]
    Gateway(#[from] PortError),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Tunables for the generation flows.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub questions_policy: PromptPolicy,
    pub deep_dive_policy: PromptPolicy,
    pub completion_timeout: Duration,
    pub temperature: f32,
    pub questions_max_tokens: u32,
    pub shuffle_deep_dive_choices: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            questions_policy: PromptPolicy::Curriculum,
            deep_dive_policy: PromptPolicy::Teacher,
            completion_timeout: Duration::from_secs(20),
            temperature: 0.7,
            questions_max_tokens: 2000,
            shuffle_deep_dive_choices: false,
        }
    }
}

//=========================================================================================
// Generator
//=========================================================================================

/// Stateless orchestration over a shared gateway. Safe to call concurrently.
#[derive(Clone)]
pub struct QuizGenerator {
    gateway: Arc<dyn CompletionGateway>,
    settings: GenerationSettings,
}

impl QuizGenerator {
    pub fn new(gateway: Arc<dyn CompletionGateway>, settings: GenerationSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub async fn generate_title(&self, request: TitleRequest) -> GenerationResult<TitleResult> {
        let completion = self.completion(
            title_prompt(&request),
            title_schema(),
            Some(self.settings.temperature),
            None,
        );
        let result: TitleResult = self.run(completion).await?;
        info!(
            "Generated title for {} characters of input",
            request.user_input.chars().count()
        );
        Ok(result)
    }

    pub async fn generate_questions(
        &self,
        request: QuestionsRequest,
    ) -> GenerationResult<QuestionSet> {
        let completion = self.completion(
            questions_prompt(&request, self.settings.questions_policy),
            questions_schema(),
            Some(self.settings.temperature),
            Some(self.settings.questions_max_tokens),
        );
        let mut set: QuestionSet = self.run(completion).await?;

        if request.question_type == QuestionType::MultipleChoice {
            shuffle_answers(&mut set.questions, &mut rand::thread_rng());
        }

        info!(
            "Generated {} {} questions (requested {})",
            set.questions.len(),
            request.question_type.as_str(),
            request.question_amount
        );
        Ok(set)
    }

    pub async fn generate_deep_dive(
        &self,
        request: DeepDiveRequest,
    ) -> GenerationResult<DeepDiveResult> {
        let completion = self.completion(
            deep_dive_prompt(&request, self.settings.deep_dive_policy),
            deep_dive_schema(),
            None,
            None,
        );
        let mut result: DeepDiveResult = self.run(completion).await?;

        if self.settings.shuffle_deep_dive_choices {
            result.markdown = shuffle_markdown_choices(&result.markdown, &mut rand::thread_rng());
        }

        info!(
            "Generated deep dive of {} characters",
            result.markdown.chars().count()
        );
        Ok(result)
    }

    fn completion(
        &self,
        prompt: Prompt,
        output: OutputSchema,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> CompletionRequest {
        CompletionRequest {
            system: prompt.system,
            user: prompt.user,
            output,
            temperature,
            max_tokens,
        }
    }

    /// Performs the single bounded gateway call and parses its output.
    async fn run<T: DeserializeOwned>(&self, request: CompletionRequest) -> GenerationResult<T> {
        let timeout = self.settings.completion_timeout;
        let value = tokio::time::timeout(timeout, self.gateway.complete(request))
            .await
            .map_err(|_| PortError::Timeout(timeout))??;

        let Some(value) = value else {
            warn!("Completion returned no structured output");
            return Err(GenerationError::EmptyResult);
        };

        serde_json::from_value(value).map_err(|e| {
            warn!("Completion output did not match the expected structure: {}", e);
            GenerationError::EmptyResult
        })
    }
}
