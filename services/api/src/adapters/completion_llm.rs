//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the structured-output completion LLM.
//! It implements the `CompletionGateway` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use quiz_generator_core::ports::{CompletionGateway, CompletionRequest, PortError, PortResult};
use serde_json::Value;
use tracing::{error, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionGateway` using OpenAI chat completions
/// with a strict JSON schema response format.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    /// `None` when no API key was configured. Every call then fails with
    /// `PortError::Unauthorized` instead of the service refusing to start.
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(api_key: Option<&str>, api_base: Option<&str>, model: String) -> Self {
        let client = api_key.map(|key| {
            let mut config = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = api_base {
                config = config.with_api_base(base);
            }
            Client::with_config(config)
        });
        Self { client, model }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

/// Maps a vendor error onto the port's error taxonomy.
fn map_openai_error(e: OpenAIError) -> PortError {
    match e {
        OpenAIError::ApiError(api) => {
            let kind = api.r#type.as_deref().unwrap_or_default();
            let code = api.code.as_deref().unwrap_or_default();
            if kind == "insufficient_quota" || code == "insufficient_quota" {
                PortError::QuotaExceeded(api.message)
            } else if code == "invalid_api_key" || kind == "authentication_error" {
                PortError::Unauthorized(api.message)
            } else {
                PortError::Unexpected(api.message)
            }
        }
        other => PortError::Unexpected(other.to_string()),
    }
}

//=========================================================================================
// `CompletionGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionGateway for OpenAiCompletionAdapter {
    async fn complete(&self, request: CompletionRequest) -> PortResult<Option<Value>> {
        let client = self.client.as_ref().ok_or_else(|| {
            PortError::Unauthorized("no OpenAI API key is configured".to_string())
        })?;

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: request.output.name.to_string(),
                schema: Some(request.output.schema),
                strict: Some(true),
            },
        };

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .response_format(response_format);
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }
        let chat_request = builder
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and map the error here, which respects the orphan rule.
        let response = client.chat().create(chat_request).await.map_err(|e| {
            error!("Completion request failed: {}", e);
            map_openai_error(e)
        })?;

        let Some(choice) = response.choices.into_iter().next() else {
            warn!("Completion returned no choices");
            return Ok(None);
        };

        if let Some(refusal) = choice.message.refusal {
            warn!("Completion was refused: {}", refusal);
            return Ok(None);
        }

        let Some(content) = choice.message.content else {
            warn!("Completion contained no text content");
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Completion content is not valid JSON: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_generator_core::schema::title_schema;

    #[tokio::test]
    async fn missing_key_surfaces_as_unauthorized() {
        let adapter = OpenAiCompletionAdapter::new(None, None, "gpt-4o-mini".to_string());
        assert!(!adapter.is_configured());

        let err = adapter
            .complete(CompletionRequest {
                system: "system".to_string(),
                user: "user".to_string(),
                output: title_schema(),
                temperature: None,
                max_tokens: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unauthorized(_)));
    }

    #[test]
    fn configured_key_builds_a_client() {
        let adapter = OpenAiCompletionAdapter::new(
            Some("sk-test"),
            Some("http://localhost:9999/v1"),
            "gpt-4o-mini".to_string(),
        );
        assert!(adapter.is_configured());
    }
}
