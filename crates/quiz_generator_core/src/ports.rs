//! crates/quiz_generator_core/src/ports.rs
//!
//! Defines the service contract between the core and the hosted model.
//! The trait forms the boundary of the hexagonal architecture, so the core
//! never depends on a specific vendor SDK.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external service.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Completion Request
//=========================================================================================

/// A named JSON schema the model output must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: Value,
}

/// Everything needed for one structured completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub output: OutputSchema,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Performs a single completion call.
    ///
    /// Returns `Ok(None)` when the service answered but produced nothing that
    /// conforms to the requested schema (a refusal, empty or non-JSON content).
    async fn complete(&self, request: CompletionRequest) -> PortResult<Option<Value>>;
}
