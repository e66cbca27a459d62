//! services/api/src/web/protocol.rs
//!
//! Defines the JSON envelope every generation endpoint responds with, and the
//! error type that turns request failures into that envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use quiz_generator_core::{GenerationError, PortError, ValidationErrors};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

pub const MSG_OK: &str = "All good";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const MSG_INVALID_BODY: &str = "Invalid request body.";
pub const MSG_EMPTY_RESULT: &str = "The model returned no result.";
pub const MSG_TIMEOUT: &str = "The completion service timed out.";
pub const MSG_GATEWAY_FAILURE: &str = "The completion service failed.";

//=========================================================================================
// Response Envelope
//=========================================================================================

/// The uniform response body. `data` is null on every failure; `errors` is only
/// present when the request body failed validation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiEnvelope<T> {
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<ValidationErrors>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            message: MSG_OK.to_string(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn failure(message: &str, errors: Option<ValidationErrors>) -> Self {
        Self {
            message: message.to_string(),
            data: None,
            errors,
        }
    }
}

//=========================================================================================
// Handler Errors
//=========================================================================================

/// Every way a generation request can fail, mapped onto a status and envelope.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The body could not be read as JSON at all.
    #[error("unreadable request body: {0}")]
    Unreadable(#[from] JsonRejection),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, envelope): (StatusCode, ApiEnvelope<()>) = match self {
            HandlerError::MethodNotAllowed => {
                let envelope = ApiEnvelope::<()>::failure(MSG_METHOD_NOT_ALLOWED, None);
                return (
                    StatusCode::METHOD_NOT_ALLOWED,
                    [(header::ALLOW, "POST")],
                    Json(envelope),
                )
                    .into_response();
            }
            HandlerError::Unreadable(rejection) => {
                let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    StatusCode::PAYLOAD_TOO_LARGE
                } else {
                    StatusCode::BAD_REQUEST
                };
                let errors = ValidationErrors::root(rejection.body_text());
                (status, ApiEnvelope::failure(MSG_INVALID_BODY, Some(errors)))
            }
            HandlerError::Invalid(errors) => (
                StatusCode::BAD_REQUEST,
                ApiEnvelope::failure(MSG_INVALID_BODY, Some(errors)),
            ),
            HandlerError::Generation(GenerationError::EmptyResult) => {
                warn!("Returning empty result to client");
                (
                    StatusCode::BAD_REQUEST,
                    ApiEnvelope::failure(MSG_EMPTY_RESULT, None),
                )
            }
            HandlerError::Generation(GenerationError::Gateway(PortError::Timeout(bound))) => {
                error!("Completion timed out after {:?}", bound);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ApiEnvelope::failure(MSG_TIMEOUT, None),
                )
            }
            HandlerError::Generation(GenerationError::Gateway(e)) => {
                error!("Completion gateway failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    ApiEnvelope::failure(MSG_GATEWAY_FAILURE, None),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}
