//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{ApiEnvelope, HandlerError};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use quiz_generator_core::{
    Answer, DeepDiveRequest, DeepDiveResult, Difficulty, Question, QuestionSet, QuestionType,
    QuestionsRequest, TitleRequest, TitleResult,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_title_handler,
        get_questions_handler,
        deep_dive_handler,
        health_handler,
    ),
    components(
        schemas(
            TitleRequest, QuestionsRequest, DeepDiveRequest, QuestionType, Difficulty,
            TitleResult, QuestionSet, Question, Answer, DeepDiveResult, HealthResponse
        )
    ),
    tags(
        (name = "Quiz Generator API", description = "Generate titles, quiz questions and deep-dive explanations from source text.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    service: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a short title and description for the given text.
#[utoipa::path(
    post,
    path = "/api/get-title",
    request_body = TitleRequest,
    responses(
        (status = 200, description = "Title generated", body = ApiEnvelope<TitleResult>),
        (status = 400, description = "Invalid request body, or the model returned nothing"),
        (status = 405, description = "Method not allowed"),
        (status = 502, description = "The completion service failed"),
        (status = 504, description = "The completion service timed out")
    )
)]
pub async fn get_title_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiEnvelope<TitleResult>>, HandlerError> {
    let Json(body) = body?;
    let request = TitleRequest::parse(&body)?;
    let result = state.generator.generate_title(request).await?;
    Ok(Json(ApiEnvelope::ok(result)))
}

/// Generate quiz questions from the given text.
///
/// Multiple-choice answers are returned in random order.
#[utoipa::path(
    post,
    path = "/api/get-questions",
    request_body = QuestionsRequest,
    responses(
        (status = 200, description = "Questions generated", body = ApiEnvelope<QuestionSet>),
        (status = 400, description = "Invalid request body, or the model returned nothing"),
        (status = 405, description = "Method not allowed"),
        (status = 502, description = "The completion service failed"),
        (status = 504, description = "The completion service timed out")
    )
)]
pub async fn get_questions_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiEnvelope<QuestionSet>>, HandlerError> {
    let Json(body) = body?;
    let request = QuestionsRequest::parse(&body)?;
    let result = state.generator.generate_questions(request).await?;
    Ok(Json(ApiEnvelope::ok(result)))
}

/// Generate a markdown deep-dive explanation of the given text.
#[utoipa::path(
    post,
    path = "/api/deep-dive",
    request_body = DeepDiveRequest,
    responses(
        (status = 200, description = "Explanation generated", body = ApiEnvelope<DeepDiveResult>),
        (status = 400, description = "Invalid request body, or the model returned nothing"),
        (status = 405, description = "Method not allowed"),
        (status = 502, description = "The completion service failed"),
        (status = 504, description = "The completion service timed out")
    )
)]
pub async fn deep_dive_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiEnvelope<DeepDiveResult>>, HandlerError> {
    let Json(body) = body?;
    let request = DeepDiveRequest::parse(&body)?;
    let result = state.generator.generate_deep_dive(request).await?;
    Ok(Json(ApiEnvelope::ok(result)))
}

/// Answers every non-POST request on a generation route. The body is never read.
pub async fn method_not_allowed() -> HandlerError {
    HandlerError::MethodNotAllowed
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "quiz_api".to_string(),
    })
}
