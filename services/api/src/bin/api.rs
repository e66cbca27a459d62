//! services/api/src/bin/api.rs

use api_lib::{
    adapters::OpenAiCompletionAdapter,
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use quiz_generator_core::QuizGenerator;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Completion Adapter ---
    let completion_adapter = OpenAiCompletionAdapter::new(
        config.openai_api_key.as_deref(),
        config.openai_base_url.as_deref(),
        config.completion_model.clone(),
    );
    if !completion_adapter.is_configured() {
        warn!("OPEN_AI_API_KEY is not set; generation requests will fail until it is configured");
    }

    // --- 3. Build the Shared AppState ---
    let generator = QuizGenerator::new(Arc::new(completion_adapter), config.generation_settings());
    info!(
        "Generator ready (model: {}, questions policy: {}, deep-dive policy: {}, timeout: {:?})",
        config.completion_model,
        generator.settings().questions_policy,
        generator.settings().deep_dive_policy,
        generator.settings().completion_timeout
    );
    let app_state = Arc::new(AppState {
        config: config.clone(),
        generator: Arc::new(generator),
    });

    // --- 4. Create the Web Router ---
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
