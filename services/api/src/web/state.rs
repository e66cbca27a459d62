//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use quiz_generator_core::QuizGenerator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
/// It is read-only; requests never share mutable data.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<QuizGenerator>,
}
