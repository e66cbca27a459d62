//! services/api/src/lib.rs
//!
//! The HTTP service around `quiz_generator_core`: configuration, the OpenAI
//! adapter, and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
