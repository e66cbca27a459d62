pub mod protocol;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the pieces the server binary and integration tests need.
pub use protocol::{ApiEnvelope, HandlerError};
pub use router::build_router;
pub use state::AppState;
