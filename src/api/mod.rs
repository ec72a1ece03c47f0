//! HTTP API: the chat endpoint and a health check.

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
