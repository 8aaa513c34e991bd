//! HTTP request handlers (route handlers).
//!
//! Handlers receive the shared [`AppState`](crate::state::AppState) through
//! Axum's `State` extractor.

/// Liveness endpoint
pub mod health;
