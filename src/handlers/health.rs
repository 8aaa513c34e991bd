//! Liveness endpoint for service monitoring.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` once the server is accepting requests
    pub status: &'static str,

    /// Engine selected at startup (`postgres` or `url`)
    pub engine: &'static str,

    /// Backend the connection handle is bound to
    pub backend: String,
}

/// Liveness handler.
///
/// Reports which database the process was bootstrapped against. It does not
/// query the database.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "ok",
///   "engine": "url",
///   "backend": "SQLite"
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        engine: state.db.engine().as_str(),
        backend: state.db.backend_name().to_string(),
    })
}
