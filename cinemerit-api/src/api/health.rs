//! Health check endpoint
//!
//! Reports the service as healthy only while the movie store answers.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use cinemerit_common::db::{self, MovieFilter};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// "ok" or "unavailable"
    pub database: &'static str,
    /// Stored movies; absent when the store cannot be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies: Option<i64>,
}

/// GET /health
///
/// 200 with the movie count, or 503 when the store cannot be queried.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let movies = match db::count_movies(&state.db, &MovieFilter::All).await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Health check: movie store unavailable: {}", e);
            None
        }
    };

    let (code, status, database) = match movies {
        Some(_) => (StatusCode::OK, "ok", "ok"),
        None => (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable"),
    };

    (
        code,
        Json(HealthResponse {
            status,
            module: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            database,
            movies,
        }),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
