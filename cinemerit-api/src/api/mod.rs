//! HTTP handlers outside the movie viewsets

pub mod buildinfo;
pub mod health;
pub mod pages;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use pages::{catalog_page, home_page};

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
