//! cinemerit-api library - movie catalog HTTP service
//!
//! JSON CRUD endpoints over the movie store (all movies, the Drama subset,
//! any genre by path), plus paginated HTML listing pages.

use axum::{routing::get, Router};
use cinemerit_common::config::PaginationConfig;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub mod api;
pub mod error;
pub mod pagination;
pub mod router;
pub mod serializer;
pub mod viewset;

use router::{RouteError, ViewSetRouter};
use viewset::{MovieViewSet, DRAMA};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Page sizes for the HTML listing pages
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }
}

/// The movie viewset route table
///
/// - `/movies/`: every movie
/// - `/drama/`: movies with genre "Drama"
/// - `/genre/:genre/`: movies with the genre named in the path
pub fn movie_routes() -> Result<ViewSetRouter, RouteError> {
    let mut routes = ViewSetRouter::new();
    routes
        .register("movies", MovieViewSet::all(), None)?
        .register("drama", MovieViewSet::fixed_genre(DRAMA), Some("drama_movies"))?
        .register(
            "genre/:genre",
            MovieViewSet::genre_from_path("genre"),
            Some("genre_movies"),
        )?;
    Ok(routes)
}

/// Build application router
///
/// Fails when the route table cannot be constructed.
pub fn build_router(state: AppState) -> Result<Router, RouteError> {
    let viewsets = movie_routes()?;
    for route in viewsets.routes() {
        debug!("Route {} -> {}", route.name, route.path);
    }

    let app = Router::new()
        .route("/", get(api::home_page))
        .route("/catalog/", get(api::catalog_page))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .merge(viewsets.into_router())
        .fallback(api::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    Ok(app)
}
