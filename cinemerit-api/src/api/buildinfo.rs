//! Build information endpoint
//!
//! Identifies the running binary and the viewset routes it was built with.

use axum::Json;
use serde::Serialize;

use crate::movie_routes;

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    /// Named viewset routes, `{basename}-list` / `{basename}-detail`
    pub routes: Vec<String>,
}

impl BuildInfo {
    /// Values captured by build.rs plus the compiled route table
    pub fn current() -> Self {
        // build_router refuses to start on a bad table, so this is never empty
        // in a running server
        let routes = movie_routes()
            .map(|table| table.routes().into_iter().map(|r| r.name).collect())
            .unwrap_or_default();

        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            build_profile: env!("BUILD_PROFILE"),
            routes,
        }
    }
}

/// GET /api/buildinfo
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}
