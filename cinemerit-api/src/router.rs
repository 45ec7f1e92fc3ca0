//! Route table for movie viewsets
//!
//! Each registration binds a URL prefix to a viewset and produces two
//! routes:
//! - `{basename}-list`: `GET`/`POST /{prefix}/`
//! - `{basename}-detail`: `GET`/`PUT`/`PATCH`/`DELETE /{prefix}/:id/`
//!
//! Prefixes may capture path segments (`genre/:genre`). Conflicts are
//! rejected at registration time, before any request is served.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use thiserror::Error;

use crate::viewset::{self, MovieViewSet, LOOKUP_PARAM};
use crate::AppState;

/// Route table construction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("prefix '{0}' needs an explicit basename: its viewset has no fixed queryset")]
    MissingBasename(String),

    #[error("basename '{basename}' for prefix '{prefix}' is already registered")]
    DuplicateBasename { prefix: String, basename: String },

    #[error("prefix '{0}' collides with an existing registration")]
    DuplicatePrefix(String),

    #[error("invalid prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },
}

/// A named route, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone)]
struct Registration {
    prefix: String,
    basename: String,
    viewset: Arc<MovieViewSet>,
}

impl Registration {
    fn list_path(&self) -> String {
        format!("/{}/", self.prefix)
    }

    fn detail_path(&self) -> String {
        format!("/{}/:{}/", self.prefix, LOOKUP_PARAM)
    }

    fn has_params(&self) -> bool {
        self.prefix.split('/').any(|segment| segment.starts_with(':'))
    }
}

/// Collects viewset registrations and builds the axum router
#[derive(Debug, Clone, Default)]
pub struct ViewSetRouter {
    registrations: Vec<Registration>,
}

impl ViewSetRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `viewset` under `prefix`
    ///
    /// Without `basename` the viewset's model name is used; two viewsets over
    /// the same model therefore need distinct explicit basenames.
    pub fn register(
        &mut self,
        prefix: &str,
        viewset: MovieViewSet,
        basename: Option<&str>,
    ) -> Result<&mut Self, RouteError> {
        let prefix = normalize_prefix(prefix, &viewset)?;

        let basename = basename
            .or_else(|| viewset.default_basename())
            .ok_or_else(|| RouteError::MissingBasename(prefix.clone()))?
            .to_string();

        if self.registrations.iter().any(|r| r.basename == basename) {
            return Err(RouteError::DuplicateBasename { prefix, basename });
        }

        let shape = route_shape(&prefix);
        if self.registrations.iter().any(|r| route_shape(&r.prefix) == shape) {
            return Err(RouteError::DuplicatePrefix(prefix));
        }

        self.registrations.push(Registration {
            prefix,
            basename,
            viewset: Arc::new(viewset),
        });
        Ok(self)
    }

    /// Every route this table will serve, in registration order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.registrations
            .iter()
            .flat_map(|r| {
                [
                    RouteInfo {
                        name: format!("{}-list", r.basename),
                        path: r.list_path(),
                    },
                    RouteInfo {
                        name: format!("{}-detail", r.basename),
                        path: r.detail_path(),
                    },
                ]
            })
            .collect()
    }

    /// Prefix → list URL, for prefixes that need no path parameters
    pub fn api_root(&self) -> BTreeMap<String, String> {
        self.registrations
            .iter()
            .filter(|r| !r.has_params())
            .map(|r| (r.prefix.clone(), r.list_path()))
            .collect()
    }

    /// Build the router: viewset routes plus the API root at `/api/`
    pub fn into_router(self) -> Router<AppState> {
        let root = self.api_root();
        let mut router = Router::new().route(
            "/api/",
            get(move || {
                let root = root.clone();
                async move { Json(root) }
            }),
        );

        for registration in self.registrations {
            let routes = Router::new()
                .route(
                    &registration.list_path(),
                    get(viewset::list).post(viewset::create),
                )
                .route(
                    &registration.detail_path(),
                    get(viewset::retrieve)
                        .put(viewset::update)
                        .patch(viewset::partial_update)
                        .delete(viewset::destroy),
                )
                .layer(Extension(registration.viewset));
            router = router.merge(routes);
        }

        router
    }
}

/// Trim slashes and check captured segments
fn normalize_prefix(prefix: &str, viewset: &MovieViewSet) -> Result<String, RouteError> {
    let trimmed = prefix.trim_matches('/');
    let invalid = |reason: &str| RouteError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty"));
    }
    if trimmed == "api" {
        return Err(invalid("reserved for the API root"));
    }

    let mut captured = HashSet::new();
    for segment in trimmed.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty path segment"));
        }
        if let Some(name) = segment.strip_prefix(':') {
            if name.is_empty() || name == LOOKUP_PARAM || !captured.insert(name) {
                return Err(invalid("bad or repeated path parameter"));
            }
        }
    }

    if let Some(param) = viewset.queryset().path_param() {
        if !captured.contains(param) {
            return Err(invalid(&format!("viewset reads ':{}', which is not captured", param)));
        }
    }

    Ok(trimmed.to_string())
}

/// Prefix with parameter names erased; equal shapes match the same URLs
fn route_shape(prefix: &str) -> Vec<&str> {
    prefix
        .split('/')
        .map(|segment| if segment.starts_with(':') { ":" } else { segment })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewset::DRAMA;

    #[test]
    fn test_register_builds_named_routes() {
        let mut router = ViewSetRouter::new();
        router.register("/movies/", MovieViewSet::all(), None).unwrap();

        assert_eq!(
            router.routes(),
            vec![
                RouteInfo {
                    name: "moviedata-list".to_string(),
                    path: "/movies/".to_string()
                },
                RouteInfo {
                    name: "moviedata-detail".to_string(),
                    path: "/movies/:id/".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_same_model_without_distinct_basename_fails() {
        let mut router = ViewSetRouter::new();
        router.register("movies", MovieViewSet::all(), None).unwrap();

        let err = router
            .register("drama", MovieViewSet::fixed_genre(DRAMA), None)
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::DuplicateBasename {
                prefix: "drama".to_string(),
                basename: "moviedata".to_string()
            }
        );
    }

    #[test]
    fn test_distinct_basenames_coexist() {
        let mut router = ViewSetRouter::new();
        router
            .register("movies", MovieViewSet::all(), None)
            .unwrap()
            .register("drama", MovieViewSet::fixed_genre(DRAMA), Some("drama_movies"))
            .unwrap();

        assert_eq!(router.routes().len(), 4);
    }

    #[test]
    fn test_path_viewset_requires_basename() {
        let mut router = ViewSetRouter::new();
        let err = router
            .register("genre/:genre", MovieViewSet::genre_from_path("genre"), None)
            .unwrap_err();
        assert_eq!(err, RouteError::MissingBasename("genre/:genre".to_string()));
    }

    #[test]
    fn test_path_viewset_requires_captured_param() {
        let mut router = ViewSetRouter::new();
        let err = router
            .register("genre", MovieViewSet::genre_from_path("genre"), Some("genre_movies"))
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidPrefix { .. }));
    }

    #[test]
    fn test_duplicate_prefix_fails() {
        let mut router = ViewSetRouter::new();
        router.register("movies", MovieViewSet::all(), None).unwrap();
        let err = router
            .register("movies", MovieViewSet::fixed_genre(DRAMA), Some("other"))
            .unwrap_err();
        assert_eq!(err, RouteError::DuplicatePrefix("movies".to_string()));
    }

    #[test]
    fn test_prefixes_differing_only_in_param_name_collide() {
        let mut router = ViewSetRouter::new();
        router
            .register("genre/:genre", MovieViewSet::genre_from_path("genre"), Some("a"))
            .unwrap();
        let err = router
            .register("genre/:kind", MovieViewSet::genre_from_path("kind"), Some("b"))
            .unwrap_err();
        assert!(matches!(err, RouteError::DuplicatePrefix(_)));
    }

    #[test]
    fn test_lookup_param_cannot_be_captured_by_prefix() {
        let mut router = ViewSetRouter::new();
        let err = router
            .register("by/:id", MovieViewSet::all(), None)
            .unwrap_err();
        assert!(matches!(err, RouteError::InvalidPrefix { .. }));
    }

    #[test]
    fn test_api_root_skips_parameterized_prefixes() {
        let mut router = ViewSetRouter::new();
        router
            .register("movies", MovieViewSet::all(), None)
            .unwrap()
            .register(
                "genre/:genre",
                MovieViewSet::genre_from_path("genre"),
                Some("genre_movies"),
            )
            .unwrap();

        let root = router.api_root();
        assert_eq!(root.len(), 1);
        assert_eq!(root["movies"], "/movies/");
    }
}
