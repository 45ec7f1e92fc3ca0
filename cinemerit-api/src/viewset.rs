//! Movie viewsets
//!
//! A viewset is the full CRUD surface (list, retrieve, create, update,
//! partial update, destroy) over one record subset. The subset comes from a
//! [`QuerySet`] strategy; the handlers are written once and shared by every
//! strategy.
//!
//! Create is never restricted by the subset: posting a Scifi movie to the
//! Drama viewset stores it as Scifi.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use cinemerit_common::db::{self, MovieFilter, MovieRecord};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::serializer::{self, MovieRepr};
use crate::AppState;

/// Model name used as the default route basename
pub const MODEL_NAME: &str = "moviedata";

/// Genre served by the fixed-genre viewset
pub const DRAMA: &str = "Drama";

/// Path parameter carrying the record id on detail routes
pub const LOOKUP_PARAM: &str = "id";

/// Captured path parameters of the matched route
pub type PathParams = HashMap<String, String>;

/// How a viewset selects its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySet {
    /// Every record
    All,
    /// A filter fixed at construction
    Fixed(MovieFilter),
    /// Exact genre match on the named path parameter, per request
    GenreFromPath(String),
}

impl QuerySet {
    /// Filter for the current request
    ///
    /// A genre token that is not made of word characters and hyphens does
    /// not name a route, so it is reported as not found.
    pub fn resolve(&self, params: &PathParams) -> ApiResult<MovieFilter> {
        match self {
            QuerySet::All => Ok(MovieFilter::All),
            QuerySet::Fixed(filter) => Ok(filter.clone()),
            QuerySet::GenreFromPath(param) => {
                let genre = params.get(param).ok_or_else(|| {
                    ApiError::Internal(format!("route does not capture '{}'", param))
                })?;
                if !is_genre_token(genre) {
                    return Err(ApiError::NotFound(format!("genre '{}'", genre)));
                }
                Ok(MovieFilter::genre(genre.as_str()))
            }
        }
    }

    /// Path parameter this strategy reads, if any
    pub fn path_param(&self) -> Option<&str> {
        match self {
            QuerySet::GenreFromPath(param) => Some(param),
            _ => None,
        }
    }
}

/// Word characters and hyphen, at least one
fn is_genre_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// CRUD operations bound to a record subset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieViewSet {
    queryset: QuerySet,
}

impl MovieViewSet {
    pub fn new(queryset: QuerySet) -> Self {
        Self { queryset }
    }

    /// Every movie
    pub fn all() -> Self {
        Self::new(QuerySet::All)
    }

    /// Movies of one genre, fixed at construction
    pub fn fixed_genre(genre: &str) -> Self {
        Self::new(QuerySet::Fixed(MovieFilter::genre(genre)))
    }

    /// Movies of the genre captured by path parameter `param`
    pub fn genre_from_path(param: &str) -> Self {
        Self::new(QuerySet::GenreFromPath(param.to_string()))
    }

    pub fn queryset(&self) -> &QuerySet {
        &self.queryset
    }

    /// Basename derived from the model; none when the subset is only known per request
    pub fn default_basename(&self) -> Option<&'static str> {
        match self.queryset {
            QuerySet::All | QuerySet::Fixed(_) => Some(MODEL_NAME),
            QuerySet::GenreFromPath(_) => None,
        }
    }

    pub async fn list(&self, pool: &SqlitePool, params: &PathParams) -> ApiResult<Vec<MovieRecord>> {
        let filter = self.queryset.resolve(params)?;
        Ok(db::list_movies(pool, &filter).await?)
    }

    pub async fn retrieve(&self, pool: &SqlitePool, params: &PathParams) -> ApiResult<MovieRecord> {
        let filter = self.queryset.resolve(params)?;
        let id = lookup_id(params)?;
        Ok(db::get_movie(pool, id, &filter).await?)
    }

    pub async fn create(
        &self,
        pool: &SqlitePool,
        params: &PathParams,
        payload: &Value,
    ) -> ApiResult<MovieRecord> {
        // Only checks the route; the subset does not constrain new records
        self.queryset.resolve(params)?;
        let fields = serializer::deserialize(payload)?;
        Ok(db::create_movie(pool, &fields).await?)
    }

    /// Full replacement (`PUT`)
    pub async fn update(
        &self,
        pool: &SqlitePool,
        params: &PathParams,
        payload: &Value,
    ) -> ApiResult<MovieRecord> {
        let filter = self.queryset.resolve(params)?;
        let id = lookup_id(params)?;
        // Unknown id wins over a bad payload
        db::get_movie(pool, id, &filter).await?;
        let fields = serializer::deserialize(payload)?;
        Ok(db::update_movie(pool, id, &filter, &fields.into()).await?)
    }

    /// Partial update (`PATCH`)
    pub async fn partial_update(
        &self,
        pool: &SqlitePool,
        params: &PathParams,
        payload: &Value,
    ) -> ApiResult<MovieRecord> {
        let filter = self.queryset.resolve(params)?;
        let id = lookup_id(params)?;
        db::get_movie(pool, id, &filter).await?;
        let changes = serializer::deserialize_partial(payload)?;
        Ok(db::update_movie(pool, id, &filter, &changes).await?)
    }

    pub async fn destroy(&self, pool: &SqlitePool, params: &PathParams) -> ApiResult<()> {
        let filter = self.queryset.resolve(params)?;
        let id = lookup_id(params)?;
        Ok(db::delete_movie(pool, id, &filter).await?)
    }
}

/// Non-integer ids cannot name a record
fn lookup_id(params: &PathParams) -> ApiResult<i64> {
    let raw = params
        .get(LOOKUP_PARAM)
        .ok_or_else(|| ApiError::Internal("detail route without an id".to_string()))?;
    raw.parse::<i64>()
        .map_err(|_| ApiError::NotFound(format!("movie '{}'", raw)))
}

// ============================================================================
// HTTP handlers
// ============================================================================

type ViewSetExt = Extension<Arc<MovieViewSet>>;
type PathExt = Result<Path<PathParams>, PathRejection>;
type BodyExt = Result<Json<Value>, JsonRejection>;

/// Captured parameters of the matched route
///
/// List routes under a static prefix capture nothing. Any other rejection
/// (for example a segment that is not UTF-8 once decoded) cannot name a
/// record or a genre.
fn path_params(params: PathExt) -> ApiResult<PathParams> {
    match params {
        Ok(Path(params)) => Ok(params),
        Err(PathRejection::MissingPathParams(_)) => Ok(PathParams::new()),
        Err(rejection) => Err(ApiError::NotFound(rejection.body_text())),
    }
}

/// GET /{prefix}/
pub async fn list(
    State(state): State<AppState>,
    Extension(viewset): ViewSetExt,
    params: PathExt,
) -> ApiResult<Json<Vec<MovieRepr>>> {
    let movies = viewset.list(&state.db, &path_params(params)?).await?;
    debug!("Listing {} movies", movies.len());
    Ok(Json(serializer::serialize_many(&movies)))
}

/// POST /{prefix}/
pub async fn create(
    State(state): State<AppState>,
    Extension(viewset): ViewSetExt,
    params: PathExt,
    payload: BodyExt,
) -> ApiResult<(StatusCode, Json<MovieRepr>)> {
    let params = path_params(params)?;
    let Json(payload) = payload?;
    let movie = viewset.create(&state.db, &params, &payload).await?;
    Ok((StatusCode::CREATED, Json(serializer::serialize(&movie))))
}

/// GET /{prefix}/{id}/
pub async fn retrieve(
    State(state): State<AppState>,
    Extension(viewset): ViewSetExt,
    params: PathExt,
) -> ApiResult<Json<MovieRepr>> {
    let movie = viewset.retrieve(&state.db, &path_params(params)?).await?;
    Ok(Json(serializer::serialize(&movie)))
}

/// PUT /{prefix}/{id}/
pub async fn update(
    State(state): State<AppState>,
    Extension(viewset): ViewSetExt,
    params: PathExt,
    payload: BodyExt,
) -> ApiResult<Json<MovieRepr>> {
    let params = path_params(params)?;
    let Json(payload) = payload?;
    let movie = viewset.update(&state.db, &params, &payload).await?;
    Ok(Json(serializer::serialize(&movie)))
}

/// PATCH /{prefix}/{id}/
pub async fn partial_update(
    State(state): State<AppState>,
    Extension(viewset): ViewSetExt,
    params: PathExt,
    payload: BodyExt,
) -> ApiResult<Json<MovieRepr>> {
    let params = path_params(params)?;
    let Json(payload) = payload?;
    let movie = viewset.partial_update(&state.db, &params, &payload).await?;
    Ok(Json(serializer::serialize(&movie)))
}

/// DELETE /{prefix}/{id}/
pub async fn destroy(
    State(state): State<AppState>,
    Extension(viewset): ViewSetExt,
    params: PathExt,
) -> ApiResult<StatusCode> {
    viewset.destroy(&state.db, &path_params(params)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
