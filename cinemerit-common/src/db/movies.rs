//! Movie record store
//!
//! All CRUD access to the `movies` table goes through here. Every read is
//! ordered by `id`; lookups, updates and deletes are scoped to a
//! [`MovieFilter`] so a record outside the caller's subset is not found.

use super::models::{MovieChanges, MovieFields, MovieFilter, MovieRecord};
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

const SELECT_COLUMNS: &str = "SELECT id, name, duration, rating, genre FROM movies";

/// SQL condition selecting the filter's subset; binds at most one genre
fn filter_condition(filter: &MovieFilter) -> &'static str {
    match filter {
        MovieFilter::All => "1 = 1",
        MovieFilter::Genre(_) => "genre = ?",
    }
}

fn filter_genre(filter: &MovieFilter) -> Option<&str> {
    match filter {
        MovieFilter::All => None,
        MovieFilter::Genre(genre) => Some(genre.as_str()),
    }
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("movie {}", id))
}

/// Insert a new movie and return it with its assigned id
pub async fn create_movie(pool: &SqlitePool, fields: &MovieFields) -> Result<MovieRecord> {
    fields.validate()?;

    let result = sqlx::query(
        "INSERT INTO movies (name, duration, rating, genre) VALUES (?, ?, ?, ?)",
    )
    .bind(&fields.name)
    .bind(fields.duration)
    .bind(fields.rating)
    .bind(&fields.genre)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!("Created movie {} ({})", id, fields.name);

    Ok(MovieRecord {
        id,
        name: fields.name.clone(),
        duration: fields.duration,
        rating: fields.rating,
        genre: fields.genre.clone(),
    })
}

/// Fetch one movie by id within `filter`
pub async fn get_movie(pool: &SqlitePool, id: i64, filter: &MovieFilter) -> Result<MovieRecord> {
    let sql = format!(
        "{} WHERE id = ? AND {}",
        SELECT_COLUMNS,
        filter_condition(filter)
    );

    let mut query = sqlx::query_as::<_, MovieRecord>(&sql).bind(id);
    if let Some(genre) = filter_genre(filter) {
        query = query.bind(genre);
    }

    query.fetch_optional(pool).await?.ok_or_else(|| not_found(id))
}

/// All movies in `filter`, ordered by id
pub async fn list_movies(pool: &SqlitePool, filter: &MovieFilter) -> Result<Vec<MovieRecord>> {
    let sql = format!(
        "{} WHERE {} ORDER BY id",
        SELECT_COLUMNS,
        filter_condition(filter)
    );

    let mut query = sqlx::query_as::<_, MovieRecord>(&sql);
    if let Some(genre) = filter_genre(filter) {
        query = query.bind(genre);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Number of movies in `filter`
pub async fn count_movies(pool: &SqlitePool, filter: &MovieFilter) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM movies WHERE {}",
        filter_condition(filter)
    );

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    if let Some(genre) = filter_genre(filter) {
        query = query.bind(genre);
    }

    Ok(query.fetch_one(pool).await?)
}

/// One window of movies in `filter`, ordered by id
pub async fn list_movies_page(
    pool: &SqlitePool,
    filter: &MovieFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<MovieRecord>> {
    let sql = format!(
        "{} WHERE {} ORDER BY id LIMIT ? OFFSET ?",
        SELECT_COLUMNS,
        filter_condition(filter)
    );

    let mut query = sqlx::query_as::<_, MovieRecord>(&sql);
    if let Some(genre) = filter_genre(filter) {
        query = query.bind(genre);
    }

    Ok(query.bind(limit).bind(offset).fetch_all(pool).await?)
}

/// Apply `changes` to the movie with `id` inside `filter`
///
/// The merged record is validated as a whole before it is written. An empty
/// change set returns the record untouched.
pub async fn update_movie(
    pool: &SqlitePool,
    id: i64,
    filter: &MovieFilter,
    changes: &MovieChanges,
) -> Result<MovieRecord> {
    let existing = get_movie(pool, id, filter).await?;
    if changes.is_empty() {
        return Ok(existing);
    }

    let fields = changes.apply_to(&existing);
    fields.validate()?;

    let result = sqlx::query(
        "UPDATE movies SET name = ?, duration = ?, rating = ?, genre = ? WHERE id = ?",
    )
    .bind(&fields.name)
    .bind(fields.duration)
    .bind(fields.rating)
    .bind(&fields.genre)
    .bind(id)
    .execute(pool)
    .await?;

    // Deleted between the lookup and the write
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    debug!("Updated movie {}", id);

    Ok(MovieRecord {
        id,
        name: fields.name,
        duration: fields.duration,
        rating: fields.rating,
        genre: fields.genre,
    })
}

/// Delete the movie with `id` inside `filter`
pub async fn delete_movie(pool: &SqlitePool, id: i64, filter: &MovieFilter) -> Result<()> {
    let sql = format!(
        "DELETE FROM movies WHERE id = ? AND {}",
        filter_condition(filter)
    );

    let mut query = sqlx::query(&sql).bind(id);
    if let Some(genre) = filter_genre(filter) {
        query = query.bind(genre);
    }

    let result = query.execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    info!("Deleted movie {}", id);
    Ok(())
}
