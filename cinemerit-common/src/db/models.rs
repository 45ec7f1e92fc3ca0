//! Database models

use crate::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a movie name, in characters
pub const NAME_MAX_LENGTH: usize = 255;

/// Maximum length of a genre, in characters
pub const GENRE_MAX_LENGTH: usize = 100;

/// A stored movie
///
/// `id` is assigned by the database on insert and never changes.
/// Duration is in minutes. No range checks apply to duration or rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieRecord {
    pub id: i64,
    pub name: String,
    pub duration: f64,
    pub rating: f64,
    pub genre: Option<String>,
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Complete set of writable movie fields (insert or full replacement)
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub name: String,
    pub duration: f64,
    pub rating: f64,
    pub genre: Option<String>,
}

impl MovieFields {
    /// Check the column constraints of the movies table
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "name", &self.name, NAME_MAX_LENGTH);
        check_number(&mut errors, "duration", self.duration);
        check_number(&mut errors, "rating", self.rating);
        if let Some(genre) = &self.genre {
            check_text(&mut errors, "genre", genre, GENRE_MAX_LENGTH);
        }
        errors.into_result()
    }
}

fn check_text(errors: &mut ValidationErrors, field: &str, value: &str, max_length: usize) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
    } else if value.chars().count() > max_length {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_length),
        );
    }
}

fn check_number(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !value.is_finite() {
        errors.add(field, "A valid number is required.");
    }
}

/// Partial update: only `Some` fields are written
///
/// `genre` is doubly optional: `Some(None)` clears it, `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
    pub name: Option<String>,
    pub duration: Option<f64>,
    pub rating: Option<f64>,
    pub genre: Option<Option<String>>,
}

impl MovieChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.duration.is_none()
            && self.rating.is_none()
            && self.genre.is_none()
    }

    /// Overlay these changes on an existing record
    pub fn apply_to(&self, record: &MovieRecord) -> MovieFields {
        MovieFields {
            name: self.name.clone().unwrap_or_else(|| record.name.clone()),
            duration: self.duration.unwrap_or(record.duration),
            rating: self.rating.unwrap_or(record.rating),
            genre: self.genre.clone().unwrap_or_else(|| record.genre.clone()),
        }
    }
}

impl From<MovieFields> for MovieChanges {
    fn from(fields: MovieFields) -> Self {
        Self {
            name: Some(fields.name),
            duration: Some(fields.duration),
            rating: Some(fields.rating),
            genre: Some(fields.genre),
        }
    }
}

/// Record subset selection
///
/// Genre matching is exact and case-sensitive. A genre nobody uses simply
/// selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MovieFilter {
    #[default]
    All,
    Genre(String),
}

impl MovieFilter {
    pub fn genre(genre: impl Into<String>) -> Self {
        MovieFilter::Genre(genre.into())
    }
}
