//! Movie transfer representation
//!
//! Outbound, a movie is `{"id", "name", "duration", "rating"}`. Genre is
//! accepted on input but is not part of the outbound shape.
//!
//! Inbound payloads are checked field by field so a single response can
//! report every offending field. Unknown keys and `id` are ignored.

use cinemerit_common::db::{
    MovieChanges, MovieFields, MovieRecord, GENRE_MAX_LENGTH, NAME_MAX_LENGTH,
};
use cinemerit_common::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_A_NUMBER: &str = "A valid number is required.";

/// Wire shape of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRepr {
    pub id: i64,
    pub name: String,
    pub duration: f64,
    pub rating: f64,
}

impl From<&MovieRecord> for MovieRepr {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            duration: record.duration,
            rating: record.rating,
        }
    }
}

pub fn serialize(record: &MovieRecord) -> MovieRepr {
    MovieRepr::from(record)
}

pub fn serialize_many(records: &[MovieRecord]) -> Vec<MovieRepr> {
    records.iter().map(MovieRepr::from).collect()
}

/// Full payload for create and `PUT`: name, duration and rating required
pub fn deserialize(payload: &Value) -> Result<MovieFields, ValidationErrors> {
    let map = as_object(payload)?;
    let mut errors = ValidationErrors::new();

    let name = required(map, "name", &mut errors, |v| parse_text(v, NAME_MAX_LENGTH));
    let duration = required(map, "duration", &mut errors, parse_number);
    let rating = required(map, "rating", &mut errors, parse_number);
    let genre = optional_text(map, "genre", &mut errors).flatten();

    match (name, duration, rating) {
        (Some(name), Some(duration), Some(rating)) if errors.is_empty() => Ok(MovieFields {
            name,
            duration,
            rating,
            genre,
        }),
        _ => Err(errors),
    }
}

/// Partial payload for `PATCH`: only supplied fields are checked
pub fn deserialize_partial(payload: &Value) -> Result<MovieChanges, ValidationErrors> {
    let map = as_object(payload)?;
    let mut errors = ValidationErrors::new();

    let changes = MovieChanges {
        name: present(map, "name", &mut errors, |v| parse_text(v, NAME_MAX_LENGTH)),
        duration: present(map, "duration", &mut errors, parse_number),
        rating: present(map, "rating", &mut errors, parse_number),
        genre: optional_text(map, "genre", &mut errors),
    };

    errors.into_result().map(|()| changes)
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    payload.as_object().ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(
            "non_field_errors",
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(payload)
            ),
        );
        errors
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required<T>(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
    parse: impl Fn(&Value) -> Result<T, String>,
) -> Option<T> {
    if !map.contains_key(key) {
        errors.add(key, REQUIRED);
        return None;
    }
    present(map, key, errors, parse)
}

fn present<T>(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
    parse: impl Fn(&Value) -> Result<T, String>,
) -> Option<T> {
    match parse(map.get(key)?) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.add(key, message);
            None
        }
    }
}

/// Genre: absent → `None`, null → `Some(None)`
fn optional_text(
    map: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<Option<String>> {
    match map.get(key)? {
        Value::Null => Some(None),
        value => match parse_text(value, GENRE_MAX_LENGTH) {
            Ok(text) => Some(Some(text)),
            Err(message) => {
                errors.add(key, message);
                None
            }
        },
    }
}

/// Strings are trimmed; numbers are accepted as their decimal text
fn parse_text(value: &Value, max_length: usize) -> Result<String, String> {
    let text = match value {
        Value::Null => return Err(NOT_NULL.to_string()),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_A_STRING.to_string()),
    };

    if text.is_empty() {
        return Err(NOT_BLANK.to_string());
    }
    if text.chars().count() > max_length {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            max_length
        ));
    }
    Ok(text)
}

/// JSON numbers and numeric strings; booleans and non-finite values rejected
fn parse_number(value: &Value) -> Result<f64, String> {
    let number = match value {
        Value::Null => return Err(NOT_NULL.to_string()),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| NOT_A_NUMBER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_omits_genre() {
        let record = MovieRecord {
            id: 1,
            name: "Inception".to_string(),
            duration: 148.0,
            rating: 8.8,
            genre: Some("Scifi".to_string()),
        };

        let value = serde_json::to_value(serialize(&record)).unwrap();

        assert_eq!(
            value,
            json!({"id": 1, "name": "Inception", "duration": 148.0, "rating": 8.8})
        );
    }

    #[test]
    fn test_deserialize_full_payload() {
        let fields = deserialize(&json!({
            "id": 99,
            "name": "  Titanic ",
            "duration": 195,
            "rating": "7.8",
            "genre": "Drama",
        }))
        .unwrap();

        assert_eq!(fields.name, "Titanic");
        assert_eq!(fields.duration, 195.0);
        assert_eq!(fields.rating, 7.8);
        assert_eq!(fields.genre.as_deref(), Some("Drama"));
    }

    #[test]
    fn test_deserialize_genre_null_or_missing() {
        let missing = deserialize(&json!({"name": "A", "duration": 1, "rating": 2})).unwrap();
        let null = deserialize(&json!({"name": "A", "duration": 1, "rating": 2, "genre": null}))
            .unwrap();
        assert!(missing.genre.is_none());
        assert!(null.genre.is_none());
    }

    #[test]
    fn test_deserialize_reports_every_missing_field() {
        let errors = deserialize(&json!({})).unwrap_err();

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            ["duration", "name", "rating"]
        );
        assert_eq!(errors.get("name").unwrap(), [REQUIRED]);
    }

    #[test]
    fn test_deserialize_wrong_types() {
        let errors = deserialize(&json!({
            "name": ["Inception"],
            "duration": true,
            "rating": "eight",
            "genre": 12.5,
        }))
        .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), [NOT_A_STRING]);
        assert_eq!(errors.get("duration").unwrap(), [NOT_A_NUMBER]);
        assert_eq!(errors.get("rating").unwrap(), [NOT_A_NUMBER]);
        // Numbers are acceptable text
        assert!(errors.get("genre").is_none());
    }

    #[test]
    fn test_deserialize_nulls_and_blanks() {
        let errors = deserialize(&json!({
            "name": "   ",
            "duration": null,
            "rating": 1.0,
            "genre": "",
        }))
        .unwrap_err();

        assert_eq!(errors.get("name").unwrap(), [NOT_BLANK]);
        assert_eq!(errors.get("duration").unwrap(), [NOT_NULL]);
        assert_eq!(errors.get("genre").unwrap(), [NOT_BLANK]);
    }

    #[test]
    fn test_deserialize_rejects_non_finite_strings() {
        let errors = deserialize(&json!({"name": "A", "duration": "inf", "rating": "NaN"}))
            .unwrap_err();
        assert!(errors.get("duration").is_some());
        assert!(errors.get("rating").is_some());
    }

    #[test]
    fn test_deserialize_rejects_long_genre() {
        let errors = deserialize(&json!({
            "name": "A",
            "duration": 1,
            "rating": 1,
            "genre": "g".repeat(GENRE_MAX_LENGTH + 1),
        }))
        .unwrap_err();

        assert_eq!(
            errors.get("genre").unwrap(),
            ["Ensure this field has no more than 100 characters."]
        );
    }

    #[test]
    fn test_deserialize_non_object() {
        let errors = deserialize(&json!([1, 2])).unwrap_err();
        assert_eq!(
            errors.get("non_field_errors").unwrap(),
            ["Invalid data. Expected a dictionary, but got array."]
        );
    }

    #[test]
    fn test_deserialize_partial_only_checks_supplied_fields() {
        let changes = deserialize_partial(&json!({"rating": 9.5, "genre": null})).unwrap();

        assert_eq!(changes.rating, Some(9.5));
        assert_eq!(changes.genre, Some(None));
        assert!(changes.name.is_none());
        assert!(changes.duration.is_none());
    }

    #[test]
    fn test_deserialize_partial_rejects_bad_value() {
        let errors = deserialize_partial(&json!({"duration": "long"})).unwrap_err();
        assert_eq!(errors.get("duration").unwrap(), [NOT_A_NUMBER]);
    }

    #[test]
    fn test_round_trip_keeps_core_fields() {
        let fields = deserialize(&json!({
            "name": "Inception",
            "duration": 148.0,
            "rating": 8.8,
            "genre": "Scifi",
        }))
        .unwrap();
        let record = MovieRecord {
            id: 3,
            name: fields.name.clone(),
            duration: fields.duration,
            rating: fields.rating,
            genre: fields.genre.clone(),
        };

        let wire = serde_json::to_value(serialize(&record)).unwrap();
        let again = deserialize(&wire).unwrap();

        assert_eq!(again.name, fields.name);
        assert_eq!(again.duration, fields.duration);
        assert_eq!(again.rating, fields.rating);
        assert!(again.genre.is_none());
    }
}
