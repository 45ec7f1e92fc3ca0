//! # Cinemerit Common Library
//!
//! Shared code for the Cinemerit movie catalog:
//! - Database initialization and the movie record store
//! - Record models and field validation
//! - Bootstrap configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result, ValidationErrors};
