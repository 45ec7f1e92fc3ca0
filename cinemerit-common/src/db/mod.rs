//! Database initialization, models and the movie record store

pub mod init;
pub mod models;
pub mod movies;

pub use init::*;
pub use models::*;
pub use movies::*;
