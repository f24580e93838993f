//! Typed errors for the server side of the api crate.
//!
//! Server functions log these with `tracing` and convert them into a
//! [`ServerFnError`] at the boundary, so the client always sees an explicit
//! error instead of an empty result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A looked-up record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The acting user is not signed in or does not own the record.
    #[error("unauthorized")]
    Unauthorized,

    /// The user's credit balance cannot cover the transformation fee.
    #[error("insufficient credits")]
    InsufficientCredits,

    /// A required environment variable is missing.
    #[error("configuration error: {0}")]
    Config(&'static str),

    /// A submitted record failed validation.
    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("invalid object id: {0}")]
    InvalidId(#[from] mongodb::bson::oid::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The image-processing provider rejected a request.
    #[error("image provider error: {0}")]
    Provider(String),

    #[error("{0}")]
    Auth(String),
}
