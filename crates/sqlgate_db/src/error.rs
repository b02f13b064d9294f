//! Error types for the driver layer.

use thiserror::Error;

/// Driver layer result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Errors surfaced at the driver boundary.
///
/// Profile resolution is total, so malformed values first become errors
/// here, where the profile is turned into something the driver checks.
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLx error (connection, handshake, query)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// The resolved port string is not a TCP port
    #[error("Invalid port '{0}': expected an integer in 1-65535")]
    InvalidPort(String),
}
