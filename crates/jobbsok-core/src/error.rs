use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all errors the job post services can surface.
/// It uses the `thiserror` crate for ergonomic error handling and
/// automatic conversion from underlying library errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// Wraps all errors from SQLx database operations, including
    /// connection failures, query errors, and constraint violations.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No job post exists with the requested identifier.
    #[error("Job post not found: {0}")]
    JobPostNotFound(i64),

    /// Creation was attempted with a missing or incorrect secret key.
    ///
    /// The message deliberately does not include the expected key.
    #[error("Invalid secret key")]
    BadSecretKey,

    /// A municipality token has no entry in the geography table.
    ///
    /// This is a data gap on the server side, not a client error:
    /// the request fails rather than silently matching nothing.
    #[error("Unknown municipality: {0}")]
    UnknownMunicipality(String),
}
