use thiserror::Error;

/// Errors from the durable memory store (used by trait definitions in webchat-core).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("constraint violation: {0}")]
    Constraint(String),
}

/// Errors raised while loading process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },

    #[error("invalid database url: {0}")]
    DatabaseUrl(String),
}
