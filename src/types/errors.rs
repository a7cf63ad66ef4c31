//! Error types for fructcheck.

use thiserror::Error;

/// Default result type for fructcheck.
pub type FructResult<T> = Result<T, FructError>;

/// Errors produced while resolving and evaluating a food.
#[derive(Error, Debug)]
pub enum FructError {
    /// The query did not resolve to a recognizable food.
    #[error("Ingredient not recognized: {0}")]
    NotFound(String),

    /// The allowed-amount math hit degenerate serving data.
    #[error("Cannot compute allowed amount: {0}")]
    Domain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Nutritionix credentials missing: set {0}")]
    MissingCredentials(String),

    #[error("Nutritionix returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Prompt error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

impl FructError {
    /// Creates a lookup failure for the given query.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates an allowed-amount computation failure.
    pub fn domain<S: Into<String>>(msg: S) -> Self {
        Self::Domain(msg.into())
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// True when the food could not be found; front ends render this as
    /// "try another search" instead of a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
