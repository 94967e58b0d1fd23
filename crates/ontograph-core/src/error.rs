use thiserror::Error;

/// Top-level error type for Ontograph configuration and input handling.
#[derive(Error, Debug)]
pub enum OntographError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid assignment '{0}': expected key=value")]
    InvalidAssignment(String),
}
