//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving a build configuration.
///
/// All of these are fatal and surface before any output directory is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Version string \"{input}\" must contain exactly three integer parts separated by dots (e.g., \"1.2.3\")")]
    InvalidVersionFormat { input: String },

    #[error("The version segment \"{segment}\" is not a valid integer")]
    InvalidVersionSegment { segment: String },

    #[error("The environment variable '{key}' is required but not set")]
    MissingEnv { key: String },

    #[error("Failed to read identity file {path}: {source}")]
    IdentityRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse identity file {path}: {source}")]
    IdentityParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
