//! Build error types

use std::path::PathBuf;

use thiserror::Error;

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated".to_string(),
    }
}

/// Failure to translate a Linux path into Windows syntax.
///
/// This is an expected outcome on hosts without `wslpath`; the synchronizer
/// treats it as "not reachable from Windows" rather than as an error.
#[derive(Debug, Clone, Error)]
pub enum TranslateError {
    #[error("wslpath is unavailable: {0}")]
    Unavailable(String),

    #[error("wslpath could not translate {} (exit code {}): {output}", .path.display(), exit_code(.code))]
    Failed {
        path: PathBuf,
        code: Option<i32>,
        output: String,
    },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{tool} failed (exit code {}): {output}", exit_code(.code))]
    ToolFailed {
        tool: &'static str,
        code: Option<i32>,
        output: String,
    },

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Path translation failed: {0}")]
    PathTranslation(#[from] TranslateError),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Pack source directory not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON5 in {}: {message}", .path.display())]
    Json5 { path: PathBuf, message: String },

    #[error("Failed to serialize {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Pack task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Script entry point not found: {}", .0.display())]
    MissingEntry(PathBuf),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed (exit code {}): {output}", exit_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },
}

/// Any failure during a build run. Collaborator errors pass through unchanged.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}
