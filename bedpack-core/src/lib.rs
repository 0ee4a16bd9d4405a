//! Bedpack Core Library
//!
//! This crate provides the build-independent pieces of Bedpack:
//! - Version parsing and formatting
//! - Addon identity (slug, names, stable pack UUIDs)
//! - Behavior/resource pack manifest documents
//! - Project configuration resolution for a single build run
//! - Cross-platform path helpers used by the directory synchronizer

pub mod env;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod path_utils;
pub mod project;
pub mod version;

// Re-export commonly used types
pub use env::{Env, ProcessEnv, DEV_BP_PREFIX, DEV_RP_PREFIX};
pub use error::ConfigError;
pub use identity::{AddonIdentity, PackUuids, IDENTITY_FILE};
pub use manifest::{Manifest, ManifestDependency, ManifestHeader, ManifestModule};
pub use path_utils::{is_windows_drive_path, looks_like_wsl_mount, resolve_against, with_trailing_slash};
pub use project::{BuildOptions, PackKind, PackTarget, ProjectConfig, DEFAULT_VERSION};
pub use version::Version;
