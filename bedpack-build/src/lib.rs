//! Bedpack Build
//!
//! Async build pipeline for Bedrock addons: packs both source trees,
//! bundles behavior pack scripts, writes manifests and mirrors the output
//! to sync targets with the best copy tool the host offers.

pub mod build;
pub mod bundle;
pub mod error;
pub mod pack;
pub mod process;
pub mod sync;
pub mod watch;

pub use build::{BuildReport, BuildServices, Builder, MANIFEST_FILE};
pub use bundle::{EsbuildBundler, ScriptBundler, DEFAULT_ESBUILD};
pub use error::{BuildError, BundleError, PackError, SyncError, TranslateError};
pub use pack::{FilePacker, Packer};
pub use process::{CommandOutput, CommandRunner, SystemRunner};
pub use sync::{DirectorySynchronizer, HostPlatform, SyncStrategy, Syncer};
pub use watch::{watch, DEFAULT_DEBOUNCE};
