//! Directory synchronization
//!
//! Mirrors a build output directory into a sync target so the destination
//! ends up with exactly the source's files (extraneous files are deleted).
//! The copy tool depends on the host:
//!
//! 1. Windows: `robocopy /MIR`
//! 2. WSL, when the destination is reachable from Windows: `robocopy.exe`
//!    on paths translated with `wslpath -w`
//! 3. Linux/macOS: `rsync -az --delete`
//! 4. Anything else is unsupported

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bedpack_core::{is_windows_drive_path, looks_like_wsl_mount, with_trailing_slash};

use crate::error::{SyncError, TranslateError};
use crate::process::{CommandOutput, CommandRunner, SystemRunner};

const ROBOCOPY: &str = "robocopy.exe";
const RSYNC: &str = "rsync";
const WSLPATH: &str = "wslpath";

/// Mirror, copy data and timestamps, no retries, multithreaded, skip junctions
const ROBOCOPY_FLAGS: [&str; 7] = ["/MIR", "/COPY:DT", "/DCOPY:DAT", "/R:0", "/W:0", "/MT:32", "/XJ"];

/// Robocopy exit codes below this only describe what was copied; 8 and up
/// mean at least one copy failed.
const ROBOCOPY_FAILURE_THRESHOLD: i32 = 8;

/// Anything that can mirror one directory into another
#[async_trait]
pub trait Syncer: Send + Sync {
    async fn sync(&self, source: &Path, destination: &Path) -> Result<(), SyncError>;
}

/// The operating system the build runs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    /// Linux under the Windows Subsystem for Linux
    Wsl,
    Linux,
    MacOs,
    Other(String),
}

impl HostPlatform {
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => HostPlatform::Windows,
            "linux" => {
                let release = std::fs::read_to_string("/proc/sys/kernel/osrelease").unwrap_or_default();
                if is_wsl_release(&release) {
                    HostPlatform::Wsl
                } else {
                    HostPlatform::Linux
                }
            }
            "macos" => HostPlatform::MacOs,
            other => HostPlatform::Other(other.to_string()),
        }
    }

    /// Hosts with a usable `rsync`
    pub fn is_posix(&self) -> bool {
        matches!(self, HostPlatform::Linux | HostPlatform::Wsl | HostPlatform::MacOs)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Windows => write!(f, "windows"),
            HostPlatform::Wsl => write!(f, "linux (wsl)"),
            HostPlatform::Linux => write!(f, "linux"),
            HostPlatform::MacOs => write!(f, "macos"),
            HostPlatform::Other(name) => write!(f, "{}", name),
        }
    }
}

fn is_wsl_release(release: &str) -> bool {
    let release = release.to_lowercase();
    release.contains("microsoft") || release.contains("wsl")
}

/// How a single sync is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    Robocopy,
    /// robocopy.exe called from WSL with Windows-syntax paths
    WslRobocopy,
    Rsync,
}

impl SyncStrategy {
    pub async fn mirror(
        self,
        runner: &dyn CommandRunner,
        source: &Path,
        destination: &Path,
    ) -> Result<(), SyncError> {
        match self {
            SyncStrategy::Robocopy => {
                robocopy(
                    runner,
                    &source.to_string_lossy(),
                    &destination.to_string_lossy(),
                )
                .await
            }
            SyncStrategy::WslRobocopy => {
                // wslpath only translates paths that exist
                create_dir_all(destination).await?;
                let source = to_windows_path(runner, source).await?;
                let destination = to_windows_path(runner, destination).await?;
                robocopy(runner, &source, &destination).await
            }
            SyncStrategy::Rsync => rsync(runner, source, destination).await,
        }
    }
}

/// Picks a [`SyncStrategy`] for each destination and runs it
#[derive(Clone)]
pub struct DirectorySynchronizer {
    host: HostPlatform,
    runner: Arc<dyn CommandRunner>,
}

impl DirectorySynchronizer {
    /// Synchronizer for the current host running real processes
    pub fn new() -> Self {
        Self::with_runner(HostPlatform::detect(), Arc::new(SystemRunner))
    }

    pub fn with_runner(host: HostPlatform, runner: Arc<dyn CommandRunner>) -> Self {
        Self { host, runner }
    }

    pub fn host(&self) -> &HostPlatform {
        &self.host
    }

    /// Choose how to mirror into `destination`; the first matching rule wins
    pub async fn select_strategy(&self, destination: &Path) -> Result<SyncStrategy, SyncError> {
        if self.host == HostPlatform::Windows {
            return Ok(SyncStrategy::Robocopy);
        }

        if self.host == HostPlatform::Wsl && self.is_windows_reachable(destination).await {
            return Ok(SyncStrategy::WslRobocopy);
        }

        if self.host.is_posix() {
            return Ok(SyncStrategy::Rsync);
        }

        Err(SyncError::UnsupportedPlatform(self.host.to_string()))
    }

    /// Can robocopy.exe reach this path? `/mnt/<drive>/` is accepted without
    /// spawning anything; otherwise ask wslpath and look for a drive letter.
    async fn is_windows_reachable(&self, path: &Path) -> bool {
        if looks_like_wsl_mount(path) {
            return true;
        }

        match to_windows_path(self.runner.as_ref(), path).await {
            Ok(translated) => is_windows_drive_path(&translated),
            Err(e) => {
                tracing::debug!("Treating {} as Linux-only: {}", path.display(), e);
                false
            }
        }
    }
}

impl Default for DirectorySynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Syncer for DirectorySynchronizer {
    async fn sync(&self, source: &Path, destination: &Path) -> Result<(), SyncError> {
        let strategy = self.select_strategy(destination).await?;
        tracing::debug!(
            "Syncing {} -> {} via {:?}",
            source.display(),
            destination.display(),
            strategy
        );
        strategy.mirror(self.runner.as_ref(), source, destination).await
    }
}

/// Translate a Linux path with `wslpath -w`
pub async fn to_windows_path(runner: &dyn CommandRunner, path: &Path) -> Result<String, TranslateError> {
    let args = ["-w".to_string(), path.to_string_lossy().into_owned()];
    let output = runner
        .run(WSLPATH, &args)
        .await
        .map_err(|e| TranslateError::Unavailable(e.to_string()))?;

    if !output.success() {
        return Err(TranslateError::Failed {
            path: path.to_path_buf(),
            code: output.code,
            output: output.diagnostics(),
        });
    }

    Ok(output.stdout.trim().to_string())
}

async fn robocopy(runner: &dyn CommandRunner, source: &str, destination: &str) -> Result<(), SyncError> {
    let mut args = vec![source.to_string(), destination.to_string()];
    args.extend(ROBOCOPY_FLAGS.iter().map(|flag| flag.to_string()));

    let output = runner
        .run(ROBOCOPY, &args)
        .await
        .map_err(|source| SyncError::Spawn {
            tool: ROBOCOPY,
            source,
        })?;

    check_robocopy_exit(&output)
}

fn check_robocopy_exit(output: &CommandOutput) -> Result<(), SyncError> {
    match output.code {
        Some(code) if (0..ROBOCOPY_FAILURE_THRESHOLD).contains(&code) => Ok(()),
        code => Err(SyncError::ToolFailed {
            tool: ROBOCOPY,
            code,
            output: output.diagnostics(),
        }),
    }
}

async fn rsync(runner: &dyn CommandRunner, source: &Path, destination: &Path) -> Result<(), SyncError> {
    create_dir_all(destination).await?;

    let args = [
        "-az".to_string(),
        "--delete".to_string(),
        with_trailing_slash(source),
        destination.to_string_lossy().into_owned(),
    ];

    let output = runner
        .run(RSYNC, &args)
        .await
        .map_err(|source| SyncError::Spawn { tool: RSYNC, source })?;

    if !output.success() {
        return Err(SyncError::ToolFailed {
            tool: RSYNC,
            code: output.code,
            output: output.diagnostics(),
        });
    }

    Ok(())
}

async fn create_dir_all(path: &Path) -> Result<(), SyncError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| SyncError::Io {
            path: path.to_path_buf(),
            source,
        })
}
