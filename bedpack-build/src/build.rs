//! Build orchestration
//!
//! Runs one complete build:
//!
//! 1. Clear both output directories
//! 2. Pack both source trees
//! 3. Bundle behavior pack scripts
//! 4. Write both manifests
//! 5. Mirror each pack into its sync targets (if any)
//!
//! Each step finishes before the next one starts; work inside a step runs
//! concurrently. The first error aborts the build.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bedpack_core::{PackTarget, ProjectConfig};
use futures::future::try_join_all;

use crate::bundle::{EsbuildBundler, ScriptBundler};
use crate::error::BuildError;
use crate::pack::{FilePacker, Packer};
use crate::sync::{DirectorySynchronizer, Syncer};

/// Manifest file name at the root of each pack
pub const MANIFEST_FILE: &str = "manifest.json";

/// Collaborators used by a build
#[derive(Clone)]
pub struct BuildServices {
    pub packer: Arc<dyn Packer>,
    pub bundler: Arc<dyn ScriptBundler>,
    pub syncer: Arc<dyn Syncer>,
}

impl BuildServices {
    /// Real file packer, esbuild and host copy tools
    pub fn system(esbuild: impl Into<String>) -> Self {
        Self {
            packer: Arc::new(FilePacker),
            bundler: Arc::new(EsbuildBundler::new(esbuild)),
            syncer: Arc::new(DirectorySynchronizer::new()),
        }
    }
}

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_root: PathBuf,
    pub elapsed: Duration,
    /// Number of sync targets mirrored
    pub synced: usize,
}

/// Runs builds with a fixed set of collaborators
#[derive(Clone)]
pub struct Builder {
    services: BuildServices,
}

impl Builder {
    pub fn new(services: BuildServices) -> Self {
        Self { services }
    }

    pub async fn build(&self, config: &ProjectConfig) -> Result<BuildReport, BuildError> {
        let started = Instant::now();
        let (bp, rp) = (&config.bp, &config.rp);

        tracing::info!("Building {} into {}", config.display_name, config.output_root.display());

        tokio::try_join!(ensure_empty_dir(&bp.out_dir), ensure_empty_dir(&rp.out_dir))?;

        tracing::info!("Performing basic packing...");
        let packer = &self.services.packer;
        tokio::try_join!(
            packer.pack(&bp.src_dir, &bp.out_dir),
            packer.pack(&rp.src_dir, &rp.out_dir),
        )?;

        tracing::info!("Bundling behavior pack scripts...");
        self.services
            .bundler
            .bundle(&script_entry(bp), &bp.out_dir.join("scripts"))
            .await?;

        tracing::info!("Creating pack manifests...");
        tokio::try_join!(write_manifest(bp), write_manifest(rp))?;

        let synced = config.sync_target_count();
        if synced > 0 {
            tracing::info!("Syncing output to {} targets...", synced);
            self.sync_output(config).await?;
        }

        let elapsed = started.elapsed();
        tracing::info!("Build finished in {:.2?}", elapsed);

        Ok(BuildReport {
            output_root: config.output_root.clone(),
            elapsed,
            synced,
        })
    }

    /// Mirror every pack output into each of its sync targets, all at once
    async fn sync_output(&self, config: &ProjectConfig) -> Result<(), BuildError> {
        let syncer = &self.services.syncer;
        let jobs = config.packs().into_iter().flat_map(|pack| {
            pack.sync_targets
                .iter()
                .map(move |target| syncer.sync(&pack.out_dir, target))
        });

        try_join_all(jobs).await?;
        Ok(())
    }
}

/// TypeScript entry point of a pack's scripts
pub fn script_entry(pack: &PackTarget) -> PathBuf {
    pack.src_dir.join("scripts").join("entry.ts")
}

/// Delete `dir` if present, then recreate it empty
async fn ensure_empty_dir(dir: &Path) -> Result<(), BuildError> {
    let io_error = |source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    };

    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_error(e)),
    }

    tokio::fs::create_dir_all(dir).await.map_err(io_error)
}

async fn write_manifest(pack: &PackTarget) -> Result<(), BuildError> {
    let text = pack.manifest.to_json_pretty()?;
    let path = pack.out_dir.join(MANIFEST_FILE);

    tokio::fs::write(&path, text)
        .await
        .map_err(|source| BuildError::Io { path, source })
}
