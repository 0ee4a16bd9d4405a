//! Basic packing
//!
//! Copies every eligible file of a pack source tree into its output
//! directory, converting `.json5` files to plain `.json` on the way.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use walkdir::WalkDir;

use crate::error::PackError;

/// Files processed at once
const PACK_CONCURRENCY: usize = 32;

/// Copies a pack source tree into an output directory
#[async_trait]
pub trait Packer: Send + Sync {
    async fn pack(&self, src_dir: &Path, out_dir: &Path) -> Result<(), PackError>;
}

/// Default packer.
///
/// Skips `scripts/` (bundled separately) and a root `tsconfig.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePacker;

#[async_trait]
impl Packer for FilePacker {
    async fn pack(&self, src_dir: &Path, out_dir: &Path) -> Result<(), PackError> {
        if !src_dir.is_dir() {
            return Err(PackError::MissingSource(src_dir.to_path_buf()));
        }

        let root = src_dir.to_path_buf();
        let entries = tokio::task::spawn_blocking(move || collect_entries(&root)).await??;
        tracing::debug!("Packing {} files from {}", entries.len(), src_dir.display());

        stream::iter(entries)
            .map(|relative| pack_file(src_dir, out_dir, relative))
            .buffer_unordered(PACK_CONCURRENCY)
            .try_collect::<Vec<()>>()
            .await?;

        Ok(())
    }
}

/// Relative paths of every eligible file under `root`, dotfiles included
fn collect_entries(root: &Path) -> Result<Vec<PathBuf>, PackError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };

        if !is_ignored(&relative) {
            entries.push(relative);
        }
    }

    Ok(entries)
}

fn is_ignored(relative: &Path) -> bool {
    let mut components = relative.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "scripts" => components.next().is_some(),
        Some(Component::Normal(first)) if first == "tsconfig.json" => components.next().is_none(),
        _ => false,
    }
}

async fn pack_file(src_dir: &Path, out_dir: &Path, relative: PathBuf) -> Result<(), PackError> {
    let src_path = src_dir.join(&relative);

    if relative.extension().is_some_and(|ext| ext == "json5") {
        let dest_path = out_dir.join(relative.with_extension("json"));
        let text = read_to_string(&src_path).await?;
        let json = transpile_json5(&src_path, &text)?;
        ensure_parent(&dest_path).await?;
        return tokio::fs::write(&dest_path, json)
            .await
            .map_err(|source| PackError::Io {
                path: dest_path,
                source,
            });
    }

    let dest_path = out_dir.join(&relative);
    ensure_parent(&dest_path).await?;
    tokio::fs::copy(&src_path, &dest_path)
        .await
        .map_err(|source| PackError::Io {
            path: src_path,
            source,
        })?;
    Ok(())
}

/// Parse JSON5 text and render it as pretty-printed JSON (2-space indent)
pub fn transpile_json5(path: &Path, text: &str) -> Result<String, PackError> {
    let value: serde_json::Value = json5::from_str(text).map_err(|e| PackError::Json5 {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::to_string_pretty(&value).map_err(|source| PackError::Json {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_to_string(path: &Path) -> Result<String, PackError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PackError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn ensure_parent(path: &Path) -> Result<(), PackError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PackError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    Ok(())
}
