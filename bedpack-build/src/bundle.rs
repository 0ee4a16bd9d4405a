//! Script bundling
//!
//! Compiles the behavior pack's TypeScript entry point and everything it
//! imports into a single ES module with esbuild. Game-provided modules
//! (`@minecraft/*`) stay external.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BundleError;
use crate::process::{CommandRunner, SystemRunner};

/// Default esbuild executable
pub const DEFAULT_ESBUILD: &str = "esbuild";

/// Bundles a script entry point into an output directory
#[async_trait]
pub trait ScriptBundler: Send + Sync {
    async fn bundle(&self, entry: &Path, out_dir: &Path) -> Result<(), BundleError>;
}

/// Runs the esbuild CLI
#[derive(Clone)]
pub struct EsbuildBundler {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl EsbuildBundler {
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(program, Arc::new(SystemRunner))
    }

    pub fn with_runner(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    fn args(entry: &Path, out_dir: &Path) -> Vec<String> {
        vec![
            entry.to_string_lossy().into_owned(),
            "--bundle".to_string(),
            "--platform=node".to_string(),
            "--format=esm".to_string(),
            "--external:@minecraft/*".to_string(),
            format!("--outdir={}", out_dir.to_string_lossy()),
        ]
    }
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self::new(DEFAULT_ESBUILD)
    }
}

#[async_trait]
impl ScriptBundler for EsbuildBundler {
    async fn bundle(&self, entry: &Path, out_dir: &Path) -> Result<(), BundleError> {
        if !entry.is_file() {
            return Err(BundleError::MissingEntry(entry.to_path_buf()));
        }

        let output = self
            .runner
            .run(&self.program, &Self::args(entry, out_dir))
            .await
            .map_err(|source| BundleError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.success() {
            return Err(BundleError::Failed {
                program: self.program.clone(),
                code: output.code,
                output: output.diagnostics(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CommandOutput;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct RecordingRunner {
        code: Option<i32>,
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl RecordingRunner {
        fn new(code: Option<i32>) -> Arc<Self> {
            Arc::new(Self {
                code,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(CommandOutput {
                code: self.code,
                stdout: String::new(),
                stderr: "✘ [ERROR] Could not resolve \"./missing\"".to_string(),
            })
        }
    }

    fn entry_file(temp_dir: &TempDir) -> std::path::PathBuf {
        let entry = temp_dir.path().join("entry.ts");
        std::fs::write(&entry, "export {};").unwrap();
        entry
    }

    #[tokio::test]
    async fn test_bundle_invokes_esbuild() {
        let temp_dir = TempDir::new().unwrap();
        let entry = entry_file(&temp_dir);
        let out_dir = temp_dir.path().join("out").join("scripts");
        let runner = RecordingRunner::new(Some(0));

        EsbuildBundler::with_runner("npx-esbuild", runner.clone())
            .bundle(&entry, &out_dir)
            .await
            .unwrap();

        let calls = runner.calls.lock().unwrap();
        let (program, args) = &calls[0];
        assert_eq!(program, "npx-esbuild");
        assert_eq!(args[0], entry.to_string_lossy());
        assert!(args.contains(&"--bundle".to_string()));
        assert!(args.contains(&"--format=esm".to_string()));
        assert!(args.contains(&"--external:@minecraft/*".to_string()));
        assert_eq!(args.last().unwrap(), &format!("--outdir={}", out_dir.to_string_lossy()));
    }

    #[tokio::test]
    async fn test_bundle_failure() {
        let temp_dir = TempDir::new().unwrap();
        let entry = entry_file(&temp_dir);

        let err = EsbuildBundler::with_runner(DEFAULT_ESBUILD, RecordingRunner::new(Some(1)))
            .bundle(&entry, temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, BundleError::Failed { code: Some(1), .. }));
        assert!(err.to_string().contains("Could not resolve"));
    }

    #[tokio::test]
    async fn test_bundle_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new(Some(0));

        let err = EsbuildBundler::with_runner(DEFAULT_ESBUILD, runner.clone())
            .bundle(&temp_dir.path().join("entry.ts"), temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, BundleError::MissingEntry(_)));
        assert!(runner.calls.lock().unwrap().is_empty());
    }
}
