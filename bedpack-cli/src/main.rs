//! Bedpack CLI
//!
//! Command-line interface for building Bedrock addon packs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bedpack_build::{watch, BuildServices, Builder, DEFAULT_DEBOUNCE, DEFAULT_ESBUILD};
use bedpack_core::{
    resolve_against, AddonIdentity, BuildOptions, ProcessEnv, ProjectConfig, DEFAULT_VERSION,
    IDENTITY_FILE,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bedpack")]
#[command(about = "Build pipeline for Bedrock behavior and resource packs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build both packs into dist/
    Build {
        /// Dev build: output to dist/dev and sync to DEV_BP_PREFIX / DEV_RP_PREFIX
        #[arg(long)]
        dev: bool,

        /// Addon version (major.minor.patch)
        #[arg(long = "version", value_name = "VERSION", default_value = DEFAULT_VERSION)]
        pack_version: String,

        /// Project root (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// esbuild executable used to bundle scripts
        #[arg(long, env = "BEDPACK_ESBUILD", default_value = DEFAULT_ESBUILD)]
        esbuild: String,

        /// Keep running and rebuild when sources change
        #[arg(short, long)]
        watch: bool,
    },

    /// Initialize a new addon project
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Addon display name
        #[arg(short, long)]
        name: Option<String>,

        /// Folder name used for sync targets (default: derived from the name)
        #[arg(short, long)]
        slug: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bedpack=info".parse()?)
                .add_directive("bedpack_core=info".parse()?)
                .add_directive("bedpack_build=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            dev,
            pack_version,
            root,
            esbuild,
            watch,
        } => {
            cmd_build(dev, pack_version, root, esbuild, watch).await?;
        }
        Commands::Init { path, name, slug } => {
            cmd_init(path, name, slug)?;
        }
    }

    Ok(())
}

fn project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(match root {
        Some(root) => resolve_against(&cwd, root),
        None => cwd,
    })
}

/// Build both packs
async fn cmd_build(
    dev: bool,
    version: String,
    root: Option<PathBuf>,
    esbuild: String,
    watch_sources: bool,
) -> Result<()> {
    let root = project_root(root)?;
    let identity = AddonIdentity::load_or_default(&root)?;
    let options = BuildOptions {
        dev,
        version,
        root,
        identity,
    };

    // Everything that can be wrong with the inputs fails here, before any
    // output directory is touched
    let config = ProjectConfig::resolve(&options, &ProcessEnv).context("Invalid build configuration")?;

    let builder = Builder::new(BuildServices::system(esbuild));
    let report = builder.build(&config).await.context("Build failed")?;

    println!(
        "Built {} into {} in {:.2?}",
        config.display_name,
        report.output_root.display(),
        report.elapsed
    );
    if report.synced > 0 {
        println!("Synced to {} targets", report.synced);
    }

    if watch_sources {
        println!("Watching for changes. Press Ctrl+C to stop.");
        tokio::select! {
            result = watch(&builder, &config, DEFAULT_DEBOUNCE) => result.context("Watch mode failed")?,
            _ = tokio::signal::ctrl_c() => tracing::info!("Stopping watcher"),
        }
    }

    Ok(())
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Initialize a new project
fn cmd_init(path: Option<PathBuf>, name: Option<String>, slug: Option<String>) -> Result<()> {
    let project_dir = project_root(path)?;
    let identity_path = project_dir.join(IDENTITY_FILE);
    if identity_path.exists() {
        anyhow::bail!("{} already exists", identity_path.display());
    }

    let name = name.unwrap_or_else(|| {
        project_dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "My Addon".to_string())
    });
    let slug = slug.unwrap_or_else(|| slugify(&name));
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from '{}'; pass --slug", name);
    }

    tracing::info!("Initializing addon project: {}", name);

    let identity = AddonIdentity::new(slug, name.clone(), format!("{} addon", name));
    write_skeleton(&project_dir)?;

    let identity_json = serde_json::to_string_pretty(&identity)?;
    std::fs::write(&identity_path, identity_json).context("Failed to write bedpack.json")?;

    println!("Initialized addon '{}' at {:?}", name, project_dir);
    println!("\nProject structure:");
    println!("  bedpack.json            - Addon identity (names, pack UUIDs)");
    println!("  src/bp/                 - Behavior pack sources");
    println!("  src/bp/scripts/entry.ts - Script entry point");
    println!("  src/rp/                 - Resource pack sources");
    println!("\nNext steps:");
    println!("  1. Set DEV_BP_PREFIX and DEV_RP_PREFIX to your development pack folders");
    println!("  2. Run: bedpack build --dev --watch");

    Ok(())
}

fn write_skeleton(project_dir: &Path) -> Result<()> {
    let scripts_dir = project_dir.join("src").join("bp").join("scripts");
    let rp_dir = project_dir.join("src").join("rp");

    std::fs::create_dir_all(&scripts_dir).context("Failed to create src/bp/scripts directory")?;
    std::fs::create_dir_all(&rp_dir).context("Failed to create src/rp directory")?;

    let entry = scripts_dir.join("entry.ts");
    if !entry.exists() {
        let entry_content = r#"import { world } from "@minecraft/server";

world.afterEvents.worldLoad.subscribe(() => {
  console.log("Addon loaded");
});
"#;
        std::fs::write(&entry, entry_content).context("Failed to write entry.ts")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Slasher Sword"), "slasher-sword");
        assert_eq!(slugify("  My  Cool_Addon!! "), "my-cool-addon");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["bedpack", "build"]);
        match cli.command {
            Commands::Build {
                dev,
                pack_version,
                watch,
                ..
            } => {
                assert!(!dev);
                assert!(!watch);
                assert_eq!(pack_version, "0.0.1");
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_cli_build_flags() {
        let cli = Cli::parse_from(["bedpack", "build", "--dev", "--version", "2.1.0"]);
        match cli.command {
            Commands::Build { dev, pack_version, .. } => {
                assert!(dev);
                assert_eq!(pack_version, "2.1.0");
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_init_writes_identity_and_skeleton() {
        let temp_dir = TempDir::new().unwrap();
        cmd_init(
            Some(temp_dir.path().to_path_buf()),
            Some("Slasher Sword".to_string()),
            None,
        )
        .unwrap();

        let identity = AddonIdentity::load(&temp_dir.path().join(IDENTITY_FILE)).unwrap();
        assert_eq!(identity.slug, "slasher-sword");
        assert_eq!(identity.name, "Slasher Sword");
        assert!(temp_dir.path().join("src/bp/scripts/entry.ts").is_file());
        assert!(temp_dir.path().join("src/rp").is_dir());

        // A second init must not clobber the identity
        assert!(cmd_init(Some(temp_dir.path().to_path_buf()), None, None).is_err());
    }
}
