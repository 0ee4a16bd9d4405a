//! Project configuration for a single build run
//!
//! [`ProjectConfig::resolve`] expands the build options, the addon identity
//! and the environment into every path, name and manifest a build needs.
//! The result is immutable and owned by the build for its whole duration.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::env::{Env, DEV_BP_PREFIX, DEV_RP_PREFIX};
use crate::error::ConfigError;
use crate::identity::{AddonIdentity, PackUuids};
use crate::manifest::Manifest;
use crate::path_utils::resolve_against;
use crate::version::Version;

/// Version used when none is given on the command line
pub const DEFAULT_VERSION: &str = "0.0.1";

/// Inputs to a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Dev builds go to `dist/dev` and are mirrored to sync targets
    pub dev: bool,
    /// Raw `major.minor.patch` string
    pub version: String,
    /// Project root; `src/` and `dist/` live directly under it
    pub root: PathBuf,
    pub identity: AddonIdentity,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            dev: false,
            version: DEFAULT_VERSION.to_string(),
            root: PathBuf::from("."),
            identity: AddonIdentity::default(),
        }
    }
}

/// Which of the two packs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackKind {
    Behavior,
    Resource,
}

impl PackKind {
    /// Directory name under both `src/` and the output root
    pub fn dir_name(self) -> &'static str {
        match self {
            PackKind::Behavior => "bp",
            PackKind::Resource => "rp",
        }
    }

    /// Environment variable holding the dev sync prefix
    pub fn sync_prefix_var(self) -> &'static str {
        match self {
            PackKind::Behavior => DEV_BP_PREFIX,
            PackKind::Resource => DEV_RP_PREFIX,
        }
    }
}

impl fmt::Display for PackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackKind::Behavior => write!(f, "behavior pack"),
            PackKind::Resource => write!(f, "resource pack"),
        }
    }
}

/// Everything needed to produce one pack
#[derive(Debug, Clone, PartialEq)]
pub struct PackTarget {
    pub kind: PackKind,
    pub src_dir: PathBuf,
    pub out_dir: PathBuf,
    pub manifest: Manifest,
    /// Directories that should end up mirroring `out_dir` (dev builds only)
    pub sync_targets: Vec<PathBuf>,
}

/// Fully resolved configuration of a build run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub version: Version,
    pub min_engine_version: Version,
    /// Stable pack and module UUIDs; only the version changes between builds
    pub uuids: PackUuids,
    pub dev: bool,
    /// `dist/dev` or `dist/v<version>`
    pub output_root: PathBuf,
    pub bp: PackTarget,
    pub rp: PackTarget,
}

impl ProjectConfig {
    /// Resolve a build configuration.
    ///
    /// Fails on a malformed version string, or in dev mode when either sync
    /// prefix variable is unset or empty. No partial configuration is returned.
    pub fn resolve(options: &BuildOptions, env: &impl Env) -> Result<Self, ConfigError> {
        let identity = &options.identity;
        let version = Version::parse(&options.version)?;
        let version_label = version.label();

        let display_name = if options.dev {
            format!("{} DEV", identity.name)
        } else {
            format!("{} {}", identity.name, version_label)
        };

        let bp_manifest = Manifest::behavior_pack(identity, &display_name, version);
        let rp_manifest = Manifest::resource_pack(identity, &display_name, version);

        let root = options.root.as_path();
        let output_root = root
            .join("dist")
            .join(if options.dev { "dev" } else { version_label.as_str() });

        let (bp_sync, rp_sync) = if options.dev {
            (
                vec![sync_target(root, env, PackKind::Behavior, &identity.slug)?],
                vec![sync_target(root, env, PackKind::Resource, &identity.slug)?],
            )
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Self {
            slug: identity.slug.clone(),
            display_name,
            description: identity.description.clone(),
            version,
            min_engine_version: identity.min_engine_version,
            uuids: identity.uuids.clone(),
            dev: options.dev,
            bp: pack_target(root, &output_root, PackKind::Behavior, bp_manifest, bp_sync),
            rp: pack_target(root, &output_root, PackKind::Resource, rp_manifest, rp_sync),
            output_root,
        })
    }

    pub fn packs(&self) -> [&PackTarget; 2] {
        [&self.bp, &self.rp]
    }

    /// Number of sync targets across both packs
    pub fn sync_target_count(&self) -> usize {
        self.bp.sync_targets.len() + self.rp.sync_targets.len()
    }
}

fn pack_target(
    root: &Path,
    output_root: &Path,
    kind: PackKind,
    manifest: Manifest,
    sync_targets: Vec<PathBuf>,
) -> PackTarget {
    PackTarget {
        kind,
        src_dir: root.join("src").join(kind.dir_name()),
        out_dir: output_root.join(kind.dir_name()),
        manifest,
        sync_targets,
    }
}

fn sync_target(root: &Path, env: &impl Env, kind: PackKind, slug: &str) -> Result<PathBuf, ConfigError> {
    let prefix = env.require(kind.sync_prefix_var())?;
    Ok(resolve_against(root, prefix).join(slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn options(dev: bool, version: &str) -> BuildOptions {
        BuildOptions {
            dev,
            version: version.to_string(),
            root: PathBuf::from("/project"),
            identity: AddonIdentity::default(),
        }
    }

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn dev_env() -> HashMap<String, String> {
        HashMap::from([
            (DEV_BP_PREFIX.to_string(), "/games/development_behavior_packs".to_string()),
            (DEV_RP_PREFIX.to_string(), "/games/development_resource_packs".to_string()),
        ])
    }

    #[test]
    fn test_release_build() {
        let config = ProjectConfig::resolve(&options(false, "2.1.0"), &no_env()).unwrap();

        assert_eq!(config.output_root, PathBuf::from("/project/dist/v2.1.0"));
        assert_eq!(config.bp.out_dir, PathBuf::from("/project/dist/v2.1.0/bp"));
        assert_eq!(config.rp.out_dir, PathBuf::from("/project/dist/v2.1.0/rp"));
        assert_eq!(config.bp.src_dir, PathBuf::from("/project/src/bp"));
        assert_eq!(config.rp.src_dir, PathBuf::from("/project/src/rp"));
        assert_eq!(config.display_name, "Slasher Sword v2.1.0");
        assert_eq!(config.bp.manifest.header.version.to_array(), [2, 1, 0]);
        assert_eq!(config.rp.manifest.header.version.to_array(), [2, 1, 0]);
        assert_eq!(config.sync_target_count(), 0);
    }

    #[test]
    fn test_release_build_ignores_env() {
        let config = ProjectConfig::resolve(&options(false, "1.0.0"), &dev_env()).unwrap();
        assert!(config.bp.sync_targets.is_empty());
        assert!(config.rp.sync_targets.is_empty());
    }

    #[test]
    fn test_dev_build() {
        let config = ProjectConfig::resolve(&options(true, "1.0.0"), &dev_env()).unwrap();

        assert_eq!(config.output_root, PathBuf::from("/project/dist/dev"));
        assert_eq!(config.display_name, "Slasher Sword DEV");
        assert!(!config.display_name.contains("v1.0.0"));
        assert_eq!(
            config.bp.sync_targets,
            vec![PathBuf::from("/games/development_behavior_packs/slasher-sword")]
        );
        assert_eq!(
            config.rp.sync_targets,
            vec![PathBuf::from("/games/development_resource_packs/slasher-sword")]
        );
        assert_eq!(config.sync_target_count(), 2);
    }

    #[test]
    fn test_dev_build_relative_prefix() {
        let env = HashMap::from([
            (DEV_BP_PREFIX.to_string(), "out/bp".to_string()),
            (DEV_RP_PREFIX.to_string(), "out/rp".to_string()),
        ]);
        let config = ProjectConfig::resolve(&options(true, "1.0.0"), &env).unwrap();
        assert_eq!(config.bp.sync_targets, vec![PathBuf::from("/project/out/bp/slasher-sword")]);
    }

    #[test]
    fn test_dev_build_missing_env() {
        let mut env = dev_env();
        env.remove(DEV_RP_PREFIX);

        match ProjectConfig::resolve(&options(true, "1.0.0"), &env) {
            Err(ConfigError::MissingEnv { key }) => assert_eq!(key, DEV_RP_PREFIX),
            other => panic!("unexpected {:?}", other),
        }

        let err = ProjectConfig::resolve(&options(true, "1.0.0"), &no_env()).unwrap_err();
        assert!(err.to_string().contains(DEV_BP_PREFIX));
    }

    #[test]
    fn test_dev_build_empty_env() {
        let mut env = dev_env();
        env.insert(DEV_BP_PREFIX.to_string(), String::new());
        assert!(matches!(
            ProjectConfig::resolve(&options(true, "1.0.0"), &env),
            Err(ConfigError::MissingEnv { .. })
        ));
    }

    #[test]
    fn test_invalid_version() {
        let err = ProjectConfig::resolve(&options(false, "1.x.0"), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersionSegment { .. }));
    }

    #[test]
    fn test_manifests_agree() {
        for (dev, version) in [(false, "0.0.1"), (true, "3.4.5"), (false, "10.0.7")] {
            let config = ProjectConfig::resolve(&options(dev, version), &dev_env()).unwrap();
            let bp = &config.bp.manifest;
            let rp = &config.rp.manifest;

            assert_eq!(bp.header.version, rp.header.version);
            assert_eq!(bp.header.min_engine_version, rp.header.min_engine_version);
            assert_eq!(bp.header.min_engine_version, config.min_engine_version);
            assert_eq!(bp.header.name, rp.header.name);
            assert!(bp.modules.iter().all(|m| m.version == config.version));
            assert!(rp.modules.iter().all(|m| m.version == config.version));

            let dependency = &bp.dependencies.as_ref().unwrap()[0];
            assert_eq!(dependency.uuid, rp.header.uuid);
            assert_eq!(dependency.version, rp.header.version);
        }
    }

    #[test]
    fn test_dev_and_release_never_collide() {
        let dev = ProjectConfig::resolve(&options(true, "0.0.1"), &dev_env()).unwrap();
        let release = ProjectConfig::resolve(&options(false, "0.0.1"), &dev_env()).unwrap();
        assert_ne!(dev.output_root, release.output_root);
    }

    #[test]
    fn test_uuids_stable_across_versions() {
        let a = ProjectConfig::resolve(&options(false, "1.0.0"), &no_env()).unwrap();
        let b = ProjectConfig::resolve(&options(false, "1.0.1"), &no_env()).unwrap();
        assert_eq!(a.uuids, b.uuids);
        assert_eq!(a.bp.manifest.header.uuid, b.bp.manifest.header.uuid);
        assert_eq!(a.rp.manifest.modules[0].uuid, b.rp.manifest.modules[0].uuid);
    }
}
