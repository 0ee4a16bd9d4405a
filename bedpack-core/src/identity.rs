//! Addon identity
//!
//! Defines the optional `bedpack.json` file. The identity holds everything
//! about an addon that must stay stable across builds: its slug, names and
//! the UUIDs that the game uses to recognize each pack and module. Only the
//! version changes between builds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::version::Version;

/// File name of the identity file at the project root
pub const IDENTITY_FILE: &str = "bedpack.json";

/// Stable identity of an addon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonIdentity {
    /// Folder name used for sync targets (e.g. "slasher-sword")
    pub slug: String,

    /// Human-readable project name; the display name appends "DEV" or the version label
    pub name: String,

    /// Pack description shown in-game
    pub description: String,

    /// Minimum engine version, independent of the addon version
    #[serde(default = "default_min_engine_version")]
    pub min_engine_version: Version,

    /// Pack and module UUIDs
    pub uuids: PackUuids,
}

/// UUIDs identifying both packs and their modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackUuids {
    pub bp_header: Uuid,
    pub bp_data_module: Uuid,
    pub bp_scripts_module: Uuid,
    pub rp_header: Uuid,
    pub rp_resources_module: Uuid,
}

fn default_min_engine_version() -> Version {
    Version::new(1, 21, 130)
}

impl PackUuids {
    /// Fresh random UUIDs for a new addon
    pub fn generate() -> Self {
        Self {
            bp_header: Uuid::new_v4(),
            bp_data_module: Uuid::new_v4(),
            bp_scripts_module: Uuid::new_v4(),
            rp_header: Uuid::new_v4(),
            rp_resources_module: Uuid::new_v4(),
        }
    }
}

impl Default for PackUuids {
    fn default() -> Self {
        Self {
            bp_header: Uuid::from_u128(0xf8775497_a00d_41a5_b69a_535ae8c18a29),
            bp_data_module: Uuid::from_u128(0x77c6bf24_f2b6_4816_b872_36a4b13cfae1),
            bp_scripts_module: Uuid::from_u128(0x756394ff_1a42_4517_a589_29f54940403e),
            rp_header: Uuid::from_u128(0xaccf87b4_c40a_4bf7_bce0_fe054b563327),
            rp_resources_module: Uuid::from_u128(0x11cdb8d4_e27c_463f_b3ed_e56a0ccb2b8c),
        }
    }
}

impl Default for AddonIdentity {
    fn default() -> Self {
        Self {
            slug: "slasher-sword".to_string(),
            name: "Slasher Sword".to_string(),
            description: "Fun chainsaw/sword addon by LC Studios MC".to_string(),
            min_engine_version: default_min_engine_version(),
            uuids: PackUuids::default(),
        }
    }
}

impl AddonIdentity {
    /// Create an identity for a new addon with freshly generated UUIDs
    pub fn new(slug: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: description.into(),
            min_engine_version: default_min_engine_version(),
            uuids: PackUuids::generate(),
        }
    }

    /// Read `bedpack.json` from `root`, falling back to the built-in identity
    /// when the file does not exist
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(IDENTITY_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IdentityRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::IdentityParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_uuids_are_stable() {
        let uuids = PackUuids::default();
        assert_eq!(uuids.bp_header.to_string(), "f8775497-a00d-41a5-b69a-535ae8c18a29");
        assert_eq!(uuids.rp_header.to_string(), "accf87b4-c40a-4bf7-bce0-fe054b563327");
        assert_eq!(uuids, PackUuids::default());
    }

    #[test]
    fn test_generated_uuids_differ() {
        let uuids = PackUuids::generate();
        assert_ne!(uuids.bp_header, uuids.rp_header);
        assert_ne!(uuids, PackUuids::generate());
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let identity = AddonIdentity::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(identity, AddonIdentity::default());
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let identity = AddonIdentity::new("my-addon", "My Addon", "Something fun");
        let json = serde_json::to_string_pretty(&identity).unwrap();
        assert!(json.contains("\"minEngineVersion\": ["));
        assert!(json.contains("\"bpHeader\""));
        fs::write(temp_dir.path().join(IDENTITY_FILE), json).unwrap();

        let loaded = AddonIdentity::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(loaded, identity);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(IDENTITY_FILE), "{ not json").unwrap();

        let err = AddonIdentity::load_or_default(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IdentityParse { .. }));
    }
}
