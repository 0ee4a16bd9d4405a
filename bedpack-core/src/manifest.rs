//! Pack manifest documents
//!
//! Shape of the `manifest.json` written at the root of each pack.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::AddonIdentity;
use crate::version::Version;

/// Script module entry point, relative to the behavior pack root
pub const SCRIPT_ENTRY: &str = "scripts/entry.js";

/// Manifest format understood by the game
pub const FORMAT_VERSION: u32 = 2;

/// A pack manifest (`manifest.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub header: ManifestHeader,
    pub modules: Vec<ManifestModule>,

    /// Packs this pack depends on (behavior pack only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<ManifestDependency>>,

    /// Optional engine capabilities (resource pack only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub name: String,
    pub description: String,
    pub uuid: Uuid,
    pub version: Version,
    pub min_engine_version: Version,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestModule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "type")]
    pub module_type: String,

    pub uuid: Uuid,
    pub version: Version,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDependency {
    pub uuid: Uuid,
    pub version: Version,
}

impl ManifestModule {
    fn new(module_type: &str, uuid: Uuid, version: Version) -> Self {
        Self {
            language: None,
            module_type: module_type.to_string(),
            uuid,
            version,
            entry: None,
        }
    }
}

impl Manifest {
    /// Behavior pack manifest: data + script modules, depending on the resource pack
    pub fn behavior_pack(identity: &AddonIdentity, display_name: &str, version: Version) -> Self {
        let uuids = &identity.uuids;
        let script = ManifestModule {
            language: Some("javascript".to_string()),
            entry: Some(SCRIPT_ENTRY.to_string()),
            ..ManifestModule::new("script", uuids.bp_scripts_module, version)
        };

        Self {
            format_version: FORMAT_VERSION,
            header: header(identity, display_name, uuids.bp_header, version),
            modules: vec![ManifestModule::new("data", uuids.bp_data_module, version), script],
            dependencies: Some(vec![ManifestDependency {
                uuid: uuids.rp_header,
                version,
            }]),
            capabilities: None,
        }
    }

    /// Resource pack manifest: a single resources module with PBR enabled
    pub fn resource_pack(identity: &AddonIdentity, display_name: &str, version: Version) -> Self {
        let uuids = &identity.uuids;
        Self {
            format_version: FORMAT_VERSION,
            header: header(identity, display_name, uuids.rp_header, version),
            modules: vec![ManifestModule::new("resources", uuids.rp_resources_module, version)],
            dependencies: None,
            capabilities: Some(vec!["pbr".to_string()]),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn header(identity: &AddonIdentity, display_name: &str, uuid: Uuid, version: Version) -> ManifestHeader {
    ManifestHeader {
        name: display_name.to_string(),
        description: identity.description.clone(),
        uuid,
        version,
        min_engine_version: identity.min_engine_version,
    }
}
