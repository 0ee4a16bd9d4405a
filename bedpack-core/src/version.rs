//! Three-part numeric versions
//!
//! Versions are written as `major.minor.patch` on the command line and
//! serialized as `[major, minor, patch]` arrays inside pack manifests.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// A parsed `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string.
    ///
    /// The string must split into exactly three dot-separated segments, each
    /// made only of ASCII digits. Blank segments, signs, whitespace and
    /// exponents are rejected rather than coerced.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(ConfigError::InvalidVersionFormat {
                input: input.to_string(),
            });
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = parse_segment(part)?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    /// Label used for versioned output directories and display names (`v1.2.3`)
    pub fn label(&self) -> String {
        format!("v{}", self)
    }

    pub fn to_array(&self) -> [u32; 3] {
        [self.major, self.minor, self.patch]
    }
}

fn parse_segment(part: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::InvalidVersionSegment {
        segment: part.to_string(),
    };

    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    part.parse().map_err(|_| invalid())
}

impl FromStr for Version {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<[u32; 3]> for Version {
    fn from([major, minor, patch]: [u32; 3]) -> Self {
        Self::new(major, minor, patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.major)?;
        tuple.serialize_element(&self.minor)?;
        tuple.serialize_element(&self.patch)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[u32; 3]>::deserialize(deserializer).map(Version::from)
    }
}
