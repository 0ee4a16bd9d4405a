//! Environment lookup
//!
//! Only project resolution reads the environment, and it does so through
//! [`Env`] so tests can hand in a fixed mapping.

use std::collections::HashMap;

use crate::error::ConfigError;

/// Destination prefix for the behavior pack sync target (dev builds)
pub const DEV_BP_PREFIX: &str = "DEV_BP_PREFIX";

/// Destination prefix for the resource pack sync target (dev builds)
pub const DEV_RP_PREFIX: &str = "DEV_RP_PREFIX";

/// Key-value view of an environment
pub trait Env {
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a variable that must be present and non-empty
    fn require(&self, key: &str) -> Result<String, ConfigError> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnv {
                key: key.to_string(),
            }),
        }
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<E: Env + ?Sized> Env for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}
