//! Hardware device profiles.
//!
//! A profile names a sampler and the constraints its filesystem imposes. The
//! built-in table covers common devices; extra entries can be declared in the
//! settings file and override built-ins of the same name.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the unconstrained default profile.
pub const DEFAULT_PROFILE: &str = "Generic";

/// Constraints for one hardware device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareProfile {
    pub name: String,
    /// Maximum total path length in characters, `None` for no restriction.
    #[serde(default)]
    pub path_limit: Option<usize>,
}

impl HardwareProfile {
    fn builtin(name: &str, path_limit: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            path_limit,
        }
    }
}

/// Built-in profiles in display order.
pub fn builtin_profiles() -> Vec<HardwareProfile> {
    vec![
        HardwareProfile::builtin(DEFAULT_PROFILE, None),
        HardwareProfile::builtin("M8", Some(127)),
        HardwareProfile::builtin("MPC One", Some(255)),
        HardwareProfile::builtin("SP-404mkII", Some(255)),
    ]
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Unknown hardware profile '{name}' (available: {available})")]
    Unknown { name: String, available: String },
    #[error("Hardware profile '{0}' has a path limit of zero")]
    ZeroLimit(String),
}

/// Lookup table of built-in plus user-declared profiles.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    profiles: Vec<HardwareProfile>,
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }
}

impl ProfileSet {
    /// Merge user profiles over the built-ins, replacing same-named entries in place.
    pub fn with_custom(custom: &[HardwareProfile]) -> Result<Self, ProfileError> {
        let mut set = Self::default();
        for profile in custom {
            if profile.path_limit == Some(0) {
                return Err(ProfileError::ZeroLimit(profile.name.clone()));
            }
            match set.position(&profile.name) {
                Some(idx) => set.profiles[idx] = profile.clone(),
                None => set.profiles.push(profile.clone()),
            }
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HardwareProfile> {
        self.profiles.iter()
    }

    /// Find a profile by name, ignoring ASCII case and surrounding whitespace.
    pub fn lookup(&self, name: &str) -> Result<&HardwareProfile, ProfileError> {
        self.position(name)
            .map(|idx| &self.profiles[idx])
            .ok_or_else(|| ProfileError::Unknown {
                name: name.to_string(),
                available: self
                    .profiles
                    .iter()
                    .map(|profile| profile.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.profiles
            .iter()
            .position(|profile| profile.name.eq_ignore_ascii_case(name))
    }
}
