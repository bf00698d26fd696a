//! Profile registry: load, validate and look up strategy profiles by id.

use std::path::Path;

use serde::Deserialize;

use super::{ProfileError, StrategyProfile};

const BUILTIN_PROFILES: &str = include_str!("profiles.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    profile: Vec<StrategyProfile>,
}

/// Ordered set of validated profiles. Lookups never fall back to a default.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRegistry {
    profiles: Vec<StrategyProfile>,
}

impl StrategyRegistry {
    /// The profiles shipped with the crate: intraday, swing, short_term, long_term.
    pub fn builtin() -> Result<Self, ProfileError> {
        Self::from_toml_str(BUILTIN_PROFILES)
    }

    /// Parse a `[[profile]]` array, validating every entry.
    pub fn from_toml_str(content: &str) -> Result<Self, ProfileError> {
        let file: ProfileFile = toml::from_str(content)?;
        Self::from_profiles(file.profile)
    }

    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_profiles(profiles: Vec<StrategyProfile>) -> Result<Self, ProfileError> {
        for (i, profile) in profiles.iter().enumerate() {
            profile.validate()?;
            if profiles[..i].iter().any(|p| p.id == profile.id) {
                return Err(ProfileError::Duplicate(profile.id.clone()));
            }
        }
        Ok(Self { profiles })
    }

    /// Look up a profile; unknown ids fail with the list of known ones.
    pub fn get(&self, id: &str) -> Result<&StrategyProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ProfileError::UnknownProfile {
                id: id.to_string(),
                known: self.ids().map(String::from).collect(),
            })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
