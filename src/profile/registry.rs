use std::sync::Arc;

use tracing::debug;

use super::{Error, OperationMode, VehicleProfile};

/// Table of known vehicles. Filled once at start-up, read-only afterwards.
///
/// Iteration follows registration order, which is also the tie-break when several profiles match during detection.
#[derive(Debug, Default, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<Arc<VehicleProfile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile after validating it. Names are unique.
    pub fn register(&mut self, profile: VehicleProfile) -> Result<(), Error> {
        profile.validate()?;

        if self.contains(&profile.name) {
            return Err(Error::DuplicateProfile(profile.name));
        }

        debug!("Registered vehicle {} ({:?})", profile.name, profile.mode);
        self.profiles.push(Arc::new(profile));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<VehicleProfile>, Error> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::NotConfigured(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
    }

    /// All profiles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<VehicleProfile>> {
        self.profiles.iter()
    }

    /// Profiles of one operation mode in registration order.
    pub fn with_mode(&self, mode: OperationMode) -> impl Iterator<Item = &Arc<VehicleProfile>> {
        self.profiles.iter().filter(move |p| p.mode == mode)
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
