//! Built-in vehicle profiles.
//!
//! Each vehicle is a plain function building its [`VehicleProfile`]. Nothing is registered implicitly, call
//! [`register_all`] or [`registry`] during start-up.

mod glc_220d;
mod id3;
mod tesla_model_3;

pub use glc_220d::{glc_220d, GLC_220D};
pub use id3::{id3_internal, id3_uds, ID3_INTERNAL, ID3_UDS};
pub use tesla_model_3::{tesla_model_3, TESLA_MODEL_3};

use tracing::debug;

use crate::profile::{Error, ProfileRegistry, VehicleProfile};

/// All built-in profiles. The order is the detection tie-break order.
pub fn all() -> Vec<VehicleProfile> {
    vec![id3_internal(), id3_uds(), glc_220d(), tesla_model_3()]
}

pub fn register_all(registry: &mut ProfileRegistry) -> Result<(), Error> {
    for profile in all() {
        registry.register(profile)?;
    }
    debug!("Configured vehicles: {:?}", registry.names());
    Ok(())
}

/// Registry holding all built-in profiles.
pub fn registry() -> Result<ProfileRegistry, Error> {
    let mut registry = ProfileRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}
