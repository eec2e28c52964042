//! Choosing the profile to run, either by name or by listening to the bus.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::can::AsyncCanAdapter;
use crate::detector::{detect_vehicle, DetectorConfig};
use crate::profile::{Error, ProfileRegistry, VehicleProfile};

/// Name accepted by [`ProfileSelection::from_str`] to request auto-detection.
pub const AUTO_DETECT: &str = "AUTO";

/// Vehicle used by the relay setup when detection finds nothing. Only the OBD port is wired there.
pub const RELAY_FALLBACK_VEHICLE: &str = crate::vehicles::ID3_UDS;

/// Which profile to run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileSelection {
    Named(String),
    AutoDetect,
}

impl FromStr for ProfileSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::NotConfigured(s.to_string()));
        }

        if s.eq_ignore_ascii_case(AUTO_DETECT) {
            Ok(ProfileSelection::AutoDetect)
        } else {
            Ok(ProfileSelection::Named(s.to_string()))
        }
    }
}

/// Resolves a selection against the registry.
///
/// A name must be registered. Auto-detection listens on the adapter and, if nothing is recognized, falls back to
/// `fallback` when given.
pub async fn select_profile(
    registry: &ProfileRegistry,
    selection: &ProfileSelection,
    adapter: &AsyncCanAdapter,
    config: &DetectorConfig,
    fallback: Option<&str>,
) -> crate::Result<Arc<VehicleProfile>> {
    let name = match selection {
        ProfileSelection::Named(name) => name.as_str(),
        ProfileSelection::AutoDetect => match detect_vehicle(registry, adapter, config).await {
            Some(profile) => return Ok(profile),
            None => match fallback {
                Some(name) => {
                    warn!("No vehicle detected, falling back to {}", name);
                    name
                }
                None => return Err(Error::NoVehicleDetected.into()),
            },
        },
    };

    let profile = registry.get(name)?;
    info!("Using vehicle {}", profile.name);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_selection() {
        assert_eq!("AUTO".parse::<ProfileSelection>(), Ok(ProfileSelection::AutoDetect));
        assert_eq!("auto".parse::<ProfileSelection>(), Ok(ProfileSelection::AutoDetect));
        assert_eq!(
            " ID3_UDS ".parse::<ProfileSelection>(),
            Ok(ProfileSelection::Named("ID3_UDS".to_string()))
        );
        assert_eq!(
            "".parse::<ProfileSelection>(),
            Err(Error::NotConfigured(String::new()))
        );
    }
}
