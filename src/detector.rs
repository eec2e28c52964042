//! Automatic vehicle identification from observed bus traffic.
//!
//! Detection first listens passively and matches the identifiers seen against the broadcast profiles. If none
//! matches, the requests of all polling profiles are sent once and the responses are matched against those.
//! ## Example
//! ```rust
//! async fn detect_example() {
//!     # struct Silent;
//!     # impl v2g::can::CanAdapter for Silent {
//!     #     fn send(&mut self, _: &mut std::collections::VecDeque<v2g::can::Frame>) -> v2g::Result<()> { Ok(()) }
//!     #     fn recv(&mut self) -> v2g::Result<Vec<v2g::can::Frame>> { Ok(vec![]) }
//!     # }
//!     let adapter = v2g::can::AsyncCanAdapter::new(Silent);
//!     let registry = v2g::vehicles::registry().unwrap();
//!
//!     let config = v2g::detector::DetectorConfig::default();
//!     match v2g::detector::detect_vehicle(&registry, &adapter, &config).await {
//!         Some(profile) => println!("Detected {}", profile.name),
//!         None => println!("Unknown vehicle"),
//!     }
//! }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::can::{AsyncCanAdapter, Frame};
use crate::profile::{OperationMode, PollingRequest, ProfileRegistry, VehicleProfile};
use crate::{Stream, StreamExt};

const PASSIVE_WINDOW_MS: u64 = 1000;
const ACTIVE_WINDOW_MS: u64 = 500;

/// Timing of the detection phases.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    /// Bus to listen and probe on
    pub bus: u8,
    /// How long to listen before matching broadcast profiles
    pub passive_window: Duration,
    /// How long to wait for responses after probing
    pub active_window: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            passive_window: Duration::from_millis(PASSIVE_WINDOW_MS),
            active_window: Duration::from_millis(ACTIVE_WINDOW_MS),
        }
    }
}

/// Matches observed identifiers against the profiles of a registry. Once resolved, the result does not change.
pub struct VehicleDetector<'a> {
    registry: &'a ProfileRegistry,
    seen: BTreeSet<u32>,
    vehicle: Option<Arc<VehicleProfile>>,
}

impl<'a> VehicleDetector<'a> {
    pub fn new(registry: &'a ProfileRegistry) -> Self {
        Self {
            registry,
            seen: BTreeSet::new(),
            vehicle: None,
        }
    }

    pub fn observe(&mut self, id: u32) {
        self.seen.insert(id);
    }

    pub fn observed(&self) -> &BTreeSet<u32> {
        &self.seen
    }

    pub fn vehicle(&self) -> Option<&Arc<VehicleProfile>> {
        self.vehicle.as_ref()
    }

    /// Tries the profiles of one mode in registration order. The first profile whose auto-detect identifiers were
    /// all observed wins. Profiles without auto-detect identifiers never match.
    pub fn resolve(&mut self, mode: OperationMode) -> Option<Arc<VehicleProfile>> {
        if self.vehicle.is_some() {
            return self.vehicle.clone();
        }

        for profile in self.registry.with_mode(mode) {
            if profile.auto_detect_ids.is_empty() {
                continue;
            }
            debug!("Vehicle: {}", profile.name);

            let missing: Vec<u32> = profile.auto_detect_ids.difference(&self.seen).copied().collect();
            if missing.is_empty() {
                self.vehicle = Some(profile.clone());
                break;
            }
            for id in missing {
                debug!("ID 0x{:x} not seen for vehicle {}", id, profile.name);
            }
        }

        self.vehicle.clone()
    }

    /// Requests of all polling profiles, sent once to provoke responses.
    pub fn probe_requests(&self) -> Vec<PollingRequest> {
        self.registry
            .with_mode(OperationMode::DiagnosticPolling)
            .flat_map(|p| p.polling_requests.iter().copied())
            .collect()
    }

    /// Records the identifiers of all frames received until `window` elapsed.
    pub async fn listen<S: Stream<Item = Frame> + Unpin>(&mut self, stream: &mut S, window: Duration) {
        let deadline = tokio::time::Instant::now() + window;
        while let Ok(Some(frame)) = tokio::time::timeout_at(deadline, stream.next()).await {
            self.observe(frame.id.into());
        }
    }
}

/// Sends the probe requests in order, stopping at the first failure.
async fn probe(adapter: &AsyncCanAdapter, requests: &[PollingRequest], bus: u8, timeout: Duration) -> crate::Result<()> {
    for request in requests {
        let frame = request.to_frame(bus)?;
        tokio::time::timeout(timeout, adapter.send(&frame)).await??;
    }
    Ok(())
}

/// Identifies the vehicle on the bus, None if no profile matches.
pub async fn detect_vehicle(
    registry: &ProfileRegistry,
    adapter: &AsyncCanAdapter,
    config: &DetectorConfig,
) -> Option<Arc<VehicleProfile>> {
    debug!("Trying to automatically detect the vehicle...");
    let mut detector = VehicleDetector::new(registry);

    // Subscribe before anything is sent so no response is missed
    let bus = config.bus;
    let mut stream = adapter.recv_filter(move |frame| frame.bus == bus && !frame.loopback);

    detector.listen(&mut stream, config.passive_window).await;

    if detector.resolve(OperationMode::DirectBroadcast).is_none() {
        debug!("No vehicle detected for direct broadcast mode, trying diagnostic polling");

        let requests = detector.probe_requests();
        if let Err(e) = probe(adapter, &requests, config.bus, config.active_window).await {
            warn!("Auto-detection via diagnostic requests failed: {}", e);
        }

        detector.listen(&mut stream, config.active_window).await;
        detector.resolve(OperationMode::DiagnosticPolling);
    }

    match detector.vehicle() {
        Some(profile) => info!("Detected vehicle: {}", profile.name),
        None => info!("Detected vehicle: NONE"),
    }
    detector.vehicle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles;

    #[test]
    fn resolves_by_subset() {
        let registry = vehicles::registry().unwrap();
        let mut detector = VehicleDetector::new(&registry);

        for id in [0x77c, 0x77d, 0x7a5, 0x776, 0x123, 0x776] {
            detector.observe(id);
        }
        assert_eq!(detector.observed().len(), 5);

        assert!(detector.resolve(OperationMode::DirectBroadcast).is_none());
        let vehicle = detector.resolve(OperationMode::DiagnosticPolling).unwrap();
        assert_eq!(vehicle.name, vehicles::ID3_UDS);
    }

    #[test]
    fn partial_match_does_not_resolve() {
        let registry = vehicles::registry().unwrap();
        let mut detector = VehicleDetector::new(&registry);

        for id in [0x77c, 0x77d, 0x7a5] {
            detector.observe(id);
        }
        assert!(detector.resolve(OperationMode::DiagnosticPolling).is_none());
    }

    #[test]
    fn profiles_without_ids_never_match() {
        let registry = vehicles::registry().unwrap();
        let mut detector = VehicleDetector::new(&registry);

        // ID3_INTERNAL has no auto-detect identifiers, observing its signals is not enough
        for id in vehicles::id3_internal().filter_ids() {
            detector.observe(id);
        }
        assert!(detector.resolve(OperationMode::DirectBroadcast).is_none());
    }

    #[test]
    fn resolution_is_terminal() {
        let registry = vehicles::registry().unwrap();
        let mut detector = VehicleDetector::new(&registry);

        for id in vehicles::tesla_model_3().auto_detect_ids {
            detector.observe(id);
        }
        assert_eq!(
            detector.resolve(OperationMode::DirectBroadcast).unwrap().name,
            vehicles::TESLA_MODEL_3
        );
        // Still resolved to the first result, whatever mode is asked for
        assert_eq!(
            detector.resolve(OperationMode::DiagnosticPolling).unwrap().name,
            vehicles::TESLA_MODEL_3
        );
    }

    #[test]
    fn probe_requests_cover_polling_profiles() {
        let registry = vehicles::registry().unwrap();
        let detector = VehicleDetector::new(&registry);

        let expected = vehicles::id3_uds().polling_requests.len() + vehicles::glc_220d().polling_requests.len();
        assert_eq!(detector.probe_requests().len(), expected);
    }
}
