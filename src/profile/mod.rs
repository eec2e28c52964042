//! Declarative description of a vehicle: which frames carry which signal and what the controller does with it.
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use v2g::gamepad::Button;
//! use v2g::profile::*;
//! use v2g::shaping::SteeringCurve;
//!
//! let profile = VehicleProfile::new("DEMO", OperationMode::DiagnosticPolling)
//!     .steering(SteeringCurve::new(0.15, 0.1, 1.0))
//!     .mapping(
//!         MappingEntry::new(0, "nitro", SignalRule::new(0x776, 5, 1, Decode::OneOf(&[0x01])), Category::Button(Button::A))
//!             .identity_filter([0x1f, 0x02]),
//!     )
//!     .polling(PollingRequest::read_data_by_identifier(0x70c, 0x1f02, 0x55, Duration::from_millis(300)));
//!
//! let mut registry = ProfileRegistry::new();
//! registry.register(profile).unwrap();
//! assert!(registry.get("DEMO").is_ok());
//! ```

mod decode;
mod error;
mod registry;

pub use decode::Decode;
pub use error::Error;
pub use registry::ProfileRegistry;

use std::collections::BTreeSet;
use std::time::Duration;

use crate::can::{filters_for, BusConfig, Frame, FrameFilter, Identifier};
use crate::gamepad::Button;
use crate::shaping::SteeringCurve;
use crate::uds;

/// How a vehicle exposes its signals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationMode {
    /// Signals are broadcast by the ECUs on their own.
    DirectBroadcast,
    /// Signals are read by periodically replaying diagnostic requests.
    DiagnosticPolling,
}

/// Where a single physical value lives in a frame.
#[derive(Debug, Clone, Copy)]
pub struct SignalRule {
    /// Arbitration ID of the frame carrying the signal
    pub source_id: u32,
    /// Position of the first byte, 1-based
    pub byte_offset: usize,
    /// Length in bytes
    pub length: usize,
    pub decode: Decode,
}

impl SignalRule {
    pub fn new(source_id: u32, byte_offset: usize, length: usize, decode: Decode) -> Self {
        Self {
            source_id,
            byte_offset,
            length,
            decode,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.byte_offset >= 1 && self.length >= 1
    }

    /// The bytes of the signal, None if the payload is too short.
    pub fn bytes<'a>(&self, payload: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.byte_offset.checked_sub(1)?;
        payload.get(start..start.checked_add(self.length)?)
    }

    pub fn decode(&self, payload: &[u8]) -> Option<f64> {
        self.decode.apply(self.bytes(payload)?)
    }
}

/// What the controller does with a decoded signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Decoded angle, shaped by the profile's [`SteeringCurve`] onto the left stick X axis.
    Steering,
    /// Accelerator in percent, drives the left stick Y axis.
    Speed,
    /// Brake in percent, drives the left trigger.
    Brake,
    /// Decoded shifter position (-2 reverse, -1 down, 0 neutral, 1 up) pressing the down and up buttons.
    Gear { down: Button, up: Button },
    /// Non-zero decoded values press the button.
    Button(Button),
}

impl Category {
    /// Controller buttons referenced by this category.
    pub fn buttons(&self) -> Vec<Button> {
        match *self {
            Category::Gear { down, up } => vec![down, up],
            Category::Button(button) => vec![button],
            _ => vec![],
        }
    }
}

/// Matches the data identifier echoed in a diagnostic response.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentityFilter {
    pub bytes: [u8; 2],
    /// The response is the first frame of a multi-frame transfer, shifting the identifier by one byte.
    pub multi_frame: bool,
}

impl IdentityFilter {
    pub fn offset(&self) -> usize {
        if self.multi_frame {
            uds::FIRST_FRAME_DID_OFFSET
        } else {
            uds::SINGLE_FRAME_DID_OFFSET
        }
    }

    pub fn matches(&self, payload: &[u8]) -> bool {
        let offset = self.offset();
        payload.get(offset..offset + 2) == Some(&self.bytes[..])
    }
}

/// A signal together with what it controls.
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub sequence_id: u32,
    pub name: String,
    pub category: Category,
    pub signal: SignalRule,
    pub enabled: bool,
    pub identity_filter: Option<IdentityFilter>,
    /// Only accept the consecutive frame starting with this byte.
    pub consecutive_frame_filter: Option<u8>,
}

impl MappingEntry {
    pub fn new(sequence_id: u32, name: &str, signal: SignalRule, category: Category) -> Self {
        Self {
            sequence_id,
            name: name.to_string(),
            category,
            signal,
            enabled: true,
            identity_filter: None,
            consecutive_frame_filter: None,
        }
    }

    /// Only apply to single frame responses carrying this data identifier.
    pub fn identity_filter(mut self, bytes: [u8; 2]) -> Self {
        self.identity_filter = Some(IdentityFilter {
            bytes,
            multi_frame: false,
        });
        self
    }

    /// Only apply to first frames of multi-frame responses carrying this data identifier.
    pub fn multi_frame_identity_filter(mut self, bytes: [u8; 2]) -> Self {
        self.identity_filter = Some(IdentityFilter {
            bytes,
            multi_frame: true,
        });
        self
    }

    pub fn consecutive_frame_filter(mut self, first_byte: u8) -> Self {
        self.consecutive_frame_filter = Some(first_byte);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this entry applies to a frame. Payloads too short for a filter never match.
    pub fn accepts(&self, id: u32, payload: &[u8]) -> bool {
        if !self.enabled || self.signal.source_id != id {
            return false;
        }

        if let Some(filter) = &self.identity_filter {
            if !filter.matches(payload) {
                return false;
            }
        }

        if let Some(first_byte) = self.consecutive_frame_filter {
            if payload.first() != Some(&first_byte) {
                return false;
            }
        }

        true
    }
}

/// A diagnostic request frame replayed at a fixed interval.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PollingRequest {
    pub id: Identifier,
    pub data: [u8; uds::FRAME_LEN],
    pub interval: Duration,
}

impl PollingRequest {
    pub fn new(id: Identifier, data: [u8; uds::FRAME_LEN], interval: Duration) -> Self {
        Self { id, data, interval }
    }

    /// 0x22 - Read Data By Identifier, sent to a standard ID
    pub fn read_data_by_identifier(tx_id: u32, data_identifier: u16, padding: u8, interval: Duration) -> Self {
        Self::new(
            Identifier::Standard(tx_id),
            uds::read_data_by_identifier(data_identifier, padding),
            interval,
        )
    }

    /// 0x10 - Diagnostic Session Control, sent to a standard ID
    pub fn diagnostic_session_control(tx_id: u32, session_type: u8, padding: u8, interval: Duration) -> Self {
        Self::new(
            Identifier::Standard(tx_id),
            uds::diagnostic_session_control(session_type, padding),
            interval,
        )
    }

    pub fn to_frame(&self, bus: u8) -> crate::Result<Frame> {
        Frame::new(bus, self.id, &self.data)
    }
}

/// Everything needed to turn one vehicle's bus traffic into controller input.
#[derive(Debug, Clone)]
pub struct VehicleProfile {
    pub name: String,
    pub mode: OperationMode,
    pub buses: Vec<BusConfig>,
    pub steering: SteeringCurve,
    pub mappings: Vec<MappingEntry>,
    pub polling_requests: Vec<PollingRequest>,
    /// Identifiers that are all present on the bus of this vehicle
    pub auto_detect_ids: BTreeSet<u32>,
    /// Number of frames dropped between two processed frames
    pub read_limiter: u32,
}

impl VehicleProfile {
    pub fn new(name: &str, mode: OperationMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
            buses: vec![],
            steering: SteeringCurve::new(1.0, 0.0, 1.0),
            mappings: vec![],
            polling_requests: vec![],
            auto_detect_ids: BTreeSet::new(),
            read_limiter: 0,
        }
    }

    pub fn bus(mut self, bus: BusConfig) -> Self {
        self.buses.push(bus);
        self
    }

    pub fn steering(mut self, steering: SteeringCurve) -> Self {
        self.steering = steering;
        self
    }

    pub fn mapping(mut self, entry: MappingEntry) -> Self {
        self.mappings.push(entry);
        self
    }

    pub fn polling(mut self, request: PollingRequest) -> Self {
        self.polling_requests.push(request);
        self
    }

    pub fn auto_detect(mut self, ids: &[u32]) -> Self {
        self.auto_detect_ids.extend(ids);
        self
    }

    pub fn read_limiter(mut self, read_limiter: u32) -> Self {
        self.read_limiter = read_limiter;
        self
    }

    /// Checks the invariants a profile needs before it can be registered.
    pub fn validate(&self) -> Result<(), Error> {
        if self.mode == OperationMode::DiagnosticPolling && self.polling_requests.is_empty() {
            return Err(Error::MissingPollingRequests(self.name.clone()));
        }

        if self.polling_requests.iter().any(|r| r.interval.is_zero()) {
            return Err(Error::InvalidPollingInterval(self.name.clone()));
        }

        if let Some(request) = self.polling_requests.iter().find(|r| r.to_frame(0).is_err()) {
            return Err(Error::InvalidPollingRequest {
                vehicle: self.name.clone(),
                id: request.id,
            });
        }

        if let Some(entry) = self.mappings.iter().find(|e| !e.signal.is_valid()) {
            return Err(Error::InvalidSignalRule {
                vehicle: self.name.clone(),
                entry: entry.name.clone(),
            });
        }

        Ok(())
    }

    /// Source IDs of all enabled mappings.
    pub fn filter_ids(&self) -> BTreeSet<u32> {
        self.mappings
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.signal.source_id)
            .collect()
    }

    /// Acceptance filters for the transport, one per entry of [`VehicleProfile::filter_ids`].
    pub fn filters(&self) -> Vec<FrameFilter> {
        filters_for(&self.filter_ids())
    }

    /// Buttons pressed by [`Category::Button`] mappings.
    pub fn buttons(&self) -> BTreeSet<Button> {
        self.mappings
            .iter()
            .filter_map(|e| match e.category {
                Category::Button(button) => Some(button),
                _ => None,
            })
            .collect()
    }
}
