//! Error types for vehicle profiles and their registry.

use thiserror::Error;

use crate::can::Identifier;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Vehicle {0} uses diagnostic polling but has no polling requests")]
    MissingPollingRequests(String),
    #[error("Vehicle {0} is already registered")]
    DuplicateProfile(String),
    #[error("Vehicle {vehicle}: signal {entry} has an invalid byte range")]
    InvalidSignalRule { vehicle: String, entry: String },
    #[error("Vehicle {0} has a polling request with zero interval")]
    InvalidPollingInterval(String),
    #[error("Vehicle {vehicle}: polling request to {id:?} is not a valid frame")]
    InvalidPollingRequest { vehicle: String, id: Identifier },
    #[error("Vehicle {0} is not configured")]
    NotConfigured(String),
    #[error("No vehicle detected")]
    NoVehicleDetected,
}
