//! Constants for composing diagnostic requests and reading their responses.

/// Added to the service identifier in a positive response
pub static POSITIVE_RESPONSE: u8 = 0x40;

/// Service Identifiers (SIDs) as defined in ISO 14229, limited to the services used for polling
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum ServiceIdentifier {
    DiagnosticSessionControl = 0x10,
    ReadDataByIdentifier = 0x22,
}

/// Diagnostic Session Type Sub-Function ID as defined in ISO 14229
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum SessionType {
    Default = 0x01,
    Programming = 0x02,
    ExtendedDiagnostic = 0x03,
    SafetySystemDiagnostic = 0x04,
}

/// ISO-TP protocol control information, upper nibble of the first payload byte
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum FrameType {
    Single = 0x00,
    First = 0x10,
    Consecutive = 0x20,
    FlowControl = 0x30,
}
