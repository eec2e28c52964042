//! Fixed diagnostic requests (ISO 14229 over ISO 15765-2 single frames).
//!
//! There is no diagnostic client here. Requests are composed once, replayed periodically, and the responses are
//! picked off the bus by the signal rules of a profile.

mod constants;

pub use constants::*;

/// Length of a classic CAN diagnostic frame
pub const FRAME_LEN: usize = 8;

/// Offset of the data identifier in a single frame positive response: `[pci, sid, did_hi, did_lo, ..]`
pub const SINGLE_FRAME_DID_OFFSET: usize = 2;

/// Offset of the data identifier in a first frame positive response: `[pci, len, sid, did_hi, did_lo, ..]`
pub const FIRST_FRAME_DID_OFFSET: usize = 3;

/// 0x22 - Read Data By Identifier request for a single 16 bit data identifier.
pub fn read_data_by_identifier(data_identifier: u16, padding: u8) -> [u8; FRAME_LEN] {
    let did = data_identifier.to_be_bytes();
    let mut buf = [padding; FRAME_LEN];
    let request = [ServiceIdentifier::ReadDataByIdentifier as u8, did[0], did[1]];
    buf[0] = FrameType::Single as u8 | request.len() as u8;
    buf[1..=request.len()].copy_from_slice(&request);
    buf
}

/// 0x10 - Diagnostic Session Control request.
pub fn diagnostic_session_control(session_type: u8, padding: u8) -> [u8; FRAME_LEN] {
    let mut buf = [padding; FRAME_LEN];
    let request = [ServiceIdentifier::DiagnosticSessionControl as u8, session_type];
    buf[0] = FrameType::Single as u8 | request.len() as u8;
    buf[1..=request.len()].copy_from_slice(&request);
    buf
}

/// First payload byte of the consecutive frame with the given sequence number.
pub fn consecutive_frame(sequence_number: u8) -> u8 {
    FrameType::Consecutive as u8 | (sequence_number & 0x0f)
}
