//! Generic CAN types and traits

pub mod async_can;
pub mod timing;

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

pub use async_can::AsyncCanAdapter;
pub use timing::{BitTiming, BusConfig};

pub static DLC_TO_LEN: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

const STANDARD_ID_MASK: u32 = 0x7ff;
const EXTENDED_ID_MASK: u32 = 0x1fffffff;

/// Identifier for a CAN frame
#[derive(Copy, Clone, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Identifier {
    Standard(u32),
    Extended(u32),
}

impl Identifier {
    pub fn is_standard(&self) -> bool {
        match self {
            Identifier::Standard(_) => true,
            Identifier::Extended(_) => false,
        }
    }
    pub fn is_extended(&self) -> bool {
        !self.is_standard()
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Extended(id) => write!(f, "0x{:08x}", id),
            Identifier::Standard(id) => write!(f, "0x{:03x}", id),
        }
    }
}

impl From<u32> for Identifier {
    fn from(id: u32) -> Identifier {
        if id <= STANDARD_ID_MASK {
            Identifier::Standard(id)
        } else {
            Identifier::Extended(id)
        }
    }
}

impl From<Identifier> for u32 {
    fn from(val: Identifier) -> u32 {
        match val {
            Identifier::Standard(id) => id,
            Identifier::Extended(id) => id,
        }
    }
}

/// A CAN frame
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// The bus index for adapters supporting multiple CAN busses
    pub bus: u8,
    /// Arbitration ID
    pub id: Identifier,
    /// Frame Data
    pub data: Vec<u8>,
    /// Wheter the frame was sent out by the adapter
    pub loopback: bool,
    /// CAN-FD Frame
    pub fd: bool,
}
impl Unpin for Frame {}

impl Frame {
    pub fn new(bus: u8, id: Identifier, data: &[u8]) -> Result<Frame, crate::error::Error> {
        // Check if the data length is valid
        if !DLC_TO_LEN.contains(&data.len()) {
            return Err(crate::error::Error::MalformedFrame);
        }

        // Check if the ID makes sense
        match id {
            Identifier::Standard(id) if id > STANDARD_ID_MASK => return Err(crate::error::Error::MalformedFrame),
            Identifier::Extended(id) if id > EXTENDED_ID_MASK => return Err(crate::error::Error::MalformedFrame),
            _ => {}
        };

        Ok(Frame {
            bus,
            id,
            data: data.to_vec(),
            loopback: false,
            fd: data.len() > 8,
        })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("bus", &self.bus)
            .field("id", &self.id)
            .field("data", &hex::encode(&self.data))
            .field("loopback", &self.loopback)
            .field("fd", &self.fd)
            .finish()
    }
}

/// Acceptance filter entry handed to a transport that supports driver level filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameFilter {
    pub id: u32,
    pub mask: u32,
    pub extended: bool,
}

impl FrameFilter {
    /// Exact match on a standard 11 bit identifier.
    pub fn standard(id: u32) -> Self {
        Self {
            id,
            mask: STANDARD_ID_MASK,
            extended: false,
        }
    }

    /// Exact match on an extended 29 bit identifier.
    pub fn extended(id: u32) -> Self {
        Self {
            id,
            mask: EXTENDED_ID_MASK,
            extended: true,
        }
    }

    pub fn matches(&self, id: Identifier) -> bool {
        if self.extended != id.is_extended() {
            return false;
        }
        let id: u32 = id.into();
        id & self.mask == self.id & self.mask
    }
}

impl From<Identifier> for FrameFilter {
    fn from(id: Identifier) -> FrameFilter {
        match id {
            Identifier::Standard(id) => FrameFilter::standard(id),
            Identifier::Extended(id) => FrameFilter::extended(id),
        }
    }
}

/// Builds one exact filter per distinct identifier. Identifiers above 0x7ff get an extended filter.
pub fn filters_for(ids: &BTreeSet<u32>) -> Vec<FrameFilter> {
    ids.iter().map(|id| Identifier::from(*id).into()).collect()
}

/// Trait for a Blocking CAN Adapter
pub trait CanAdapter {
    /// Send frames. Frames that could not be handed to the hardware yet are left in the queue.
    fn send(&mut self, frames: &mut VecDeque<Frame>) -> Result<(), crate::error::Error>;
    fn recv(&mut self) -> Result<Vec<Frame>, crate::error::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_compare() {
        assert_eq!(true, Identifier::Standard(0x123) < Identifier::Standard(0x124));
        assert_eq!(true, Identifier::Standard(0x7ff) > Identifier::Standard(0x100));

        // Extended IDs always have lower priority than standard IDs
        assert_eq!(true, Identifier::Extended(0x1) > Identifier::Standard(0x100));
    }

    #[test]
    fn frame_length_validation() {
        assert!(Frame::new(0, 0x123.into(), &[0u8; 8]).is_ok());
        assert!(Frame::new(0, 0x123.into(), &[0u8; 64]).unwrap().fd);
        assert_eq!(
            Frame::new(0, 0x123.into(), &[0u8; 9]),
            Err(crate::error::Error::MalformedFrame)
        );
        assert_eq!(
            Frame::new(0, Identifier::Standard(0x800), &[]),
            Err(crate::error::Error::MalformedFrame)
        );
    }

    #[test]
    fn filter_matches_only_its_id() {
        let filter = FrameFilter::standard(0x77c);
        assert!(filter.matches(Identifier::Standard(0x77c)));
        assert!(!filter.matches(Identifier::Standard(0x77d)));
        assert!(!filter.matches(Identifier::Extended(0x77c)));
    }

    #[test]
    fn filters_are_deduplicated() {
        let ids: BTreeSet<u32> = [0x776, 0x77c, 0x776].into_iter().collect();
        assert_eq!(
            filters_for(&ids),
            vec![FrameFilter::standard(0x776), FrameFilter::standard(0x77c)]
        );
    }

    #[test]
    fn extended_ids_get_extended_filters() {
        let ids: BTreeSet<u32> = [0x7ff, 0x18daf110].into_iter().collect();
        let filters = filters_for(&ids);
        assert_eq!(filters, vec![FrameFilter::standard(0x7ff), FrameFilter::extended(0x18daf110)]);

        assert!(filters[1].matches(Identifier::Extended(0x18daf110)));
        assert!(!filters[1].matches(Identifier::Extended(0x18daf111)));
        assert!(!filters[1].matches(Identifier::Standard(0x110)));
    }
}
