//! Bus timing requested by a vehicle profile. Applying it to an interface is up to the transport.

const DEFAULT_BITRATE: u32 = 500_000;
const DEFAULT_DBITRATE: u32 = 2_000_000; // SAE J2284-4
const DEFAULT_SAMPLE_POINT: f32 = 0.8; // SAE J2284-4 and SAE J2284-5

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitTiming {
    /// The bitrate in bits per second
    pub bitrate: u32,
    /// Between 0 and 1, where 0 is 0% and 1 is 100% of the bit time.
    pub sample_point: f32,
}

impl BitTiming {
    pub fn new(bitrate: u32) -> Self {
        Self {
            bitrate,
            sample_point: DEFAULT_SAMPLE_POINT,
        }
    }
}

/// One bus a profile listens on.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusConfig {
    pub classic: BitTiming,
    /// If None, FD support will be disabled.
    pub fd: Option<BitTiming>,
}

impl BusConfig {
    /// Classic CAN bus.
    pub fn classic(bitrate: u32) -> Self {
        Self {
            classic: BitTiming::new(bitrate),
            fd: None,
        }
    }

    /// CAN-FD bus with a separate data phase bitrate.
    pub fn fd(bitrate: u32, data_bitrate: u32) -> Self {
        Self {
            classic: BitTiming::new(bitrate),
            fd: Some(BitTiming::new(data_bitrate)),
        }
    }

    /// CAN-FD bus at 500 kbit/s with a 2 Mbit/s data phase.
    pub fn default_fd() -> Self {
        Self::fd(DEFAULT_BITRATE, DEFAULT_DBITRATE)
    }

    pub fn is_fd(&self) -> bool {
        self.fd.is_some()
    }

    pub fn bitrate(&self) -> u32 {
        self.classic.bitrate
    }

    pub fn data_bitrate(&self) -> Option<u32> {
        self.fd.map(|t| t.bitrate)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig::classic(DEFAULT_BITRATE)
    }
}
