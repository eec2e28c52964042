//! Decode strategies turning the bytes of a signal into a physical value.

use std::fmt;

use crate::shaping::range_map;

/// How a [`SignalRule`](super::SignalRule) turns its bytes into a value. Multi byte values are read big endian.
///
/// Decoding yields `None` when the input has no defined meaning, the interpreter then keeps its previous state.
#[derive(Clone, Copy)]
pub enum Decode {
    /// `(raw + offset) * factor`
    Linear { offset: f64, factor: f64 },
    /// Saturating linear map of the raw value from `[in_min, in_max]` to `[out_min, out_max]`.
    Range {
        in_min: f64,
        in_max: f64,
        out_min: f64,
        out_max: f64,
    },
    /// `(first_byte & mask) >> shift`
    Bits { mask: u8, shift: u8 },
    /// Table of first byte to value. Bytes not in the table are undefined.
    Lookup(&'static [(u8, f64)]),
    /// 1 if the first byte is one of the values, 0 otherwise.
    OneOf(&'static [u8]),
    /// Vehicle specific layouts that don't fit the other kinds.
    Custom(fn(&[u8]) -> Option<f64>),
}

impl Decode {
    /// Identity on the raw value.
    pub const RAW: Decode = Decode::Linear { offset: 0.0, factor: 1.0 };

    pub fn apply(&self, bytes: &[u8]) -> Option<f64> {
        match *self {
            Decode::Linear { offset, factor } => Some((raw_be(bytes)? + offset) * factor),
            Decode::Range {
                in_min,
                in_max,
                out_min,
                out_max,
            } => Some(range_map(raw_be(bytes)?, in_min, in_max, out_min, out_max)),
            Decode::Bits { mask, shift } => {
                let byte = *bytes.first()?;
                Some(((byte & mask) >> shift) as f64)
            }
            Decode::Lookup(table) => {
                let byte = *bytes.first()?;
                table.iter().find(|(key, _)| *key == byte).map(|(_, value)| *value)
            }
            Decode::OneOf(values) => {
                let byte = bytes.first()?;
                Some(if values.contains(byte) { 1.0 } else { 0.0 })
            }
            Decode::Custom(f) => f(bytes),
        }
    }
}

impl fmt::Debug for Decode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decode::Linear { offset, factor } => f
                .debug_struct("Linear")
                .field("offset", offset)
                .field("factor", factor)
                .finish(),
            Decode::Range {
                in_min,
                in_max,
                out_min,
                out_max,
            } => f
                .debug_struct("Range")
                .field("in_min", in_min)
                .field("in_max", in_max)
                .field("out_min", out_min)
                .field("out_max", out_max)
                .finish(),
            Decode::Bits { mask, shift } => f
                .debug_struct("Bits")
                .field("mask", &format_args!("0x{:02x}", mask))
                .field("shift", shift)
                .finish(),
            Decode::Lookup(table) => f.debug_tuple("Lookup").field(table).finish(),
            Decode::OneOf(values) => f.debug_tuple("OneOf").field(&hex::encode(values)).finish(),
            Decode::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Big endian unsigned value of up to 8 bytes.
fn raw_be(bytes: &[u8]) -> Option<f64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }
    Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    static GEARS: &[(u8, f64)] = &[(0x40, 0.0), (0x50, 1.0)];

    #[test]
    fn linear_is_big_endian() {
        let decode = Decode::Linear {
            offset: -1.0,
            factor: 0.5,
        };
        assert_eq!(decode.apply(&[0x01, 0x01]), Some(128.0));
        assert_eq!(Decode::RAW.apply(&[0x2a]), Some(42.0));
        assert_eq!(decode.apply(&[]), None);
    }

    #[test]
    fn range_saturates() {
        let decode = Decode::Range {
            in_min: 0.0,
            in_max: 100.0,
            out_min: -1.0,
            out_max: 1.0,
        };
        assert_eq!(decode.apply(&[50]), Some(0.0));
        assert_eq!(decode.apply(&[200]), Some(1.0));
    }

    #[test]
    fn bits() {
        let decode = Decode::Bits { mask: 0x10, shift: 4 };
        assert_eq!(decode.apply(&[0x1f]), Some(1.0));
        assert_eq!(decode.apply(&[0x0f]), Some(0.0));
    }

    #[test]
    fn lookup_unknown_is_undefined() {
        let decode = Decode::Lookup(GEARS);
        assert_eq!(decode.apply(&[0x50]), Some(1.0));
        assert_eq!(decode.apply(&[0x51]), None);
    }

    #[test]
    fn one_of() {
        let decode = Decode::OneOf(&[1, 2]);
        assert_eq!(decode.apply(&[2]), Some(1.0));
        assert_eq!(decode.apply(&[3]), Some(0.0));
    }

    #[test]
    fn custom() {
        fn double(bytes: &[u8]) -> Option<f64> {
            bytes.first().map(|b| *b as f64 * 2.0)
        }
        assert_eq!(Decode::Custom(double).apply(&[4]), Some(8.0));
        assert_eq!(format!("{:?}", Decode::Custom(double)), "Custom(..)");
    }
}
