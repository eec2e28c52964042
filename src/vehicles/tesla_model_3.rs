//! Tesla Model 3, broadcast signals from the vehicle CAN. The bus is busy enough that only every 11th frame is used.

use crate::can::BusConfig;
use crate::gamepad::Button;
use crate::profile::{Category, Decode, MappingEntry, OperationMode, SignalRule, VehicleProfile};
use crate::shaping::{range_map, SteeringCurve};

pub const TESLA_MODEL_3: &str = "TESLA_MODEL_3";

const STEERING_ANGLE_RANGE: f64 = 819.2;

/// SCCM_steeringAngle: 16|14@1+ (0.1,-819.2) [deg]
fn steering_angle(x: &[u8]) -> Option<f64> {
    let raw = ((*x.get(1)? as u16 & 0x3f) << 8) | *x.first()? as u16;
    let angle = raw as f64 * 0.1 - STEERING_ANGLE_RANGE;
    Some(range_map(angle, -STEERING_ANGLE_RANGE, STEERING_ANGLE_RANGE, -1.0, 1.0))
}

/// Gear lever, upper three bits
fn gear(x: &[u8]) -> Option<f64> {
    match *x.first()? >> 5 {
        0x02 => Some(-2.0),
        0x03 => Some(0.0),
        0x04 => Some(1.0),
        _ => None,
    }
}

/// The frame is multiplexed, only mux 0 carries the brake switch. Other muxes keep the previous value.
fn brake(x: &[u8]) -> Option<f64> {
    if *x.first()? & 0b0000_0011 != 0 {
        return None;
    }
    if *x.get(4)? & 0b0000_1100 > 1 {
        Some(100.0)
    } else {
        Some(0.0)
    }
}

pub fn tesla_model_3() -> VehicleProfile {
    VehicleProfile::new(TESLA_MODEL_3, OperationMode::DirectBroadcast)
        .bus(BusConfig::classic(500_000))
        .steering(SteeringCurve::new(0.08, 0.1, 1.0))
        .read_limiter(10)
        .auto_detect(&[0x1d8, 0x261, 0x288, 0x129, 0x545, 0x257, 0x118, 0x3c2])
        .mapping(MappingEntry::new(
            0,
            "steering",
            SignalRule::new(0x129, 3, 2, Decode::Custom(steering_angle)),
            Category::Steering,
        ))
        // Pedal position in percent
        .mapping(MappingEntry::new(
            1,
            "speed",
            SignalRule::new(0x118, 5, 1, Decode::Linear { offset: 0.0, factor: 0.4 }),
            Category::Speed,
        ))
        .mapping(MappingEntry::new(
            2,
            "brake",
            SignalRule::new(0x3c2, 1, 5, Decode::Custom(brake)),
            Category::Brake,
        ))
        .mapping(MappingEntry::new(
            3,
            "gear",
            SignalRule::new(0x118, 3, 1, Decode::Custom(gear)),
            Category::Gear {
                down: Button::DpadDown,
                up: Button::DpadUp,
            },
        ))
        // VCFRONT_lowBeamLeftStatus
        .mapping(MappingEntry::new(
            4,
            "nitro",
            SignalRule::new(0x3f5, 4, 1, Decode::Bits { mask: 0x10, shift: 4 }),
            Category::Button(Button::A),
        ))
        // VCFRONT_indicatorLeftRequest
        .mapping(MappingEntry::new(
            5,
            "fire",
            SignalRule::new(0x3f5, 1, 1, Decode::OneOf(&[1, 2])),
            Category::Button(Button::B),
        ))
        .mapping(MappingEntry::new(
            6,
            "buttonX",
            SignalRule::new(0x3f5, 1, 1, Decode::OneOf(&[4, 8])),
            Category::Button(Button::X),
        ))
}
