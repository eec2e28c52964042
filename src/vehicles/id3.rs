//! Volkswagen ID.3

use std::time::Duration;

use crate::can::BusConfig;
use crate::gamepad::Button;
use crate::profile::{Category, Decode, MappingEntry, OperationMode, PollingRequest, SignalRule, VehicleProfile};
use crate::shaping::{range_map, SteeringCurve};
use crate::uds::SessionType;

pub const ID3_INTERNAL: &str = "ID3_INTERNAL";
pub const ID3_UDS: &str = "ID3_UDS";

const POLLING_INTERVAL_FAST: Duration = Duration::from_millis(30);
const POLLING_INTERVAL_SLOW: Duration = Duration::from_millis(300);
const PADDING: u8 = 0x55;

const SHIFTER: Category = Category::Gear {
    down: Button::DpadDown,
    up: Button::DpadUp,
};

/// Shifter stalk on the broadcast bus
static GEAR_INTERNAL: &[(u8, f64)] = &[(0x40, 0.0), (0x50, 1.0), (0x60, -1.0), (0x70, -2.0)];

/// Shifter stalk as reported by the diagnostic service. 0x05 is fully up, 0x06 up.
static GEAR_UDS: &[(u8, f64)] = &[(0x04, 0.0), (0x05, 1.0), (0x06, 1.0), (0x09, -1.0), (0x07, -2.0)];

/// Steering is two bytes: left deflection in the first, right deflection in the second.
fn steering_internal(x: &[u8]) -> Option<f64> {
    let (left, right) = (*x.first()?, *x.get(1)?);
    let value = if left > 0 { -(left as f64) } else { right as f64 };
    Some(range_map(value, -255.0, 255.0, -1.0, 1.0))
}

/// Accelerator pedal in percent, truncated.
fn pedal_percent(x: &[u8]) -> Option<f64> {
    let raw = *x.first()? as f64;
    Some((100.0 * (raw - 0x25 as f64) / 0xb5 as f64).trunc())
}

/// Brake pressure, the low byte carries an offset of 0x75.
fn brake_uds(x: &[u8]) -> Option<f64> {
    let (high, low) = (*x.first()? as f64, *x.get(1)? as f64);
    let low = (low - 0x75 as f64).max(0.0);
    Some(100.0 * (high * 256.0 + low) / 0x5e1 as f64)
}

/// Broadcast mode, reading the signals straight off the CAN-FD and classic buses.
pub fn id3_internal() -> VehicleProfile {
    VehicleProfile::new(ID3_INTERNAL, OperationMode::DirectBroadcast)
        .bus(BusConfig::default_fd())
        .bus(BusConfig::default())
        .steering(SteeringCurve::new(0.15, 0.1, 1.0))
        .mapping(MappingEntry::new(
            0,
            "steering",
            SignalRule::new(0xfc, 24, 2, Decode::Custom(steering_internal)),
            Category::Steering,
        ))
        .mapping(MappingEntry::new(
            1,
            "speed",
            SignalRule::new(0x14c, 22, 1, Decode::Custom(pedal_percent)),
            Category::Speed,
        ))
        .mapping(MappingEntry::new(
            2,
            "brake",
            SignalRule::new(
                0x176,
                6,
                1,
                Decode::Linear {
                    offset: -1.0,
                    factor: 100.0 / 0x50 as f64,
                },
            ),
            Category::Brake,
        ))
        .mapping(MappingEntry::new(
            3,
            "gear",
            SignalRule::new(0xb5, 6, 1, Decode::Lookup(GEAR_INTERNAL)),
            SHIFTER,
        ))
        .mapping(MappingEntry::new(
            4,
            "nitro",
            SignalRule::new(0x658, 2, 1, Decode::OneOf(&[0x70])),
            Category::Button(Button::A),
        ))
        // Left indicator, fires three times per blink
        .mapping(MappingEntry::new(
            5,
            "fire",
            SignalRule::new(0x658, 7, 1, Decode::OneOf(&[0x12])),
            Category::Button(Button::B),
        ))
}

/// Diagnostic polling mode, works through the OBD port.
pub fn id3_uds() -> VehicleProfile {
    VehicleProfile::new(ID3_UDS, OperationMode::DiagnosticPolling)
        .bus(BusConfig::classic(500_000))
        .auto_detect(&[0x77c, 0x77d, 0x7a5, 0x776])
        .steering(SteeringCurve::new(0.15, 0.1, 1.0))
        .mapping(MappingEntry::new(
            0,
            "steering",
            SignalRule::new(
                0x77c,
                5,
                2,
                Decode::Range {
                    in_min: 0.0,
                    in_max: 0x2edf as f64,
                    out_min: 1.0,
                    out_max: -1.0,
                },
            ),
            Category::Steering,
        ))
        .mapping(MappingEntry::new(
            1,
            "speed",
            SignalRule::new(0x77d, 5, 1, Decode::Custom(pedal_percent)),
            Category::Speed,
        ))
        .mapping(
            MappingEntry::new(2, "brake", SignalRule::new(0x7a5, 7, 2, Decode::Custom(brake_uds)), Category::Brake)
                .identity_filter([0x62, 0x47]),
        )
        .mapping(
            MappingEntry::new(3, "gear", SignalRule::new(0x776, 5, 1, Decode::Lookup(GEAR_UDS)), SHIFTER)
                .identity_filter([0x4f, 0xe4]),
        )
        .mapping(
            MappingEntry::new(
                4,
                "nitro",
                SignalRule::new(0x776, 5, 1, Decode::OneOf(&[0x01])),
                Category::Button(Button::A),
            )
            .identity_filter([0x1f, 0x02]),
        )
        .mapping(
            MappingEntry::new(
                5,
                "fire",
                SignalRule::new(0x776, 5, 1, Decode::OneOf(&[0x02])),
                Category::Button(Button::B),
            )
            .identity_filter([0x1f, 0x00]),
        )
        .mapping(
            MappingEntry::new(6, "X", SignalRule::new(0x776, 5, 1, Decode::OneOf(&[0x01])), Category::Button(Button::X))
                .identity_filter([0x1f, 0x00]),
        )
        .mapping(
            MappingEntry::new(7, "Y", SignalRule::new(0x776, 5, 1, Decode::OneOf(&[0x02])), Category::Button(Button::Y))
                .identity_filter([0x1f, 0x02]),
        )
        .polling(PollingRequest::read_data_by_identifier(0x70c, 0x4fe4, PADDING, POLLING_INTERVAL_FAST))
        .polling(PollingRequest::read_data_by_identifier(0x713, 0xf449, PADDING, POLLING_INTERVAL_FAST))
        .polling(PollingRequest::read_data_by_identifier(0x73b, 0x47d4, PADDING, POLLING_INTERVAL_FAST))
        .polling(PollingRequest::read_data_by_identifier(0x712, 0x1812, PADDING, POLLING_INTERVAL_FAST))
        .polling(PollingRequest::read_data_by_identifier(0x70c, 0x1f00, PADDING, POLLING_INTERVAL_SLOW))
        .polling(PollingRequest::read_data_by_identifier(0x70c, 0x1f02, PADDING, POLLING_INTERVAL_SLOW))
        .polling(PollingRequest::diagnostic_session_control(
            0x73b,
            SessionType::ExtendedDiagnostic as u8,
            PADDING,
            POLLING_INTERVAL_SLOW,
        ))
}
