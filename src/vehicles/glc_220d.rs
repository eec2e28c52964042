//! Mercedes-Benz GLC 220d. Everything is read through diagnostic requests, several responses span multiple frames.

use std::time::Duration;

use crate::can::BusConfig;
use crate::gamepad::Button;
use crate::profile::{Category, Decode, MappingEntry, OperationMode, PollingRequest, SignalRule, VehicleProfile};
use crate::shaping::SteeringCurve;
use crate::uds;

pub const GLC_220D: &str = "GLC_220D";

const POLLING_INTERVAL_FAST: Duration = Duration::from_millis(50);
const POLLING_INTERVAL_SLOW: Duration = Duration::from_millis(300);
const PADDING: u8 = 0xff;

pub fn glc_220d() -> VehicleProfile {
    VehicleProfile::new(GLC_220D, OperationMode::DiagnosticPolling)
        .bus(BusConfig::classic(500_000))
        .steering(SteeringCurve::new(0.15, 0.1, 1.0))
        .auto_detect(&[0x87, 0x133, 0xb3, 0x1e1, 0x3d, 0x225, 0x2f, 0xa1, 0xa3, 0xae, 0x381])
        // Centered around 0x2000, lower values are left
        .mapping(
            MappingEntry::new(
                0,
                "steering",
                SignalRule::new(
                    0x726,
                    6,
                    2,
                    Decode::Range {
                        in_min: 0x0fbb as f64,
                        in_max: 0x30cd as f64,
                        out_min: -1.0,
                        out_max: 1.0,
                    },
                ),
                Category::Steering,
            )
            .multi_frame_identity_filter([0x02, 0x00]),
        )
        // Accelerator pedal in percent
        .mapping(
            MappingEntry::new(1, "speed", SignalRule::new(0x7e8, 5, 1, Decode::RAW), Category::Speed)
                .identity_filter([0x20, 0x15]),
        )
        // Brake pressure is in the second consecutive frame of a long response
        .mapping(
            MappingEntry::new(
                2,
                "brake",
                SignalRule::new(
                    0x7ea,
                    4,
                    2,
                    Decode::Range {
                        in_min: 0x14 as f64,
                        in_max: 0x3208 as f64,
                        out_min: 0.0,
                        out_max: 100.0,
                    },
                ),
                Category::Brake,
            )
            .consecutive_frame_filter(uds::consecutive_frame(2)),
        )
        // Headlight flasher
        .mapping(
            MappingEntry::new(
                4,
                "nitro",
                SignalRule::new(0x726, 6, 1, Decode::OneOf(&[0x02])),
                Category::Button(Button::A),
            )
            .multi_frame_identity_filter([0x02, 0x03]),
        )
        // High beam
        .mapping(
            MappingEntry::new(
                4,
                "high_beam",
                SignalRule::new(0x726, 6, 1, Decode::OneOf(&[0x01])),
                Category::Button(Button::X),
            )
            .multi_frame_identity_filter([0x02, 0x03]),
        )
        // Left indicator
        .mapping(
            MappingEntry::new(
                5,
                "fire",
                SignalRule::new(0x723, 8, 1, Decode::OneOf(&[0x01])),
                Category::Button(Button::B),
            )
            .multi_frame_identity_filter([0x02, 0x02]),
        )
        // Right indicator
        .mapping(
            MappingEntry::new(7, "Y", SignalRule::new(0x723, 8, 1, Decode::OneOf(&[0x02])), Category::Button(Button::Y))
                .multi_frame_identity_filter([0x02, 0x02]),
        )
        .polling(PollingRequest::read_data_by_identifier(0x746, 0x0200, PADDING, POLLING_INTERVAL_SLOW))
        .polling(PollingRequest::read_data_by_identifier(0x7e0, 0x2015, PADDING, POLLING_INTERVAL_FAST))
        .polling(PollingRequest::read_data_by_identifier(0x746, 0x0203, PADDING, POLLING_INTERVAL_SLOW))
        .polling(PollingRequest::read_data_by_identifier(0x743, 0x0202, PADDING, POLLING_INTERVAL_SLOW))
}
