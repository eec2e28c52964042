use super::{Button, Gamepad};

/// Report id of the gamepad input report.
pub const HID_INPUT_REPORT: u8 = 0xa1;

const REPORT_LEN: usize = 4;
const AXIS_SCALE: f64 = 127.0;

/// Two axis, four button HID gamepad as exposed over a wireless link.
///
/// Every state change produces a full input report `[0xA1, x, y, buttons]` which is handed to `report`. The device
/// has no trigger, so the left trigger pulls the Y axis backwards instead. An idle throttle only resets Y once,
/// otherwise speed frames would keep erasing the brake.
pub struct HidGamepad<F> {
    report: F,
    x: f64,
    y: f64,
    y_zero: bool,
    buttons: u8,
}

impl<F: FnMut(&[u8])> HidGamepad<F> {
    pub fn new(report: F) -> Self {
        Self {
            report,
            x: 0.0,
            y: 0.0,
            y_zero: false,
            buttons: 0,
        }
    }

    fn button_mask(button: Button) -> Option<u8> {
        match button {
            Button::A => Some(1 << 0),
            Button::B => Some(1 << 1),
            Button::X => Some(1 << 3),
            Button::Y => Some(1 << 4),
            _ => None,
        }
    }

    fn axis(value: f64) -> u8 {
        // Saturating float to int cast, the report carries a signed byte
        ((value * AXIS_SCALE) as i8) as u8
    }

    /// Current input report.
    pub fn state(&self) -> [u8; REPORT_LEN] {
        [HID_INPUT_REPORT, Self::axis(self.x), Self::axis(self.y), self.buttons]
    }

    fn send_report(&mut self) {
        let state = self.state();
        (self.report)(&state);
    }
}

impl<F: FnMut(&[u8])> Gamepad for HidGamepad<F> {
    fn left_stick(&mut self, x: f64, y: f64) {
        self.x = x;
        if y != 0.0 {
            self.y = -y;
            self.y_zero = false;
        } else if !self.y_zero {
            self.y = 0.0;
            self.y_zero = true;
        }
        self.send_report();
    }

    fn left_trigger(&mut self, value: f64) {
        self.y = value;
        self.send_report();
    }

    fn button(&mut self, button: Button, pressed: bool) {
        let Some(mask) = Self::button_mask(button) else {
            return;
        };

        if pressed {
            self.buttons |= mask;
        } else {
            self.buttons &= !mask;
        }
        self.send_report();
    }
}
