//! Virtual controller the vehicle signals are rendered to.
//!
//! The interpreter only talks to the [`Gamepad`] trait. Buttons are logical, each sink maps them to whatever bit layout
//! its device uses.

mod channel;
mod hid;

pub use channel::ChannelGamepad;
pub use hid::{HidGamepad, HID_INPUT_REPORT};

use strum_macros::{Display, EnumIter};

/// Logical controller buttons, modelled after an XInput pad.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    Guide,
    A,
    B,
    X,
    Y,
}

/// Capability set of a controller sink. Calls must not block, they are made from the frame handling path.
pub trait Gamepad {
    /// Left stick position, both axes in `-1.0..=1.0`.
    fn left_stick(&mut self, x: f64, y: f64);

    /// Right stick position, both axes in `-1.0..=1.0`.
    fn right_stick(&mut self, _x: f64, _y: f64) {}

    /// Left trigger in `0.0..=1.0`.
    fn left_trigger(&mut self, value: f64);

    /// Right trigger in `0.0..=1.0`.
    fn right_trigger(&mut self, _value: f64) {}

    fn button(&mut self, button: Button, pressed: bool);
}

/// A single call on a [`Gamepad`].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GamepadEvent {
    LeftStick { x: f64, y: f64 },
    RightStick { x: f64, y: f64 },
    LeftTrigger(f64),
    RightTrigger(f64),
    Button { button: Button, pressed: bool },
}

impl GamepadEvent {
    /// Replays the event on a sink.
    pub fn apply<G: Gamepad + ?Sized>(&self, gamepad: &mut G) {
        match *self {
            GamepadEvent::LeftStick { x, y } => gamepad.left_stick(x, y),
            GamepadEvent::RightStick { x, y } => gamepad.right_stick(x, y),
            GamepadEvent::LeftTrigger(value) => gamepad.left_trigger(value),
            GamepadEvent::RightTrigger(value) => gamepad.right_trigger(value),
            GamepadEvent::Button { button, pressed } => gamepad.button(button, pressed),
        }
    }
}

impl<G: Gamepad + ?Sized> Gamepad for Box<G> {
    fn left_stick(&mut self, x: f64, y: f64) {
        (**self).left_stick(x, y)
    }

    fn right_stick(&mut self, x: f64, y: f64) {
        (**self).right_stick(x, y)
    }

    fn left_trigger(&mut self, value: f64) {
        (**self).left_trigger(value)
    }

    fn right_trigger(&mut self, value: f64) {
        (**self).right_trigger(value)
    }

    fn button(&mut self, button: Button, pressed: bool) {
        (**self).button(button, pressed)
    }
}
