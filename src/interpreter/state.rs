//! Controller position as built up from decoded signals.

use std::collections::BTreeMap;

use crate::gamepad::{Button, Gamepad};

/// Sign applied to the throttle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// Last confirmed position of a momentary up/down shifter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GearPosition {
    Down,
    #[default]
    Neutral,
    Up,
}

impl GearPosition {
    pub fn value(&self) -> i8 {
        match self {
            GearPosition::Down => -1,
            GearPosition::Neutral => 0,
            GearPosition::Up => 1,
        }
    }
}

/// Decoded value of a gear signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GearSignal {
    Reverse,
    Down,
    Neutral,
    Up,
}

impl GearSignal {
    /// None for values outside `{-2, -1, 0, 1}`.
    pub fn from_value(value: f64) -> Option<GearSignal> {
        match value {
            -2.0 => Some(GearSignal::Reverse),
            -1.0 => Some(GearSignal::Down),
            0.0 => Some(GearSignal::Neutral),
            1.0 => Some(GearSignal::Up),
            _ => None,
        }
    }
}

/// Snapshot of everything the interpreter has pushed to the controller.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerState {
    pub steering: f64,
    pub throttle: f64,
    pub direction: Direction,
    pub brake: f64,
    pub gear: GearPosition,
    /// Last state sent per button of a button mapping
    pub buttons: BTreeMap<Button, bool>,
}

impl ControllerState {
    pub fn new(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            buttons: buttons.into_iter().map(|b| (b, false)).collect(),
            ..Default::default()
        }
    }

    /// Sends the button only when its state changed.
    pub fn set_button<G: Gamepad + ?Sized>(&mut self, button: Button, pressed: bool, gamepad: &mut G) {
        if self.buttons.get(&button) == Some(&pressed) {
            return;
        }
        self.buttons.insert(button, pressed);
        gamepad.button(button, pressed);
    }

    /// Advances the shifter state machine. Repeated readings of the same position don't press again.
    pub fn shift<G: Gamepad + ?Sized>(&mut self, signal: GearSignal, down: Button, up: Button, gamepad: &mut G) {
        match signal {
            GearSignal::Reverse => self.direction = Direction::Reverse,
            GearSignal::Down => {
                if self.gear != GearPosition::Down {
                    gamepad.button(down, true);
                }
                self.gear = GearPosition::Down;
            }
            GearSignal::Neutral => {
                match self.gear {
                    GearPosition::Down => gamepad.button(down, false),
                    GearPosition::Up => gamepad.button(up, false),
                    GearPosition::Neutral => {}
                }
                self.gear = GearPosition::Neutral;
            }
            GearSignal::Up => {
                if self.gear != GearPosition::Up {
                    gamepad.button(up, true);
                }
                self.gear = GearPosition::Up;
                self.direction = Direction::Forward;
            }
        }
    }

    fn pressed(&self, button: Button) -> u8 {
        self.buttons.get(&button).copied().unwrap_or_default() as u8
    }

    /// One line summary for tracing.
    pub fn status(&self) -> String {
        let mut line = format!(
            "X: {:6.3}, Y: {:6.3}, direction: {:2}, Brake: {:5.3}, Gear: {:2}",
            self.steering,
            self.throttle,
            self.direction.sign(),
            self.brake,
            self.gear.value()
        );
        for button in self.buttons.keys() {
            line.push_str(&format!(", {}: {}", button, self.pressed(*button)));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::GamepadEvent;

    #[derive(Default)]
    struct Events(Vec<GamepadEvent>);

    impl Gamepad for Events {
        fn left_stick(&mut self, x: f64, y: f64) {
            self.0.push(GamepadEvent::LeftStick { x, y })
        }

        fn left_trigger(&mut self, value: f64) {
            self.0.push(GamepadEvent::LeftTrigger(value))
        }

        fn button(&mut self, button: Button, pressed: bool) {
            self.0.push(GamepadEvent::Button { button, pressed })
        }
    }

    fn press(button: Button, pressed: bool) -> GamepadEvent {
        GamepadEvent::Button { button, pressed }
    }

    #[test]
    fn gear_signal_values() {
        assert_eq!(GearSignal::from_value(-2.0), Some(GearSignal::Reverse));
        assert_eq!(GearSignal::from_value(1.0), Some(GearSignal::Up));
        assert_eq!(GearSignal::from_value(0.5), None);
        assert_eq!(GearSignal::from_value(2.0), None);
    }

    #[test]
    fn shifter_sequence() {
        let mut state = ControllerState::default();
        let mut events = Events::default();

        for value in [1.0, 1.0, 0.0, -1.0, -1.0, 0.0, 1.0] {
            let signal = GearSignal::from_value(value).unwrap();
            state.shift(signal, Button::DpadDown, Button::DpadUp, &mut events);
        }

        assert_eq!(
            events.0,
            vec![
                press(Button::DpadUp, true),
                press(Button::DpadUp, false),
                press(Button::DpadDown, true),
                press(Button::DpadDown, false),
                press(Button::DpadUp, true),
            ]
        );
        assert_eq!(state.gear, GearPosition::Up);
    }

    #[test]
    fn reverse_only_flips_direction() {
        let mut state = ControllerState::default();
        let mut events = Events::default();

        state.shift(GearSignal::Reverse, Button::DpadDown, Button::DpadUp, &mut events);
        assert!(events.0.is_empty());
        assert_eq!(state.direction, Direction::Reverse);
        assert_eq!(state.gear, GearPosition::Neutral);

        state.shift(GearSignal::Up, Button::DpadDown, Button::DpadUp, &mut events);
        assert_eq!(state.direction, Direction::Forward);
    }

    #[test]
    fn buttons_are_edge_triggered() {
        let mut state = ControllerState::new([Button::A]);
        let mut events = Events::default();

        state.set_button(Button::A, false, &mut events);
        state.set_button(Button::A, true, &mut events);
        state.set_button(Button::A, true, &mut events);
        state.set_button(Button::A, false, &mut events);

        assert_eq!(events.0, vec![press(Button::A, true), press(Button::A, false)]);
    }

    #[test]
    fn status_line() {
        let state = ControllerState::new([Button::A, Button::B]);
        assert_eq!(
            state.status(),
            "X:  0.000, Y:  0.000, direction:  1, Brake: 0.000, Gear:  0, A: 0, B: 0"
        );
    }
}
