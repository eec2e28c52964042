use tokio::sync::mpsc;
use tracing::trace;

use super::{Button, Gamepad, GamepadEvent};

/// Forwards every call as a [`GamepadEvent`] over a bounded channel, e.g. to a task relaying the state to a remote host.
///
/// Sending never blocks. Events are dropped while the channel is full or after the receiver went away.
pub struct ChannelGamepad {
    sender: mpsc::Sender<GamepadEvent>,
}

impl ChannelGamepad {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<GamepadEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    fn push(&self, event: GamepadEvent) {
        if let Err(e) = self.sender.try_send(event) {
            trace!("Dropped gamepad event: {}", e);
        }
    }
}

impl Gamepad for ChannelGamepad {
    fn left_stick(&mut self, x: f64, y: f64) {
        self.push(GamepadEvent::LeftStick { x, y })
    }

    fn right_stick(&mut self, x: f64, y: f64) {
        self.push(GamepadEvent::RightStick { x, y })
    }

    fn left_trigger(&mut self, value: f64) {
        self.push(GamepadEvent::LeftTrigger(value))
    }

    fn right_trigger(&mut self, value: f64) {
        self.push(GamepadEvent::RightTrigger(value))
    }

    fn button(&mut self, button: Button, pressed: bool) {
        self.push(GamepadEvent::Button { button, pressed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_events_in_order() {
        let (mut gamepad, mut rx) = ChannelGamepad::new(8);
        gamepad.left_stick(0.5, -0.25);
        gamepad.button(Button::A, true);

        assert_eq!(rx.try_recv().unwrap(), GamepadEvent::LeftStick { x: 0.5, y: -0.25 });
        assert_eq!(
            rx.try_recv().unwrap(),
            GamepadEvent::Button {
                button: Button::A,
                pressed: true
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (mut gamepad, mut rx) = ChannelGamepad::new(1);
        gamepad.left_trigger(0.1);
        gamepad.left_trigger(0.2);

        assert_eq!(rx.try_recv().unwrap(), GamepadEvent::LeftTrigger(0.1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (mut gamepad, rx) = ChannelGamepad::new(1);
        drop(rx);
        gamepad.button(Button::B, false);
    }
}
