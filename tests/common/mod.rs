#![allow(dead_code)]
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use v2g::can::{CanAdapter, Frame};
use v2g::gamepad::{Button, Gamepad, GamepadEvent};

/// Number of `recv` calls between two repetitions of the broadcast traffic.
const BROADCAST_PERIOD: usize = 5;

type Responder = Box<dyn Fn(&Frame) -> Vec<Frame> + Send + Sync>;

/// In-memory transport. Sent frames are echoed back as loopback and may trigger scripted responses, broadcast
/// frames are repeated periodically like ECU traffic on a real bus.
pub struct MockAdapter {
    broadcast: Vec<Frame>,
    responder: Option<Responder>,
    fail_send: bool,
    pending: VecDeque<Frame>,
    sent: Arc<Mutex<Vec<Frame>>>,
    calls: usize,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            broadcast: vec![],
            responder: None,
            fail_send: false,
            pending: VecDeque::new(),
            sent: Arc::new(Mutex::new(vec![])),
            calls: 0,
        }
    }

    pub fn broadcast(mut self, id: u32, data: &[u8]) -> Self {
        self.broadcast.push(Frame::new(0, id.into(), data).unwrap());
        self
    }

    pub fn respond(mut self, responder: impl Fn(&Frame) -> Vec<Frame> + Send + Sync + 'static) -> Self {
        self.responder = Some(Box::new(responder));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Log of all frames accepted for sending, shared with the test.
    pub fn sent(&self) -> Arc<Mutex<Vec<Frame>>> {
        self.sent.clone()
    }
}

impl CanAdapter for MockAdapter {
    fn send(&mut self, frames: &mut VecDeque<Frame>) -> v2g::Result<()> {
        if self.fail_send {
            return Err(v2g::Error::Disconnected);
        }

        while let Some(frame) = frames.pop_front() {
            self.sent.lock().unwrap().push(frame.clone());

            let mut loopback = frame.clone();
            loopback.loopback = true;
            self.pending.push_back(loopback);

            if let Some(responder) = &self.responder {
                self.pending.extend(responder(&frame));
            }
        }
        Ok(())
    }

    fn recv(&mut self) -> v2g::Result<Vec<Frame>> {
        let mut frames: Vec<Frame> = self.pending.drain(..).collect();

        if self.calls % BROADCAST_PERIOD == 0 {
            frames.extend(self.broadcast.iter().cloned());
        }
        self.calls += 1;

        Ok(frames)
    }
}

pub fn frame(id: u32, data: &[u8]) -> Frame {
    Frame::new(0, id.into(), data).unwrap()
}

/// Sink recording every call.
#[derive(Default)]
pub struct Recorder {
    pub events: Vec<GamepadEvent>,
}

impl Gamepad for Recorder {
    fn left_stick(&mut self, x: f64, y: f64) {
        self.events.push(GamepadEvent::LeftStick { x, y });
    }

    fn left_trigger(&mut self, value: f64) {
        self.events.push(GamepadEvent::LeftTrigger(value));
    }

    fn button(&mut self, button: Button, pressed: bool) {
        self.events.push(GamepadEvent::Button { button, pressed });
    }
}
