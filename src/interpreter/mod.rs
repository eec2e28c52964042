//! Turns bus frames into controller input according to a [`VehicleProfile`].
//! ## Example
//! ```rust
//! use v2g::gamepad::ChannelGamepad;
//! use v2g::interpreter::SignalInterpreter;
//! use v2g::vehicles;
//!
//! let (gamepad, mut events) = ChannelGamepad::new(64);
//! let interpreter = SignalInterpreter::new(vehicles::id3_internal(), gamepad);
//!
//! // Brake pedal at 50%
//! interpreter.on_frame(0x176, &[0, 0, 0, 0, 0, 0x29, 0, 0]);
//! assert!(events.try_recv().is_ok());
//! ```

mod state;

pub use state::{ControllerState, Direction, GearPosition, GearSignal};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::can::{AsyncCanAdapter, Frame};
use crate::gamepad::Gamepad;
use crate::profile::{Category, VehicleProfile};
use crate::shaping::pedal;
use crate::StreamExt;

struct Inner<G> {
    state: ControllerState,
    /// Frames dropped since the last processed one
    counter: u32,
    gamepad: G,
}

/// Runtime engine for one vehicle profile and one controller.
///
/// Frames may arrive from several bus threads at once. Each frame is handled under a single lock, so a frame is
/// either fully applied or not at all when the next one is looked at.
pub struct SignalInterpreter<G> {
    profile: Arc<VehicleProfile>,
    inner: Mutex<Inner<G>>,
}

impl<G: Gamepad> SignalInterpreter<G> {
    pub fn new(profile: impl Into<Arc<VehicleProfile>>, gamepad: G) -> Self {
        let profile = profile.into();
        let state = ControllerState::new(profile.buttons());

        Self {
            profile,
            inner: Mutex::new(Inner {
                state,
                counter: 0,
                gamepad,
            }),
        }
    }

    pub fn profile(&self) -> &VehicleProfile {
        &self.profile
    }

    fn lock(&self) -> MutexGuard<'_, Inner<G>> {
        // State is only mutated through `on_frame`, which leaves it consistent between mappings
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handles one received frame.
    pub fn on_frame(&self, id: u32, payload: &[u8]) {
        let mut inner = self.lock();

        if inner.counter < self.profile.read_limiter {
            inner.counter += 1;
            return;
        }
        inner.counter = 0;

        let Inner { state, gamepad, .. } = &mut *inner;
        let mut matched = false;

        for entry in self.profile.mappings.iter().filter(|e| e.accepts(id, payload)) {
            // Short payloads and undefined inputs leave the state as it is
            let Some(value) = entry.signal.decode(payload) else {
                continue;
            };
            matched = true;

            match entry.category {
                Category::Steering => {
                    state.steering = self.profile.steering.shape(value);
                    gamepad.left_stick(state.steering, state.throttle);
                }
                Category::Speed => {
                    state.throttle = pedal(value) * state.direction.sign();
                    gamepad.left_stick(state.steering, state.throttle);
                }
                Category::Brake => {
                    state.brake = pedal(value);
                    gamepad.left_trigger(state.brake);
                }
                Category::Button(button) => state.set_button(button, value != 0.0, gamepad),
                Category::Gear { down, up } => {
                    if let Some(signal) = GearSignal::from_value(value) {
                        state.shift(signal, down, up, gamepad);
                    }
                }
            }
        }

        if matched {
            trace!("{}", state.status());
        }
    }

    /// Handles a frame received from an adapter. Frames sent by ourselves are ignored.
    pub fn handle(&self, frame: &Frame) {
        if frame.loopback {
            return;
        }
        self.on_frame(frame.id.into(), &frame.data);
    }

    /// Feeds all frames accepted by the profile's filters into the interpreter until the adapter shuts down.
    pub async fn run(&self, adapter: &AsyncCanAdapter) {
        let filters = self.profile.filters();
        let mut stream =
            adapter.recv_filter(move |frame| !frame.loopback && filters.iter().any(|f| f.matches(frame.id)));

        while let Some(frame) = stream.next().await {
            self.handle(&frame);
        }
    }

    /// Current controller position.
    pub fn state(&self) -> ControllerState {
        self.lock().state.clone()
    }

    pub fn into_gamepad(self) -> G {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .gamepad
    }
}
