//! # The v2g Crate
//! Turns a vehicle's CAN traffic into virtual gamepad input. Steering, pedals, the gear lever and a few stalks are
//! decoded according to a [`profile::VehicleProfile`] and forwarded to a [`gamepad::Gamepad`] sink.
//!
//! ## Interpreter Example
//!
//! A profile is picked from the built-in vehicles, then all matching frames received by the adapter are interpreted.
//!
//! ```rust
//! async fn interpreter_example<T: v2g::can::CanAdapter + Send + Sync + 'static>(transport: T) {
//!     let adapter = v2g::can::AsyncCanAdapter::new(transport);
//!     let (gamepad, mut events) = v2g::gamepad::ChannelGamepad::new(64);
//!
//!     let interpreter = v2g::interpreter::SignalInterpreter::new(v2g::vehicles::id3_internal(), gamepad);
//!     tokio::spawn(async move {
//!         while let Some(event) = events.recv().await {
//!             println!("{:?}", event);
//!         }
//!     });
//!
//!     interpreter.run(&adapter).await;
//! }
//! ```
//!
//! ## Auto-Detection Example
//!
//! Vehicles carrying auto-detect identifiers can be recognized from their bus traffic. Diagnostic polling vehicles
//! additionally need their requests replayed in the background.
//!
//! ```rust
//! use std::sync::Arc;
//! async fn detection_example(adapter: Arc<v2g::can::AsyncCanAdapter>) -> v2g::Result<()> {
//!     let registry = v2g::vehicles::registry()?;
//!     let selection: v2g::selection::ProfileSelection = "AUTO".parse()?;
//!     let config = v2g::detector::DetectorConfig::default();
//!
//!     let profile = v2g::selection::select_profile(&registry, &selection, &adapter, &config, None).await?;
//!     let _polling = v2g::polling::spawn_polling(adapter.clone(), config.bus, &profile.polling_requests)?;
//!
//!     let (gamepad, _events) = v2g::gamepad::ChannelGamepad::new(64);
//!     v2g::interpreter::SignalInterpreter::new(profile, gamepad).run(&adapter).await;
//!     Ok(())
//! }
//! ```

pub mod can;
pub mod detector;
mod error;
pub mod gamepad;
pub mod interpreter;
pub mod polling;
pub mod profile;
pub mod selection;
pub mod shaping;
pub mod uds;
pub mod vehicles;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use tokio_stream::{Stream, StreamExt};
