//! Periodic replay of diagnostic requests for vehicles in polling mode.
//!
//! Each request runs on its own tokio task at its own interval. Start times are staggered so requests sharing an
//! interval do not all hit the bus at once.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::can::{AsyncCanAdapter, Frame};
use crate::profile::PollingRequest;

/// Fraction of a request's interval added to the start delay of the next request.
const STAGGER_DIVISOR: u32 = 5;

/// Running polling tasks. Dropping the handle stops all of them.
#[derive(Debug)]
pub struct PollingHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl PollingHandle {
    /// Number of requests being replayed.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn stop(mut self) {
        self.abort_all();
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.abort_all();
    }
}

async fn poll(adapter: Arc<AsyncCanAdapter>, frame: Frame, delay: Duration, period: Duration) {
    tokio::time::sleep(delay).await;

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut failing = false;
    loop {
        interval.tick().await;

        match adapter.send(&frame).await {
            Ok(()) if failing => {
                info!("Polling {:?} recovered", frame.id);
                failing = false;
            }
            Ok(()) => {}
            // Only report the first failure of a streak
            Err(e) if !failing => {
                warn!("Polling {:?} failed: {}", frame.id, e);
                failing = true;
            }
            Err(_) => {}
        }
    }
}

/// Starts one task per request on the current tokio runtime. Requests with a zero interval are skipped. Nothing is
/// started if any request does not form a valid frame.
pub fn spawn_polling(
    adapter: Arc<AsyncCanAdapter>,
    bus: u8,
    requests: &[PollingRequest],
) -> crate::Result<PollingHandle> {
    let mut frames = Vec::with_capacity(requests.len());
    for request in requests {
        if request.interval.is_zero() {
            warn!("Skipping polling request to {:?} without interval", request.id);
            continue;
        }
        frames.push((request.to_frame(bus)?, request.interval));
    }

    let mut tasks = Vec::with_capacity(frames.len());
    let mut delay = Duration::ZERO;

    for (frame, period) in frames {
        debug!("Polling {:?} {} every {:?}", frame.id, hex::encode(&frame.data), period);

        tasks.push(tokio::spawn(poll(adapter.clone(), frame, delay, period)));
        delay += period / STAGGER_DIVISOR;
    }

    Ok(PollingHandle { tasks })
}
