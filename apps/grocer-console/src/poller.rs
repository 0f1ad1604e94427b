//! # Poller
//!
//! Background task that asks the service for the most recently registered
//! product on a fixed interval.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  loop {                                                               │
//! │    select! {                                                          │
//! │      interval.tick()  ──► control == Run ? latest() ──► PollEvent     │
//! │      control.changed() ──► sender dropped ──► stop                    │
//! │    }                                                                  │
//! │  }                                                                    │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures are reported once when the service goes away and once when it
//! comes back, not on every tick.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use grocer_core::Product;

use crate::client::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerControl {
    Run,
    Pause,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    Latest(Product),
    Unreachable(String),
    Reconnected,
}

pub struct Poller {
    client: ApiClient,
    interval: Duration,
    events: mpsc::Sender<PollEvent>,
    control: watch::Receiver<PollerControl>,
    failing: bool,
}

impl Poller {
    /// Spawns the poller and returns its event stream and control handle.
    ///
    /// Dropping the control sender or the event receiver stops the task.
    pub fn spawn(
        client: ApiClient,
        interval: Duration,
    ) -> (
        mpsc::Receiver<PollEvent>,
        watch::Sender<PollerControl>,
        JoinHandle<()>,
    ) {
        let (events_tx, events_rx) = mpsc::channel(16);
        let (control_tx, control_rx) = watch::channel(PollerControl::Run);

        let poller = Poller {
            client,
            interval,
            events: events_tx,
            control: control_rx,
            failing: false,
        };
        let handle = tokio::spawn(poller.run());

        (events_rx, control_tx, handle)
    }

    async fn run(mut self) {
        info!(interval_ms = self.interval.as_millis() as u64, "Poller starting");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if *self.control.borrow() == PollerControl::Pause {
                        continue;
                    }
                    if !self.poll_once().await {
                        break;
                    }
                }

                changed = self.control.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!(control = ?*self.control.borrow(), "Poller control changed");
                }
            }
        }

        info!("Poller stopped");
    }

    /// Returns `false` once the UI has gone away.
    async fn poll_once(&mut self) -> bool {
        let event = match self.client.latest().await {
            Ok(latest) => {
                let recovered = std::mem::replace(&mut self.failing, false);
                if recovered && self.events.send(PollEvent::Reconnected).await.is_err() {
                    return false;
                }
                match latest {
                    Some(product) => PollEvent::Latest(product),
                    None => return true,
                }
            }
            Err(e) => {
                if self.failing {
                    return true;
                }
                warn!(error = %e, "Polling failed");
                self.failing = true;
                PollEvent::Unreachable(e.to_string())
            }
        };

        self.events.send(event).await.is_ok()
    }
}
