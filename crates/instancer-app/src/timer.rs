//! Countdown interval task
//!
//! At most one interval runs at a time. Starting a new one aborts the
//! previous task, so a superseded deployment can never keep ticking.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

use crate::message::Message;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the single countdown interval task
#[derive(Debug)]
pub struct CountdownTimer {
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Timer with a custom period (tests)
    pub fn with_period(period: Duration) -> Self {
        Self {
            handle: None,
            period,
        }
    }

    /// Abort any running interval and start ticking `generation` for `id`
    pub fn start(&mut self, id: String, generation: u64, tx: mpsc::Sender<Message>) {
        self.stop();

        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!("Countdown tick {} for {}", generation, id);
                let tick = Message::CountdownTick {
                    id: id.clone(),
                    generation,
                };
                if tx.send(tick).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
