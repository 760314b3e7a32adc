use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Recurring tick task that is aborted when stopped or dropped.
///
/// The first tick fires one full `period` after start, so a consumer counting
/// ticks reads "seconds elapsed" when the period is one second.
#[derive(Debug)]
pub struct ElapsedTimer {
    handle: JoinHandle<()>,
    started_at: Instant,
}

impl ElapsedTimer {
    /// Spawns the ticking task. `on_tick` returns `false` to end the timer
    /// from the inside (e.g. the receiving side went away).
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let started_at = Instant::now();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(started_at + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !on_tick() {
                    tracing::debug!("Timer receiver gone, stopping");
                    break;
                }
            }
        });

        Self { handle, started_at }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        // Drop does the abort.
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
