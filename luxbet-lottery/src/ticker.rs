use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Repeating timer task. Dropping the handle cancels it.
#[derive(Debug)]
pub struct RoundTicker {
    handle: JoinHandle<()>,
}

impl RoundTicker {
    /// Runs `on_tick` every `period`, first call one full period from now.
    /// Must be called inside a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick();
            }
        });

        Self { handle }
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for RoundTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
