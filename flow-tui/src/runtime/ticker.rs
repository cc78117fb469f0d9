use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::action_queue::{Action, ActionTx};

pub(super) const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Repeating [`Action::Tick`] source for the running timer.
/// The interval task is aborted when the ticker is dropped.
pub(super) struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn start(action_tx: ActionTx, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if action_tx.send(Action::Tick).is_err() {
                    break;
                }
            }
        });
        tracing::debug!("ticker started");
        Self { handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("ticker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::super::action_queue::channel;
    use super::*;

    fn drain_ticks(rx: &mut super::super::action_queue::ActionRx) -> usize {
        let mut ticks = 0;
        while let Ok(action) = rx.try_recv() {
            if matches!(action, Action::Tick) {
                ticks += 1;
            }
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_dropped() {
        let (tx, mut rx) = channel();
        let ticker = Ticker::start(tx, TICK_PERIOD);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(drain_ticks(&mut rx), 3);

        drop(ticker);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain_ticks(&mut rx), 0);
    }
}
