use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Wait strategy selecting between the two interval semantics.
///
/// Both variants share one `ready` entry point so the cancellation handling
/// in the run loop stays a single code path.
pub(crate) enum WaitStrategy {
    /// Ticks are scheduled start-to-start from loop entry. When an
    /// invocation overruns the interval, one overdue tick fires as soon as
    /// possible, the ticks missed in between are dropped, and the schedule
    /// realigns to the next boundary instead of delivering a catch-up burst.
    FixedSchedule(Interval),
    /// The interval spans end-of-invocation to start-of-next-invocation: a
    /// fresh sleep is started on every wait, after the previous invocation
    /// has returned.
    WaitFull(Duration),
}

impl WaitStrategy {
    pub(crate) fn new(interval: Duration, wait_full: bool) -> Self {
        if wait_full {
            Self::WaitFull(interval)
        } else {
            // interval_at so the first tick fires after one full interval,
            // not immediately.
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            Self::FixedSchedule(ticker)
        }
    }

    /// Resolves when the next invocation is due.
    pub(crate) async fn ready(&mut self) {
        match self {
            Self::FixedSchedule(ticker) => {
                ticker.tick().await;
            }
            Self::WaitFull(interval) => time::sleep(*interval).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fixed_schedule_ticks_start_to_start() {
        let interval = Duration::from_secs(5);
        let start = Instant::now();
        let mut wait = WaitStrategy::new(interval, false);

        wait.ready().await;
        assert_eq!(start.elapsed(), interval);

        wait.ready().await;
        assert_eq!(start.elapsed(), interval * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_schedule_skips_missed_ticks() {
        let interval = Duration::from_secs(10);
        let start = Instant::now();
        let mut wait = WaitStrategy::new(interval, false);

        wait.ready().await;
        assert_eq!(start.elapsed(), interval);

        // Simulate an invocation overrunning two full intervals: one overdue
        // tick fires immediately, the ticks missed in between are dropped,
        // and the schedule realigns to the next boundary instead of
        // delivering a catch-up burst.
        time::sleep(Duration::from_secs(25)).await;
        wait.ready().await;
        assert_eq!(start.elapsed(), Duration::from_secs(35));

        wait.ready().await;
        assert_eq!(start.elapsed(), Duration::from_secs(40));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_full_restarts_after_each_wait() {
        let interval = Duration::from_secs(5);
        let start = Instant::now();
        let mut wait = WaitStrategy::new(interval, true);

        wait.ready().await;
        assert_eq!(start.elapsed(), interval);

        // Time spent between waits pushes the next deadline back by the
        // full interval.
        time::sleep(Duration::from_secs(3)).await;
        wait.ready().await;
        assert_eq!(start.elapsed(), Duration::from_secs(13));
    }
}
