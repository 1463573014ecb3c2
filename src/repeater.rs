//! The run loop: composes the caller's cancellation token with process
//! termination signals and invokes the processor once per interval.

mod wait;

use crate::processor::Processor;
use crate::runtime::signals::{self, OsSignals, TerminationSignals};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wait::WaitStrategy;

/// Periodically invokes a [`Processor`] until cancelled.
///
/// The loop stops when the parent token is cancelled, the process receives a
/// termination signal, or an invocation returns an error. At most one
/// invocation is ever in flight; [`Processor::clean_up`] runs exactly once
/// per [`run`](Repeater::run) call, whichever way the loop ends.
pub struct Repeater<P: Processor> {
    processor: P,
    wait_full: bool,
    signals: Arc<dyn TerminationSignals>,
}

impl<P: Processor> Repeater<P> {
    /// Binds a new repeater to the given processor.
    ///
    /// Ownership makes "repeater without a processor" unrepresentable; there
    /// is no runtime check to fail.
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            wait_full: false,
            signals: Arc::new(OsSignals),
        }
    }

    /// Selects wait-full interval semantics: the interval spans the end of
    /// one invocation to the start of the next, instead of start-to-start.
    ///
    /// Takes effect on the next [`run`](Repeater::run) call. The default is
    /// fixed-schedule.
    pub fn with_wait_full(mut self, wait_full: bool) -> Self {
        self.wait_full = wait_full;
        self
    }

    /// Overrides the termination-signal source.
    ///
    /// The default is [`OsSignals`]; substitute [`NoSignals`](crate::NoSignals)
    /// or a synthetic source when the embedder manages signals itself or in
    /// tests.
    pub fn with_termination_signals(mut self, signals: Arc<dyn TerminationSignals>) -> Self {
        self.signals = signals;
        self
    }

    /// Invokes the processor every `interval` until the parent token is
    /// cancelled, the process receives a termination signal, or an invocation
    /// fails.
    ///
    /// If `invoke_immediately` is true, the first invocation happens before
    /// the first interval has elapsed.
    ///
    /// Cancellation and signals are a clean stop: `run` returns `Ok(())`. An
    /// invocation error is returned unchanged after cleanup has executed.
    /// When a tick and cancellation become ready in the same instant,
    /// cancellation wins.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero. This is a caller bug, detected before
    /// any invocation and before cleanup is registered.
    pub async fn run(
        &mut self,
        parent: CancellationToken,
        interval: Duration,
        invoke_immediately: bool,
    ) -> Result<()> {
        assert!(!interval.is_zero(), "interval must not be zero");

        let cancel = parent.child_token();
        // Cancelling the derived token on exit also winds down the signal
        // listener, so repeated runs never accumulate listeners.
        let _teardown = cancel.clone().drop_guard();
        signals::spawn_listener(self.signals.clone(), cancel.clone());

        let mut wait = WaitStrategy::new(interval, self.wait_full);
        // Drop guard: clean_up fires on every exit path, including a panic
        // unwinding out of process().
        let mut processor = CleanupGuard::new(&mut self.processor);

        if invoke_immediately {
            processor.get().process(cancel.clone()).await?;
        }

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("repeater cancelled; stopping");
                    return Ok(());
                }
                _ = wait.ready() => {
                    processor.get().process(cancel.clone()).await?;
                }
            }
        }
    }
}

struct CleanupGuard<'a, P: Processor> {
    processor: &'a mut P,
}

impl<'a, P: Processor> CleanupGuard<'a, P> {
    fn new(processor: &'a mut P) -> Self {
        Self { processor }
    }

    fn get(&mut self) -> &mut P {
        self.processor
    }
}

impl<P: Processor> Drop for CleanupGuard<'_, P> {
    fn drop(&mut self) {
        self.processor.clean_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ProcessFuture;

    #[derive(Default)]
    struct NoopProcessor {
        cleanups: usize,
    }

    impl Processor for NoopProcessor {
        fn process(&mut self, _cancel: CancellationToken) -> ProcessFuture<'_> {
            Box::pin(async { Ok(()) })
        }

        fn clean_up(&mut self) {
            self.cleanups += 1;
        }
    }

    #[test]
    fn cleanup_guard_fires_once_on_drop() {
        let mut processor = NoopProcessor::default();
        {
            let mut guard = CleanupGuard::new(&mut processor);
            let _ = guard.get();
        }
        assert_eq!(processor.cleanups, 1);
    }

    #[test]
    fn cleanup_guard_fires_during_unwind() {
        let mut processor = NoopProcessor::default();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = CleanupGuard::new(&mut processor);
            panic!("boom");
        }));
        assert!(caught.is_err());
        assert_eq!(processor.cleanups, 1);
    }

    #[tokio::test]
    #[should_panic(expected = "interval must not be zero")]
    async fn zero_interval_panics() {
        let mut repeater = Repeater::new(NoopProcessor::default());
        let _ = repeater
            .run(CancellationToken::new(), Duration::ZERO, false)
            .await;
    }
}
