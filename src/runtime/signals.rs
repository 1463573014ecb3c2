use core::future::Future;
use core::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub type SignalFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Process-wide termination notification source.
///
/// The repeater treats resolution of [`terminated`](TerminationSignals::terminated)
/// identically to cancellation of the caller's token. Injected so tests and
/// embedders can substitute a synthetic source for the OS signal facilities.
pub trait TerminationSignals: Send + Sync {
    /// Resolves once the process has been asked to terminate. Must be safe
    /// to call once per `run` invocation.
    fn terminated(&self) -> SignalFuture;
}

/// Default source backed by the operating system.
///
/// On unix this resolves on Ctrl-C (SIGINT) or SIGTERM; elsewhere on Ctrl-C
/// only.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSignals;

impl TerminationSignals for OsSignals {
    #[cfg(unix)]
    fn terminated(&self) -> SignalFuture {
        use tokio::signal::unix::{signal, SignalKind};

        Box::pin(async {
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "failed to install SIGTERM handler; listening for Ctrl-C only"
                    );
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        })
    }

    #[cfg(not(unix))]
    fn terminated(&self) -> SignalFuture {
        Box::pin(async {
            let _ = tokio::signal::ctrl_c().await;
        })
    }
}

/// Source that never fires.
///
/// For tests and embedders that handle process signals themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl TerminationSignals for NoSignals {
    fn terminated(&self) -> SignalFuture {
        Box::pin(core::future::pending())
    }
}

/// Spawns the listener that cancels `cancel` when `source` fires.
///
/// The task also exits when `cancel` is cancelled from elsewhere, so its
/// lifetime never outlives the `run` call that spawned it.
pub(crate) fn spawn_listener(
    source: Arc<dyn TerminationSignals>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let terminated = source.terminated();
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = terminated => {
                tracing::info!("termination signal received; cancelling run");
                cancel.cancel();
            }
        }
    })
}
