//! Periodic invocation of a [`Processor`] until an external stop condition
//! occurs.
//!
//! A [`Repeater`] owns a single [`Processor`] and calls it once per interval
//! until either the caller-supplied cancellation token is cancelled, the
//! process receives a termination signal, or an invocation returns an error.
//! Whichever way the loop ends, [`Processor::clean_up`] runs exactly once.
//!
//! ```no_run
//! use repeater::{ProcessFuture, Processor, Repeater};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! struct Heartbeat;
//!
//! impl Processor for Heartbeat {
//!     fn process(&mut self, _cancel: CancellationToken) -> ProcessFuture<'_> {
//!         Box::pin(async {
//!             tracing::info!("beat");
//!             Ok(())
//!         })
//!     }
//!
//!     fn clean_up(&mut self) {
//!         tracing::info!("done");
//!     }
//! }
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut repeater = Repeater::new(Heartbeat);
//! repeater
//!     .run(CancellationToken::new(), Duration::from_secs(5), true)
//!     .await
//! # }
//! ```

pub mod processor;
pub mod repeater;
pub mod runtime;

pub use processor::{ProcessFuture, Processor};
pub use repeater::Repeater;
pub use runtime::signals::{NoSignals, OsSignals, SignalFuture, TerminationSignals};
pub use runtime::telemetry::init_tracing;
