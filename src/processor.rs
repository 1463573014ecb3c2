use anyhow::Error as AnyError;
use core::future::Future;
use core::pin::Pin;
use tokio_util::sync::CancellationToken;

pub type ProcessFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AnyError>> + Send + 'a>>;

/// Trait implemented by the unit of work a [`Repeater`](crate::Repeater)
/// invokes periodically.
///
/// The repeater never constructs a processor; callers supply one at
/// construction and the repeater borrows it exclusively for the span of a
/// single [`run`](crate::Repeater::run) call.
pub trait Processor: Send {
    /// Performs one unit of periodic work.
    ///
    /// `cancel` is the combined cancellation token of the current run. The
    /// repeater never interrupts an in-flight invocation; a long-running
    /// processor that wants to stop early must observe the token itself.
    ///
    /// Returning an error is final as far as the loop is concerned: the
    /// invocation is not retried and the error propagates unchanged out of
    /// `run` once [`clean_up`](Processor::clean_up) has executed.
    fn process(&mut self, cancel: CancellationToken) -> ProcessFuture<'_>;

    /// Releases resources associated with this processor.
    ///
    /// Invoked exactly once per `run` call, on every exit path: cancellation,
    /// termination signal, a failed invocation, or a panic unwinding through
    /// the loop.
    fn clean_up(&mut self);
}
