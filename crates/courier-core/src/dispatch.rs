//! Send completion dispatch
//!
//! One background unit of work per send call. For every send with a
//! non-empty recipient list, exactly one of `on_success`/`on_error`
//! fires, followed unconditionally by exactly one `on_complete`. There
//! is no automatic retry.

use crate::CoreError;
use tracing::error;

/// Result of one send attempt
#[derive(Debug)]
pub enum SendOutcome {
    /// The message was transmitted
    Success,
    /// The send failed; the cause is only reported here, never thrown
    Failure(CoreError),
}

/// Completion hooks for one send call.
///
/// All hooks default to no-ops, so an observer only implements what it
/// cares about.
pub trait SendObserver: Send + Sync {
    /// The message was transmitted
    fn on_success(&self) {}

    /// The send failed with the given cause
    fn on_error(&self, _error: &CoreError) {}

    /// Fires after `on_success` or `on_error`, once per send
    fn on_complete(&self) {}
}

/// Observer that ignores every notification
pub struct NullObserver;

impl SendObserver for NullObserver {}

/// Deliver one outcome to an observer, preserving the ordering contract.
pub(crate) fn notify(observer: &dyn SendObserver, outcome: SendOutcome) {
    match outcome {
        SendOutcome::Success => observer.on_success(),
        SendOutcome::Failure(ref cause) => {
            error!("Send failed: {}", cause);
            observer.on_error(cause);
        }
    }
    observer.on_complete();
}
