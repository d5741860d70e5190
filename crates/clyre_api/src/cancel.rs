use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ClyreApiError;

/// Cancellation signal shared between a stream consumer and whoever may abort it.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

pub fn cancellation_signal() -> CancellationSignal {
    Arc::new(AtomicBool::new(false))
}

pub fn cancel(signal: &CancellationSignal) {
    signal.store(true, Ordering::Release);
}

pub fn is_cancelled(signal: Option<&CancellationSignal>) -> bool {
    signal.is_some_and(|signal| signal.load(Ordering::Acquire))
}

/// Await `future`, giving up with [`ClyreApiError::Cancelled`] once the signal fires.
///
/// The future is dropped on cancellation, which releases whatever it was reading from.
pub async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, ClyreApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(ClyreApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(ClyreApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}
