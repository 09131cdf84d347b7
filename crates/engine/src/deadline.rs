//! Deadline and cancellation wrapper for network calls.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::WorkflowError;

/// Run `call` until it finishes, `timeout` elapses, or `token` is cancelled,
/// whichever comes first. The losing future is dropped.
pub async fn run_guarded<T, F>(
    operation: &'static str,
    timeout: Duration,
    token: &CancellationToken,
    call: F,
) -> Result<T, WorkflowError>
where
    F: Future<Output = Result<T, WorkflowError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            warn!(operation, "call cancelled");
            Err(WorkflowError::Cancelled { operation })
        }
        outcome = tokio::time::timeout(timeout, call) => match outcome {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(operation, timeout_ms, "call timed out");
                Err(WorkflowError::Timeout { operation, timeout_ms })
            }
        },
    }
}
