use riyobox_core::{UploadError, UploadResult};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run `transfer` until it finishes, `timeout` elapses, or `cancel` fires.
///
/// The timer and the transfer share a child token of `cancel`: the timer
/// cancels it on expiry, which drops the in-flight transfer.
pub async fn with_deadline<T, Fut>(
    transfer: Fut,
    timeout: Duration,
    cancel: &CancellationToken,
) -> UploadResult<T>
where
    Fut: Future<Output = UploadResult<T>>,
{
    let token = cancel.child_token();
    let timer_token = token.clone();
    let timer = tokio::spawn(async move {
        tokio::select! {
            _ = timer_token.cancelled() => false,
            _ = tokio::time::sleep(timeout) => {
                timer_token.cancel();
                true
            }
        }
    });

    let result = tokio::select! {
        result = transfer => Some(result),
        _ = token.cancelled() => None,
    };

    // Stop the timer if the transfer won.
    token.cancel();
    let timed_out = timer.await.unwrap_or(false);

    match result {
        Some(result) => result,
        None if timed_out && !cancel.is_cancelled() => Err(UploadError::Timeout(timeout)),
        None => Err(UploadError::Cancelled),
    }
}

/// Run `transfer` unless `cancel` fires first.
pub async fn cancellable<T, Fut>(transfer: Fut, cancel: &CancellationToken) -> UploadResult<T>
where
    Fut: Future<Output = UploadResult<T>>,
{
    tokio::select! {
        result = transfer => result,
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
    }
}
