use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Run `future`, turning a panic into `Err(message)`.
///
/// Background tasks wrap their body in this so a panic is reported to the
/// UI as `AppEvent::TaskPanicked` instead of the task silently vanishing.
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "non-string panic payload".to_string()
            }
        })
}
