//! Top-level task supervision
//!
//! The command runs in its own task. A panic inside it (for example one
//! raised from a store transfer after the call that started it returned) is
//! logged as a warning and never fails the CI job.

use crate::error::CacheResult;
use std::any::Any;
use std::future::Future;
use tracing::warn;

/// Run `task` on its own task, absorbing panics
pub async fn supervise<F>(task: F) -> CacheResult<()>
where
    F: Future<Output = CacheResult<()>> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic().as_ref());
            warn!("[warning]{}", message);
            Ok(())
        }
        Err(e) => {
            warn!("[warning]task did not complete: {}", e);
            Ok(())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
