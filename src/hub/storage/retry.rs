extern crate tokio;

use super::error::Result;
use log::warn;
use std::{future::Future, time::Duration};
use tokio::time::sleep;

/// How often and how patiently a store call is repeated.
#[derive(Debug, Clone, Copy)]
pub struct Retry {
    pub count: u32,
    pub delay: Duration,
}
impl Default for Retry {
    fn default() -> Self {
        use crate::config::storage::{CONTEXT_RETRY_COUNT, CONTEXT_RETRY_DELAY};
        Retry {
            count: CONTEXT_RETRY_COUNT,
            delay: CONTEXT_RETRY_DELAY,
        }
    }
}

/// Repeat `fun` while it fails with a transient context error, waiting a
/// little longer after each attempt.
pub(super) async fn context_retry<F, U, Out>(policy: Retry, operation: &str, fun: F) -> Result<Out>
where
    F: Fn() -> U,
    U: Future<Output = Result<Out>>,
{
    for attempt in 1..policy.count.max(1) {
        match fun().await {
            Err(e) if e.is_transient() => {
                warn!(
                    "{}: {} (attempt {}/{}), retrying",
                    operation, e, attempt, policy.count
                );
                sleep(policy.delay * attempt).await;
            }
            result => return result,
        }
    }
    fun().await
}
