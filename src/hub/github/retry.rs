extern crate tokio;

use super::error::Kind;
use crate::config::retry::RETRY_COUNT;
use log::warn;
use std::future::Future;
use tokio::time::sleep;

pub(super) async fn async_retry<F, U, Out>(fun: F) -> Result<Out, Kind>
where
    F: Fn() -> U,
    U: Future<Output = Result<Out, Kind>>,
{
    for attempt in 1..RETRY_COUNT {
        match fun().await {
            Err(e) => match e.backoff() {
                Some(delay) => {
                    warn!("{} (attempt {}/{}), retrying", e, attempt, RETRY_COUNT);
                    sleep(delay).await;
                }
                None => return Err(e),
            },
            ok => return ok,
        }
    }
    fun().await
}
