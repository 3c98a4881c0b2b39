use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Fixed-delay retry. No backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until `should_retry` rejects its result or attempts run out.
    /// The last result is returned either way.
    pub async fn run<T, E, F, Fut, R>(&self, mut op: F, should_retry: R) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&Result<T, E>) -> bool,
    {
        let mut attempt = 1;
        loop {
            let result = op().await;
            if attempt >= self.attempts || !should_retry(&result) {
                return result;
            }
            debug!(attempt, "Retrying after {:?}", self.delay);
            attempt += 1;
            sleep(self.delay).await;
        }
    }
}
