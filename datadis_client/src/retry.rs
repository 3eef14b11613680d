//! Declarative retry policy for the HTTP transport.
//!
//! A [`RetryPolicy`] is supplied by the caller when the client is built and is
//! applied by [`ReqwestTransport`](crate::transport::ReqwestTransport) only.
//! The facade itself never retries.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::transport::TransportError;

pub type DelayFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;
pub type RetryCondition = Arc<dyn Fn(&TransportError) -> bool + Send + Sync>;

const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// How many times to retry, how long to wait, and which failures qualify.
#[derive(Clone)]
pub struct RetryPolicy {
    retries: u32,
    delay: DelayFn,
    condition: RetryCondition,
}

impl RetryPolicy {
    /// `retries` extra attempts after the first, one second apart, for network
    /// failures and 5xx answers.
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            delay: Arc::new(|_: u32| DEFAULT_DELAY),
            condition: Arc::new(is_network_or_server_error),
        }
    }

    /// Retries every failure except HTTP 429, so a rate-limited caller backs
    /// off instead of hammering the service.
    pub fn excluding_rate_limit(retries: u32) -> Self {
        Self::new(retries).with_condition(|err| err.status() != Some(429))
    }

    /// `delay(n)` is the wait before retry number `n` (starting at 1).
    pub fn with_delay(mut self, delay: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Arc::new(delay);
        self
    }

    pub fn with_fixed_delay(self, delay: Duration) -> Self {
        self.with_delay(move |_| delay)
    }

    pub fn with_condition(
        mut self,
        condition: impl Fn(&TransportError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.condition = Arc::new(condition);
        self
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        (self.delay)(retry)
    }

    pub fn should_retry(&self, err: &TransportError) -> bool {
        (self.condition)(err)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retries", &self.retries)
            .field("first_delay", &self.delay_for(1))
            .finish_non_exhaustive()
    }
}

/// Default retry condition: no response at all, or a 5xx answer.
pub fn is_network_or_server_error(err: &TransportError) -> bool {
    match err.status() {
        None => true,
        Some(status) => status >= 500,
    }
}

/// Runs `operation`, retrying per `policy`. Without a policy it runs once.
pub(crate) async fn retry_with_policy<F, Fut, T>(
    policy: Option<&RetryPolicy>,
    operation_name: &str,
    mut operation: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let Some(policy) = policy else {
        return operation().await;
    };

    let mut retry = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if retry > 0 {
                    info!(operation = operation_name, retry, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if retry >= policy.retries || !policy.should_retry(&err) {
                    return Err(err);
                }
                retry += 1;
                let delay = policy.delay_for(retry);
                warn!(
                    operation = operation_name,
                    retry,
                    max_retries = policy.retries,
                    error = %err,
                    retry_in_ms = delay.as_millis() as u64,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
