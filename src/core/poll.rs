use crate::domain::ports::Sleeper;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Bounded retry policy for asynchronous jobs: wait, probe, repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug)]
pub enum PollOutcome<T> {
    Ready { value: T, attempts: u32 },
    /// Budget spent; `failures` counts probes that errored rather than
    /// answering "not ready".
    Exhausted { attempts: u32, failures: u32 },
}

impl PollPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Upper bound on time spent sleeping, ignoring probe latency. Saturates
    /// at `Duration::MAX`.
    pub fn budget(&self) -> Duration {
        self.delay
            .checked_mul(self.max_attempts)
            .unwrap_or(Duration::MAX)
    }

    /// Runs `probe` at most `max_attempts` times, sleeping `delay` before each
    /// attempt. `Ok(Some(_))` stops the loop. `Ok(None)` and `Err(_)` both
    /// count as not ready: a failed probe is logged and the next attempt runs.
    pub async fn run<T, F, Fut>(&self, sleeper: &dyn Sleeper, mut probe: F) -> PollOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let mut failures = 0;
        for attempt in 1..=self.max_attempts {
            sleeper.sleep(self.delay).await;

            match probe(attempt).await {
                Ok(Some(value)) => {
                    return PollOutcome::Ready {
                        value,
                        attempts: attempt,
                    }
                }
                Ok(None) => {
                    tracing::debug!(attempt, max = self.max_attempts, "⏳ Job not ready yet");
                }
                Err(error) => {
                    failures += 1;
                    tracing::warn!(
                        attempt,
                        max = self.max_attempts,
                        "⚠️ Poll attempt failed, retrying: {}",
                        error
                    );
                }
            }
        }

        PollOutcome::Exhausted {
            attempts: self.max_attempts,
            failures,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
