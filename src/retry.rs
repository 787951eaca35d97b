use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::warn;

use crate::BoxError;
use crate::store::StoreResult;

/// Cooperative stop flag shared between the host process and the engine.
///
/// Triggering wakes any in-progress backoff sleep; the engine surfaces the
/// interruption as a fatal error instead of carrying on, so a half-completed
/// script is never recorded as applied.
#[derive(Clone, Default)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

#[derive(Default)]
struct ShutdownInner {
    stop: Mutex<bool>,
    cond: Condvar,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        *self.inner.stop.lock() = true;
        self.inner.cond.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.stop.lock()
    }

    /// Sleep for `timeout`, returning true if the shutdown fired first.
    fn sleep(&self, timeout: Duration) -> bool {
        let mut stop = self.inner.stop.lock();
        if *stop {
            return true;
        }
        self.inner.cond.wait_for(&mut stop, timeout);
        *stop
    }
}

/// Outcome of a retried operation that never succeeded.
#[derive(Debug)]
pub enum RetryError {
    /// Every attempt failed; carries the final failure.
    Exhausted { attempts: u32, source: BoxError },
    /// The host asked us to stop during a backoff sleep.
    Interrupted,
}

/// Exponential-backoff retry for a fallible operation.
///
/// The delay doubles after every failed attempt, starting from
/// `initial_backoff`. No sleep follows the final failure.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(3000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
        }
    }

    /// Run `op`, retrying on failure until it succeeds or attempts run out.
    ///
    /// `label` identifies the work in retry warnings (the script file name).
    pub fn run<T>(
        &self,
        shutdown: &Shutdown,
        label: &str,
        mut op: impl FnMut() -> StoreResult<T>,
    ) -> std::result::Result<T, RetryError> {
        let max_attempts = self.max_attempts.max(1);
        let mut delay = self.initial_backoff;

        for attempt in 1..=max_attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt == max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    warn!(
                        "Attempt {}/{} failed for statement in {} - retrying in {} ms: {}",
                        attempt,
                        max_attempts,
                        label,
                        delay.as_millis(),
                        e
                    );
                    if shutdown.sleep(delay) {
                        return Err(RetryError::Interrupted);
                    }
                    delay = delay.saturating_mul(2);
                }
            }
        }

        unreachable!("final attempt returns from the loop")
    }
}
