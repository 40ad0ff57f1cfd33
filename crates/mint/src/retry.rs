//! Retry utilities.

use std::{fmt, time::Duration};

/// A type that keeps track of attempts.
#[derive(Clone, Debug)]
pub struct Retry {
    retries: u32,
    delay: Option<Duration>,
}

impl Retry {
    /// Creates a new `Retry` instance that retries `retries` times after the
    /// first attempt, sleeping `delay` between attempts.
    pub fn new(retries: u32, delay: Option<Duration>) -> Self {
        Self { retries, delay }
    }

    /// Creates a new `Retry` instance that does not sleep between attempts.
    pub fn new_no_delay(retries: u32) -> Self {
        Self::new(retries, None)
    }

    async fn handle_err(&mut self, err: impl fmt::Display) {
        debug_assert!(self.retries > 0);
        self.retries -= 1;
        warn!("erroneous attempt ({} tries remaining): {}", self.retries, err);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Runs the given async closure until it succeeds or the attempt budget is
    /// exhausted, returning the last result.
    pub async fn run_async<T, E, F, Fut>(mut self, mut callback: F) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        loop {
            match callback().await {
                Err(err) if self.retries > 0 => self.handle_err(err).await,
                res => return res,
            }
        }
    }
}
