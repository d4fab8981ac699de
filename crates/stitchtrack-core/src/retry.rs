//! Bounded retry for optimistic read-modify-write loops.

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::errors::{StorageError, TrackError, TrackResult};

/// How often, and how patiently, a contended write is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(25),
            max_backoff: Duration::from_millis(500),
        }
    }
}

/// Result of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Done(T),
    /// Compare-and-set lost to a concurrent writer; read again and retry.
    Conflict,
}

impl RetryPolicy {
    /// Retries without sleeping. Used by tests.
    pub fn no_backoff(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Sleep after the given failed attempt (1-based): doubles each time,
    /// capped at `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << shift)
            .min(self.max_backoff)
    }

    /// Run `op` until it returns [`Attempt::Done`], a non-contention error,
    /// or the attempts run out. `op` receives the 1-based attempt number.
    pub fn run<T, F>(&self, operation: &'static str, mut op: F) -> TrackResult<T>
    where
        F: FnMut(u32) -> Result<Attempt<T>, StorageError>,
    {
        let attempts = self.max_attempts.max(1);
        for attempt in 1..=attempts {
            match op(attempt) {
                Ok(Attempt::Done(value)) => return Ok(value),
                Ok(Attempt::Conflict) => {
                    warn!(operation, attempt, "revision moved, retrying");
                }
                Err(e) if e.is_contention() => {
                    warn!(operation, attempt, error = %e, "store contended, retrying");
                }
                Err(e) => return Err(TrackError::Storage(e)),
            }
            if attempt < attempts {
                let pause = self.backoff_for(attempt);
                if !pause.is_zero() {
                    thread::sleep(pause);
                }
            }
        }
        Err(TrackError::StoreContention {
            operation,
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_millis(25));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(50));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(6), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(40), Duration::from_millis(500));
    }

    #[test]
    fn succeeds_after_conflicts() {
        let mut calls = 0;
        let out = RetryPolicy::no_backoff(5).run("test", |attempt| {
            calls += 1;
            Ok(if attempt < 3 { Attempt::Conflict } else { Attempt::Done(attempt) })
        });
        assert_eq!(out.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn exhaustion_reports_attempts() {
        let err = RetryPolicy::no_backoff(5)
            .run::<(), _>("scan", |_| Err(StorageError::DbBusy))
            .unwrap_err();
        assert!(matches!(
            err,
            TrackError::StoreContention { operation: "scan", attempts: 5 }
        ));
    }

    #[test]
    fn data_errors_are_not_retried() {
        let mut calls = 0;
        let err = RetryPolicy::no_backoff(5)
            .run::<(), _>("scan", |_| {
                calls += 1;
                Err(StorageError::SqliteError { message: "constraint".into() })
            })
            .unwrap_err();
        assert!(matches!(err, TrackError::Storage(StorageError::SqliteError { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let out = RetryPolicy::no_backoff(0).run("once", |_| Ok(Attempt::Done(7)));
        assert_eq!(out.unwrap(), 7);
    }
}
