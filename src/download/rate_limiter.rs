//! Fixed-interval pacing for download task starts.
//!
//! This module provides the [`RateLimiter`] struct, a single shared gate that
//! hands out at most one start permit per interval. It bounds how fast new
//! downloads ramp up without bounding how many run at once: a task that has
//! acquired its permit runs to completion independently.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use playlist_core::RateLimiter;
//!
//! # async fn example() {
//! let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
//!
//! // First permit is immediate
//! limiter.acquire().await;
//!
//! // Second permit waits for the next tick
//! limiter.acquire().await;
//! # }
//! ```

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, instrument, trace};

/// Shared fixed-interval gate for download task starts.
///
/// Designed to be wrapped in `Arc` and shared across spawned Tokio tasks.
/// Waiters queue on a fair `tokio::sync::Mutex`, so permits are handed out in
/// the order tasks asked for them.
#[derive(Debug)]
pub struct RateLimiter {
    /// Interval between two permits.
    interval: Duration,

    /// Ticker shared by every waiter. `None` when pacing is disabled.
    ticker: Option<Mutex<Interval>>,
}

impl RateLimiter {
    /// Creates a rate limiter that releases one permit per `interval`.
    ///
    /// A zero interval yields a [disabled](Self::disabled) limiter.
    ///
    /// The first permit is available immediately, later ones follow at
    /// `interval` spacing. Ticks missed
    /// while nobody is waiting are not accumulated into a burst.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    #[instrument(skip_all, fields(interval_ms = interval.as_millis()))]
    pub fn new(interval: Duration) -> Self {
        if interval.is_zero() {
            return Self::disabled();
        }
        debug!("creating rate limiter");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            ticker: Some(Mutex::new(ticker)),
        }
    }

    /// Creates a disabled rate limiter that applies no delays.
    ///
    /// Use this when `--interval-ms 0` is specified.
    #[must_use]
    #[instrument]
    pub fn disabled() -> Self {
        debug!("creating disabled rate limiter");
        Self {
            interval: Duration::ZERO,
            ticker: None,
        }
    }

    /// Returns whether pacing is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.ticker.is_none()
    }

    /// Returns the interval between two permits.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the next start permit is available.
    pub async fn acquire(&self) {
        let Some(ticker) = &self.ticker else {
            return;
        };
        let mut ticker = ticker.lock().await;
        ticker.tick().await;
        trace!("start permit acquired");
    }
}
