//! Configuration for building throttles.

use std::time::Duration;

/// Configuration structure for creating a [`Throttle`](crate::Throttle) or
/// [`ThrottleFunc`](crate::ThrottleFunc).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Minimum time between two fires.
    pub period: Duration,
    /// Whether triggers during an active window earn one extra fire at its end.
    pub trailing: bool,
}

impl ThrottleConfig {
    /// Creates a new configuration instance.
    pub fn new(period: Duration, trailing: bool) -> Self {
        Self { period, trailing }
    }

    /// Leading edge only: triggers during an active window are dropped.
    pub fn leading(period: Duration) -> Self {
        Self::new(period, false)
    }

    /// Leading and trailing edge.
    pub fn trailing(period: Duration) -> Self {
        Self::new(period, true)
    }
}

impl Default for ThrottleConfig {
    /// 100ms window, leading edge only.
    fn default() -> Self {
        Self::leading(Duration::from_millis(100))
    }
}
