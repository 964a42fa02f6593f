//! error.rs
//! Errors raised while constructing or shutting down a throttle.
//!
//! Running throttles never fail: triggering and stopping are infallible, and the end of the fire
//! stream is reported through `next()` returning `false`, not through an error.

/// Error type for throttle construction and shutdown.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ThrottleError {
    /// The collapsing window has zero length.
    #[error("period must be greater than 0")]
    ZeroPeriod,

    /// The throttle was built outside of a tokio runtime, so its driver task cannot be spawned.
    #[error("throttle must be created from within a tokio runtime")]
    NoRuntime,

    /// The user callback of a `ThrottleFunc` panicked and took the consumer task down with it.
    #[error("throttle consumer callback panicked")]
    ConsumerPanicked,
}

/// Result type for throttle construction and shutdown.
pub type ThrottleResult<T> = Result<T, ThrottleError>;
