//! Producer-side trait shared by both throttle flavours.
//!
//! Code that only emits triggers can be generic over [`ThrottleControl`] and accept either a
//! pull-style [`Throttle`](crate::Throttle) or a push-style [`ThrottleFunc`](crate::ThrottleFunc).

/// The producer-facing operations every throttle supports.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use throttle_core::{Throttle, ThrottleControl};
///
/// fn on_file_changed(throttle: &impl ThrottleControl) {
///     throttle.trigger();
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let throttle = Throttle::new(Duration::from_millis(50), true);
/// on_file_changed(&throttle);
/// assert!(throttle.next().await);
/// # }
/// ```
pub trait ThrottleControl: Send + Sync {
    /// Signals an event to collapse. Never blocks; a no-op after [`stop`](ThrottleControl::stop).
    fn trigger(&self);

    /// Permanently stops the throttle. Idempotent and non-blocking.
    fn stop(&self);

    /// Whether the throttle has been stopped.
    fn is_stopped(&self) -> bool;
}
