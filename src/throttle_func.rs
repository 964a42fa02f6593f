use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ThrottleConfig;
use crate::control::ThrottleControl;
use crate::error::{ThrottleError, ThrottleResult};
use crate::throttle::Throttle;

/// A throttle that calls a function on every fire.
///
/// Wraps a [`Throttle`] together with a background consumer task that waits for fires and runs
/// `on_fire` synchronously for each one, so callers never write the consumer loop themselves.
/// The task ends once the throttle is stopped; a callback already running when
/// [`stop`](ThrottleFunc::stop) is called is allowed to finish.
///
/// `on_fire` runs on a tokio worker. Keep it short or hand heavy work off to another task.
///
/// Dropping a `ThrottleFunc` stops it.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
/// use throttle_core::ThrottleFunc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let saves = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&saves);
///
/// let autosave = ThrottleFunc::new(Duration::from_millis(10), false, move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// for _ in 0..5 {
///     autosave.trigger();
/// }
///
/// tokio::time::sleep(Duration::from_millis(50)).await;
/// autosave.shutdown().await.unwrap();
///
/// assert_eq!(saves.load(Ordering::SeqCst), 1);
/// # }
/// ```
pub struct ThrottleFunc {
    throttle: Throttle,
    consumer: Option<JoinHandle<()>>,
}

impl ThrottleControl for ThrottleFunc {
    #[inline(always)]
    fn trigger(&self) {
        self.trigger()
    }

    #[inline(always)]
    fn stop(&self) {
        self.stop()
    }

    #[inline(always)]
    fn is_stopped(&self) -> bool {
        self.is_stopped()
    }
}

impl ThrottleFunc {
    /// Creates the throttle and spawns its consumer task.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside of a tokio runtime.
    pub fn new<F>(period: Duration, trailing: bool, on_fire: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        match Self::try_new(period, trailing, on_fire) {
            Ok(throttle) => throttle,
            Err(err) => panic!("{}", err),
        }
    }

    /// Same as [`new`](ThrottleFunc::new), reporting invalid input instead of panicking.
    pub fn try_new<F>(period: Duration, trailing: bool, on_fire: F) -> ThrottleResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let throttle = Throttle::try_new(period, trailing)?;
        let consumer = tokio::spawn(consume(throttle.clone(), on_fire));

        Ok(ThrottleFunc {
            throttle,
            consumer: Some(consumer),
        })
    }

    /// Builds a `ThrottleFunc` from a [`ThrottleConfig`].
    pub fn with_config<F>(config: ThrottleConfig, on_fire: F) -> ThrottleResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        Self::try_new(config.period, config.trailing, on_fire)
    }

    /// Signals an event to collapse. Never blocks; a no-op after [`stop`](ThrottleFunc::stop).
    #[inline]
    pub fn trigger(&self) {
        self.throttle.trigger();
    }

    /// Stops the throttle without waiting for the consumer task.
    #[inline]
    pub fn stop(&self) {
        self.throttle.stop();
    }

    /// Whether the throttle has been stopped, by [`stop`](ThrottleFunc::stop) or a drop.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.throttle.is_stopped()
    }

    /// Minimum time between two callback invocations.
    #[inline]
    pub fn period(&self) -> Duration {
        self.throttle.period()
    }

    /// Whether triggers during an active window earn one extra callback at its end.
    #[inline]
    pub fn is_trailing(&self) -> bool {
        self.throttle.is_trailing()
    }

    /// Stops the throttle and waits until the consumer task has exited.
    ///
    /// # Returns
    /// * `Ok(())` - The consumer loop finished; `on_fire` will not run again
    /// * `Err(ThrottleError::ConsumerPanicked)` - `on_fire` panicked earlier
    pub async fn shutdown(mut self) -> ThrottleResult<()> {
        self.stop();

        let Some(consumer) = self.consumer.take() else {
            return Ok(());
        };

        match consumer.await {
            Ok(()) => Ok(()),
            Err(err) if err.is_panic() => Err(ThrottleError::ConsumerPanicked),
            // The runtime is going away and took the task with it.
            Err(_) => Ok(()),
        }
    }
}

impl Drop for ThrottleFunc {
    fn drop(&mut self) {
        self.throttle.stop();
    }
}

impl std::fmt::Debug for ThrottleFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottleFunc")
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

async fn consume<F>(throttle: Throttle, mut on_fire: F)
where
    F: FnMut() + Send + 'static,
{
    while throttle.next().await {
        on_fire();
    }
    debug!(period = ?throttle.period(), "throttle consumer exited");
}
