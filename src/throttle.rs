use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ThrottleConfig;
use crate::control::ThrottleControl;
use crate::driver::{Driver, Mailbox};
use crate::error::{ThrottleError, ThrottleResult};
use crate::window::ThrottleWindow;

/// An async throttle with a pull-style consumer API.
///
/// Producers call [`trigger`](Throttle::trigger) as often as they like; the throttle collapses
/// those triggers into at most one fire per `period`, measured from the previous fire. A single
/// consumer receives the fires through [`next`](Throttle::next).
///
/// # Behavior
///
/// - A trigger while idle fires immediately and arms a `period` timer (leading edge).
/// - Triggers while armed are dropped, or with `trailing` enabled collapse into exactly one
///   extra fire when the timer runs out (trailing edge).
/// - [`stop`](Throttle::stop) cancels the timer and ends the fire stream for good.
///
/// All state lives in a background driver task spawned on the current tokio runtime, so
/// `trigger` and `stop` never block and need no external locking. `Throttle` is a cheap handle:
/// clone it to hand out to producers. Dropping the last handle stops the throttle.
///
/// Only one consumer loop per throttle is supported. With several, each fire reaches at most
/// one of them.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use throttle_core::Throttle;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let throttle = Throttle::new(Duration::from_millis(10), false);
///
/// for _ in 0..5 {
///     throttle.trigger();
/// }
///
/// assert!(throttle.next().await); // five triggers, one fire
///
/// throttle.stop();
/// assert!(!throttle.next().await);
/// # }
/// ```
#[derive(Clone)]
pub struct Throttle {
    inner: Arc<Inner>,
}

/// State shared by all handles of one throttle
struct Inner {
    /// Length of the collapsing window
    period: Duration,
    /// Whether triggers while armed earn a trailing fire
    trailing: bool,
    /// Trigger inbox read by the driver
    mailbox: Arc<Mailbox>,
    /// Receiving end of the single-slot fire conduit
    fires: Mutex<mpsc::Receiver<()>>,
    /// Cancelled exactly once, by `stop()` or when the last handle goes away
    shutdown: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl ThrottleControl for Throttle {
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

impl Throttle {
    /// Creates a throttle and spawns its driver on the current tokio runtime.
    ///
    /// # Parameters
    ///
    /// * `period` - Minimum time between two fires
    /// * `trailing` - Whether triggers during an active window earn one extra fire at its end
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside of a tokio runtime. Use
    /// [`try_new`](Throttle::try_new) to handle those cases.
    pub fn new(period: Duration, trailing: bool) -> Self {
        match Self::try_new(period, trailing) {
            Ok(throttle) => throttle,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a throttle, reporting invalid input instead of panicking.
    ///
    /// # Returns
    /// * `Ok(throttle)` - Idle throttle with its driver running
    /// * `Err(ThrottleError::ZeroPeriod)` - `period` is zero
    /// * `Err(ThrottleError::NoRuntime)` - No tokio runtime to spawn the driver on
    pub fn try_new(period: Duration, trailing: bool) -> ThrottleResult<Self> {
        if period.is_zero() {
            return Err(ThrottleError::ZeroPeriod);
        }
        let runtime = Handle::try_current().map_err(|_| ThrottleError::NoRuntime)?;

        let mailbox = Arc::new(Mailbox::default());
        let shutdown = CancellationToken::new();
        let (tx, rx) = mpsc::channel(1);

        runtime.spawn(
            Driver {
                period,
                window: ThrottleWindow::new(trailing),
                mailbox: Arc::clone(&mailbox),
                fires: tx,
                shutdown: shutdown.clone(),
            }
            .run(),
        );

        Ok(Throttle {
            inner: Arc::new(Inner {
                period,
                trailing,
                mailbox,
                fires: Mutex::new(rx),
                shutdown,
            }),
        })
    }

    /// Signals that something happened. Never blocks.
    ///
    /// A no-op once the throttle is stopped.
    #[inline]
    pub fn trigger(&self) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        self.inner.mailbox.post();
    }

    /// Waits for the next fire.
    ///
    /// # Returns
    /// * `true` - The throttle fired; handle one collapsed event
    /// * `false` - The throttle is stopped and will never fire again
    ///
    /// Once `false` has been returned, every later call returns `false` without waiting.
    pub async fn next(&self) -> bool {
        let shutdown = &self.inner.shutdown;

        let mut fires = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return false,
            guard = self.inner.fires.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => false,
            fire = fires.recv() => fire.is_some(),
        }
    }

    /// Blocking variant of [`next`](Throttle::next) for consumers on plain threads.
    ///
    /// Must not be called from async code: it parks the calling thread until the next fire.
    pub fn blocking_next(&self) -> bool {
        futures::executor::block_on(self.next())
    }

    /// Returns the fires as a stream that ends when the throttle stops.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use futures::StreamExt;
    /// use throttle_core::Throttle;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let throttle = Throttle::new(Duration::from_millis(10), false);
    /// let mut fires = Box::pin(throttle.fires());
    ///
    /// throttle.trigger();
    /// assert_eq!(fires.next().await, Some(()));
    ///
    /// throttle.stop();
    /// assert_eq!(fires.next().await, None);
    /// # }
    /// ```
    pub fn fires(&self) -> impl Stream<Item = ()> + Send + 'static {
        futures::stream::unfold(self.clone(), |throttle| async move {
            if throttle.next().await {
                Some(((), throttle))
            } else {
                None
            }
        })
    }

    /// Stops the throttle: cancels the timer and ends the fire stream.
    ///
    /// Safe to call any number of times, from any thread. Never blocks.
    pub fn stop(&self) {
        if !self.inner.shutdown.is_cancelled() {
            debug!(period = ?self.inner.period, "stopping throttle");
        }
        self.inner.shutdown.cancel();
    }

    /// Whether [`stop`](Throttle::stop) has been called.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Minimum time between two fires.
    #[inline]
    pub fn period(&self) -> Duration {
        self.inner.period
    }

    /// Whether triggers during an active window earn one extra fire at its end.
    #[inline]
    pub fn is_trailing(&self) -> bool {
        self.inner.trailing
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("period", &self.inner.period)
            .field("trailing", &self.inner.trailing)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl From<ThrottleConfig> for Throttle {
    /// Converts a `ThrottleConfig` into a running `Throttle`.
    ///
    /// # Panics
    /// Panics under the same conditions as [`Throttle::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use throttle_core::{Throttle, ThrottleConfig};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let throttle: Throttle = ThrottleConfig::trailing(Duration::from_millis(250)).into();
    /// assert!(throttle.is_trailing());
    /// # }
    /// ```
    #[inline(always)]
    fn from(config: ThrottleConfig) -> Self {
        Throttle::new(config.period, config.trailing)
    }
}
