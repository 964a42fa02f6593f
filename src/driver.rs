//! Background task that owns a [`ThrottleWindow`] and its period timer.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::{sleep, Instant, Sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::window::{ThrottleWindow, WindowAction};

/// Trigger inbox shared between producers and the driver.
///
/// Producers only bump a counter, so `trigger()` never blocks and a burst of any size costs the
/// driver a single wakeup.
#[derive(Debug, Default)]
pub(crate) struct Mailbox {
    triggers: AtomicUsize,
    notify: Notify,
}

impl Mailbox {
    pub(crate) fn post(&self) {
        self.triggers.fetch_add(1, Ordering::AcqRel);
        self.notify.notify_one();
    }

    fn take(&self) -> usize {
        self.triggers.swap(0, Ordering::AcqRel)
    }
}

/// Everything the driver task owns.
pub(crate) struct Driver {
    pub(crate) period: Duration,
    pub(crate) window: ThrottleWindow,
    pub(crate) mailbox: Arc<Mailbox>,
    pub(crate) fires: mpsc::Sender<()>,
    pub(crate) shutdown: CancellationToken,
}

impl Driver {
    /// Runs until the throttle is stopped or every consumer handle is gone.
    ///
    /// Returning drops the fire sender, which closes the conduit for good.
    pub(crate) async fn run(mut self) {
        debug!(period = ?self.period, trailing = self.window.is_trailing(), "throttle driver started");

        let timer = sleep(self.period);
        tokio::pin!(timer);
        let mut armed = false;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = &mut timer, if armed => {
                    let action = self.window.on_expired();
                    if !self.apply(action, timer.as_mut(), &mut armed) {
                        break;
                    }
                }
                _ = self.mailbox.notify.notified() => {
                    // A period that ran out at the same instant ends before these triggers count.
                    if armed && timer.deadline() <= Instant::now() {
                        let action = self.window.on_expired();
                        if !self.apply(action, timer.as_mut(), &mut armed) {
                            break;
                        }
                    }

                    let count = self.mailbox.take();
                    trace!(count, "triggers received");
                    let action = self.window.on_triggers(count);
                    if !self.apply(action, timer.as_mut(), &mut armed) {
                        break;
                    }
                }
            }
        }

        debug!(stopped = self.shutdown.is_cancelled(), "throttle driver exited");
    }

    /// Carries out one window action. Returns `false` once the receiving side is gone.
    fn apply(&self, action: WindowAction, timer: Pin<&mut Sleep>, armed: &mut bool) -> bool {
        match action {
            WindowAction::Ignore => true,
            WindowAction::FireAndArm => {
                timer.reset(Instant::now() + self.period);
                *armed = true;
                self.deliver()
            }
            WindowAction::Disarm => {
                trace!("throttle idle");
                *armed = false;
                true
            }
        }
    }

    /// Pushes one fire into the single-slot conduit.
    ///
    /// A fire still sitting in the slot absorbs the new one. Returns `false` once the receiving
    /// side is gone.
    fn deliver(&self) -> bool {
        match self.fires.try_send(()) {
            Ok(()) => {
                trace!(pending = self.window.is_pending(), "throttle fired");
                true
            }
            Err(mpsc::error::TrySendError::Full(())) => {
                trace!("previous fire not consumed yet, coalescing");
                true
            }
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }
}
