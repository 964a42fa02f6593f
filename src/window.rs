//! Time-free state machine behind every throttle.

/// Timer state of a [`ThrottleWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// No timer is running; the next trigger fires immediately.
    Idle,
    /// A period timer is counting down from the most recent fire.
    Armed,
}

/// What the owner of a [`ThrottleWindow`] must do after feeding it an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// Nothing changes.
    Ignore,
    /// Emit one fire and (re)start the period timer from now.
    FireAndArm,
    /// Stop the period timer.
    Disarm,
}

/// Core implementation of the leading/trailing throttle window.
///
/// The window collapses any number of triggers into at most one fire per period:
///
/// - The first trigger while idle fires at once (the leading edge) and arms the window.
/// - Triggers while armed are dropped, or, when `trailing` is set, remembered in a single
///   pending flag.
/// - When the period elapses a pending trigger produces one more fire (the trailing edge) and
///   re-arms the window; otherwise the window goes idle.
///
/// `ThrottleWindow` knows nothing about clocks. The async driver owns one window, feeds it
/// triggers and timer expirations, and carries out the returned [`WindowAction`].
///
/// # Example
///
/// ```rust
/// use throttle_core::{ThrottleWindow, WindowAction, WindowState};
///
/// let mut window = ThrottleWindow::new(true);
///
/// assert_eq!(window.on_triggers(1), WindowAction::FireAndArm);
/// assert_eq!(window.on_triggers(3), WindowAction::Ignore); // coalesced into one pending flag
/// assert!(window.is_pending());
///
/// assert_eq!(window.on_expired(), WindowAction::FireAndArm); // trailing edge
/// assert_eq!(window.on_expired(), WindowAction::Disarm);
/// assert_eq!(window.state(), WindowState::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct ThrottleWindow {
    /// Whether triggers while armed earn one trailing fire
    trailing: bool,
    /// Idle or armed
    state: WindowState,
    /// A trigger arrived while armed and has not been fired yet
    pending: bool,
}

impl ThrottleWindow {
    /// Creates an idle window with nothing pending.
    pub fn new(trailing: bool) -> Self {
        ThrottleWindow {
            trailing,
            state: WindowState::Idle,
            pending: false,
        }
    }

    /// Feeds `count` triggers that arrived since the last call.
    ///
    /// Triggers are applied in arrival order, so a batch that finds the window idle fires the
    /// leading edge with its first trigger and treats the rest as arriving while armed.
    pub fn on_triggers(&mut self, count: usize) -> WindowAction {
        if count == 0 {
            return WindowAction::Ignore;
        }

        match self.state {
            WindowState::Idle => {
                self.state = WindowState::Armed;
                self.pending = self.trailing && count > 1;
                WindowAction::FireAndArm
            }
            WindowState::Armed => {
                if self.trailing {
                    self.pending = true;
                }
                WindowAction::Ignore
            }
        }
    }

    /// Handles the end of the current period.
    pub fn on_expired(&mut self) -> WindowAction {
        match self.state {
            // Stale expiry; the timer is already off.
            WindowState::Idle => WindowAction::Ignore,
            WindowState::Armed if self.pending => {
                self.pending = false;
                WindowAction::FireAndArm
            }
            WindowState::Armed => {
                self.state = WindowState::Idle;
                WindowAction::Disarm
            }
        }
    }

    /// Current timer state.
    #[inline]
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Whether a trailing fire is queued for the end of the current period.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether triggers while armed are remembered for a trailing fire.
    #[inline]
    pub fn is_trailing(&self) -> bool {
        self.trailing
    }
}
