//! An async throttle for collapsing bursts of events.
//!
//! Producer code calls `trigger()` as often as it likes; the throttle turns those triggers into
//! at most one "fire" per configured period, measured from the previous fire. Fires reach a
//! single consumer either by pulling or by callback.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use throttle_core::Throttle;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let throttle = Throttle::new(Duration::from_millis(100), false);
//!
//! let consumer = {
//!     let throttle = throttle.clone();
//!     tokio::spawn(async move {
//!         let mut handled = 0;
//!         while throttle.next().await {
//!             handled += 1; // one collapsed event
//!         }
//!         handled
//!     })
//! };
//!
//! for _ in 0..10 {
//!     throttle.trigger();
//! }
//! tokio::time::sleep(Duration::from_millis(20)).await;
//!
//! throttle.stop();
//! assert_eq!(consumer.await.unwrap(), 1);
//! # }
//! ```
//!
//! # Consumption Modes
//!
//! ## [Pull](Throttle)
//! Call [`Throttle::next`] in a loop; it returns `false` once the throttle is stopped. Plain
//! threads can use [`Throttle::blocking_next`], and [`Throttle::fires`] exposes the same
//! sequence as a `Stream`.
//!
//! ## [Push](ThrottleFunc)
//! [`ThrottleFunc`] spawns the consumer loop for you and runs a callback on every fire.
//!
//! # Core Concepts
//!
//! ## Leading and Trailing Edges
//! A trigger while the throttle is idle fires immediately (the leading edge) and starts a
//! period timer. Triggers that arrive before the timer runs out are dropped, unless the
//! throttle was built with `trailing = true`: then they collapse into exactly one extra fire
//! when the period ends (the trailing edge), which also restarts the timer.
//!
//! ## Stopping
//! `stop()` is permanent. It cancels the timer, wakes a waiting consumer with end-of-stream,
//! and turns every later `trigger()` into a no-op.
//!
//! ## Runtime
//! Each throttle spawns a small driver task, so throttles must be created inside a tokio
//! runtime. The state machine itself is available without any runtime as [`ThrottleWindow`].
//!
//! ## Error Handling
//! Running throttles cannot fail. Only construction can, returning [`ThrottleError`] from the
//! `try_new` constructors: a zero period or a missing runtime.

pub mod config;
pub mod control;
mod driver;
pub mod error;
pub mod throttle;
pub mod throttle_func;
pub mod window;

pub use config::ThrottleConfig;
pub use control::ThrottleControl;
pub use error::{ThrottleError, ThrottleResult};
pub use throttle::Throttle;
pub use throttle_func::ThrottleFunc;
pub use window::{ThrottleWindow, WindowAction, WindowState};
