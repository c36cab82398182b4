//! Timer expiration events.
//!
//! When a timer registered in [`Timers`](crate::resources::timers::Timers)
//! runs out, a [`TimerEvent`] is passed to every timer handler. Handlers
//! usually match on the signal name:
//!
//! ```ignore
//! sim.on_timer(|ctx, event| match event.signal.as_str() {
//!     "stop_effects" => ctx.stop_all_tweens(),
//!     _ => {}
//! });
//! ```

use crate::resources::timers::TimerId;

/// Event emitted when a timer expires.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEvent {
    /// The timer that expired.
    pub timer: TimerId,
    /// The signal name configured on the timer.
    pub signal: String,
}
