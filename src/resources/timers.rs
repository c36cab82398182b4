//! Scene-level timers.
//!
//! A timer counts simulated time down and fires its signal name when it
//! runs out. One-shot timers are removed after firing; repeating timers
//! rearm with their period. A step longer than the period fires a repeating
//! timer once per elapsed period, up to [`MAX_FIRES_PER_STEP`] times; any
//! backlog past that is dropped and the timer rearms on its original phase.
//!
//! Timers are advanced by [`timer_system`](crate::systems::timer::timer_system)
//! and delivered to the handlers registered with
//! [`Simulation::on_timer`](crate::simulation::Simulation::on_timer).

use bevy_ecs::prelude::Resource;

use crate::error::SimError;
use crate::events::timer::TimerEvent;

/// Most times one repeating timer fires in a single step.
pub const MAX_FIRES_PER_STEP: u32 = 1024;

/// Handle of a timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    remaining: f64,
    period: Option<f64>,
    signal: String,
}

#[derive(Resource, Debug, Default)]
pub struct Timers {
    next_id: u64,
    timers: Vec<Timer>,
}

impl Timers {
    fn push(&mut self, remaining: f64, period: Option<f64>, signal: String) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            remaining,
            period,
            signal,
        });
        id
    }

    /// One-shot timer firing `signal` after `delay` seconds.
    ///
    /// A zero or negative delay fires on the next step.
    pub fn after(&mut self, delay: f64, signal: impl Into<String>) -> TimerId {
        let delay = if delay.is_finite() { delay } else { 0.0 };
        self.push(delay, None, signal.into())
    }

    /// Repeating timer firing `signal` every `period` seconds.
    pub fn every(&mut self, period: f64, signal: impl Into<String>) -> Result<TimerId, SimError> {
        if !(period.is_finite() && period > 0.0) {
            return Err(SimError::Config(format!(
                "timer period must be positive, got {period}"
            )));
        }
        Ok(self.push(period, Some(period), signal.into()))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != id);
        self.timers.len() != before
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Seconds until a timer fires next.
    pub fn remaining(&self, id: TimerId) -> Option<f64> {
        self.timers
            .iter()
            .find(|timer| timer.id == id)
            .map(|timer| timer.remaining.max(0.0))
    }

    /// Count every timer down by `dt` and collect the ones that fired.
    pub fn advance(&mut self, dt: f64) -> Vec<TimerEvent> {
        let mut fired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining -= dt;
            let mut fires = 0;
            while timer.remaining <= 0.0 {
                fired.push(TimerEvent {
                    timer: timer.id,
                    signal: timer.signal.clone(),
                });
                fires += 1;
                let Some(period) = timer.period else {
                    return false;
                };
                if fires == MAX_FIRES_PER_STEP {
                    timer.remaining = period - (-timer.remaining).rem_euclid(period);
                    break;
                }
                timer.remaining += period;
            }
            true
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut timers = Timers::default();
        let id = timers.after(1.0, "go");
        assert!(timers.advance(0.5).is_empty());
        let fired = timers.advance(0.5);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].timer, id);
        assert_eq!(fired[0].signal, "go");
        assert!(timers.is_empty());
        assert!(timers.advance(10.0).is_empty());
    }

    #[test]
    fn repeating_timer_catches_up() {
        let mut timers = Timers::default();
        timers.every(0.25, "tick").unwrap();
        assert_eq!(timers.advance(1.0).len(), 4);
        assert_eq!(timers.advance(0.1).len(), 0);
        assert_eq!(timers.advance(0.2).len(), 1);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn period_below_countdown_precision_still_returns() {
        let mut timers = Timers::default();
        let id = timers.every(1e-20, "x").unwrap();
        let fired = timers.advance(1.0);
        assert_eq!(fired.len(), MAX_FIRES_PER_STEP as usize);
        let remaining = timers.remaining(id).unwrap();
        assert!(remaining > 0.0 && remaining <= 1e-20);
    }

    #[test]
    fn backlog_past_the_cap_keeps_the_phase() {
        let mut timers = Timers::default();
        let id = timers.every(0.5, "tick").unwrap();
        let fired = timers.advance(10_000.25);
        assert_eq!(fired.len(), MAX_FIRES_PER_STEP as usize);
        assert_eq!(timers.remaining(id), Some(0.25));
    }

    #[test]
    fn cancel_only_removes_one() {
        let mut timers = Timers::default();
        let a = timers.after(1.0, "a");
        let b = timers.after(1.0, "b");
        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        let fired = timers.advance(1.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].timer, b);
    }

    #[test]
    fn invalid_period_is_rejected() {
        let mut timers = Timers::default();
        assert!(timers.every(0.0, "x").is_err());
        assert!(timers.every(f64::INFINITY, "x").is_err());
    }
}
