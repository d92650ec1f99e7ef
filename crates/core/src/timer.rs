//! Timer module - polled delay / repeat primitive
//!
//! Timers never sleep. The owner keeps a clock, calls [`Timer::update`] with
//! the current time once per step and dispatches whatever action comes back.
//! Keeping the action a plain value means a timer holds no reference to the
//! thing it drives.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer<A> {
    duration: Duration,
    repeat: bool,
    active: bool,
    last_trigger: Duration,
    action: Option<A>,
}

impl<A: Copy> Timer<A> {
    pub fn new(duration: Duration, repeat: bool, action: Option<A>) -> Self {
        Self {
            duration,
            repeat,
            active: false,
            last_trigger: Duration::ZERO,
            action,
        }
    }

    /// One-shot timer with no action, used as a cooldown.
    pub fn one_shot(duration: Duration) -> Self {
        Self::new(duration, false, None)
    }

    pub fn repeating(duration: Duration, action: A) -> Self {
        Self::new(duration, true, Some(action))
    }

    /// Start (or restart) counting from `now`.
    pub fn activate(&mut self, now: Duration) {
        self.active = true;
        self.last_trigger = now;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Takes effect on the next `update`; the trigger clock is left alone.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Fire if the duration has elapsed since the last trigger.
    ///
    /// Returns the bound action when the timer fires. A repeating timer
    /// restarts from `now`, a one-shot timer goes inactive. At most one firing
    /// happens per call, however much time has passed.
    pub fn update(&mut self, now: Duration) -> Option<A> {
        if !self.active || now.saturating_sub(self.last_trigger) < self.duration {
            return None;
        }
        if self.repeat {
            self.last_trigger = now;
        } else {
            self.active = false;
        }
        self.action
    }
}
