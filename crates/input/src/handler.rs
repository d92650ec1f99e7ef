//! Held-key tracking for terminal environments.
//!
//! The engine wants a press when a key goes down and a release when it comes
//! back up. Most terminals only report presses (plus auto-repeat), so a key
//! that has not been reported for a while is treated as released.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::KeyEvent;

use crate::map::to_input_event;
use crate::types::{Control, InputEvent};

// A tap must not turn into a long hold. Terminal auto-repeat usually starts
// after ~250ms and then repeats every ~30ms, so this spans the gap between
// the first report and the first repeat.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 300;

/// Turns raw key events into press/release pairs.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Last time each control was reported down, `None` when up.
    last_seen: [Option<Instant>; 5],
    key_release_timeout: Duration,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_seen: [None; 5],
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout = Duration::from_millis(timeout_ms);
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.last_seen[control.index()].is_some()
    }

    /// Feed one key event seen at `now`.
    ///
    /// Returns the event to pass on, if any: the first report of a key is a
    /// press, repeats only refresh the hold, real release events pass through.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<InputEvent> {
        let event = to_input_event(key)?;
        match event {
            InputEvent::Press(control) => {
                let seen = self.last_seen[control.index()].replace(now);
                seen.is_none().then_some(event)
            }
            InputEvent::Release(control) => {
                self.last_seen[control.index()] = None;
                Some(event)
            }
        }
    }

    /// Release every key that has not been reported within the timeout.
    pub fn update(&mut self, now: Instant) -> ArrayVec<InputEvent, 5> {
        let mut released = ArrayVec::new();
        for control in Control::ALL {
            let slot = &mut self.last_seen[control.index()];
            if let Some(seen) = *slot {
                if now.saturating_duration_since(seen) > self.key_release_timeout {
                    *slot = None;
                    released.push(InputEvent::Release(control));
                }
            }
        }
        released
    }

    pub fn reset(&mut self) {
        self.last_seen = [None; 5];
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_report_is_a_press_repeats_are_swallowed() {
        let mut ih = InputHandler::new();
        let t0 = Instant::now();
        assert_eq!(
            ih.handle_key(press(KeyCode::Left), t0),
            Some(InputEvent::Press(Control::Left))
        );
        assert_eq!(ih.handle_key(press(KeyCode::Left), t0 + ms(30)), None);
        assert!(ih.is_held(Control::Left));
    }

    #[test]
    fn test_auto_release_after_timeout() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        ih.handle_key(press(KeyCode::Down), t0);

        assert!(ih.update(t0 + ms(50)).is_empty());
        assert_eq!(
            ih.update(t0 + ms(51)).as_slice(),
            &[InputEvent::Release(Control::SoftDrop)]
        );
        assert!(!ih.is_held(Control::SoftDrop));
    }

    #[test]
    fn test_repeats_keep_key_held() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        let t0 = Instant::now();
        ih.handle_key(press(KeyCode::Right), t0);
        ih.handle_key(press(KeyCode::Right), t0 + ms(40));
        assert!(ih.update(t0 + ms(80)).is_empty());
    }

    #[test]
    fn test_real_release_passes_through() {
        let mut ih = InputHandler::new();
        let t0 = Instant::now();
        ih.handle_key(press(KeyCode::Up), t0);
        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(
            ih.handle_key(release, t0 + ms(5)),
            Some(InputEvent::Release(Control::Rotate))
        );
        assert!(ih.update(t0 + ms(10_000)).is_empty());
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key(press(KeyCode::Tab), Instant::now()), None);
    }

    #[test]
    fn test_reset_forgets_held_keys() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10);
        let t0 = Instant::now();
        ih.handle_key(press(KeyCode::Left), t0);
        ih.reset();
        assert!(ih.update(t0 + ms(100)).is_empty());
    }
}
