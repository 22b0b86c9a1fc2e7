use tapkey_common::{action_code::MouseMove, mouse::MouseConfig};

use crate::event_queue::Timestamp;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Movement {
    dir: MouseMove,
    started: Timestamp,
    last: Timestamp,
    carry: f32,
}

/// Held mouse buttons and the one active movement. A newer movement key replaces the current one.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MouseKeys {
    buttons: u8,
    movement: Option<Movement>,
}

impl MouseKeys {
    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// Returns the new button mask.
    pub fn press_buttons(&mut self, mask: u8) -> u8 {
        self.buttons |= mask;
        self.buttons
    }

    pub fn release_buttons(&mut self, mask: u8) -> u8 {
        self.buttons &= !mask;
        self.buttons
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }

    pub fn start(&mut self, dir: MouseMove, now: Timestamp) {
        self.movement = Some(Movement {
            dir,
            started: now,
            last: now,
            carry: 0.0,
        });
    }

    /// Stop if `dir` is the active movement. Returns true when it was.
    pub fn stop(&mut self, dir: MouseMove) -> bool {
        match self.movement {
            Some(m) if m.dir == dir => {
                self.movement = None;
                true
            }
            _ => false,
        }
    }

    /// The (x, y, wheel) step for the time since the last tick, or `None` when idle or when the
    /// step rounds to zero.
    pub fn tick(&mut self, config: &MouseConfig, now: Timestamp) -> Option<(i8, i8, i8)> {
        let m = self.movement.as_mut()?;
        let period = now.since(m.last);
        let held = now.since(m.started);
        m.last = now;
        let ticks = config.ramp(m.dir).ticks(period, held, &mut m.carry);
        if ticks == 0 {
            return None;
        }
        let (x, y, wheel) = m.dir.vector();
        Some((x * ticks, y * ticks, wheel * ticks))
    }
}

#[cfg(test)]
#[path = "mouse_keys_test.rs"]
mod test;
