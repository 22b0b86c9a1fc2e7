use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::{
    config,
    event_queue::{EventQueue, KeyEvent, Timestamp},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Free,
    /// Asserted but not yet stable for the debounce time.
    Debouncing,
    Down,
    /// Down for at least the hold time.
    Hold,
    /// De-asserted after being down; `from_hold` records where to return on a bounce.
    ReleasedEdge { from_hold: bool },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyState {
    pub phase: Phase,
    pub last_change: Timestamp,
    pub last_level: bool,
}

impl KeyState {
    pub fn is_down(&self) -> bool {
        matches!(
            self.phase,
            Phase::Down | Phase::Hold | Phase::ReleasedEdge { .. }
        )
    }
}

/// Per position debounce and hold state machine. Each call to [Debouncer::sample] feeds one raw
/// level; press and release events go to the [EventQueue] once the level has been stable for the
/// debounce time.
pub struct Debouncer<const KEYS: usize> {
    keys: [KeyState; KEYS],
    debounce_ms: u16,
    hold_ms: u16,
}

impl<const KEYS: usize> Default for Debouncer<KEYS> {
    fn default() -> Self {
        Self::new(config::DEBOUNCE_MS, config::HOLD_MS)
    }
}

impl<const KEYS: usize> Debouncer<KEYS> {
    const OKAY: bool = config::check_key_count::<KEYS>();

    pub fn new(debounce_ms: u16, hold_ms: u16) -> Self {
        assert!(Self::OKAY);
        Self {
            keys: [KeyState::default(); KEYS],
            debounce_ms,
            hold_ms,
        }
    }

    pub fn debounce_ms(&self) -> u16 {
        self.debounce_ms
    }

    pub fn set_debounce_ms(&mut self, ms: u16) {
        self.debounce_ms = ms;
    }

    pub fn hold_ms(&self) -> u16 {
        self.hold_ms
    }

    pub fn set_hold_ms(&mut self, ms: u16) {
        self.hold_ms = ms;
    }

    pub fn state(&self, position: u8) -> Option<&KeyState> {
        self.keys.get(position as usize)
    }

    /// True when every key is free; the scanner may then wait for an interrupt instead of polling.
    pub fn all_free(&self) -> bool {
        self.keys.iter().all(|k| k.phase == Phase::Free)
    }

    pub fn sample<M: RawMutex>(
        &mut self,
        position: u8,
        level: bool,
        now: Timestamp,
        queue: &EventQueue<M, KEYS>,
    ) {
        let Some(key) = self.keys.get_mut(position as usize) else {
            return;
        };

        if level != key.last_level {
            key.last_level = level;
            key.last_change = now;
        }
        let stable_ms = now.since(key.last_change);
        let settled = stable_ms >= self.debounce_ms as u32;

        key.phase = match key.phase {
            Phase::Free if level => Phase::Debouncing,
            Phase::Debouncing if !level => Phase::Free,
            Phase::Debouncing if settled => {
                match queue.try_push(KeyEvent::press(position, key.last_change)) {
                    Ok(()) => Phase::Down,
                    Err(err) => {
                        crate::debug!("press {} deferred {:?}", position, err);
                        Phase::Debouncing
                    }
                }
            }
            Phase::Down if !level => Phase::ReleasedEdge { from_hold: false },
            Phase::Down if stable_ms >= self.hold_ms as u32 => Phase::Hold,
            Phase::Hold if !level => Phase::ReleasedEdge { from_hold: true },
            Phase::ReleasedEdge { from_hold } if level => {
                if from_hold {
                    Phase::Hold
                } else {
                    Phase::Down
                }
            }
            Phase::ReleasedEdge { from_hold } if settled => {
                match queue.try_push(KeyEvent::release(position, key.last_change)) {
                    Ok(()) => Phase::Free,
                    Err(err) => {
                        crate::debug!("release {} deferred {:?}", position, err);
                        Phase::ReleasedEdge { from_hold }
                    }
                }
            }
            phase => phase,
        };
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod test;
