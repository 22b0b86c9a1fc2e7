//! Timing configuration, fixed at startup.

use tapkey_common::mouse::MouseConfig;

pub const DEBOUNCE_MS: u16 = 20;
pub const HOLD_MS: u16 = 200;
pub const TAP_DELAY_MS: u16 = 500;
pub const FAST_TYPE_MS: u16 = 200;
pub const PAIR_DELAY_MS: u16 = 10;
pub const SCAN_PERIOD_US: u32 = 1000;
pub const IDLE_TIMEOUT_MS: u16 = 1000;
pub const ACTIVE_TICK_MS: u16 = 20;

/// Positions are `u8` so a keyboard has at most 256 keys.
pub const fn check_key_count<const KEYS: usize>() -> bool {
    assert!(KEYS > 0 && KEYS <= 256);
    true
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub debounce_ms: u16,
    pub hold_ms: u16,
    pub tap_delay_ms: u16,
    pub fast_type_ms: u16,
    pub pair_delay_ms: u16,
    pub scan_period_us: u32,
    /// Poll timeout when nothing is animating.
    pub idle_timeout_ms: u16,
    /// Poll timeout while the mouse ramp or the backlight is active.
    pub active_tick_ms: u16,
    pub mouse: MouseConfig,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
            hold_ms: HOLD_MS,
            tap_delay_ms: TAP_DELAY_MS,
            fast_type_ms: FAST_TYPE_MS,
            pair_delay_ms: PAIR_DELAY_MS,
            scan_period_us: SCAN_PERIOD_US,
            idle_timeout_ms: IDLE_TIMEOUT_MS,
            active_tick_ms: ACTIVE_TICK_MS,
            mouse: MouseConfig::normal(),
            verbose: true,
        }
    }
}

impl Config {
    pub fn debounce_ms(mut self, value: u16) -> Self {
        self.debounce_ms = value;
        self
    }

    pub fn hold_ms(mut self, value: u16) -> Self {
        self.hold_ms = value;
        self
    }

    pub fn tap_delay_ms(mut self, value: u16) -> Self {
        self.tap_delay_ms = value;
        self
    }

    pub fn fast_type_ms(mut self, value: u16) -> Self {
        self.fast_type_ms = value;
        self
    }

    pub fn pair_delay_ms(mut self, value: u16) -> Self {
        self.pair_delay_ms = value;
        self
    }

    pub fn scan_period_us(mut self, value: u32) -> Self {
        self.scan_period_us = value;
        self
    }

    pub fn idle_timeout_ms(mut self, value: u16) -> Self {
        self.idle_timeout_ms = value;
        self
    }

    pub fn active_tick_ms(mut self, value: u16) -> Self {
        self.active_tick_ms = value;
        self
    }

    pub fn mouse(mut self, value: MouseConfig) -> Self {
        self.mouse = value;
        self
    }

    pub fn verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Longest time from a switch edge until its event is in the queue: the debounce time plus one
    /// scan period. Waits for the next event extend their deadline by this much while still
    /// comparing edge times.
    pub fn event_latency_ms(&self) -> u32 {
        self.debounce_ms as u32 + self.scan_period_us.div_ceil(1000)
    }

    /// Clamp inconsistent values instead of failing.
    pub fn validated(mut self) -> Self {
        if self.fast_type_ms > self.tap_delay_ms {
            crate::warn!(
                "fast_type_ms {} > tap_delay_ms {}; clamped",
                self.fast_type_ms,
                self.tap_delay_ms
            );
            self.fast_type_ms = self.tap_delay_ms;
        }
        if self.hold_ms < self.debounce_ms {
            crate::warn!(
                "hold_ms {} < debounce_ms {}; raised",
                self.hold_ms,
                self.debounce_ms
            );
            self.hold_ms = self.debounce_ms;
        }
        if self.scan_period_us == 0 {
            self.scan_period_us = SCAN_PERIOD_US;
        }
        if self.active_tick_ms == 0 {
            self.active_tick_ms = ACTIVE_TICK_MS;
        }
        if self.idle_timeout_ms < self.active_tick_ms {
            self.idle_timeout_ms = self.active_tick_ms;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod test;
