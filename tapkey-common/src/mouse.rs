use crate::action_code::MouseMove;

/// Speed settings for held mouse-key movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseConfig {
    pub movement: Ramp,
    pub scroll: Ramp,
}
impl Default for MouseConfig {
    fn default() -> Self {
        MouseConfig::normal()
    }
}
impl MouseConfig {
    pub const fn slow() -> Self {
        Self {
            movement: Ramp {
                curve: (0.1, 0.5),
                max_time_ms: 1_000.0,
                min_ticks_per_ms: 0.02,
                max_ticks_per_ms: 1.0,
            },
            scroll: Ramp {
                curve: (0.0, 0.0),
                max_time_ms: 5_000.0,
                min_ticks_per_ms: 0.01,
                max_ticks_per_ms: 0.25,
            },
        }
    }

    pub const fn normal() -> Self {
        Self {
            movement: Ramp {
                curve: (0.1, 0.5),
                max_time_ms: 1_000.0,
                min_ticks_per_ms: 0.05,
                max_ticks_per_ms: 2.0,
            },
            scroll: Ramp {
                curve: (0.0, 0.0),
                max_time_ms: 5_000.0,
                min_ticks_per_ms: 0.01,
                max_ticks_per_ms: 0.5,
            },
        }
    }

    pub fn ramp(&self, dir: MouseMove) -> &Ramp {
        if dir.is_wheel() {
            &self.scroll
        } else {
            &self.movement
        }
    }
}

/// Ticks per millisecond as a function of how long the key has been held. The rate climbs along a
/// cubic bezier from `min_ticks_per_ms` to `min_ticks_per_ms + max_ticks_per_ms` over
/// `max_time_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub curve: (f32, f32),
    pub max_time_ms: f32,
    pub min_ticks_per_ms: f32,
    pub max_ticks_per_ms: f32,
}
impl Ramp {
    /// Ticks to move for a report `period_ms` long, after holding for `held_ms`. The fractional
    /// remainder is carried in `carry` to the next report.
    pub fn ticks(&self, period_ms: u32, held_ms: u32, carry: &mut f32) -> i8 {
        let r = self.rate(held_ms) * period_ms as f32 + *carry;
        let r = min(r, 127.0);
        let ticks = r as i8;
        *carry = r - ticks as f32;
        ticks
    }

    pub fn rate(&self, held_ms: u32) -> f32 {
        let (c0, c1) = self.curve;
        let t = min(held_ms as f32, self.max_time_ms) / self.max_time_ms;
        self.min_ticks_per_ms + self.max_ticks_per_ms * cubic_bezier(t, c0, c1)
    }
}

/// y value of a cubic bezier from (0,0) to (1,1) at `t`; `c0` and `c1` are the inner control
/// points' y values.
pub fn cubic_bezier(t: f32, c0: f32, c1: f32) -> f32 {
    let r = 1.0 - t;
    3.0 * r * r * t * c0 + 3.0 * r * t * t * c1 + t * t * t
}

fn min(a: f32, b: f32) -> f32 {
    if a < b {
        a
    } else {
        b
    }
}

#[cfg(test)]
#[path = "mouse_test.rs"]
mod test;
