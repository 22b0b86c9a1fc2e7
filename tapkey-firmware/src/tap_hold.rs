//! Tap or hold decision for dual role keys.
//!
//! Called after the dual role key's press has been taken from the queue; only peeks at the events
//! that follow it. The decision is:
//!
//! 1. wait up to `tap_delay` (from the press) for the next event; none means hold.
//! 2. a release within `tap_delay` means tap.
//! 3. a press of another key means hold, unless this key's own release follows it within
//!    `fast_type` (fast typing).
//!
//! Windows are measured between switch edges. An edge only reaches the queue `latency_ms` after
//! it happened, so each wait runs that much past its window.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::event_queue::{EventQueue, Timestamp};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHold {
    Tap,
    Hold,
}

fn remaining(window_ms: u32, since: Timestamp) -> i32 {
    window_ms.saturating_sub(since.elapsed()).min(i32::MAX as u32) as i32
}

pub async fn classify<M: RawMutex, const KEYS: usize>(
    queue: &EventQueue<M, KEYS>,
    position: u8,
    pressed_at: Timestamp,
    tap_delay_ms: u16,
    fast_type_ms: u16,
    latency_ms: u32,
) -> TapHold {
    let decision = decide(
        queue,
        position,
        pressed_at,
        tap_delay_ms,
        fast_type_ms,
        latency_ms,
    )
    .await;
    crate::debug!("tap_hold {} {:?}", position, decision);
    decision
}

async fn decide<M: RawMutex, const KEYS: usize>(
    queue: &EventQueue<M, KEYS>,
    position: u8,
    pressed_at: Timestamp,
    tap_delay_ms: u16,
    fast_type_ms: u16,
    latency_ms: u32,
) -> TapHold {
    let tap_wait = remaining(tap_delay_ms as u32 + latency_ms, pressed_at);
    queue.wait_len(1, tap_wait).await;
    let Some(next) = queue.peek(0) else {
        return TapHold::Hold;
    };
    if next.time.since(pressed_at) >= tap_delay_ms as u32 {
        return TapHold::Hold;
    }
    if !next.is_press() {
        return TapHold::Tap;
    }

    let fast_wait = remaining(fast_type_ms as u32 + latency_ms, next.time);
    queue.wait_len(2, fast_wait).await;
    match queue.peek(1) {
        Some(after)
            if after.is_release_of(position)
                && after.time.since(next.time) <= fast_type_ms as u32 =>
        {
            TapHold::Tap
        }
        _ => TapHold::Hold,
    }
}

#[cfg(test)]
#[path = "tap_hold_test.rs"]
mod test;
