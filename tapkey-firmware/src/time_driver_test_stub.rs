//! Virtual clock for host tests. Time stands still until a timer is scheduled; scheduling a wake
//! jumps the clock to the deadline, or to the first scripted action due before it, so every
//! timeout completes deterministically.

extern crate std;

use core::{
    cell::{Cell, RefCell},
    task::Waker,
};
use embassy_time_driver::Driver;
use std::{boxed::Box, vec::Vec};

type Action = Box<dyn FnOnce()>;

struct VirtualClock;

std::thread_local! {
    static NOW_US: Cell<u64> = const { Cell::new(0) };
    static SCRIPT: RefCell<Vec<(u64, Action)>> = const { RefCell::new(Vec::new()) };
}

fn next_action_before(at: u64) -> Option<(u64, Action)> {
    SCRIPT.with_borrow_mut(|script| {
        let (i, _) = script
            .iter()
            .enumerate()
            .filter(|(_, (t, _))| *t <= at)
            .min_by_key(|(_, (t, _))| *t)?;
        Some(script.remove(i))
    })
}

impl Driver for VirtualClock {
    fn now(&self) -> u64 {
        NOW_US.get()
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        let now = NOW_US.get();
        if at > now {
            match next_action_before(at) {
                Some((t, action)) => {
                    NOW_US.set(t.max(now));
                    action();
                }
                None => NOW_US.set(at),
            }
        }
        waker.wake_by_ref();
    }
}

embassy_time_driver::time_driver_impl!(static CLOCK: VirtualClock = VirtualClock);

/// Set the clock in microseconds and forget any scripted actions. Each test thread has its own
/// clock.
pub fn set_time(us: u64) {
    NOW_US.set(us);
    SCRIPT.with_borrow_mut(|script| script.clear());
}

pub fn advance_ms(ms: u64) {
    NOW_US.set(NOW_US.get() + ms * 1000);
}

pub fn now_ms() -> u64 {
    NOW_US.get() / 1000
}

/// Run `action` when a pending timer carries the clock to `ms`.
pub fn at_ms(ms: u64, action: impl FnOnce() + 'static) {
    SCRIPT.with_borrow_mut(|script| script.push((ms * 1000, Box::new(action))));
}
