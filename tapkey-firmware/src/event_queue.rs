use core::cell::RefCell;

use embassy_sync::{
    blocking_mutex::{raw::RawMutex, Mutex},
    signal::Signal,
};
use embassy_time::{with_deadline, Duration, Instant};
use heapless::Deque;

/// Millisecond timestamp from the monotonic clock. Wraps after ~49 days so only differences are
/// meaningful.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(pub u32);
impl Timestamp {
    pub fn now() -> Self {
        Self(Instant::now().as_millis() as u32)
    }

    /// Milliseconds from `earlier` to `self`; correct across clock wraparound.
    pub fn since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub fn elapsed(self) -> u32 {
        Self::now().since(self)
    }

    pub fn add_ms(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Press,
    Release,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub position: u8,
    pub edge: Edge,
    pub time: Timestamp,
}
impl KeyEvent {
    pub fn press(position: u8, time: Timestamp) -> Self {
        Self {
            position,
            edge: Edge::Press,
            time,
        }
    }

    pub fn release(position: u8, time: Timestamp) -> Self {
        Self {
            position,
            edge: Edge::Release,
            time,
        }
    }

    pub fn is_press(&self) -> bool {
        self.edge == Edge::Press
    }

    pub fn is_release_of(&self, position: u8) -> bool {
        self.edge == Edge::Release && self.position == position
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    Full,
    /// The position already has an unconsumed event in the queue.
    Outstanding,
    InvalidPosition,
}

struct Inner<const KEYS: usize> {
    events: Deque<KeyEvent, KEYS>,
    outstanding: [bool; KEYS],
}

/// FIFO of debounced key events between the matrix scanner and the dispatcher. Holds at most one
/// unconsumed event per position so `KEYS` slots never overflow.
pub struct EventQueue<M: RawMutex, const KEYS: usize> {
    inner: Mutex<M, RefCell<Inner<KEYS>>>,
    signal: Signal<M, ()>,
}
impl<M: RawMutex, const KEYS: usize> Default for EventQueue<M, KEYS> {
    fn default() -> Self {
        Self::new()
    }
}
impl<M: RawMutex, const KEYS: usize> EventQueue<M, KEYS> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                events: Deque::new(),
                outstanding: [false; KEYS],
            })),
            signal: Signal::new(),
        }
    }

    pub fn try_push(&self, event: KeyEvent) -> Result<(), QueueError> {
        let pos = event.position as usize;
        if pos >= KEYS {
            return Err(QueueError::InvalidPosition);
        }
        self.inner.lock(|r| {
            let mut inner = r.borrow_mut();
            if inner.outstanding[pos] {
                return Err(QueueError::Outstanding);
            }
            inner
                .events
                .push_back(event)
                .map_err(|_| QueueError::Full)?;
            inner.outstanding[pos] = true;
            Ok(())
        })?;
        self.signal.signal(());
        Ok(())
    }

    pub fn has_outstanding(&self, position: u8) -> bool {
        self.inner.lock(|r| {
            r.borrow()
                .outstanding
                .get(position as usize)
                .copied()
                .unwrap_or(false)
        })
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|r| r.borrow().events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`th unconsumed event, oldest first.
    pub fn peek(&self, i: usize) -> Option<KeyEvent> {
        self.inner.lock(|r| r.borrow().events.iter().nth(i).copied())
    }

    pub fn pop(&self) -> Option<KeyEvent> {
        self.inner.lock(|r| {
            let mut inner = r.borrow_mut();
            let event = inner.events.pop_front()?;
            inner.outstanding[event.position as usize] = false;
            Some(event)
        })
    }

    /// Wait until at least `n` events are queued or `timeout_ms` passes. Returns the queue length.
    /// A zero or negative timeout returns straight away.
    pub async fn wait_len(&self, n: usize, timeout_ms: i32) -> usize {
        if timeout_ms <= 0 {
            return self.len();
        }
        let deadline = Instant::now() + Duration::from_millis(timeout_ms as u64);
        loop {
            let len = self.len();
            if len >= n {
                return len;
            }
            if with_deadline(deadline, self.signal.wait()).await.is_err() {
                return self.len();
            }
        }
    }
}

#[cfg(test)]
#[path = "event_queue_test.rs"]
mod test;
