use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::event_queue::{EventQueue, KeyEvent};

/// Position pairs that act as a chord when pressed together. A pair's index is its place in the
/// list.
#[derive(Copy, Clone, Debug, Default)]
pub struct PairRegistry<'p> {
    pairs: &'p [[u8; 2]],
}

impl<'p> PairRegistry<'p> {
    pub const fn new(pairs: &'p [[u8; 2]]) -> Self {
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn is_pair_key(&self, position: u8) -> bool {
        self.pairs.iter().any(|p| p.contains(&position))
    }

    /// Index of the pair `{a, b}` in either order.
    pub fn find(&self, a: u8, b: u8) -> Option<usize> {
        if a == b {
            return None;
        }
        self.pairs
            .iter()
            .position(|p| (p[0] == a && p[1] == b) || (p[0] == b && p[1] == a))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PairHit {
    pub index: usize,
    pub first: KeyEvent,
    pub second: KeyEvent,
}

/// Look for a chord at the head of the queue. When the head is a lone press of a pair key, wait
/// for a second event until `pair_delay_ms + latency_ms` after that press, `latency_ms` being how
/// long an edge takes to reach the queue. Both presses are removed from the queue only when their
/// edges are within `pair_delay_ms` and they form a registered pair; otherwise the queue is left
/// untouched for normal dispatch.
pub async fn detect<M: RawMutex, const KEYS: usize>(
    queue: &EventQueue<M, KEYS>,
    registry: &PairRegistry<'_>,
    pair_delay_ms: u16,
    latency_ms: u32,
) -> Option<PairHit> {
    if registry.is_empty() {
        return None;
    }
    let first = queue.peek(0)?;
    if !first.is_press() || !registry.is_pair_key(first.position) {
        return None;
    }
    if queue.len() == 1 {
        let remaining = (pair_delay_ms as u32 + latency_ms).saturating_sub(first.time.elapsed());
        queue.wait_len(2, remaining.min(i32::MAX as u32) as i32).await;
    }
    let second = queue.peek(1)?;
    if !second.is_press() || second.time.since(first.time) > pair_delay_ms as u32 {
        return None;
    }
    let index = registry.find(first.position, second.position)?;

    queue.pop();
    queue.pop();
    crate::debug!(
        "pair {} {} {} dt {}",
        index,
        first.position,
        second.position,
        second.time.since(first.time)
    );
    Some(PairHit {
        index,
        first,
        second,
    })
}

#[cfg(test)]
#[path = "pairs_test.rs"]
mod test;
