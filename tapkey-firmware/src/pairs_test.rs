extern crate std;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use std::boxed::Box;

use super::*;
use crate::{
    event_queue::Timestamp,
    time_driver_test_stub::{at_ms, now_ms, set_time},
};

type Queue = EventQueue<NoopRawMutex, 8>;

static PAIRS: [[u8; 2]; 2] = [[3, 4], [6, 2]];

fn queue_at(now_ms: u64) -> &'static Queue {
    set_time(now_ms * 1000);
    Box::leak(Box::new(Queue::new()))
}

fn run(q: &Queue) -> Option<PairHit> {
    block_on(detect(q, &PairRegistry::new(&PAIRS), 10, 0))
}

#[test]
fn registry_lookup_is_unordered() {
    let reg = PairRegistry::new(&PAIRS);
    assert_eq!(reg.find(3, 4), Some(0));
    assert_eq!(reg.find(4, 3), Some(0));
    assert_eq!(reg.find(2, 6), Some(1));
    assert_eq!(reg.find(3, 6), None);
    assert_eq!(reg.find(3, 3), None);
    assert!(reg.is_pair_key(2));
    assert!(!reg.is_pair_key(5));
    assert!(PairRegistry::default().is_empty());
}

#[test]
fn pair_within_delay_is_consumed() {
    let q = queue_at(1005);
    q.try_push(KeyEvent::press(4, Timestamp(1000))).unwrap();
    q.try_push(KeyEvent::press(3, Timestamp(1004))).unwrap();

    let hit = run(q).unwrap();
    assert_eq!(hit.index, 0);
    assert_eq!(hit.first.position, 4);
    assert_eq!(hit.second.position, 3);
    assert!(q.is_empty());
}

#[test]
fn second_press_arriving_in_window() {
    let q = queue_at(1000);
    q.try_push(KeyEvent::press(6, Timestamp(1000))).unwrap();
    at_ms(1007, move || q.try_push(KeyEvent::press(2, Timestamp(1007))).unwrap());

    assert_eq!(run(q).map(|h| h.index), Some(1));
    assert_eq!(now_ms(), 1007);
    assert!(q.is_empty());
}

#[test]
fn lone_pair_key_times_out() {
    let q = queue_at(1000);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();

    assert_eq!(run(q), None);
    assert_eq!(now_ms(), 1010);
    assert_eq!(q.len(), 1);
}

#[test]
fn presses_too_far_apart_are_left_alone() {
    let q = queue_at(1100);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();
    q.try_push(KeyEvent::press(4, Timestamp(1050))).unwrap();

    assert_eq!(run(q), None);
    assert_eq!(q.len(), 2);
}

#[test]
fn non_pairs_are_left_alone() {
    let q = queue_at(1005);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();
    q.try_push(KeyEvent::press(6, Timestamp(1001))).unwrap();
    assert_eq!(run(q), None);
    assert_eq!(q.len(), 2);

    let q = queue_at(1005);
    q.try_push(KeyEvent::press(5, Timestamp(1000))).unwrap();
    assert_eq!(run(q), None);
    assert_eq!(now_ms(), 1005);

    let q = queue_at(1005);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();
    q.try_push(KeyEvent::release(4, Timestamp(1001))).unwrap();
    assert_eq!(run(q), None);
    assert_eq!(q.len(), 2);
}

#[test]
fn empty_registry_never_waits() {
    let q = queue_at(1000);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();

    assert_eq!(block_on(detect(q, &PairRegistry::default(), 10, 21)), None);
    assert_eq!(now_ms(), 1000);
}

#[test]
fn first_press_queued_after_the_window() {
    let q = queue_at(1020);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();
    at_ms(1026, move || q.try_push(KeyEvent::press(4, Timestamp(1005))).unwrap());

    let hit = block_on(detect(q, &PairRegistry::new(&PAIRS), 10, 21));
    assert_eq!(hit.map(|h| h.index), Some(0));
    assert!(q.is_empty());
}

#[test]
fn late_wait_still_compares_edges() {
    let q = queue_at(1020);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();
    at_ms(1029, move || q.try_push(KeyEvent::press(4, Timestamp(1011))).unwrap());

    assert_eq!(block_on(detect(q, &PairRegistry::new(&PAIRS), 10, 21)), None);
    assert_eq!(q.len(), 2);

    let q = queue_at(1020);
    q.try_push(KeyEvent::press(3, Timestamp(1000))).unwrap();
    assert_eq!(block_on(detect(q, &PairRegistry::new(&PAIRS), 10, 21)), None);
    assert_eq!(now_ms(), 1031);
}
