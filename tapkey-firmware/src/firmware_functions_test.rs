use core::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static RESETS: AtomicUsize = AtomicUsize::new(0);
static BOOTS: AtomicUsize = AtomicUsize::new(0);
static SUSPENDS: AtomicUsize = AtomicUsize::new(0);

fn count_reset() {
    RESETS.fetch_add(1, Ordering::SeqCst);
}

fn count_boot() {
    BOOTS.fetch_add(1, Ordering::SeqCst);
}

fn count_suspend() -> Result<(), TransportError> {
    SUSPENDS.fetch_add(1, Ordering::SeqCst);
    Err(TransportError::Busy)
}

// One test so the global registry is not shared between test threads.
#[test]
fn registered_functions_are_called() {
    assert_eq!(suspend(), Err(TransportError::Unsupported));

    handle_reset(Some(&count_reset));
    handle_reset_to_bootloader(Some(&count_boot));
    handle_suspend(Some(&count_suspend));

    reset_to_bootloader();
    reset_to_bootloader();
    assert_eq!(BOOTS.load(Ordering::SeqCst), 1);

    assert_eq!(suspend(), Err(TransportError::Busy));
    assert_eq!(suspend(), Err(TransportError::Busy));
    assert_eq!(SUSPENDS.load(Ordering::SeqCst), 2);

    shutdown();
    assert_eq!(RESETS.load(Ordering::SeqCst), 1);
    reset();
    assert_eq!(RESETS.load(Ordering::SeqCst), 1);

    handle_shutdown(Some(&count_boot));
    shutdown();
    assert_eq!(BOOTS.load(Ordering::SeqCst), 2);
    handle_suspend(None);
}
