//! Board specific functions the dispatcher calls for system commands.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;

use crate::hid::TransportError;

pub type ResetFn = &'static (dyn Fn() + Sync);
pub type SuspendFn = &'static (dyn Fn() -> Result<(), TransportError> + Sync);

struct Functions {
    reset: Option<ResetFn>,
    reset_to_bootloader: Option<ResetFn>,
    shutdown: Option<ResetFn>,
    suspend: Option<SuspendFn>,
}

const fn default_functions() -> Functions {
    Functions {
        reset: None,
        reset_to_bootloader: None,
        shutdown: None,
        suspend: None,
    }
}

static FUNCTIONS: CriticalSectionMutex<RefCell<Functions>> =
    CriticalSectionMutex::new(RefCell::new(default_functions()));

fn take(f: impl FnOnce(&mut Functions) -> Option<ResetFn>) -> Option<ResetFn> {
    FUNCTIONS.lock(|r| f(&mut r.borrow_mut()))
}

pub fn reset() {
    if let Some(f) = take(|fns| fns.reset.take()) {
        f();
    }
}

pub fn reset_to_bootloader() {
    if let Some(f) = take(|fns| fns.reset_to_bootloader.take()) {
        f();
    }
}

/// Power down. Falls back to [reset] when no shutdown function is registered.
pub fn shutdown() {
    match take(|fns| fns.shutdown.take()) {
        Some(f) => f(),
        None => reset(),
    }
}

/// Enter low power sleep until a key wakes the board. Unlike the reset functions this may be
/// called many times.
pub fn suspend() -> Result<(), TransportError> {
    match FUNCTIONS.lock(|r| r.borrow().suspend) {
        Some(f) => f(),
        None => Err(TransportError::Unsupported),
    }
}

/// Register a function that will reset the MCU when requested [reset] is called.
///
/// ```
/// use tapkey_firmware::firmware_functions::handle_reset;
/// # pub mod cortex_m { pub mod peripheral {pub mod SCB {pub fn sys_reset() {}}}}
///
/// fn myreset() {
///     cortex_m::peripheral::SCB::sys_reset();
/// }
///
/// handle_reset(Some(&myreset));
/// ```
pub fn handle_reset(value: Option<ResetFn>) {
    FUNCTIONS.lock(|r| r.borrow_mut().reset = value);
}

pub fn handle_reset_to_bootloader(value: Option<ResetFn>) {
    FUNCTIONS.lock(|r| r.borrow_mut().reset_to_bootloader = value);
}

pub fn handle_shutdown(value: Option<ResetFn>) {
    FUNCTIONS.lock(|r| r.borrow_mut().shutdown = value);
}

pub fn handle_suspend(value: Option<SuspendFn>) {
    FUNCTIONS.lock(|r| r.borrow_mut().suspend = value);
}

#[cfg(all(not(test), feature = "reset-on-panic", target_os = "none"))]
mod panic {
    #[panic_handler]
    fn panic(_info: &core::panic::PanicInfo) -> ! {
        super::reset();

        loop {}
    }
}

#[cfg(test)]
#[path = "firmware_functions_test.rs"]
mod test;
