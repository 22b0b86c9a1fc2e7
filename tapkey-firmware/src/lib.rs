#![no_std]
pub mod config;
pub mod debounce;
pub mod dispatcher;
pub mod event_queue;
pub mod exec;
pub mod firmware_functions;
pub mod hid;
pub mod layers;
pub mod matrix;
pub mod mouse_keys;
pub mod nvm;
pub mod pairs;
pub mod tap_hold;

#[cfg(any(test, feature = "test-utils"))]
pub mod hid_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod storage_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod switch_test_stub;
#[cfg(any(test, feature = "test-utils"))]
pub mod time_driver_test_stub;

#[macro_use]
mod macros;

pub use exec::{Keyboard, KeyboardBuilder};
pub use tapkey_common::{Action, ActionCode, Mods};

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
