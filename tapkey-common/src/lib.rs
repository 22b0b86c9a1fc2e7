#![no_std]
pub mod action_code;
pub mod keycodes;
pub mod mouse;
pub mod record;

pub use action_code::{Action, ActionCode};
pub use keycodes::Mods;
