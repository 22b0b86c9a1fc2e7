//! Collaborators the dispatcher drives: the HID transport, the backlight and the user handlers.

use tapkey_common::{
    action_code::{Action, BLUETOOTH_IDS},
    ActionCode,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Connection {
    Usb,
    Bluetooth(u8),
}

impl Connection {
    /// Bluetooth identities past the last slot are clamped to 0.
    pub fn bluetooth(id: u8) -> Self {
        if id < BLUETOOTH_IDS {
            Self::Bluetooth(id)
        } else {
            crate::warn!("bluetooth id {} out of range", id);
            Self::Bluetooth(0)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    NotConnected,
    Busy,
    Unsupported,
    Io,
}

/// A USB or bluetooth HID link. Every call may fail transiently; the caller logs and carries on.
pub trait HidTransport {
    fn press(&mut self, keycodes: &[u8]) -> Result<(), TransportError>;
    fn release(&mut self, keycodes: &[u8]) -> Result<(), TransportError>;
    fn send_consumer(&mut self, usage: u16) -> Result<(), TransportError>;
    fn move_mouse(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), TransportError>;

    fn send_system(&mut self, _usage: u16) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }

    /// Report the set of held mouse buttons.
    fn mouse_buttons(&mut self, _buttons: u8) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }

    fn connection(&self) -> Connection {
        Connection::Usb
    }

    fn select_bluetooth(&mut self, _id: u8) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }

    fn toggle_usb(&mut self) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }

    fn toggle_bluetooth(&mut self) -> Result<(), TransportError> {
        Err(TransportError::Unsupported)
    }

    /// A connection change the transport noticed on its own (host attached, advertising timed
    /// out). Polled once per loop.
    fn poll_connection(&mut self) -> Option<Connection> {
        None
    }
}

pub const BACKLIGHT_STEP: i8 = 8;

/// Lighting. Everything defaults to doing nothing.
pub trait Backlight {
    fn toggle(&mut self) {}
    fn next_mode(&mut self) {}
    fn adjust_hue(&mut self, _delta: i8) {}
    fn adjust_sat(&mut self, _delta: i8) {}
    fn adjust_val(&mut self, _delta: i8) {}

    /// Called for every event taken from the queue.
    fn handle_key(&mut self, _position: u8, _pressed: bool) {}

    /// True while an animation needs the dispatcher to wake on the active tick. Also the hook for
    /// advancing the animation.
    fn animating(&mut self) -> bool {
        false
    }
}

impl Backlight for () {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandlerError {
    Transport(TransportError),
    Unknown(u16),
    Failed,
}

impl From<TransportError> for HandlerError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

/// What a macro or pair handler is given to act on the keyboard.
pub struct Device<'d> {
    transport: &'d mut dyn HidTransport,
    backlight: &'d mut dyn Backlight,
}

impl<'d> Device<'d> {
    pub fn new(transport: &'d mut dyn HidTransport, backlight: &'d mut dyn Backlight) -> Self {
        Self {
            transport,
            backlight,
        }
    }

    pub fn backlight(&mut self) -> &mut dyn Backlight {
        self.backlight
    }

    pub fn press(&mut self, keycodes: &[u8]) -> Result<(), TransportError> {
        self.transport
            .press(keycodes)
            .inspect_err(|err| crate::warn!("press {:?} failed {:?}", keycodes, err))
    }

    pub fn release(&mut self, keycodes: &[u8]) -> Result<(), TransportError> {
        self.transport
            .release(keycodes)
            .inspect_err(|err| crate::warn!("release {:?} failed {:?}", keycodes, err))
    }

    /// Press then release.
    pub fn send(&mut self, keycodes: &[u8]) -> Result<(), TransportError> {
        let pressed = self.press(keycodes);
        let released = self.release(keycodes);
        pressed.and(released)
    }

    pub fn send_consumer(&mut self, usage: u16) -> Result<(), TransportError> {
        let sent = self
            .transport
            .send_consumer(usage)
            .inspect_err(|err| crate::warn!("consumer {} failed {:?}", usage, err));
        let cleared = self
            .transport
            .send_consumer(0)
            .inspect_err(|err| crate::warn!("consumer release failed {:?}", err));
        sent.and(cleared)
    }

    /// Type each key code (with its modifiers) in turn. Codes other than plain keys are skipped.
    pub fn send_keys(&mut self, codes: &[ActionCode]) -> Result<(), TransportError> {
        let mut result = Ok(());
        for code in codes {
            let Action::Key { mods, keycode } = code.decode() else {
                crate::debug!("send_keys skips {:?}", code);
                continue;
            };
            result = result.and(self.send(&mods.with_key(keycode)));
        }
        result
    }

    /// Type ASCII text. Characters without a key are skipped.
    pub fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        let mut result = Ok(());
        for c in text.bytes() {
            match ActionCode::from_ascii(c) {
                Some(code) => result = result.and(self.send_keys(&[code])),
                None => crate::debug!("send_text skips {}", c),
            }
        }
        result
    }
}

pub trait MacroHandler {
    fn handle(
        &mut self,
        device: &mut Device<'_>,
        index: u16,
        pressed: bool,
    ) -> Result<(), HandlerError>;
}

pub trait PairHandler {
    fn handle(&mut self, device: &mut Device<'_>, pair: usize) -> Result<(), HandlerError>;
}

impl<F: FnMut(&mut Device<'_>, u16, bool) -> Result<(), HandlerError>> MacroHandler for F {
    fn handle(
        &mut self,
        device: &mut Device<'_>,
        index: u16,
        pressed: bool,
    ) -> Result<(), HandlerError> {
        self(device, index, pressed)
    }
}

impl<F: FnMut(&mut Device<'_>, usize) -> Result<(), HandlerError>> PairHandler for F {
    fn handle(&mut self, device: &mut Device<'_>, pair: usize) -> Result<(), HandlerError> {
        self(device, pair)
    }
}

#[cfg(test)]
#[path = "hid_test.rs"]
mod test;
