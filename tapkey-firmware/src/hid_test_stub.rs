//! Recording transport and backlight for tests.

extern crate std;

use std::vec::Vec;

use crate::hid::{Backlight, Connection, HidTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Press(Vec<u8>),
    Release(Vec<u8>),
    Consumer(u16),
    System(u16),
    Move(i8, i8, i8),
    Buttons(u8),
    SelectBluetooth(u8),
    ToggleUsb,
    ToggleBluetooth,
}

#[derive(Debug)]
pub struct RecordingTransport {
    pub calls: Vec<Call>,
    pub connection: Connection,
    /// Change reported by the next [HidTransport::poll_connection].
    pub pending: Option<Connection>,
    /// Fail this many calls (after recording them) with `error`.
    pub failures: usize,
    pub error: TransportError,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            connection: Connection::Usb,
            pending: None,
            failures: 0,
            error: TransportError::Busy,
        }
    }
}

impl RecordingTransport {
    pub fn fail_next(&mut self, n: usize, error: TransportError) {
        self.failures = n;
        self.error = error;
    }

    pub fn take(&mut self) -> Vec<Call> {
        core::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: Call) -> Result<(), TransportError> {
        self.calls.push(call);
        if self.failures > 0 {
            self.failures -= 1;
            Err(self.error)
        } else {
            Ok(())
        }
    }
}

impl HidTransport for RecordingTransport {
    fn press(&mut self, keycodes: &[u8]) -> Result<(), TransportError> {
        self.record(Call::Press(keycodes.to_vec()))
    }

    fn release(&mut self, keycodes: &[u8]) -> Result<(), TransportError> {
        self.record(Call::Release(keycodes.to_vec()))
    }

    fn send_consumer(&mut self, usage: u16) -> Result<(), TransportError> {
        self.record(Call::Consumer(usage))
    }

    fn move_mouse(&mut self, x: i8, y: i8, wheel: i8) -> Result<(), TransportError> {
        self.record(Call::Move(x, y, wheel))
    }

    fn send_system(&mut self, usage: u16) -> Result<(), TransportError> {
        self.record(Call::System(usage))
    }

    fn mouse_buttons(&mut self, buttons: u8) -> Result<(), TransportError> {
        self.record(Call::Buttons(buttons))
    }

    fn connection(&self) -> Connection {
        self.connection
    }

    fn select_bluetooth(&mut self, id: u8) -> Result<(), TransportError> {
        self.record(Call::SelectBluetooth(id))?;
        self.connection = Connection::Bluetooth(id);
        Ok(())
    }

    fn toggle_usb(&mut self) -> Result<(), TransportError> {
        self.record(Call::ToggleUsb)?;
        self.connection = match self.connection {
            Connection::Usb => Connection::Bluetooth(0),
            Connection::Bluetooth(_) => Connection::Usb,
        };
        Ok(())
    }

    fn toggle_bluetooth(&mut self) -> Result<(), TransportError> {
        self.record(Call::ToggleBluetooth)
    }

    fn poll_connection(&mut self) -> Option<Connection> {
        let next = self.pending.take()?;
        self.connection = next;
        Some(next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Light {
    Toggle,
    NextMode,
    Hue(i8),
    Sat(i8),
    Val(i8),
}

#[derive(Debug, Default)]
pub struct RecordingBacklight {
    pub ops: Vec<Light>,
    pub keys: Vec<(u8, bool)>,
    pub animating: bool,
}

impl Backlight for RecordingBacklight {
    fn toggle(&mut self) {
        self.ops.push(Light::Toggle);
    }

    fn next_mode(&mut self) {
        self.ops.push(Light::NextMode);
    }

    fn adjust_hue(&mut self, delta: i8) {
        self.ops.push(Light::Hue(delta));
    }

    fn adjust_sat(&mut self, delta: i8) {
        self.ops.push(Light::Sat(delta));
    }

    fn adjust_val(&mut self, delta: i8) {
        self.ops.push(Light::Val(delta));
    }

    fn handle_key(&mut self, position: u8, pressed: bool) {
        self.keys.push((position, pressed));
    }

    fn animating(&mut self) -> bool {
        self.animating
    }
}
