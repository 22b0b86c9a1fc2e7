use tapkey_common::{action_code::BLUETOOTH_IDS, ActionCode};

use crate::hid::Connection;

pub const MAX_LAYERS: usize = 32;

pub type Layer<const KEYS: usize> = [ActionCode; KEYS];

/// Set of active layers. The base layer is always consulted last whether or not bit 0 is set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerMask(u32);

impl Default for LayerMask {
    fn default() -> Self {
        Self::BASE
    }
}

impl LayerMask {
    pub const BASE: LayerMask = LayerMask(1);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, layer: u8) -> bool {
        layer < MAX_LAYERS as u8 && self.0 & (1 << layer) != 0
    }

    pub fn set(&mut self, layer: u8) {
        if let Some(bit) = bit(layer) {
            self.0 |= bit;
        }
    }

    pub fn clear(&mut self, layer: u8) {
        if let Some(bit) = bit(layer) {
            self.0 &= !bit;
        }
    }

    pub fn toggle(&mut self, layer: u8) {
        if let Some(bit) = bit(layer) {
            self.0 ^= bit;
        }
    }
}

fn bit(layer: u8) -> Option<u32> {
    1u32.checked_shl(layer as u32)
}

/// Layers of action codes indexed by position. Layer 0 is the base layer.
#[derive(Copy, Clone, Debug)]
pub struct Keymap<'k, const KEYS: usize> {
    layers: &'k [Layer<KEYS>],
}

impl<'k, const KEYS: usize> Keymap<'k, KEYS> {
    pub const fn new(layers: &'k [Layer<KEYS>]) -> Self {
        Self { layers }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn get(&self, layer: usize, position: u8) -> Option<ActionCode> {
        self.layers.get(layer)?.get(position as usize).copied()
    }

    /// The code for `position` from the highest active layer that is not transparent there.
    /// [ActionCode::NONE] when every active layer is transparent.
    pub fn resolve(&self, mask: LayerMask, position: u8) -> ActionCode {
        let pos = position as usize;
        if pos >= KEYS {
            return ActionCode::NONE;
        }
        let active = mask.bits() | LayerMask::BASE.bits();
        let top = self.layers.len().min(MAX_LAYERS);
        for (i, layer) in self.layers[..top].iter().enumerate().rev() {
            if active & (1 << i) == 0 {
                continue;
            }
            let code = layer[pos];
            if !code.is_transparent() {
                return code;
            }
        }
        ActionCode::NONE
    }
}

/// Keymaps selected by connection, falling back to `default`. Also holds the optional table
/// mapping electrical positions to keymap positions.
#[derive(Copy, Clone, Debug)]
pub struct Profiles<'k, const KEYS: usize> {
    default: Keymap<'k, KEYS>,
    usb: Option<Keymap<'k, KEYS>>,
    bluetooth: [Option<Keymap<'k, KEYS>>; BLUETOOTH_IDS as usize],
    coords: Option<&'k [u8; KEYS]>,
}

impl<'k, const KEYS: usize> Profiles<'k, KEYS> {
    pub const fn new(default: Keymap<'k, KEYS>) -> Self {
        Self {
            default,
            usb: None,
            bluetooth: [None; BLUETOOTH_IDS as usize],
            coords: None,
        }
    }

    pub fn with_usb(mut self, keymap: Keymap<'k, KEYS>) -> Self {
        self.usb = Some(keymap);
        self
    }

    /// Identities past the last bluetooth slot are clamped to 0.
    pub fn with_bluetooth(mut self, id: u8, keymap: Keymap<'k, KEYS>) -> Self {
        let id = if id < BLUETOOTH_IDS {
            id
        } else {
            crate::warn!("bluetooth profile {} out of range", id);
            0
        };
        self.bluetooth[id as usize] = Some(keymap);
        self
    }

    pub fn with_coords(mut self, coords: &'k [u8; KEYS]) -> Self {
        self.coords = Some(coords);
        self
    }

    pub fn for_connection(&self, connection: Connection) -> Keymap<'k, KEYS> {
        let keymap = match connection {
            Connection::Usb => self.usb,
            Connection::Bluetooth(id) => self.bluetooth.get(id as usize).copied().flatten(),
        };
        keymap.unwrap_or(self.default)
    }

    /// Keymap position for electrical `position`.
    pub fn keymap_position(&self, position: u8) -> u8 {
        match self.coords {
            Some(coords) => coords.get(position as usize).copied().unwrap_or(position),
            None => position,
        }
    }
}

#[cfg(test)]
#[path = "layers_test.rs"]
mod test;
