//! The 16 bit action code: every key binding a keymap can hold.
//!
//! ```text
//! 000r | mods | keycode    Key; 0x0000 no action, 0x0001 transparent
//! 001r | mods | keycode    Mod-tap: mods when held, keycode when tapped
//! 0100 | 0p | usage(10)    Usage: p=0 system control, p=1 consumer
//! 0101 | move | buttons    Mouse: move id 1..10 or, when move is 0, a button mask
//! 101l | llll | keycode    Layer-tap: 5 bit layer; keycode 0xf0 taps toggle;
//!                          0b110m_mmmm in the low byte is layer + mods
//! 1100 | index(12)         Macro
//! 1101 | op                Backlight operation
//! 1110 | command           System command; 0x1nn selects bluetooth identity nn
//! ```
//!
//! Kinds 0110, 0111, 1000, 1001 and 1111 are reserved and decode to [Action::NoOp].

use crate::keycodes::{self, key_range, Mods};

pub mod kind {
    pub const MODS: u16 = 0b0000;
    pub const MODS_RIGHT: u16 = 0b0001;
    pub const MODS_TAP: u16 = 0b0010;
    pub const MODS_TAP_RIGHT: u16 = 0b0011;
    pub const USAGE: u16 = 0b0100;
    pub const MOUSE: u16 = 0b0101;
    pub const LAYER_TAP: u16 = 0b1010;
    pub const LAYER_TAP_EXT: u16 = 0b1011;
    pub const MACRO: u16 = 0b1100;
    pub const BACKLIGHT: u16 = 0b1101;
    pub const COMMAND: u16 = 0b1110;
}

/// Low byte of a layer-tap code that toggles the layer when tapped.
pub const OP_TAP_TOGGLE: u8 = 0xf0;

const USAGE_CONSUMER: u16 = 0x400;
const LAYER_MODS_MASK: u8 = 0xe0;
const LAYER_MODS_TAG: u8 = 0xc0;
const BLUETOOTH_BASE: u16 = 0x100;
pub const BLUETOOTH_IDS: u8 = 10;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionCode(pub u16);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Usage {
    System(u16),
    Consumer(u16),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseMove {
    Up = 1,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    WheelUp,
    WheelDown,
}
impl MouseMove {
    pub const fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            1 => Self::Up,
            2 => Self::Down,
            3 => Self::Left,
            4 => Self::Right,
            5 => Self::UpLeft,
            6 => Self::UpRight,
            7 => Self::DownLeft,
            8 => Self::DownRight,
            9 => Self::WheelUp,
            10 => Self::WheelDown,
            _ => return None,
        })
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Unit direction as (x, y, wheel).
    pub const fn vector(self) -> (i8, i8, i8) {
        match self {
            Self::Up => (0, -1, 0),
            Self::Down => (0, 1, 0),
            Self::Left => (-1, 0, 0),
            Self::Right => (1, 0, 0),
            Self::UpLeft => (-1, -1, 0),
            Self::UpRight => (1, -1, 0),
            Self::DownLeft => (-1, 1, 0),
            Self::DownRight => (1, 1, 0),
            Self::WheelUp => (0, 0, 1),
            Self::WheelDown => (0, 0, -1),
        }
    }

    pub const fn is_wheel(self) -> bool {
        matches!(self, Self::WheelUp | Self::WheelDown)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightOp {
    Toggle = 0,
    NextMode,
    HueUp,
    HueDown,
    SatUp,
    SatDown,
    ValUp,
    ValDown,
}
impl BacklightOp {
    pub const fn from_op(op: u16) -> Option<Self> {
        Some(match op {
            0 => Self::Toggle,
            1 => Self::NextMode,
            2 => Self::HueUp,
            3 => Self::HueDown,
            4 => Self::SatUp,
            5 => Self::SatDown,
            6 => Self::ValUp,
            7 => Self::ValDown,
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Bootloader,
    Suspend,
    Shutdown,
    UsbToggle,
    BluetoothToggle,
    Heatmap,
    Bluetooth(u8),
}
impl Command {
    pub const fn from_op(op: u16) -> Option<Self> {
        Some(match op {
            0 => Self::Bootloader,
            1 => Self::Suspend,
            2 => Self::Shutdown,
            3 => Self::UsbToggle,
            4 => Self::BluetoothToggle,
            5 => Self::Heatmap,
            n if n >= BLUETOOTH_BASE && n < BLUETOOTH_BASE + BLUETOOTH_IDS as u16 => {
                Self::Bluetooth((n - BLUETOOTH_BASE) as u8)
            }
            _ => return None,
        })
    }

    pub const fn op(self) -> u16 {
        match self {
            Self::Bootloader => 0,
            Self::Suspend => 1,
            Self::Shutdown => 2,
            Self::UsbToggle => 3,
            Self::BluetoothToggle => 4,
            Self::Heatmap => 5,
            Self::Bluetooth(n) => BLUETOOTH_BASE + n as u16,
        }
    }
}

/// A decoded [ActionCode].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    NoOp,
    Transparent,
    Key { mods: Mods, keycode: u8 },
    ModTap { mods: Mods, tap: u8 },
    Usage(Usage),
    MouseButton(u8),
    MouseMove(MouseMove),
    LayerTap { layer: u8, tap: u8 },
    LayerTapToggle { layer: u8 },
    LayerMods { layer: u8, mods: Mods },
    Macro(u16),
    Backlight(BacklightOp),
    Command(Command),
}

impl Action {
    pub const fn encode(self) -> ActionCode {
        match self {
            Action::NoOp => ActionCode::NONE,
            Action::Transparent => ActionCode::TRANSPARENT,
            Action::Key { mods, keycode } => ActionCode::mods_key(mods, keycode),
            Action::ModTap { mods, tap } => ActionCode::mods_tap(mods, tap),
            Action::Usage(Usage::System(id)) => ActionCode::system(id),
            Action::Usage(Usage::Consumer(id)) => ActionCode::consumer(id),
            Action::MouseButton(buttons) => ActionCode::mouse_button(buttons),
            Action::MouseMove(dir) => ActionCode::mouse_move(dir),
            Action::LayerTap { layer, tap } => ActionCode::layer_tap(layer, tap),
            Action::LayerTapToggle { layer } => ActionCode::layer_tap_toggle(layer),
            Action::LayerMods { layer, mods } => ActionCode::layer_mods(layer, mods),
            Action::Macro(index) => ActionCode::user_macro(index),
            Action::Backlight(op) => ActionCode::backlight(op),
            Action::Command(cmd) => ActionCode::command(cmd),
        }
    }
}

impl From<u16> for ActionCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<ActionCode> for u16 {
    fn from(value: ActionCode) -> Self {
        value.0
    }
}

impl ActionCode {
    pub const NONE: ActionCode = ActionCode(0);
    pub const TRANSPARENT: ActionCode = ActionCode(1);

    pub const fn kind(self) -> u16 {
        self.0 >> 12
    }

    pub const fn is_transparent(self) -> bool {
        self.0 == Self::TRANSPARENT.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    pub const fn key(keycode: u8) -> Self {
        Self(keycode as u16)
    }

    pub const fn mods_key(mods: Mods, keycode: u8) -> Self {
        Self(((mods.bits() as u16) << 8) | keycode as u16)
    }

    pub const fn mods_tap(mods: Mods, tap: u8) -> Self {
        Self((kind::MODS_TAP << 12) | ((mods.bits() as u16) << 8) | tap as u16)
    }

    /// Hold `modifier_key` (0xe0..=0xe7), tap `tap`. Any other hold key yields [Self::NONE].
    pub const fn mod_tap(modifier_key: u8, tap: u8) -> Self {
        match Mods::from_modifier_key(modifier_key) {
            Some(mods) => Self::mods_tap(mods, tap),
            None => Self::NONE,
        }
    }

    pub const fn layer_tap(layer: u8, tap: u8) -> Self {
        Self((kind::LAYER_TAP << 12) | (((layer & 0x1f) as u16) << 8) | tap as u16)
    }

    pub const fn layer_tap_toggle(layer: u8) -> Self {
        Self::layer_tap(layer, OP_TAP_TOGGLE)
    }

    pub const fn layer_mods(layer: u8, mods: Mods) -> Self {
        Self::layer_tap(layer, LAYER_MODS_TAG | mods.bits())
    }

    const fn with_mods(self, mods: Mods) -> Self {
        Self(self.0 | ((mods.bits() as u16) << 8))
    }

    pub const fn shifted(self) -> Self {
        self.with_mods(Mods::SHIFT)
    }

    pub const fn ctrl(self) -> Self {
        self.with_mods(Mods::CTRL)
    }

    pub const fn alt(self) -> Self {
        self.with_mods(Mods::ALT)
    }

    pub const fn gui(self) -> Self {
        self.with_mods(Mods::GUI)
    }

    pub const fn system(usage: u16) -> Self {
        Self((kind::USAGE << 12) | (usage & key_range::USAGE_MAX))
    }

    pub const fn consumer(usage: u16) -> Self {
        Self((kind::USAGE << 12) | USAGE_CONSUMER | (usage & key_range::USAGE_MAX))
    }

    pub const fn mouse_button(buttons: u8) -> Self {
        Self((kind::MOUSE << 12) | buttons as u16)
    }

    pub const fn mouse_move(dir: MouseMove) -> Self {
        Self((kind::MOUSE << 12) | ((dir.id() as u16) << 8))
    }

    pub const fn user_macro(index: u16) -> Self {
        Self((kind::MACRO << 12) | (index & 0xfff))
    }

    pub const fn backlight(op: BacklightOp) -> Self {
        Self((kind::BACKLIGHT << 12) | op as u16)
    }

    pub const fn command(cmd: Command) -> Self {
        Self((kind::COMMAND << 12) | cmd.op())
    }

    pub const fn bluetooth(id: u8) -> Self {
        Self::command(Command::Bluetooth(id))
    }

    /// The key (shifted when needed) that types ASCII `c`.
    pub const fn from_ascii(c: u8) -> Option<Self> {
        match keycodes::from_ascii(c) {
            Some((true, kc)) => Some(Self::key(kc).shifted()),
            Some((false, kc)) => Some(Self::key(kc)),
            None => None,
        }
    }

    /// Total over all 16 bit values; anything unrecognised is [Action::NoOp].
    pub const fn decode(self) -> Action {
        let code = self.0;
        let low = (code & 0xff) as u8;
        let mods = Mods::from_bits((code >> 8) as u8);
        match self.kind() {
            kind::MODS | kind::MODS_RIGHT => match code {
                0 => Action::NoOp,
                1 => Action::Transparent,
                _ => Action::Key { mods, keycode: low },
            },
            kind::MODS_TAP | kind::MODS_TAP_RIGHT => Action::ModTap { mods, tap: low },
            kind::USAGE => {
                let id = code & key_range::USAGE_MAX;
                if code & USAGE_CONSUMER != 0 {
                    Action::Usage(Usage::Consumer(id))
                } else {
                    Action::Usage(Usage::System(id))
                }
            }
            kind::MOUSE => {
                let id = ((code >> 8) & 0xf) as u8;
                if id == 0 {
                    Action::MouseButton(low)
                } else {
                    match MouseMove::from_id(id) {
                        Some(dir) => Action::MouseMove(dir),
                        None => Action::NoOp,
                    }
                }
            }
            kind::LAYER_TAP | kind::LAYER_TAP_EXT => {
                let layer = ((code >> 8) & 0x1f) as u8;
                if low & LAYER_MODS_MASK == LAYER_MODS_TAG {
                    Action::LayerMods {
                        layer,
                        mods: Mods::from_bits(low),
                    }
                } else if low == OP_TAP_TOGGLE {
                    Action::LayerTapToggle { layer }
                } else {
                    Action::LayerTap { layer, tap: low }
                }
            }
            kind::MACRO => Action::Macro(code & 0xfff),
            kind::BACKLIGHT => match BacklightOp::from_op(code & 0xfff) {
                Some(op) => Action::Backlight(op),
                None => Action::NoOp,
            },
            kind::COMMAND => match Command::from_op(code & 0xfff) {
                Some(cmd) => Action::Command(cmd),
                None => Action::NoOp,
            },
            _ => Action::NoOp,
        }
    }

    pub const fn layer_of(self) -> Option<u8> {
        match self.decode() {
            Action::LayerTap { layer, .. }
            | Action::LayerTapToggle { layer }
            | Action::LayerMods { layer, .. } => Some(layer),
            _ => None,
        }
    }

    pub const fn tap_keycode_of(self) -> Option<u8> {
        match self.decode() {
            Action::ModTap { tap, .. } | Action::LayerTap { tap, .. } => Some(tap),
            Action::LayerTapToggle { .. } => Some(OP_TAP_TOGGLE),
            _ => None,
        }
    }

    pub const fn mods_of(self) -> Option<Mods> {
        match self.decode() {
            Action::Key { mods, .. }
            | Action::ModTap { mods, .. }
            | Action::LayerMods { mods, .. } => Some(mods),
            _ => None,
        }
    }

    /// True for codes whose press has to wait for the tap/hold decision.
    pub const fn is_dual_role(self) -> bool {
        matches!(
            self.decode(),
            Action::ModTap { .. } | Action::LayerTap { .. } | Action::LayerTapToggle { .. }
        )
    }
}

#[cfg(test)]
#[path = "action_code_test.rs"]
mod test;
