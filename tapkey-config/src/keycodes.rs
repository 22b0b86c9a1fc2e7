//! Mnemonic names for every action that has one: HID keyboard keys, consumer and system usages,
//! mouse keys, backlight operations and commands. Lookup ignores case, `_` and `-`.

use std::collections::HashMap;

use lazy_static::lazy_static;
use tapkey_common::{
    action_code::{BacklightOp, Command, MouseMove},
    keycodes::key_range,
    ActionCode,
};

const DASH_USCORE: [char; 2] = ['_', '-'];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Basic,
    Modifier,
    Consumer,
    System,
    Mouse,
    Backlight,
    Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mnemonic {
    pub name: &'static str,
    pub code: ActionCode,
    pub kind: Kind,
}

/// HID keyboard page names from 0x04 on; `/` separates aliases.
const HID_KEYS: &str = r#"
A B C D E F G H I J K L M N O P Q R S T U V W X Y Z
1 2 3 4 5 6 7 8 9 0
Return/Enter/ent
Escape/esc
backspace/bksp
Tab
Spacebar/space/spc
Dash/-/minus
Equals/=/equal
LeftBrace/[/leftsquarebracket
RightBrace/]/rightsquarebracket
Backslash/\
NonUsHash
Semicolon/;
LeftApos/'/apostrophe
GraveAccent/`/grave
Comma/,
Period/./dot
Forwardslash/slash
CapsLock
F1 F2 F3 F4 F5 F6 F7 F8 F9 F10 F11 F12
Printscreen/print
ScrollLock
Pause
Insert
Home Pageup/pgup Delete/del End Pagedown/pgdn
Right Left Down Up
KpNumLock
KpForwardslash KpStar KpDash KpPlus KpEnter
Kp1 Kp2 Kp3 Kp4 Kp5 Kp6 Kp7 Kp8 Kp9 Kp0
KpPeriod
NonUsBackslash
Application/app
Power
KpEquals
F13 F14 F15 F16 F17 F18 F19 F20 F21 F22 F23 F24
Execute
Help
Menu/mnu
Select
Stop
Again Undo
Cut Copy Paste
Find
Mute
VolumeUp VolumeDown
LockingCapsLock LockingNumLock LockingScrollLock
KpComma KpEqualSign
International1 International2 International3 International4
International5 International6 International7 International8 International9
Lang1 Lang2 Lang3 Lang4 Lang5 Lang6 Lang7 Lang8 Lang9
AlternateErase
SysreqAttention
Cancel
Clear
Prior
KeyboardReturn
Separator
Out
Oper
ClearAgain
CrselProps
Exsel
A5 A6 A7 A8 A9 AA AB AC AD AE AF
KpDouble0 KpTriple0
ThousandsSeparator DecimalSeparator CurrencyUnit CurrencySubUnit
KpLeftBracket KpRightBracket KpLeftBrace KpRightBrace
KpTab KpBackspace
KpA KpB KpC KpD KpE KpF
KpXor
KpCaret
KpPercentage
KpLess KpGreater
KpAmpersand KpDoubleAmpersand KpBar KpDoubleBar
KpColon KpHash KpSpace KpAt KpBang
KpMemoryStore KpMemoryRecall KpMemoryClear
KpMemoryAdd KpMemorySubtract KpMemoryMultiply KpMemoryDivide KpPlusMinus
KpClear KpClearEntry
KpBinary KpOctal KpDecimal KpHexadecimal
DE DF
Leftcontrol/lctrl/lc/lctl
Leftshift/lshift/ls
Leftalt/lalt/la
LeftGui/leftmeta/lgui/lg
Rightcontrol/rctrl/rc/rctl
Rightshift/rshift/rs
Rightalt/altgr/ralt/ra
RightGui/rightmeta/rgui/rg
"#;

const CONSUMER: [(&str, u16); 25] = [
    ("brightness_up/bri_up", 0x06f),
    ("brightness_down/bri_down", 0x070),
    ("record", 0x0b2),
    ("fast_forward", 0x0b3),
    ("rewind", 0x0b4),
    ("next_track/next", 0x0b5),
    ("prev_track/prev", 0x0b6),
    ("media_stop", 0x0b7),
    ("eject", 0x0b8),
    ("play_pause/play", 0x0cd),
    ("audio_mute/amute", 0x0e2),
    ("audio_vol_up/volu", 0x0e9),
    ("audio_vol_down/vold", 0x0ea),
    ("email/mail", 0x18a),
    ("calculator/calc", 0x192),
    ("browser/www", 0x196),
    ("screen_lock/lock", 0x19e),
    ("control_panel", 0x19f),
    ("assistant", 0x1cb),
    ("search", 0x221),
    ("home_page", 0x223),
    ("back", 0x224),
    ("forward", 0x225),
    ("refresh", 0x227),
    ("bookmarks", 0x22a),
];

const SYSTEM: [(&str, u16); 3] = [
    ("power_down/power_off", 0x081),
    ("sleep", 0x082),
    ("wake_up/wake", 0x083),
];

const MOUSE_BUTTONS: [(&str, u8); 5] = [
    ("mouse_btn1/btn1", 0x01),
    ("mouse_btn2/btn2", 0x02),
    ("mouse_btn3/btn3", 0x04),
    ("mouse_btn4/btn4", 0x08),
    ("mouse_btn5/btn5", 0x10),
];

const MOUSE_MOVES: [(&str, MouseMove); 10] = [
    ("mouse_up/ms_up", MouseMove::Up),
    ("mouse_down/ms_down", MouseMove::Down),
    ("mouse_left/ms_left", MouseMove::Left),
    ("mouse_right/ms_right", MouseMove::Right),
    ("mouse_up_left/ms_ul", MouseMove::UpLeft),
    ("mouse_up_right/ms_ur", MouseMove::UpRight),
    ("mouse_down_left/ms_dl", MouseMove::DownLeft),
    ("mouse_down_right/ms_dr", MouseMove::DownRight),
    ("wheel_up/wh_up", MouseMove::WheelUp),
    ("wheel_down/wh_down", MouseMove::WheelDown),
];

const BACKLIGHT: [(&str, BacklightOp); 8] = [
    ("bl_toggle/rgb_tog", BacklightOp::Toggle),
    ("bl_next/rgb_mod", BacklightOp::NextMode),
    ("hue_up/rgb_hui", BacklightOp::HueUp),
    ("hue_down/rgb_hud", BacklightOp::HueDown),
    ("sat_up/rgb_sai", BacklightOp::SatUp),
    ("sat_down/rgb_sad", BacklightOp::SatDown),
    ("val_up/rgb_vai", BacklightOp::ValUp),
    ("val_down/rgb_vad", BacklightOp::ValDown),
];

const COMMANDS: [(&str, Command); 6] = [
    ("bootloader/boot", Command::Bootloader),
    ("suspend", Command::Suspend),
    ("shutdown", Command::Shutdown),
    ("usb_toggle/usb_tog", Command::UsbToggle),
    ("bt_toggle/bt_tog", Command::BluetoothToggle),
    ("heatmap", Command::Heatmap),
];

#[derive(Default)]
struct Table {
    list: Vec<Mnemonic>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<u16, usize>,
}

impl Table {
    fn add(&mut self, names: &'static str, code: ActionCode, kind: Kind) {
        for name in names.split('/') {
            self.insert(name, code, kind);
        }
    }

    fn insert(&mut self, name: &'static str, code: ActionCode, kind: Kind) {
        let key = normalize(name);
        if self.by_name.contains_key(&key) {
            panic!("mnemonic already added {name}");
        }
        let i = self.list.len();
        self.by_code.entry(code.0).or_insert(i);
        self.by_name.insert(key, i);
        self.list.push(Mnemonic { name, code, kind });
    }
}

lazy_static! {
    static ref TABLE: Table = {
        let mut t = Table::default();
        t.add("NO/noop/none", ActionCode::NONE, Kind::Basic);
        t.add("TRNS/transparent", ActionCode::TRANSPARENT, Kind::Basic);
        for (i, names) in HID_KEYS.split_whitespace().enumerate() {
            let kc = i as u8 + key_range::BASIC_MIN;
            let kind = if key_range::is_modifier(kc) {
                Kind::Modifier
            } else {
                Kind::Basic
            };
            t.add(names, ActionCode::key(kc), kind);
        }
        t.insert("/", ActionCode::key(0x38), Kind::Basic);
        for (names, usage) in CONSUMER {
            t.add(names, ActionCode::consumer(usage), Kind::Consumer);
        }
        for (names, usage) in SYSTEM {
            t.add(names, ActionCode::system(usage), Kind::System);
        }
        for (names, mask) in MOUSE_BUTTONS {
            t.add(names, ActionCode::mouse_button(mask), Kind::Mouse);
        }
        for (names, dir) in MOUSE_MOVES {
            t.add(names, ActionCode::mouse_move(dir), Kind::Mouse);
        }
        for (names, op) in BACKLIGHT {
            t.add(names, ActionCode::backlight(op), Kind::Backlight);
        }
        for (names, cmd) in COMMANDS {
            t.add(names, ActionCode::command(cmd), Kind::Command);
        }
        t
    };
}

fn normalize(name: &str) -> String {
    if name.len() > 1 {
        name.replace(DASH_USCORE, "").to_lowercase()
    } else {
        name.to_lowercase()
    }
}

/// Every mnemonic, aliases included, in table order.
pub fn mnemonics() -> impl Iterator<Item = &'static Mnemonic> {
    TABLE.list.iter()
}

pub fn lookup(name: &str) -> Option<&'static Mnemonic> {
    let name = if name.len() > 1 && name.starts_with('\\') {
        &name[1..]
    } else {
        name
    };
    TABLE.by_name.get(&normalize(name)).map(|&i| &TABLE.list[i])
}

/// The first name registered for `code`.
pub fn name_of(code: ActionCode) -> Option<&'static str> {
    TABLE.by_code.get(&code.0).map(|&i| TABLE.list[i].name)
}

/// HID keycode for a keyboard or modifier key name.
pub fn keycode(name: &str) -> Option<u8> {
    lookup(name)
        .filter(|m| matches!(m.kind, Kind::Basic | Kind::Modifier))
        .map(|m| m.code.0 as u8)
}

#[cfg(test)]
#[path = "keycodes_test.rs"]
mod test;
