use tapkey_common::{
    action_code::{Command, Usage},
    Action, ActionCode, Mods,
};

use crate::keycodes;

const WRAPPERS: [(Mods, &str); 4] = [
    (Mods::CTRL, "C"),
    (Mods::SHIFT, "S"),
    (Mods::ALT, "A"),
    (Mods::GUI, "G"),
];

/// The expression [crate::parse_action] reads back as `code`.
pub fn describe(code: ActionCode) -> String {
    if let Some(name) = keycodes::name_of(code) {
        return name.into();
    }
    match code.decode() {
        Action::Key { mods, keycode } => {
            let mut ans = key_name(keycode);
            for (bit, w) in WRAPPERS.iter().rev() {
                if mods.contains(*bit) {
                    let r = if mods.is_right() { "R" } else { "" };
                    ans = format!("{r}{w}({ans})");
                }
            }
            if mods.is_empty() && mods.is_right() {
                hex(code)
            } else {
                ans
            }
        }
        Action::ModTap { mods, tap } => format!("MT({}, {})", mods_name(mods), key_name(tap)),
        Action::LayerTap { layer, tap } => format!("LT({layer}, {})", key_name(tap)),
        Action::LayerTapToggle { layer } => format!("TT({layer})"),
        Action::LayerMods { layer, mods } => format!("LM({layer}, {})", mods_name(mods)),
        Action::Usage(Usage::Consumer(id)) => format!("CONSUMER(0x{id:03x})"),
        Action::Usage(Usage::System(id)) => format!("SYSTEM(0x{id:03x})"),
        Action::MouseButton(buttons) => format!("BUTTONS(0x{buttons:02x})"),
        Action::Macro(index) => format!("MACRO({index})"),
        Action::Command(Command::Bluetooth(id)) => format!("BT({id})"),
        _ => hex(code),
    }
}

fn hex(code: ActionCode) -> String {
    format!("0x{:04X}", code.0)
}

fn key_name(kc: u8) -> String {
    match keycodes::name_of(ActionCode::key(kc)) {
        Some(name) => name.into(),
        None => format!("0x{kc:02x}"),
    }
}

/// Modifier keys joined with `|`, or the raw bits when no key is selected.
fn mods_name(mods: Mods) -> String {
    let keys = mods.keycodes();
    if keys.is_empty() {
        return format!("0x{:02x}", mods.bits());
    }
    keys.iter()
        .map(|&kc| key_name(kc))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
#[path = "describe_test.rs"]
mod test;
