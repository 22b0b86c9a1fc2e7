use tapkey_common::{
    action_code::MouseMove,
    keycodes::{A, ESCAPE, LEFT_SHIFT, RIGHT_ALT, SPACE, TAB},
};

use super::*;
use crate::parse_action;

#[test]
fn named_codes() {
    assert_eq!(describe(ActionCode::key(A)), "A");
    assert_eq!(describe(ActionCode::NONE), "NO");
    assert_eq!(describe(ActionCode::consumer(0xe9)), "audio_vol_up");
    assert_eq!(describe(ActionCode::mouse_move(MouseMove::Left)), "mouse_left");
}

#[test]
fn composite_codes() {
    assert_eq!(describe(ActionCode::key(A).shifted().ctrl()), "C(S(A))");
    assert_eq!(
        describe(ActionCode::mods_key(Mods::ALT.union(Mods::RIGHT), A)),
        "RA(A)"
    );
    assert_eq!(describe(ActionCode::key(0).shifted()), "S(NO)");
    assert_eq!(
        describe(ActionCode::mod_tap(LEFT_SHIFT, ESCAPE)),
        "MT(Leftshift, Escape)"
    );
    assert_eq!(
        describe(ActionCode::mods_tap(Mods::CTRL.union(Mods::GUI), TAB)),
        "MT(Leftcontrol|LeftGui, Tab)"
    );
    assert_eq!(
        describe(ActionCode::mod_tap(RIGHT_ALT, SPACE)),
        "MT(Rightalt, Spacebar)"
    );
    assert_eq!(describe(ActionCode::layer_tap(4, SPACE)), "LT(4, Spacebar)");
    assert_eq!(describe(ActionCode::layer_tap_toggle(2)), "TT(2)");
    assert_eq!(describe(ActionCode::layer_mods(1, Mods::SHIFT)), "LM(1, Leftshift)");
    assert_eq!(describe(ActionCode::consumer(0x3ff)), "CONSUMER(0x3ff)");
    assert_eq!(describe(ActionCode::mouse_button(3)), "BUTTONS(0x03)");
    assert_eq!(describe(ActionCode::user_macro(7)), "MACRO(7)");
    assert_eq!(describe(ActionCode::bluetooth(4)), "BT(4)");
}

#[test]
fn unnamed_codes_are_hex() {
    assert_eq!(describe(ActionCode(0x6123)), "0x6123");
    assert_eq!(describe(ActionCode(0xD0FF)), "0xD0FF");
    assert_eq!(describe(ActionCode(0x1004)), "0x1004");
    assert_eq!(describe(ActionCode::mods_tap(Mods::RIGHT, A)), "MT(0x10, A)");
}

#[test]
fn descriptions_parse_back() {
    for code in [
        0x0000, 0x0001, 0x0004, 0x0304, 0x1f2c, 0x1004, 0x0100, 0x00e8, 0x2104, 0x3629, 0x4081,
        0x44e9, 0x47ff, 0x5003, 0x5400, 0xa42b, 0xa3f0, 0xa1c3, 0xc123, 0xd002, 0xe005, 0xe103,
        0x7000, 0xf00f,
    ] {
        let code = ActionCode(code);
        let text = describe(code);
        assert_eq!(parse_action(&text).ok(), Some(code), "{text}");
    }
}
