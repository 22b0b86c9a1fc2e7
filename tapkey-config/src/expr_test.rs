use tapkey_common::{
    action_code::{BacklightOp, MouseMove},
    keycodes::{A, B, E, ESCAPE, LEFT_CTRL, SPACE, TAB},
    Action,
};

use super::*;

fn parse(src: &str) -> ActionCode {
    match parse_action(src) {
        Ok(code) => code,
        Err(err) => panic!("{src:?}: {err}"),
    }
}

fn err(src: &str) -> ConfigError {
    match parse_action(src) {
        Ok(code) => panic!("{src:?} parsed to {code:?}"),
        Err(err) => err,
    }
}

#[test]
fn names_and_raw_codes() {
    assert_eq!(parse("a"), ActionCode::key(A));
    assert_eq!(parse("  Spacebar "), ActionCode::key(SPACE));
    assert_eq!(parse("TRNS"), ActionCode::TRANSPARENT);
    assert_eq!(parse("no"), ActionCode::NONE);
    assert_eq!(parse("volu"), ActionCode::consumer(0xe9));
    assert_eq!(parse("wh_up"), ActionCode::mouse_move(MouseMove::WheelUp));
    assert_eq!(parse("rgb_hui"), ActionCode::backlight(BacklightOp::HueUp));
    assert_eq!(parse("0x1234"), ActionCode(0x1234));
    assert_eq!(parse("1"), ActionCode::key(0x1e));
    assert_eq!(parse("300"), ActionCode(300));
}

#[test]
fn modifier_wrappers_nest() {
    assert_eq!(parse("S(a)"), ActionCode::key(A).shifted());
    assert_eq!(parse("C(S(a))"), ActionCode::key(A).shifted().ctrl());
    assert_eq!(parse("c( s ( a ) )"), ActionCode::key(A).shifted().ctrl());
    assert_eq!(
        parse("RA(e)"),
        ActionCode::mods_key(Mods::ALT.union(Mods::RIGHT), E)
    );
    assert_eq!(parse("G(0x2c)"), ActionCode::key(SPACE).gui());

    let e = err("C(RS(a))");
    assert_eq!(e.message, "left and right hand modifiers cannot be mixed");
    assert_eq!(e.span, Some(0..1));
}

#[test]
fn dual_role_keys() {
    assert_eq!(parse("MT(LCTRL, b)"), ActionCode::mod_tap(LEFT_CTRL, B));
    assert_eq!(
        parse("MT(lctrl|lshift, esc)"),
        ActionCode::mods_tap(Mods::CTRL.union(Mods::SHIFT), ESCAPE)
    );
    assert_eq!(parse("MT(0x12, tab)"), ActionCode::mods_tap(Mods::from_bits(0x12), TAB));
    assert_eq!(parse("LT(2, tab)"), ActionCode::layer_tap(2, TAB));
    assert_eq!(parse("TT(3)"), ActionCode::layer_tap_toggle(3));
    assert_eq!(parse("LM(1, LGUI)"), ActionCode::layer_mods(1, Mods::GUI));

    assert_eq!(
        parse("lt(31, space)").decode(),
        Action::LayerTap {
            layer: 31,
            tap: SPACE
        }
    );
}

#[test]
fn dual_role_errors() {
    assert_eq!(err("MT(a, b)").message, "\"a\" is not a modifier");
    assert_eq!(
        err("MT(lctrl|rshift, b)").message,
        "left and right hand modifiers cannot be mixed"
    );
    assert_eq!(err("MT(lctrl, S(b))").message, "a tap key cannot carry modifiers");
    assert_eq!(err("MT(0x20, b)").message, "modifier bits 0x20 out of range");

    let e = err("LT(32, a)");
    assert_eq!(e.message, "layer 32 out of range 0..=31");
    assert_eq!(e.span, Some(3..5));

    assert_eq!(
        err("LT(1, 0xc5)").message,
        "key 0xc5 cannot be a layer-tap key"
    );
    assert_eq!(
        err("LT(1, 0xf0)").message,
        "key 0xf0 cannot be a layer-tap key"
    );
}

#[test]
fn usages_and_commands() {
    assert_eq!(parse("CONSUMER(0xe9)"), ActionCode::consumer(0xe9));
    assert_eq!(parse("SYSTEM(0x82)"), ActionCode::system(0x82));
    assert_eq!(parse("BUTTONS(0x03)"), ActionCode::mouse_button(3));
    assert_eq!(parse("MACRO(12)"), ActionCode::user_macro(12));
    assert_eq!(parse("M(0xfff)"), ActionCode::user_macro(0xfff));
    assert_eq!(parse("BT(9)"), ActionCode::bluetooth(9));

    assert_eq!(err("BT(10)").message, "bluetooth id 10 out of range 0..=9");
    assert_eq!(err("CONSUMER(0x400)").message, "usage 1024 out of range 0..=1023");
    assert_eq!(err("MACRO(4096)").message, "macro 4096 out of range 0..=4095");
}

#[test]
fn syntax_errors() {
    let e = err("nosuch");
    assert_eq!(e.message, "unknown key name \"nosuch\"");
    assert_eq!(e.span, Some(0..6));

    assert_eq!(err("FOO(1)").message, "unknown function \"FOO\"");
    assert_eq!(err("").message, "expected an action");
    assert_eq!(err("MT(lctrl b)").message, "expected ,");
    assert_eq!(err("TT(3").message, "expected )");

    let e = err("a b");
    assert_eq!(e.message, "unexpected input");
    assert_eq!(e.span, Some(2..3));

    assert_eq!(err("0x10000").message, "code larger than 0xffff");
}
