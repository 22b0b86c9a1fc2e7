use tapkey_common::keycodes::{A, B, C, D, E, LEFT_SHIFT, Q};

use super::*;

const T: ActionCode = ActionCode::TRANSPARENT;
const N: ActionCode = ActionCode::NONE;

const fn k(kc: u8) -> ActionCode {
    ActionCode::key(kc)
}

const LAYERS: [Layer<3>; 3] = [
    [k(A), T, k(C)],
    [T, k(B), T],
    [k(D), T, T],
];

const KEYMAP: Keymap<3> = Keymap::new(&LAYERS);

#[test]
fn base_layer_only() {
    assert_eq!(KEYMAP.resolve(LayerMask::BASE, 0), k(A));
    assert_eq!(KEYMAP.resolve(LayerMask::BASE, 1), N);
    assert_eq!(KEYMAP.resolve(LayerMask::BASE, 2), k(C));
}

#[test]
fn higher_layers_shadow_lower() {
    let mask = LayerMask::from_bits(0b101);
    assert_eq!(KEYMAP.resolve(mask, 0), k(D));
    assert_eq!(KEYMAP.resolve(mask, 2), k(C));

    let mask = LayerMask::from_bits(0b111);
    assert_eq!(KEYMAP.resolve(mask, 1), k(B));
}

#[test]
fn base_is_consulted_without_bit_zero() {
    let mask = LayerMask::from_bits(0b100);
    assert_eq!(KEYMAP.resolve(mask, 0), k(D));
    assert_eq!(KEYMAP.resolve(mask, 2), k(C));
    assert_eq!(KEYMAP.resolve(LayerMask::from_bits(0), 0), k(A));
}

#[test]
fn layer_two_wins_regardless_of_base() {
    static ONLY: [Layer<1>; 3] = [[k(Q)], [k(E)], [k(B).shifted()]];
    let keymap = Keymap::new(&ONLY);
    assert_eq!(keymap.resolve(LayerMask::from_bits(0b101), 0), k(B).shifted());
}

#[test]
fn out_of_range_is_none() {
    assert_eq!(KEYMAP.resolve(LayerMask::BASE, 3), N);
    assert_eq!(KEYMAP.resolve(LayerMask::from_bits(u32::MAX), 1), k(B));
    assert_eq!(KEYMAP.get(5, 0), None);
    assert_eq!(KEYMAP.get(1, 1), Some(k(B)));
    assert_eq!(KEYMAP.layer_count(), 3);
}

#[test]
fn layer_mask_bits() {
    let mut mask = LayerMask::default();
    assert_eq!(mask, LayerMask::BASE);

    mask.set(3);
    assert!(mask.contains(3));
    assert_eq!(mask.bits(), 0b1001);
    mask.toggle(3);
    mask.toggle(4);
    assert_eq!(mask.bits(), 0b1_0001);
    mask.clear(4);
    assert_eq!(mask, LayerMask::BASE);

    mask.set(31);
    assert!(mask.contains(31));
    mask.set(40);
    assert!(!mask.contains(40));
    assert_eq!(mask.bits(), 0x8000_0001);
}

#[test]
fn profiles_select_by_connection() {
    static USB: [Layer<3>; 1] = [[k(Q), k(Q), k(Q)]];
    static BT2: [Layer<3>; 1] = [[k(E), k(E), ActionCode::mod_tap(LEFT_SHIFT, A)]];

    let profiles = Profiles::new(KEYMAP)
        .with_usb(Keymap::new(&USB))
        .with_bluetooth(2, Keymap::new(&BT2));

    let usb = profiles.for_connection(Connection::Usb);
    assert_eq!(usb.resolve(LayerMask::BASE, 0), k(Q));

    let bt2 = profiles.for_connection(Connection::Bluetooth(2));
    assert_eq!(bt2.resolve(LayerMask::BASE, 0), k(E));

    let bt1 = profiles.for_connection(Connection::Bluetooth(1));
    assert_eq!(bt1.resolve(LayerMask::BASE, 0), k(A));

    let bad = profiles.for_connection(Connection::Bluetooth(42));
    assert_eq!(bad.resolve(LayerMask::BASE, 0), k(A));
}

#[test]
fn bluetooth_profile_out_of_range_is_clamped() {
    static BT: [Layer<3>; 1] = [[k(E), k(E), k(E)]];
    let profiles = Profiles::new(KEYMAP).with_bluetooth(12, Keymap::new(&BT));

    let bt0 = profiles.for_connection(Connection::Bluetooth(0));
    assert_eq!(bt0.resolve(LayerMask::BASE, 0), k(E));
}

#[test]
fn coords_remap_positions() {
    static COORDS: [u8; 3] = [2, 0, 1];
    let profiles = Profiles::new(KEYMAP).with_coords(&COORDS);
    assert_eq!(profiles.keymap_position(0), 2);
    assert_eq!(profiles.keymap_position(2), 1);
    assert_eq!(profiles.keymap_position(7), 7);

    let plain = Profiles::new(KEYMAP);
    assert_eq!(plain.keymap_position(0), 0);
}
