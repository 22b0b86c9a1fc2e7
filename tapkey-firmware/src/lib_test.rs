extern crate std;

#[cfg(feature = "defmt")]
#[defmt::global_logger]
struct Logger;

#[cfg(feature = "defmt")]
unsafe impl defmt::Logger for Logger {
    fn acquire() {}

    unsafe fn release() {}

    unsafe fn write(_bytes: &[u8]) {}

    unsafe fn flush() {}
}

#[cfg(all(not(test), feature = "defmt"))]
#[defmt::panic_handler]
fn defmt_panic() -> ! {
    std::unimplemented!()
}

#[test]
fn keymaps_written_as_text_resolve() {
    use crate::layers::{Keymap, LayerMask};
    use tapkey_config::parse_action;

    let base = ["a", "MT(LCTRL, b)", "LT(1, SPACE)", "MUTE"].map(|s| parse_action(s).unwrap());
    let upper = ["TRNS", "TRNS", "TRNS", "BT(2)"].map(|s| parse_action(s).unwrap());
    let layers = [base, upper];
    let keymap = Keymap::new(&layers);

    assert_eq!(keymap.resolve(LayerMask::BASE, 1), base[1]);
    assert_eq!(
        keymap.resolve(LayerMask::from_bits(0b11), 3),
        crate::ActionCode::bluetooth(2)
    );
    assert_eq!(keymap.resolve(LayerMask::from_bits(0b11), 0), base[0]);
}
