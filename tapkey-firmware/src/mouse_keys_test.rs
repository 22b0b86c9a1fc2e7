use super::*;

const CONFIG: MouseConfig = MouseConfig::normal();

#[test]
fn buttons_accumulate() {
    let mut mouse = MouseKeys::default();
    assert_eq!(mouse.press_buttons(1), 1);
    assert_eq!(mouse.press_buttons(4), 5);
    assert_eq!(mouse.release_buttons(1), 4);
    assert_eq!(mouse.buttons(), 4);
}

#[test]
fn idle_does_not_move() {
    let mut mouse = MouseKeys::default();
    assert!(!mouse.is_moving());
    assert_eq!(mouse.tick(&CONFIG, Timestamp(100)), None);
}

#[test]
fn movement_follows_direction() {
    let mut mouse = MouseKeys::default();
    mouse.start(MouseMove::UpLeft, Timestamp(0));
    assert!(mouse.is_moving());

    let (x, y, wheel) = mouse.tick(&CONFIG, Timestamp(100)).unwrap();
    assert!(x < 0);
    assert_eq!(x, y);
    assert_eq!(wheel, 0);

    mouse.start(MouseMove::WheelUp, Timestamp(100));
    let (x, y, wheel) = mouse.tick(&CONFIG, Timestamp(600)).unwrap();
    assert_eq!((x, y), (0, 0));
    assert!(wheel > 0);
}

#[test]
fn speed_ramps_with_hold_time() {
    let mut early = MouseKeys::default();
    early.start(MouseMove::Right, Timestamp(0));
    let (slow, _, _) = early.tick(&CONFIG, Timestamp(20)).unwrap_or_default();

    let mut late = MouseKeys::default();
    late.start(MouseMove::Right, Timestamp(0));
    late.tick(&CONFIG, Timestamp(980));
    let (fast, _, _) = late.tick(&CONFIG, Timestamp(1000)).unwrap();

    assert!(fast > slow + 10, "{fast} {slow}");
}

#[test]
fn stop_only_matching_direction() {
    let mut mouse = MouseKeys::default();
    mouse.start(MouseMove::Down, Timestamp(0));
    assert!(!mouse.stop(MouseMove::Up));
    assert!(mouse.is_moving());
    assert!(mouse.stop(MouseMove::Down));
    assert!(!mouse.is_moving());
}
