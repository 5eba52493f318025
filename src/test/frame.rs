use crate::sim::{Frame, TickInterval};

#[test]
fn frame_arithmetic_saturates() {
    assert_eq!(Frame(5).after(3), Frame(8));
    assert_eq!(Frame(u64::MAX).after(1), Frame(u64::MAX));
    assert_eq!(Frame(5).frames_until(Frame(9)), 4);
    assert_eq!(Frame(9).frames_until(Frame(5)), 0);
    assert_eq!(Frame::ZERO.next(), Frame(1));
}

#[test]
fn tick_interval_conversions() {
    let iv = TickInterval::from_millis(50);
    assert_eq!(iv.as_millis(), 50);
    assert_eq!(iv.frames_in_millis(125.0), 2.5);
    assert_eq!(iv.frames_in_secs(2.0), 40.0);
    assert_eq!(iv.frames_covering(1), 1);
    assert_eq!(iv.frames_covering(50), 1);
    assert_eq!(iv.frames_covering(51), 2);
    assert_eq!(iv.frames_covering(0), 1);
    assert_eq!(TickInterval::from_millis(0).as_millis(), 1);
    assert_eq!(TickInterval::default().as_millis(), TickInterval::DEFAULT_MS);
}
