//! Types Module Tests
//!
//! Tests for domain types (Frequency, Volume, SignalQuality, TunerState)
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test types_tests

use fm_rds_radio::types::{Frequency, SeekDirection, SignalQuality, TunerState, Volume};

// =============================================================================
// Frequency Tests
// =============================================================================

#[test]
fn test_frequency_from_mhz_in_band() {
    assert_eq!(Frequency::from_mhz(88.3).as_tenths(), 883);
    assert_eq!(Frequency::from_mhz(87.5).as_tenths(), 875);
    assert_eq!(Frequency::from_mhz(108.0).as_tenths(), 1080);
}

#[test]
fn test_frequency_from_mhz_clamps() {
    assert_eq!(Frequency::from_mhz(108.5), Frequency::MAX);
    assert_eq!(Frequency::from_mhz(80.0), Frequency::MIN);
    assert_eq!(Frequency::from_mhz(-5.0), Frequency::MIN);
}

#[test]
fn test_frequency_from_mhz_nan() {
    assert_eq!(Frequency::from_mhz(f64::NAN), Frequency::MIN);
}

#[test]
fn test_frequency_from_mhz_rounds() {
    assert_eq!(Frequency::from_mhz(99.94).as_tenths(), 999);
    assert_eq!(Frequency::from_mhz(99.96).as_tenths(), 1000);
}

#[test]
fn test_frequency_from_mhz_half_channel_to_even() {
    assert_eq!(Frequency::from_mhz(88.25).as_tenths(), 882);
    assert_eq!(Frequency::from_mhz(88.15).as_tenths(), 882);
    assert_eq!(Frequency::from_mhz(100.05).as_tenths(), 1000);
    assert_eq!(Frequency::from_mhz(100.15).as_tenths(), 1002);
}

#[test]
fn test_frequency_from_tenths_clamps() {
    assert_eq!(Frequency::from_tenths(0), Frequency::MIN);
    assert_eq!(Frequency::from_tenths(1200), Frequency::MAX);
    assert_eq!(Frequency::from_tenths(950).as_tenths(), 950);
}

#[test]
fn test_frequency_channel_mapping() {
    assert_eq!(Frequency::from_mhz(88.3).channel(), 8);
    assert_eq!(Frequency::MAX.channel(), 205);
    assert_eq!(Frequency::MIN.channel(), 0);
    assert_eq!(Frequency::from_channel(8).as_tenths(), 883);
}

#[test]
fn test_frequency_from_channel_not_clamped() {
    // Whatever the chip reports is taken as-is
    let f = Frequency::from_channel(0x1FF);
    assert_eq!(f.as_tenths(), 875 + 0x1FF);
}

#[test]
fn test_frequency_as_mhz() {
    let f = Frequency::from_tenths(1015);
    assert!((f.as_mhz() - 101.5).abs() < 0.001);
}

#[test]
fn test_frequency_display() {
    assert_eq!(format!("{}", Frequency::from_tenths(883)), "88.3 MHz");
    assert_eq!(format!("{}", Frequency::MAX), "108.0 MHz");
}

// =============================================================================
// Volume Tests
// =============================================================================

#[test]
fn test_volume_clamps() {
    assert_eq!(Volume::new(-3).level(), 0);
    assert_eq!(Volume::new(20).level(), 15);
    assert_eq!(Volume::new(7).level(), 7);
}

#[test]
fn test_volume_adjust() {
    let v = Volume::new(14);
    assert_eq!(v.adjust(5).level(), 15);
    assert_eq!(v.adjust(-20).level(), 0);
    assert_eq!(v.adjust(-1).level(), 13);
}

#[test]
fn test_volume_adjust_extreme_delta() {
    assert_eq!(Volume::new(15).adjust(i32::MAX).level(), 15);
    assert_eq!(Volume::new(0).adjust(i32::MIN).level(), 0);
}

// =============================================================================
// Misc Types
// =============================================================================

#[test]
fn test_seek_direction_default_up() {
    assert_eq!(SeekDirection::default(), SeekDirection::Up);
}

#[test]
fn test_signal_quality_default() {
    let q = SignalQuality::default();
    assert_eq!(q.rssi, 0);
    assert!(!q.stereo);
}

#[test]
fn test_tuner_state_default_unpowered() {
    let s = TunerState::default();
    assert!(!s.powered);
    assert!(!s.muted);
    assert_eq!(s.frequency, Frequency::MIN);
}
