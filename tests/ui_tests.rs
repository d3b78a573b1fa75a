//! User Interface Tests
//!
//! Tests for the mode button, scroll ticker, RDS caching and layout helpers.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test ui_tests

use fm_rds_radio::drivers::rds::SCANNING_PLACEHOLDER;
use fm_rds_radio::radio::state::RadioState;
use fm_rds_radio::types::{Frequency, SignalQuality, Volume};
use fm_rds_radio::ui::{
    centered_x, signal_bars, text_width, volume_bar_width, ModeButton, ScrollState, UiMode,
    UiState,
};

// =============================================================================
// Mode
// =============================================================================

#[test]
fn mode_toggle() {
    assert_eq!(UiMode::default(), UiMode::Frequency);
    assert_eq!(UiMode::Frequency.toggle(), UiMode::Volume);
    assert_eq!(UiMode::Volume.toggle(), UiMode::Frequency);
    assert_eq!(UiMode::Frequency.label(), "FREQ");
    assert_eq!(UiMode::Volume.label(), "VOL");
}

#[test]
fn button_accepts_after_cooldown() {
    let mut button = ModeButton::default();
    assert!(button.poll(1_000, true));
    assert!(!button.poll(1_100, true));
    assert!(!button.poll(1_300, true));
    assert!(button.poll(1_301, true));
}

#[test]
fn button_released_never_fires() {
    let mut button = ModeButton::default();
    assert!(!button.poll(5_000, false));
    assert!(!button.poll(10_000, false));
}

#[test]
fn button_held_repeats() {
    let mut button = ModeButton::new(300);
    let fired = (0..20)
        .map(|i| 1_000 + i * 100)
        .filter(|&t| button.poll(t, true))
        .count();
    // 1000, 1400, 1800, 2200, 2600
    assert_eq!(fired, 5);
}

// =============================================================================
// Layout Helpers
// =============================================================================

#[test]
fn text_width_uses_glyph_width() {
    assert_eq!(text_width(""), 0);
    assert_eq!(text_width("ABC"), 18);
}

#[test]
fn centered_x_never_negative() {
    assert_eq!(centered_x("88.3 MHz"), (128 - 48) / 2);
    assert_eq!(centered_x(&"X".repeat(40)), 0);
}

#[test]
fn signal_bar_thresholds() {
    assert_eq!(signal_bars(0), 0);
    assert_eq!(signal_bars(10), 0);
    assert_eq!(signal_bars(11), 1);
    assert_eq!(signal_bars(35), 3);
    assert_eq!(signal_bars(50), 4);
    assert_eq!(signal_bars(51), 5);
    assert_eq!(signal_bars(255), 5);
}

#[test]
fn volume_bar_scales() {
    assert_eq!(volume_bar_width(Volume::new(0)), 0);
    assert_eq!(volume_bar_width(Volume::new(15)), 124);
    assert_eq!(volume_bar_width(Volume::new(8)), 66);
}

// =============================================================================
// Scroll
// =============================================================================

#[test]
fn scroll_starts_off_screen() {
    assert_eq!(ScrollState::new().offset(), 128);
}

#[test]
fn scroll_waits_for_interval() {
    let mut scroll = ScrollState::new();
    assert!(!scroll.advance(60, 300));
    assert_eq!(scroll.offset(), 128);
    assert!(scroll.advance(61, 300));
    assert_eq!(scroll.offset(), 126);
}

#[test]
fn long_text_scrolls_and_wraps() {
    let mut scroll = ScrollState::new();
    let width = 200;
    let mut now = 0;
    let mut wrapped = false;
    let mut previous = scroll.offset();
    for _ in 0..400 {
        now += 61;
        scroll.advance(now, width);
        if scroll.offset() > previous {
            wrapped = true;
            assert_eq!(scroll.offset(), 128);
            assert!(previous - 2 < -width);
            break;
        }
        previous = scroll.offset();
    }
    assert!(wrapped);
}

#[test]
fn short_text_is_centred() {
    let mut scroll = ScrollState::new();
    assert!(scroll.advance(100, 60));
    assert_eq!(scroll.offset(), 34);
    // Already centred: no change reported
    assert!(!scroll.advance(200, 60));
}

#[test]
fn scroll_reset() {
    let mut scroll = ScrollState::new();
    scroll.advance(100, 500);
    scroll.reset();
    assert_eq!(scroll.offset(), 128);
}

// =============================================================================
// UI State
// =============================================================================

#[test]
fn ui_starts_dirty() {
    let ui = UiState::new();
    assert!(ui.needs_update());
    assert_eq!(ui.display_text(), SCANNING_PLACEHOLDER);
}

#[test]
fn station_name_change_invalidates() {
    let mut ui = UiState::new();
    ui.mark_updated();
    ui.update_rds("RADIO 1 ", "");
    assert!(ui.needs_update());
    assert_eq!(ui.station_name(), "RADIO 1 ");

    ui.mark_updated();
    ui.update_rds("RADIO 1 ", "");
    assert!(!ui.needs_update());
}

#[test]
fn empty_radio_text_keeps_cached() {
    let mut ui = UiState::new();
    ui.update_rds("", "NOW PLAYING");
    ui.update_rds("", "");
    assert_eq!(ui.radio_text(), "NOW PLAYING");
    assert_eq!(ui.display_text(), "NOW PLAYING");
}

#[test]
fn retune_clears_cache() {
    let mut ui = UiState::new();
    ui.update_rds("NAME", "TEXT");
    ui.advance_scroll(1_000);
    ui.mark_updated();
    ui.on_retune();
    assert!(ui.needs_update());
    assert_eq!(ui.station_name(), "");
    assert_eq!(ui.radio_text(), "");
    assert_eq!(ui.scroll().offset(), 128);
}

#[test]
fn scroll_step_invalidates() {
    let mut ui = UiState::new();
    ui.update_rds("", &"LONG RADIO TEXT ".repeat(3));
    ui.mark_updated();
    ui.advance_scroll(1_000);
    assert!(ui.needs_update());
    assert_eq!(ui.scroll().offset(), 126);
}

#[test]
fn render_state_collects_frame() {
    let mut ui = UiState::new();
    ui.update_rds("JAZZ FM ", "");
    let radio = RadioState::new(Frequency::from_tenths(1015), Volume::new(6), 0);
    let frame = ui.render_state(
        &radio,
        SignalQuality {
            rssi: 33,
            stereo: true,
        },
    );
    assert_eq!(frame.frequency.as_tenths(), 1015);
    assert_eq!(frame.volume.level(), 6);
    assert_eq!(frame.rssi, 33);
    assert!(frame.stereo);
    assert_eq!(frame.mode, UiMode::Frequency);
    assert_eq!(frame.station_name.as_str(), "JAZZ FM ");
    assert_eq!(frame.scroll_text.as_str(), SCANNING_PLACEHOLDER);
    assert_eq!(frame.scroll_offset, 128);
}
