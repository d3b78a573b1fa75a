//! User Interface
//!
//! Mode button handling, RDS text caching, the scroll ticker and the
//! render-state value handed to the display.

use heapless::String;

use crate::config::{DISPLAY_WIDTH, GLYPH_WIDTH, SCROLL_SPEED_MS, SCROLL_STEP_PX};
use crate::drivers::rds::{RADIO_TEXT_LEN, SCANNING_PLACEHOLDER};
use crate::radio::state::RadioState;
use crate::types::{Frequency, SignalQuality, Volume};

/// What the rotary encoder adjusts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Encoder tunes the frequency
    #[default]
    Frequency,
    /// Encoder adjusts the volume
    Volume,
}

impl UiMode {
    /// The other mode
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Frequency => Self::Volume,
            Self::Volume => Self::Frequency,
        }
    }

    /// Short label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Frequency => "FREQ",
            Self::Volume => "VOL",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for UiMode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.label());
    }
}

/// Active-low mode button with a cooldown between accepted presses
#[derive(Clone, Copy, Debug)]
pub struct ModeButton {
    cooldown_ms: u32,
    last_accepted_ms: u32,
}

impl ModeButton {
    /// Create a button with the given cooldown
    #[must_use]
    pub const fn new(cooldown_ms: u32) -> Self {
        Self {
            cooldown_ms,
            last_accepted_ms: 0,
        }
    }

    /// Sample the button; returns true when a press is accepted
    ///
    /// The button is level-sensitive: holding it down toggles again once
    /// the cooldown has passed.
    pub fn poll(&mut self, now_ms: u32, pressed: bool) -> bool {
        if pressed && now_ms.wrapping_sub(self.last_accepted_ms) > self.cooldown_ms {
            self.last_accepted_ms = now_ms;
            true
        } else {
            false
        }
    }
}

impl Default for ModeButton {
    fn default() -> Self {
        Self::new(crate::config::BUTTON_COOLDOWN_MS)
    }
}

/// Pixel width of `text` in the display font
#[must_use]
pub fn text_width(text: &str) -> i32 {
    text.len() as i32 * GLYPH_WIDTH
}

/// X position that centres `text` on the display (never negative)
#[must_use]
pub fn centered_x(text: &str) -> i32 {
    ((DISPLAY_WIDTH as i32 - text_width(text)) / 2).max(0)
}

/// Number of lit signal bars (0-5) for an RSSI reading
#[must_use]
pub fn signal_bars(rssi: u8) -> u8 {
    [10, 20, 30, 40, 50]
        .iter()
        .filter(|&&threshold| rssi > threshold)
        .count() as u8
}

/// Filled width of the volume bar in pixels
#[must_use]
pub fn volume_bar_width(volume: Volume) -> u32 {
    u32::from(volume.level()) * 124 / u32::from(Volume::MAX)
}

/// Horizontal ticker for the radio text line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollState {
    offset: i32,
    last_step_ms: u32,
}

impl ScrollState {
    /// Start off the right edge of the display
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset: DISPLAY_WIDTH as i32,
            last_step_ms: 0,
        }
    }

    /// Current x offset
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    /// Restart from the right edge
    pub fn reset(&mut self) {
        self.offset = DISPLAY_WIDTH as i32;
    }

    /// Advance the ticker; returns true when the offset changed
    ///
    /// Text wider than the display moves left and wraps once fully gone;
    /// shorter text is centred.
    pub fn advance(&mut self, now_ms: u32, width: i32) -> bool {
        if now_ms.wrapping_sub(self.last_step_ms) <= SCROLL_SPEED_MS {
            return false;
        }
        self.last_step_ms = now_ms;

        let display = DISPLAY_WIDTH as i32;
        if width > display {
            self.offset -= SCROLL_STEP_PX;
            if self.offset < -width {
                self.offset = display;
            }
            true
        } else {
            let target = (display - width) / 2;
            let changed = self.offset != target;
            self.offset = target;
            changed
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the display needs to draw one frame
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Authoritative tuned frequency
    pub frequency: Frequency,
    /// Volume level
    pub volume: Volume,
    /// Received signal strength
    pub rssi: u8,
    /// Stereo pilot present
    pub stereo: bool,
    /// Encoder mode
    pub mode: UiMode,
    /// Station name as received (may be padded or a placeholder)
    pub station_name: String<16>,
    /// Radio text line
    pub scroll_text: String<RADIO_TEXT_LEN>,
    /// X offset of the radio text line
    pub scroll_offset: i32,
}

/// Display-side state: cached RDS strings, ticker and redraw flag
#[derive(Clone, Debug)]
pub struct UiState {
    station_name: String<16>,
    radio_text: String<RADIO_TEXT_LEN>,
    scroll: ScrollState,
    needs_update: bool,
}

impl UiState {
    /// Create new UI state
    #[must_use]
    pub fn new() -> Self {
        Self {
            station_name: String::new(),
            radio_text: String::new(),
            scroll: ScrollState::new(),
            needs_update: true,
        }
    }

    /// Take the latest decoder strings
    ///
    /// The station name is copied whenever it differs and forces a redraw.
    /// Radio text is only taken when non-empty, so a blank decoder keeps
    /// the last text until a retune clears it.
    pub fn update_rds(&mut self, station_name: &str, radio_text: &str) {
        if self.station_name.as_str() != station_name {
            copy_into(&mut self.station_name, station_name);
            self.needs_update = true;
        }
        if !radio_text.is_empty() && self.radio_text.as_str() != radio_text {
            copy_into(&mut self.radio_text, radio_text);
        }
    }

    /// Forget cached RDS strings after a frequency change
    pub fn on_retune(&mut self) {
        self.station_name.clear();
        self.radio_text.clear();
        self.scroll.reset();
        self.needs_update = true;
    }

    /// Text for the ticker line
    #[must_use]
    pub fn display_text(&self) -> &str {
        if self.radio_text.is_empty() {
            SCANNING_PLACEHOLDER
        } else {
            &self.radio_text
        }
    }

    /// Cached station name
    #[must_use]
    pub fn station_name(&self) -> &str {
        &self.station_name
    }

    /// Cached radio text
    #[must_use]
    pub fn radio_text(&self) -> &str {
        &self.radio_text
    }

    /// Ticker position
    #[must_use]
    pub const fn scroll(&self) -> ScrollState {
        self.scroll
    }

    /// Step the ticker
    pub fn advance_scroll(&mut self, now_ms: u32) {
        let width = text_width(self.display_text());
        if self.scroll.advance(now_ms, width) {
            self.needs_update = true;
        }
    }

    /// Check if display needs update
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Mark as updated
    pub fn mark_updated(&mut self) {
        self.needs_update = false;
    }

    /// Force update
    pub fn invalidate(&mut self) {
        self.needs_update = true;
    }

    /// Assemble the frame for the display
    #[must_use]
    pub fn render_state(&self, radio: &RadioState, signal: SignalQuality) -> RenderState {
        let mut scroll_text = String::new();
        copy_into(&mut scroll_text, self.display_text());
        RenderState {
            frequency: radio.frequency(),
            volume: radio.volume(),
            rssi: signal.rssi,
            stereo: signal.stereo,
            mode: radio.mode(),
            station_name: self.station_name.clone(),
            scroll_text,
            scroll_offset: self.scroll.offset(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

fn copy_into<const N: usize>(out: &mut String<N>, text: &str) {
    out.clear();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
}
