//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the FM receiver hardware.
//! All pin mappings, bus parameters, timings and UI parameters are centralized here.

use crate::types::{Frequency, Volume};

/// `Si4703` 7-bit I2C address
pub const SI4703_I2C_ADDR: u8 = 0x10;

/// I2C bus frequency for the `Si4703`
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// SPI bus frequency for the SSD1306 OLED
pub const DISPLAY_SPI_FREQUENCY_HZ: u32 = 10_000_000;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 64;

/// Width of one glyph of the display font (6x10) in pixels
pub const GLYPH_WIDTH: i32 = 6;

/// Default startup frequency in 100 kHz units (88.3 MHz)
pub const DEFAULT_FREQUENCY_TENTHS: i32 = 883;

/// Default startup volume
pub const DEFAULT_VOLUME: i32 = 8;

/// Main loop period in milliseconds
pub const LOOP_PERIOD_MS: u64 = 10;

/// Rotary encoder lower bound
pub const ENCODER_MIN: i32 = -1000;

/// Rotary encoder upper bound
pub const ENCODER_MAX: i32 = 1000;

/// Rotary encoder start value
pub const ENCODER_START: i32 = 0;

/// Rotary encoder increment per accepted detent
pub const ENCODER_STEP: i32 = 1;

/// Minimum spacing between accepted encoder edges in milliseconds
pub const ENCODER_DEBOUNCE_MS: u32 = 50;

/// Cooldown between accepted mode button presses in milliseconds
pub const BUTTON_COOLDOWN_MS: u32 = 300;

/// Settle time between tune start and tune bit release in milliseconds
pub const TUNE_SETTLE_MS: u32 = 100;

/// Delay between seek status polls in milliseconds
pub const SEEK_POLL_MS: u32 = 50;

/// Maximum time a seek may take before it is abandoned in milliseconds
pub const SEEK_TIMEOUT_MS: u32 = 5_000;

/// Crystal oscillator stabilisation time in milliseconds
pub const OSCILLATOR_SETTLE_MS: u32 = 500;

/// Power-up time after enabling the chip in milliseconds
pub const POWERUP_SETTLE_MS: u32 = 110;

/// Settle time after band/RDS configuration in milliseconds
pub const CONFIG_SETTLE_MS: u32 = 100;

/// Reset pulse phase duration in milliseconds
pub const RESET_PULSE_MS: u32 = 100;

/// Interval between scroll steps in milliseconds
pub const SCROLL_SPEED_MS: u32 = 60;

/// Scroll step in pixels
pub const SCROLL_STEP_PX: i32 = 2;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// I2C1 SCL (`Si4703` SCLK)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (`Si4703` SDIO)
    pub const I2C1_SDA: &str = "PB9";

    /// `Si4703` reset
    pub const RADIO_RST: &str = "PB7";

    /// Encoder CLK (primary, interrupt capable)
    pub const ENCODER_CLK: &str = "PA0";

    /// Encoder DT (complementary)
    pub const ENCODER_DT: &str = "PA1";

    /// Encoder push button (active low)
    pub const ENCODER_SW: &str = "PA2";

    /// OLED SPI clock
    pub const OLED_SCK: &str = "PA5";

    /// OLED SPI data out
    pub const OLED_MOSI: &str = "PA7";

    /// OLED SPI data in (unused by the panel)
    pub const OLED_MISO: &str = "PA6";

    /// OLED data/command select
    pub const OLED_DC: &str = "PB0";

    /// OLED chip select
    pub const OLED_CS: &str = "PB1";

    /// OLED reset
    pub const OLED_RES: &str = "PB2";
}

/// Build the default startup frequency
#[must_use]
pub fn default_frequency() -> Frequency {
    Frequency::from_tenths(DEFAULT_FREQUENCY_TENTHS)
}

/// Build the default startup volume
#[must_use]
pub fn default_volume() -> Volume {
    Volume::new(DEFAULT_VOLUME)
}
