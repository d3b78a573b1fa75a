//! Shared types used across the FM radio firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at construction time and provide type safety throughout the codebase.

use core::cmp::Ordering;
use core::fmt;

/// FM broadcast frequency in 100 kHz units
///
/// Values built from user input are clamped to the 87.5-108.0 MHz band.
/// Values read back from the tuner are taken verbatim, since the chip's
/// resolved channel is the authoritative frequency.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u16);

impl Frequency {
    /// Bottom of the band (87.5 MHz) in 100 kHz units
    pub const MIN_TENTHS: u16 = 875;

    /// Top of the band (108.0 MHz) in 100 kHz units
    pub const MAX_TENTHS: u16 = 1080;

    /// Lowest tunable frequency
    pub const MIN: Self = Self(Self::MIN_TENTHS);

    /// Highest tunable frequency
    pub const MAX: Self = Self(Self::MAX_TENTHS);

    /// Create a frequency from MHz, clamped to the band and rounded to 100 kHz
    ///
    /// Half-channel inputs round to the even channel, so 88.25 MHz gives
    /// 88.2 MHz and 100.05 MHz gives 100.0 MHz.
    #[must_use]
    pub fn from_mhz(mhz: f64) -> Self {
        if mhz.is_nan() {
            return Self::MIN;
        }
        let scaled = mhz.clamp(87.5, 108.0) * 10.0;
        // In band the value is positive, so truncation is floor
        let floor = scaled as i32;
        let tenths = match (scaled - f64::from(floor)).partial_cmp(&0.5) {
            Some(Ordering::Greater) => floor + 1,
            Some(Ordering::Equal) if floor % 2 != 0 => floor + 1,
            _ => floor,
        };
        Self::from_tenths(tenths)
    }

    /// Create a frequency from 100 kHz units, clamped to the band
    #[must_use]
    pub fn from_tenths(tenths: i32) -> Self {
        let clamped = tenths.clamp(i32::from(Self::MIN_TENTHS), i32::from(Self::MAX_TENTHS));
        Self(clamped as u16)
    }

    /// Create a frequency from a tuner channel index (`875 + channel`)
    #[must_use]
    pub const fn from_channel(channel: u16) -> Self {
        Self(Self::MIN_TENTHS + channel)
    }

    /// Tuner channel index for this frequency
    #[must_use]
    pub const fn channel(self) -> u16 {
        self.0.saturating_sub(Self::MIN_TENTHS)
    }

    /// Frequency in 100 kHz units
    #[must_use]
    pub const fn as_tenths(self) -> u16 {
        self.0
    }

    /// Frequency in MHz as floating point
    #[must_use]
    pub fn as_mhz(self) -> f32 {
        f32::from(self.0) / 10.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({}.{} MHz)", self.0 / 10, self.0 % 10)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} MHz", self.0 / 10, self.0 % 10)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}.{} MHz", self.0 / 10, self.0 % 10);
    }
}

/// Audio volume level (0-15)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Volume(u8);

impl Volume {
    /// Maximum volume level
    pub const MAX: u8 = 15;

    /// Create a volume level, clamped to 0-15
    #[must_use]
    pub fn new(level: i32) -> Self {
        Self(level.clamp(0, i32::from(Self::MAX)) as u8)
    }

    /// Get the volume level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Adjust by a signed delta (clamped)
    #[must_use]
    pub fn adjust(self, delta: i32) -> Self {
        Self::new(i32::from(self.0).saturating_add(delta))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Volume {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "vol {}", self.0);
    }
}

/// Seek scan direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekDirection {
    /// Scan towards higher frequencies
    #[default]
    Up,
    /// Scan towards lower frequencies
    Down,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SeekDirection {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Up => defmt::write!(f, "Up"),
            Self::Down => defmt::write!(f, "Down"),
        }
    }
}

/// Received signal quality snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SignalQuality {
    /// Received signal strength (0-255)
    pub rssi: u8,
    /// Stereo pilot detected
    pub stereo: bool,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SignalQuality {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "RSSI {} {}", self.rssi, if self.stereo { "ST" } else { "MO" });
    }
}

/// Snapshot of the tuner's power/audio configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TunerState {
    /// Authoritative frequency last read back from the chip
    pub frequency: Frequency,
    /// Volume written to the chip
    pub volume: Volume,
    /// Audio muted
    pub muted: bool,
    /// Chip powered
    pub powered: bool,
}

impl Default for TunerState {
    fn default() -> Self {
        Self {
            frequency: Frequency::MIN,
            volume: Volume::default(),
            muted: false,
            powered: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mhz_rounds_to_nearest_channel() {
        assert_eq!(Frequency::from_mhz(88.3).as_tenths(), 883);
        assert_eq!(Frequency::from_mhz(99.96).as_tenths(), 1000);
    }

    #[test]
    fn from_mhz_half_channel_rounds_to_even() {
        assert_eq!(Frequency::from_mhz(88.25).as_tenths(), 882);
        assert_eq!(Frequency::from_mhz(88.35).as_tenths(), 884);
        assert_eq!(Frequency::from_mhz(100.05).as_tenths(), 1000);
    }

    #[test]
    fn channel_readback_is_not_clamped() {
        let f = Frequency::from_channel(300);
        assert_eq!(f.as_tenths(), 1175);
        assert_eq!(f.channel(), 300);
    }
}
