//! Rotary Encoder Driver
//!
//! Debounced, clamped counter fed from the falling edge of the encoder's
//! primary pin. The edge handler runs in interrupt context and the main
//! loop only reads the value, so all state lives in atomics.

use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

use crate::config;

/// Encoder rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise rotation (increment)
    Clockwise,
    /// Counter-clockwise rotation (decrement)
    CounterClockwise,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clockwise => defmt::write!(f, "CW"),
            Self::CounterClockwise => defmt::write!(f, "CCW"),
        }
    }
}

/// Which level of the complementary pin means "count down"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Complementary pin high decrements, low increments
    #[default]
    HighDecrements,
    /// Complementary pin high increments, low decrements
    HighIncrements,
}

impl Polarity {
    /// Direction for a complementary pin level sampled at the edge
    #[must_use]
    pub const fn direction(self, complementary_high: bool) -> Direction {
        match (self, complementary_high) {
            (Self::HighDecrements, true) | (Self::HighIncrements, false) => {
                Direction::CounterClockwise
            }
            (Self::HighDecrements, false) | (Self::HighIncrements, true) => Direction::Clockwise,
        }
    }
}

const fn clamp(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Edge-driven rotary counter with debounce and bounds
#[derive(Debug)]
pub struct RotaryEncoder {
    value: AtomicI32,
    last_edge_ms: AtomicU32,
    last_level: AtomicBool,
    min: i32,
    max: i32,
    step: i32,
    debounce_ms: u32,
    polarity: Polarity,
}

impl RotaryEncoder {
    /// Create an encoder; `start` is clamped to `[min, max]`
    #[must_use]
    pub const fn new(min: i32, max: i32, start: i32, step: i32) -> Self {
        Self {
            value: AtomicI32::new(clamp(start, min, max)),
            last_edge_ms: AtomicU32::new(0),
            last_level: AtomicBool::new(false),
            min,
            max,
            step,
            debounce_ms: config::ENCODER_DEBOUNCE_MS,
            polarity: Polarity::HighDecrements,
        }
    }

    /// Override the debounce window
    #[must_use]
    pub const fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Override the direction polarity
    #[must_use]
    pub const fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Falling edge on the primary pin
    ///
    /// Edges closer than the debounce window to the last accepted edge are
    /// dropped without touching any state. Returns the applied direction for
    /// an accepted edge.
    pub fn on_falling_edge(&self, now_ms: u32, complementary_high: bool) -> Option<Direction> {
        let last = self.last_edge_ms.load(Ordering::Acquire);
        if now_ms.wrapping_sub(last) < self.debounce_ms {
            return None;
        }
        self.last_edge_ms.store(now_ms, Ordering::Release);
        self.last_level.store(complementary_high, Ordering::Relaxed);

        let direction = self.polarity.direction(complementary_high);
        let delta = match direction {
            Direction::Clockwise => self.step,
            Direction::CounterClockwise => -self.step,
        };
        let (min, max) = (self.min, self.max);
        // The closure never returns None, so this cannot fail.
        let _ = self
            .value
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| {
                Some(clamp(v.saturating_add(delta), min, max))
            });
        Some(direction)
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> i32 {
        self.value.load(Ordering::Acquire)
    }

    /// Overwrite the value (clamped to the bounds)
    pub fn set_value(&self, value: i32) {
        self.value
            .store(clamp(value, self.min, self.max), Ordering::Release);
    }

    /// Timestamp of the last accepted edge
    #[must_use]
    pub fn last_edge_ms(&self) -> u32 {
        self.last_edge_ms.load(Ordering::Acquire)
    }

    /// Complementary pin level at the last accepted edge
    #[must_use]
    pub fn last_level(&self) -> bool {
        self.last_level.load(Ordering::Relaxed)
    }

    /// Lower bound
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }
}

impl Default for RotaryEncoder {
    fn default() -> Self {
        Self::new(
            config::ENCODER_MIN,
            config::ENCODER_MAX,
            config::ENCODER_START,
            config::ENCODER_STEP,
        )
    }
}
