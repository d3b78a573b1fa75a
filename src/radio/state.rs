//! Radio State Machine
//!
//! Application state owned by the main loop: encoder mode, requested and
//! confirmed frequency, volume and the last encoder reading. Transitions
//! are pure and return a new state plus the tuner command to issue, if any.

use crate::config;
use crate::types::{Frequency, Volume};
use crate::ui::UiMode;

/// Application state (immutable)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioState {
    /// Encoder target
    mode: UiMode,
    /// Requested frequency (what the encoder is steering)
    target: Frequency,
    /// Frequency confirmed by the chip
    frequency: Frequency,
    /// Volume
    volume: Volume,
    /// Encoder value seen on the previous tick
    last_encoder: i32,
}

impl RadioState {
    /// Create a state tuned (nominally) to `frequency`
    #[must_use]
    pub const fn new(frequency: Frequency, volume: Volume, encoder: i32) -> Self {
        Self {
            mode: UiMode::Frequency,
            target: frequency,
            frequency,
            volume,
            last_encoder: encoder,
        }
    }

    /// Encoder mode
    #[must_use]
    pub const fn mode(&self) -> UiMode {
        self.mode
    }

    /// Requested frequency
    #[must_use]
    pub const fn target(&self) -> Frequency {
        self.target
    }

    /// Frequency last confirmed by the chip
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Volume
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Encoder value seen on the previous tick
    #[must_use]
    pub const fn last_encoder(&self) -> i32 {
        self.last_encoder
    }

    /// Switch encoder mode (returns new state)
    #[must_use]
    pub const fn toggle_mode(self) -> Self {
        Self {
            mode: self.mode.toggle(),
            ..self
        }
    }

    /// Record the chip's resolved frequency (returns new state)
    ///
    /// The target follows, so the next encoder step starts from where the
    /// chip actually is.
    #[must_use]
    pub const fn with_frequency(self, frequency: Frequency) -> Self {
        Self {
            target: frequency,
            frequency,
            ..self
        }
    }

    /// Set volume (returns new state)
    #[must_use]
    pub const fn with_volume(self, volume: Volume) -> Self {
        Self { volume, ..self }
    }
}

impl Default for RadioState {
    fn default() -> Self {
        Self::new(
            config::default_frequency(),
            config::default_volume(),
            config::ENCODER_START,
        )
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Radio({}, {}, {})", self.frequency, self.volume, self.mode);
    }
}

/// Radio event that triggers state transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioEvent {
    /// Encoder read this tick (absolute value)
    Encoder(i32),
    /// Mode button accepted
    ToggleMode,
    /// Chip reported its resolved frequency
    Tuned(Frequency),
}

/// Command for the tuner produced by a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunerCommand {
    /// Retune
    SetFrequency(Frequency),
    /// Change volume
    SetVolume(Volume),
}

#[cfg(feature = "embedded")]
impl defmt::Format for TunerCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SetFrequency(freq) => defmt::write!(f, "SetFreq({})", freq),
            Self::SetVolume(vol) => defmt::write!(f, "SetVol({})", vol),
        }
    }
}

/// Apply an event to the radio state, returning new state and any command
#[must_use]
pub fn apply_event(state: RadioState, event: RadioEvent) -> (RadioState, Option<TunerCommand>) {
    match event {
        RadioEvent::Encoder(value) => {
            let delta = value.wrapping_sub(state.last_encoder);
            if delta == 0 {
                return (state, None);
            }
            let state = RadioState {
                last_encoder: value,
                ..state
            };
            match state.mode {
                UiMode::Frequency => {
                    let target = Frequency::from_tenths(
                        i32::from(state.target.as_tenths()).saturating_add(delta),
                    );
                    (
                        RadioState { target, ..state },
                        Some(TunerCommand::SetFrequency(target)),
                    )
                }
                UiMode::Volume => {
                    let volume = state.volume.adjust(delta);
                    (
                        state.with_volume(volume),
                        Some(TunerCommand::SetVolume(volume)),
                    )
                }
            }
        }
        RadioEvent::ToggleMode => (state.toggle_mode(), None),
        RadioEvent::Tuned(frequency) => (state.with_frequency(frequency), None),
    }
}
