//! Radio Controller
//!
//! Imperative shell around the tuner. Encoder and button samples go through
//! [`apply_event`]; the resulting commands are executed against the chip and
//! a frame is produced whenever something visible changed.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::state::{apply_event, RadioEvent, RadioState, TunerCommand};
use crate::drivers::si4703::{SeekAbort, Si4703, TunerError};
use crate::types::{Frequency, SeekDirection, Volume};
use crate::ui::{ModeButton, RenderState, UiState};

/// Main-loop owner of the tuner and application state
pub struct RadioController<I2C, D> {
    tuner: Si4703<I2C, D>,
    state: RadioState,
    ui: UiState,
    button: ModeButton,
}

impl<I2C: I2c, D: DelayNs> RadioController<I2C, D> {
    /// Wrap an (unpowered) tuner
    #[must_use]
    pub fn new(tuner: Si4703<I2C, D>, encoder_start: i32) -> Self {
        let tuner_state = tuner.state();
        Self {
            tuner,
            state: RadioState::new(tuner_state.frequency, tuner_state.volume, encoder_start),
            ui: UiState::new(),
            button: ModeButton::default(),
        }
    }

    /// Override the mode button cooldown
    #[must_use]
    pub fn with_button(mut self, button: ModeButton) -> Self {
        self.button = button;
        self
    }

    /// Power up, apply the startup volume and frequency, and read back
    /// where the chip actually landed
    pub async fn start(&mut self, frequency: Frequency, volume: Volume) -> Result<(), TunerError> {
        self.tuner.init().await?;
        self.tuner.set_volume(volume).await?;
        self.tuner.set_frequency(frequency).await?;
        let tuned = self.tuner.frequency().await;

        self.state = self.state.with_volume(volume);
        self.state = apply_event(self.state, RadioEvent::Tuned(tuned)).0;
        self.ui.on_retune();

        #[cfg(feature = "embedded")]
        defmt::info!("radio started at {}", tuned);
        Ok(())
    }

    /// One pass of the main loop
    ///
    /// Returns a frame to draw when the display is stale.
    pub async fn tick(
        &mut self,
        now_ms: u32,
        encoder_value: i32,
        button_pressed: bool,
    ) -> Option<RenderState> {
        self.tuner.process_rds().await;

        if self.button.poll(now_ms, button_pressed) {
            self.state = apply_event(self.state, RadioEvent::ToggleMode).0;
            self.ui.invalidate();

            #[cfg(feature = "embedded")]
            defmt::debug!("mode {}", self.state.mode());
        }

        let (state, command) = apply_event(self.state, RadioEvent::Encoder(encoder_value));
        self.state = state;
        if let Some(command) = command {
            if let Err(_err) = self.execute(command).await {
                #[cfg(feature = "embedded")]
                defmt::warn!("{} failed: {}", command, _err);
            }
        }

        self.ui
            .update_rds(self.tuner.station_name(), self.tuner.radio_text());
        self.ui.advance_scroll(now_ms);

        if !self.ui.needs_update() {
            return None;
        }
        let signal = self.tuner.signal().await;
        self.ui.mark_updated();
        Some(self.ui.render_state(&self.state, signal))
    }

    async fn execute(&mut self, command: TunerCommand) -> Result<(), TunerError> {
        match command {
            TunerCommand::SetFrequency(target) => {
                self.tuner.set_frequency(target).await?;
                let tuned = self.tuner.frequency().await;
                self.state = apply_event(self.state, RadioEvent::Tuned(tuned)).0;
                self.ui.on_retune();
            }
            TunerCommand::SetVolume(volume) => {
                self.tuner.set_volume(volume).await?;
                self.ui.invalidate();
            }
        }
        Ok(())
    }

    /// Scan for the next station and adopt the frequency it stopped on
    pub async fn seek(
        &mut self,
        direction: SeekDirection,
        abort: &SeekAbort,
    ) -> Result<Frequency, TunerError> {
        let result = self.tuner.seek(direction, abort).await;
        let tuned = match result {
            Ok(freq) => freq,
            Err(_) => self.tuner.frequency().await,
        };
        self.state = apply_event(self.state, RadioEvent::Tuned(tuned)).0;
        self.ui.on_retune();
        result
    }

    /// Mute and power the tuner down
    pub async fn shutdown(&mut self) -> Result<(), TunerError> {
        self.tuner.mute(true).await?;
        self.tuner.shutdown().await
    }

    /// Application state
    #[must_use]
    pub const fn state(&self) -> RadioState {
        self.state
    }

    /// UI state
    #[must_use]
    pub const fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Tuner driver
    #[must_use]
    pub const fn tuner(&self) -> &Si4703<I2C, D> {
        &self.tuner
    }

    /// Tuner driver (mutable)
    pub fn tuner_mut(&mut self) -> &mut Si4703<I2C, D> {
        &mut self.tuner
    }

    /// Release the tuner
    pub fn release(self) -> Si4703<I2C, D> {
        self.tuner
    }
}
