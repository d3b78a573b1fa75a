//! `Si4703` FM Tuner Driver
//!
//! Issues tune, seek, volume, mute and power commands by editing the
//! register shadow and writing the control block back. Frequency is always
//! read back from the chip's resolved channel register after a command;
//! the requested value is never assumed.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use super::rds::{RdsDecoder, RdsGroup, RdsReset, RdsUpdate};
use super::registers::RegisterStore;
use crate::config;
use crate::types::{Frequency, SeekDirection, SignalQuality, TunerState, Volume};

/// `Si4703` logical register numbers
#[allow(missing_docs)]
pub mod reg {
    pub const DEVICEID: usize = 0x00;
    pub const CHIPID: usize = 0x01;
    pub const POWERCFG: usize = 0x02;
    pub const CHANNEL: usize = 0x03;
    pub const SYSCONFIG1: usize = 0x04;
    pub const SYSCONFIG2: usize = 0x05;
    pub const SYSCONFIG3: usize = 0x06;
    pub const TEST1: usize = 0x07;
    pub const STATUSRSSI: usize = 0x0A;
    pub const READCHAN: usize = 0x0B;
    pub const RDSA: usize = 0x0C;
    pub const RDSB: usize = 0x0D;
    pub const RDSC: usize = 0x0E;
    pub const RDSD: usize = 0x0F;
}

/// Register bit fields
pub mod bits {
    /// POWERCFG: softmute disable
    pub const DSMUTE: u16 = 1 << 15;
    /// POWERCFG: audio mute disable (set = audio on)
    pub const DMUTE: u16 = 1 << 14;
    /// POWERCFG: seek upwards
    pub const SEEKUP: u16 = 1 << 9;
    /// POWERCFG: start seek
    pub const SEEK: u16 = 1 << 8;
    /// POWERCFG: power up enable
    pub const ENABLE: u16 = 1 << 0;

    /// CHANNEL: start tune
    pub const TUNE: u16 = 1 << 15;
    /// CHANNEL / READCHAN: channel index field
    pub const CHANNEL_MASK: u16 = 0x01FF;

    /// SYSCONFIG1: RDS enable
    pub const RDS: u16 = 1 << 12;

    /// SYSCONFIG2: band, spacing and volume fields
    pub const BAND_SPACING_VOLUME_MASK: u16 = 0x003F;
    /// SYSCONFIG2: 87.5-108 MHz band, 100 kHz spacing, volume 1
    pub const EUROPE_DEFAULTS: u16 = 0x0011;
    /// SYSCONFIG2: volume field
    pub const VOLUME_MASK: u16 = 0x000F;

    /// TEST1: crystal oscillator enable
    pub const XOSCEN: u16 = 0x8100;

    /// STATUSRSSI: seek/tune complete
    pub const STC: u16 = 1 << 14;
    /// STATUSRSSI: seek failed / band limit reached
    pub const SFBL: u16 = 1 << 13;
    /// STATUSRSSI: stereo indicator
    pub const ST: u16 = 1 << 8;
    /// STATUSRSSI: signal strength field
    pub const RSSI_MASK: u16 = 0x00FF;

    /// POWERCFG value for power-up with audio on
    pub const POWER_UP: u16 = DSMUTE | DMUTE | ENABLE;
}

/// Tuner operation error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TunerError {
    /// Bus transaction failed
    Bus(ErrorKind),
    /// Control pin could not be driven
    Pin,
    /// Seek did not complete within the allowed time
    SeekTimeout,
    /// Seek was cancelled through its [`SeekAbort`] token
    SeekAborted,
}

impl fmt::Display for TunerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(kind) => write!(f, "bus error: {kind}"),
            Self::Pin => f.write_str("pin error"),
            Self::SeekTimeout => f.write_str("seek timed out"),
            Self::SeekAborted => f.write_str("seek aborted"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TunerError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(kind) => defmt::write!(f, "Bus({})", defmt::Debug2Format(kind)),
            Self::Pin => defmt::write!(f, "Pin"),
            Self::SeekTimeout => defmt::write!(f, "SeekTimeout"),
            Self::SeekAborted => defmt::write!(f, "SeekAborted"),
        }
    }
}

/// Cancellation token for a running seek
///
/// May be raised from any context (another task, an interrupt); the seek
/// poll loop consumes the request at its next poll.
#[derive(Debug, Default)]
pub struct SeekAbort(AtomicBool);

impl SeekAbort {
    /// Create a token with no pending request
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Request that the running (or next) seek stops
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a request is pending
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Drop any pending request
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// Hold SDIO low across a reset pulse so the chip comes up in 2-wire mode
pub async fn reset_and_select_bus<RST, SDIO, D>(
    rst: &mut RST,
    sdio: &mut SDIO,
    delay: &mut D,
) -> Result<(), TunerError>
where
    RST: OutputPin,
    SDIO: OutputPin,
    D: DelayNs,
{
    sdio.set_low().map_err(|_| TunerError::Pin)?;
    delay.delay_ms(config::RESET_PULSE_MS).await;
    rst.set_low().map_err(|_| TunerError::Pin)?;
    delay.delay_ms(config::RESET_PULSE_MS).await;
    rst.set_high().map_err(|_| TunerError::Pin)?;
    delay.delay_ms(config::RESET_PULSE_MS).await;
    Ok(())
}

/// `Si4703` driver
pub struct Si4703<I2C, D> {
    regs: RegisterStore<I2C>,
    delay: D,
    rds: RdsDecoder,
    state: TunerState,
}

impl<I2C: I2c, D: DelayNs> Si4703<I2C, D> {
    /// Create a driver at the default bus address
    #[must_use]
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, config::SI4703_I2C_ADDR)
    }

    /// Create a driver at a specific bus address
    #[must_use]
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            regs: RegisterStore::new(i2c, address),
            delay,
            rds: RdsDecoder::new(),
            state: TunerState::default(),
        }
    }

    /// Bring the chip up: oscillator, power, band plan and RDS
    pub async fn init(&mut self) -> Result<(), TunerError> {
        self.regs.refresh().await;
        self.regs.set(reg::TEST1, bits::XOSCEN);
        self.regs.commit().await?;
        self.delay.delay_ms(config::OSCILLATOR_SETTLE_MS).await;

        self.regs.set(reg::POWERCFG, bits::POWER_UP);
        self.regs.commit().await?;
        self.delay.delay_ms(config::POWERUP_SETTLE_MS).await;

        self.regs.refresh().await;
        let shadow = self.regs.shadow_mut();
        shadow.modify(
            reg::SYSCONFIG2,
            bits::BAND_SPACING_VOLUME_MASK,
            bits::EUROPE_DEFAULTS,
        );
        shadow.write_flag(reg::SYSCONFIG1, bits::RDS, true);
        self.regs.commit().await?;
        self.delay.delay_ms(config::CONFIG_SETTLE_MS).await;

        self.state.powered = true;
        self.state.muted = false;
        self.state.volume = Volume::new(1);

        #[cfg(feature = "embedded")]
        defmt::info!("Si4703 powered up");
        Ok(())
    }

    /// Tune to `freq` (band-clamped) and invalidate decoded RDS
    pub async fn set_frequency(&mut self, freq: Frequency) -> Result<(), TunerError> {
        self.rds.reset(RdsReset::Retune);

        let freq = Frequency::from_tenths(i32::from(freq.as_tenths()));
        let channel = freq.channel() & bits::CHANNEL_MASK;
        self.regs.refresh().await;
        self.regs.shadow_mut().modify(
            reg::CHANNEL,
            bits::CHANNEL_MASK | bits::TUNE,
            channel | bits::TUNE,
        );
        self.regs.commit().await?;
        self.delay.delay_ms(config::TUNE_SETTLE_MS).await;

        self.regs
            .shadow_mut()
            .write_flag(reg::CHANNEL, bits::TUNE, false);
        self.regs.commit().await?;

        #[cfg(feature = "embedded")]
        defmt::debug!("tuned to {}", freq);
        Ok(())
    }

    /// Tune to a frequency given in MHz (clamped to 87.5-108.0)
    pub async fn set_frequency_mhz(&mut self, mhz: f64) -> Result<(), TunerError> {
        self.set_frequency(Frequency::from_mhz(mhz)).await
    }

    /// Authoritative frequency, read back from the resolved channel register
    pub async fn frequency(&mut self) -> Frequency {
        self.regs.refresh().await;
        let channel = self.regs.get(reg::READCHAN) & bits::CHANNEL_MASK;
        let freq = Frequency::from_channel(channel);
        self.state.frequency = freq;
        freq
    }

    /// Set output volume (0-15); other SYSCONFIG2 bits are preserved
    pub async fn set_volume(&mut self, volume: Volume) -> Result<(), TunerError> {
        self.regs.refresh().await;
        self.regs.shadow_mut().modify(
            reg::SYSCONFIG2,
            bits::VOLUME_MASK,
            u16::from(volume.level()),
        );
        self.regs.commit().await?;
        self.state.volume = volume;
        Ok(())
    }

    /// Mute or unmute audio
    pub async fn mute(&mut self, muted: bool) -> Result<(), TunerError> {
        self.regs.refresh().await;
        self.regs
            .shadow_mut()
            .write_flag(reg::POWERCFG, bits::DMUTE, !muted);
        self.regs.commit().await?;
        self.state.muted = muted;
        Ok(())
    }

    /// Power the chip down
    pub async fn shutdown(&mut self) -> Result<(), TunerError> {
        self.regs.refresh().await;
        self.regs
            .shadow_mut()
            .write_flag(reg::POWERCFG, bits::ENABLE, false);
        self.regs.commit().await?;
        self.state.powered = false;

        #[cfg(feature = "embedded")]
        defmt::info!("Si4703 powered down");
        Ok(())
    }

    /// Let the chip scan for the next station
    ///
    /// Waits for seek/tune complete, releases the seek bit and waits for the
    /// chip to acknowledge. Each wait is bounded by the seek timeout. The
    /// seek bit is always released before returning.
    pub async fn seek(
        &mut self,
        direction: SeekDirection,
        abort: &SeekAbort,
    ) -> Result<Frequency, TunerError> {
        self.rds.reset(RdsReset::Seek);

        #[cfg(feature = "embedded")]
        defmt::info!("seek {}", direction);

        let up = matches!(direction, SeekDirection::Up);
        self.regs.refresh().await;
        self.regs.shadow_mut().modify(
            reg::POWERCFG,
            bits::SEEKUP | bits::SEEK,
            bits::SEEK | if up { bits::SEEKUP } else { 0 },
        );
        self.regs.commit().await?;

        let completed = self.wait_for_stc(true, Some(abort)).await;
        let band_limit = self.regs.shadow().flag(reg::STATUSRSSI, bits::SFBL);

        self.regs
            .shadow_mut()
            .write_flag(reg::POWERCFG, bits::SEEK, false);
        self.regs.commit().await?;

        if let Err(err) = completed {
            #[cfg(feature = "embedded")]
            defmt::warn!("seek stopped: {}", err);
            return Err(err);
        }

        self.wait_for_stc(false, None).await?;

        let freq = self.frequency().await;
        if band_limit {
            #[cfg(feature = "embedded")]
            defmt::info!("seek hit band limit at {}", freq);
        } else {
            #[cfg(feature = "embedded")]
            defmt::info!("seek found {}", freq);
        }
        Ok(freq)
    }

    /// Poll STC until it reads `asserted`, an abort is requested, or time runs out
    async fn wait_for_stc(
        &mut self,
        asserted: bool,
        abort: Option<&SeekAbort>,
    ) -> Result<(), TunerError> {
        let polls = config::SEEK_TIMEOUT_MS / config::SEEK_POLL_MS;
        for _ in 0..=polls {
            if abort.is_some_and(SeekAbort::take) {
                return Err(TunerError::SeekAborted);
            }
            if self.regs.refresh().await
                && self.regs.shadow().flag(reg::STATUSRSSI, bits::STC) == asserted
            {
                return Ok(());
            }
            self.delay.delay_ms(config::SEEK_POLL_MS).await;
        }
        Err(TunerError::SeekTimeout)
    }

    /// Received signal strength (0-255)
    pub async fn rssi(&mut self) -> u8 {
        self.regs.refresh().await;
        (self.regs.get(reg::STATUSRSSI) & bits::RSSI_MASK) as u8
    }

    /// Signal strength and stereo indicator from one refresh
    pub async fn signal(&mut self) -> SignalQuality {
        self.regs.refresh().await;
        let status = self.regs.get(reg::STATUSRSSI);
        SignalQuality {
            rssi: (status & bits::RSSI_MASK) as u8,
            stereo: status & bits::ST != 0,
        }
    }

    /// Poll for a new RDS group and feed it to the decoder
    ///
    /// Call every 10-50 ms. A failed refresh counts as "nothing new".
    pub async fn process_rds(&mut self) -> RdsUpdate {
        if !self.regs.refresh().await {
            return RdsUpdate::Idle;
        }
        let group = RdsGroup::from_shadow(self.regs.shadow());
        self.rds.process(&group)
    }

    /// Current station name
    #[must_use]
    pub fn station_name(&self) -> &str {
        self.rds.station_name()
    }

    /// Current radio text
    #[must_use]
    pub fn radio_text(&self) -> &str {
        self.rds.radio_text()
    }

    /// RDS decoder state
    #[must_use]
    pub const fn rds(&self) -> &RdsDecoder {
        &self.rds
    }

    /// Last known tuner state
    #[must_use]
    pub const fn state(&self) -> TunerState {
        self.state
    }

    /// Register shadow store
    #[must_use]
    pub const fn registers(&self) -> &RegisterStore<I2C> {
        &self.regs
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.regs.release(), self.delay)
    }
}
