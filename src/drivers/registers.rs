//! `Si4703` Register Shadow Store
//!
//! Keeps an in-memory mirror of the tuner's sixteen 16-bit registers.
//!
//! The chip has no register pointer on the bus. A read burst always returns
//! all sixteen words starting at logical register `0x0A` and wrapping round
//! to `0x00`-`0x09`; a write burst always lands at `0x02` onwards. The store
//! hides that ordering so everything above it addresses registers by their
//! logical number.

use core::ops::Range;

use embedded_hal::i2c::Error as _;
use embedded_hal_async::i2c::I2c;

use super::si4703::TunerError;

/// Number of logical registers
pub const REGISTER_COUNT: usize = 16;

/// Bytes in one full read burst
pub const READ_BLOCK_LEN: usize = REGISTER_COUNT * 2;

/// Logical register returned first in a read burst
pub const READ_START: usize = 0x0A;

/// Logical register receiving the first word of a write burst
pub const WRITE_START: usize = 0x02;

/// Control registers written back by [`RegisterStore::commit`]
pub const CONTROL_BLOCK: Range<usize> = 0x02..0x08;

/// Map a word position in the read burst to its logical register
#[must_use]
pub const fn wire_to_logical(slot: usize) -> usize {
    (READ_START + slot) % REGISTER_COUNT
}

/// Shadow copy of the register file, indexed by logical register
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RegisterShadow {
    values: [u16; REGISTER_COUNT],
}

impl RegisterShadow {
    /// Create a shadow with every register zeroed
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; REGISTER_COUNT],
        }
    }

    /// Get a register value (out-of-range registers read as zero)
    #[must_use]
    pub fn get(&self, reg: usize) -> u16 {
        self.values.get(reg).copied().unwrap_or(0)
    }

    /// Set a register value (out-of-range registers are ignored)
    pub fn set(&mut self, reg: usize, value: u16) {
        if let Some(slot) = self.values.get_mut(reg) {
            *slot = value;
        }
    }

    /// Clear `mask` then OR in `bits`
    pub fn modify(&mut self, reg: usize, mask: u16, bits: u16) {
        let value = (self.get(reg) & !mask) | (bits & mask);
        self.set(reg, value);
    }

    /// Set or clear a single-bit mask
    pub fn write_flag(&mut self, reg: usize, mask: u16, on: bool) {
        self.modify(reg, mask, if on { mask } else { 0 });
    }

    /// Test whether all bits of `mask` are set
    #[must_use]
    pub fn flag(&self, reg: usize, mask: u16) -> bool {
        self.get(reg) & mask == mask
    }

    /// Replace the shadow from a raw read burst (big-endian words, wire order)
    pub fn load_wire(&mut self, raw: &[u8; READ_BLOCK_LEN]) {
        for (slot, word) in raw.chunks_exact(2).enumerate() {
            self.values[wire_to_logical(slot)] = u16::from_be_bytes([word[0], word[1]]);
        }
    }

    /// Serialize registers for a write burst, MSB first
    ///
    /// Write bursts always begin at [`WRITE_START`], so the range is widened
    /// down to it. Returns the number of bytes written into `out`.
    pub fn encode_burst(&self, range: Range<usize>, out: &mut [u8]) -> usize {
        let end = range.end.min(REGISTER_COUNT);
        let mut len = 0;
        for reg in WRITE_START..end {
            let Some(dst) = out.get_mut(len..len + 2) else {
                break;
            };
            dst.copy_from_slice(&self.values[reg].to_be_bytes());
            len += 2;
        }
        len
    }

    /// All registers in logical order
    #[must_use]
    pub const fn as_array(&self) -> &[u16; REGISTER_COUNT] {
        &self.values
    }
}

/// Register shadow bound to the bus it mirrors
pub struct RegisterStore<I2C> {
    i2c: I2C,
    address: u8,
    shadow: RegisterShadow,
}

impl<I2C: I2c> RegisterStore<I2C> {
    /// Create a store for the device at `address`
    #[must_use]
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            shadow: RegisterShadow::new(),
        }
    }

    /// Read the whole register file in one burst
    ///
    /// A transport error is logged and leaves the shadow untouched; the
    /// caller should treat `false` as "state unknown, retry next tick".
    pub async fn refresh(&mut self) -> bool {
        let mut raw = [0u8; READ_BLOCK_LEN];
        match self.i2c.read(self.address, &mut raw).await {
            Ok(()) => {
                self.shadow.load_wire(&raw);
                true
            }
            Err(_err) => {
                #[cfg(feature = "embedded")]
                defmt::warn!("Si4703 refresh failed: {}", defmt::Debug2Format(&_err.kind()));
                false
            }
        }
    }

    /// Write back the control block (`0x02`-`0x07`)
    pub async fn commit(&mut self) -> Result<(), TunerError> {
        self.commit_range(CONTROL_BLOCK).await
    }

    /// Write back registers from `0x02` up to `range.end` as one burst
    pub async fn commit_range(&mut self, range: Range<usize>) -> Result<(), TunerError> {
        let mut buf = [0u8; READ_BLOCK_LEN];
        let len = self.shadow.encode_burst(range, &mut buf);
        self.i2c
            .write(self.address, &buf[..len])
            .await
            .map_err(|err| {
                let kind = err.kind();
                #[cfg(feature = "embedded")]
                defmt::warn!("Si4703 commit failed: {}", defmt::Debug2Format(&kind));
                TunerError::Bus(kind)
            })
    }

    /// Get a shadowed register value
    #[must_use]
    pub fn get(&self, reg: usize) -> u16 {
        self.shadow.get(reg)
    }

    /// Set a shadowed register value (reaches hardware on the next commit)
    pub fn set(&mut self, reg: usize, value: u16) {
        self.shadow.set(reg, value);
    }

    /// Shared access to the shadow
    #[must_use]
    pub const fn shadow(&self) -> &RegisterShadow {
        &self.shadow
    }

    /// Mutable access to the shadow
    pub fn shadow_mut(&mut self) -> &mut RegisterShadow {
        &mut self.shadow
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}
