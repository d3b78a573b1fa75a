//! Shared host-side test doubles
//!
//! `FakeSi4703` answers read and write bursts in the chip's wire order and
//! models tune and seek completion through the STC flag. Clones share state,
//! so a test can keep a handle while the driver owns the bus.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::ErrorKind;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation};

pub const POWERCFG: usize = 0x02;
pub const CHANNEL: usize = 0x03;
pub const SYSCONFIG1: usize = 0x04;
pub const SYSCONFIG2: usize = 0x05;
pub const TEST1: usize = 0x07;
pub const STATUSRSSI: usize = 0x0A;
pub const READCHAN: usize = 0x0B;
pub const RDSA: usize = 0x0C;
pub const RDSB: usize = 0x0D;
pub const RDSC: usize = 0x0E;
pub const RDSD: usize = 0x0F;

pub const TUNE: u16 = 1 << 15;
pub const SEEK: u16 = 1 << 8;
pub const SEEKUP: u16 = 1 << 9;
pub const STC: u16 = 1 << 14;
pub const SFBL: u16 = 1 << 13;
pub const RDS_READY: u16 = 1 << 15;
pub const STEREO: u16 = 1 << 8;

/// Run a future to completion on the test thread
pub fn run<F: core::future::Future>(fut: F) -> F::Output {
    embassy_futures::block_on(fut)
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub regs: [u16; 16],
    /// Raw bytes of every write burst, in order
    pub writes: Vec<Vec<u8>>,
    pub reads: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Reads after seek start before STC rises; `None` never completes
    pub seek_polls: Option<usize>,
    /// Channel the seek lands on
    pub seek_channel: u16,
    /// Raise SFBL when the seek completes
    pub seek_band_limit: bool,
    /// Channel reported after a tune instead of the requested one
    pub tune_override: Option<u16>,
    seek_remaining: Option<usize>,
    seeking: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FakeSi4703 {
    state: Rc<RefCell<FakeState>>,
}

impl FakeSi4703 {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.borrow_mut().seek_polls = Some(3);
        fake
    }

    pub fn state(&self) -> std::cell::RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub fn reg(&self, reg: usize) -> u16 {
        self.state.borrow().regs[reg]
    }

    pub fn set_reg(&self, reg: usize, value: u16) {
        self.state.borrow_mut().regs[reg] = value;
    }

    pub fn write_count(&self) -> usize {
        self.state.borrow().writes.len()
    }

    pub fn last_write(&self) -> Vec<u8> {
        self.state.borrow().writes.last().cloned().unwrap_or_default()
    }

    /// Latch one RDS group with the ready flag set
    pub fn latch_rds(&self, b: u16, c: u16, d: u16) {
        let mut state = self.state.borrow_mut();
        state.regs[STATUSRSSI] |= RDS_READY;
        state.regs[RDSB] = b;
        state.regs[RDSC] = c;
        state.regs[RDSD] = d;
    }

    pub fn clear_rds_ready(&self) {
        self.state.borrow_mut().regs[STATUSRSSI] &= !RDS_READY;
    }

    pub fn set_signal(&self, rssi: u8, stereo: bool) {
        let mut state = self.state.borrow_mut();
        let mut status = state.regs[STATUSRSSI] & !(0x00FF | STEREO);
        status |= u16::from(rssi);
        if stereo {
            status |= STEREO;
        }
        state.regs[STATUSRSSI] = status;
    }
}

impl FakeState {
    fn read_burst(&mut self, buf: &mut [u8]) {
        self.reads += 1;
        if self.seeking {
            if let Some(remaining) = self.seek_remaining.as_mut() {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    self.seek_remaining = None;
                    self.regs[STATUSRSSI] |= STC;
                    if self.seek_band_limit {
                        self.regs[STATUSRSSI] |= SFBL;
                    }
                    self.regs[READCHAN] = (self.regs[READCHAN] & !0x01FF) | self.seek_channel;
                }
            }
        }
        for (slot, word) in buf.chunks_mut(2).enumerate() {
            let value = self.regs[(0x0A + slot) % 16].to_be_bytes();
            word.copy_from_slice(&value[..word.len()]);
        }
    }

    fn write_burst(&mut self, bytes: &[u8]) {
        self.writes.push(bytes.to_vec());
        let before_powercfg = self.regs[POWERCFG];
        let before_channel = self.regs[CHANNEL];
        for (i, word) in bytes.chunks_exact(2).enumerate() {
            let reg = 0x02 + i;
            if reg < 16 {
                self.regs[reg] = u16::from_be_bytes([word[0], word[1]]);
            }
        }

        let channel = self.regs[CHANNEL];
        if channel & TUNE != 0 && before_channel & TUNE == 0 {
            let resolved = self.tune_override.unwrap_or(channel & 0x01FF);
            self.regs[READCHAN] = (self.regs[READCHAN] & !0x01FF) | resolved;
            self.regs[STATUSRSSI] |= STC;
        } else if channel & TUNE == 0 && before_channel & TUNE != 0 {
            self.regs[STATUSRSSI] &= !STC;
        }

        let powercfg = self.regs[POWERCFG];
        if powercfg & SEEK != 0 && before_powercfg & SEEK == 0 {
            self.seeking = true;
            self.seek_remaining = self.seek_polls;
            self.regs[STATUSRSSI] &= !(STC | SFBL);
        } else if powercfg & SEEK == 0 && before_powercfg & SEEK != 0 {
            self.seeking = false;
            self.seek_remaining = None;
            self.regs[STATUSRSSI] &= !(STC | SFBL);
        }
    }
}

impl ErrorType for FakeSi4703 {
    type Error = ErrorKind;
}

impl I2c for FakeSi4703 {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    if state.fail_reads {
                        return Err(ErrorKind::Other);
                    }
                    state.read_burst(buf);
                }
                Operation::Write(bytes) => {
                    if state.fail_writes {
                        return Err(ErrorKind::Other);
                    }
                    state.write_burst(bytes);
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately and records how long it was asked to wait
#[derive(Clone, Debug, Default)]
pub struct RecordingDelay {
    total_ns: Rc<RefCell<u64>>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        *self.total_ns.borrow() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }

    async fn delay_ms(&mut self, ms: u32) {
        *self.total_ns.borrow_mut() += u64::from(ms) * 1_000_000;
    }
}
