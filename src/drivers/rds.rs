//! RDS (Radio Data System) Decoder
//!
//! Reassembles the programme service name (group 0) and radio text
//! (group 2A) from the block registers the tuner latches for each received
//! group. Characters land at the position the group's address field names;
//! positions that have not been received keep their previous content.

use heapless::String;

use super::registers::RegisterShadow;
use super::si4703::reg;

/// Characters in the programme service (station name) buffer
pub const STATION_NAME_LEN: usize = 8;

/// Characters in the radio text buffer
pub const RADIO_TEXT_LEN: usize = 64;

/// Station name shown after a retune until a name is received
pub const SCANNING_PLACEHOLDER: &str = "Scanning...";

/// Station name shown while a seek is in progress
pub const SEEKING_PLACEHOLDER: &str = "Seeking...";

/// RDS ready flag in the status register
const RDS_READY: u16 = 1 << 15;

/// Group type code of the basic tuning group 0A
const GROUP_BASIC_TUNING: u8 = 0b00000;

/// Group type code of the radio text group 2A
const GROUP_RADIO_TEXT_2A: u8 = 0b00100;

/// One latched RDS group, as seen in the register shadow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RdsGroup {
    /// Status register (carries the ready flag)
    pub status: u16,
    /// Block B (group type and address)
    pub block_b: u16,
    /// Block C
    pub block_c: u16,
    /// Block D
    pub block_d: u16,
}

impl RdsGroup {
    /// Extract the group registers from a refreshed shadow
    #[must_use]
    pub fn from_shadow(shadow: &RegisterShadow) -> Self {
        Self {
            status: shadow.get(reg::STATUSRSSI),
            block_b: shadow.get(reg::RDSB),
            block_c: shadow.get(reg::RDSC),
            block_d: shadow.get(reg::RDSD),
        }
    }

    /// Whether the chip flagged a new group
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.status & RDS_READY != 0
    }

    /// Five-bit group type code (top bits of block B)
    #[must_use]
    pub const fn group_type(&self) -> u8 {
        (self.block_b >> 11) as u8
    }
}

/// What a call to [`RdsDecoder::process`] changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RdsUpdate {
    /// Nothing new (no group ready, or a group type we do not decode)
    Idle,
    /// Station name buffer written
    StationName,
    /// Radio text buffer written
    RadioText,
}

/// Why the buffers are being invalidated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RdsReset {
    /// Frequency was set directly
    Retune,
    /// A seek was started
    Seek,
}

impl RdsReset {
    const fn placeholder(self) -> &'static str {
        match self {
            Self::Retune => SCANNING_PLACEHOLDER,
            Self::Seek => SEEKING_PLACEHOLDER,
        }
    }
}

/// Station name and radio text accumulator
#[derive(Clone, Debug)]
pub struct RdsDecoder {
    station_name: [u8; STATION_NAME_LEN],
    radio_text: [u8; RADIO_TEXT_LEN],
    name: String<16>,
    text: String<RADIO_TEXT_LEN>,
}

impl RdsDecoder {
    /// Create a decoder with blank buffers
    #[must_use]
    pub fn new() -> Self {
        Self {
            station_name: [b' '; STATION_NAME_LEN],
            radio_text: [b' '; RADIO_TEXT_LEN],
            name: String::new(),
            text: String::new(),
        }
    }

    /// Decode one group
    ///
    /// A group without the ready flag is a no-op. Derived strings are only
    /// rebuilt when their buffer was touched.
    pub fn process(&mut self, group: &RdsGroup) -> RdsUpdate {
        if !group.is_ready() {
            return RdsUpdate::Idle;
        }

        match group.group_type() {
            GROUP_BASIC_TUNING => {
                let idx = usize::from(group.block_b & 0x03) * 2;
                let [hi, lo] = group.block_d.to_be_bytes();
                write_printable(&mut self.station_name, idx, &[hi, lo]);
                rebuild(&mut self.name, &self.station_name, false);
                RdsUpdate::StationName
            }
            GROUP_RADIO_TEXT_2A => {
                let idx = usize::from(group.block_b & 0x0F) * 4;
                let [c0, c1] = group.block_c.to_be_bytes();
                let [d0, d1] = group.block_d.to_be_bytes();
                write_printable(&mut self.radio_text, idx, &[c0, c1, d0, d1]);
                rebuild(&mut self.text, &self.radio_text, true);
                RdsUpdate::RadioText
            }
            _ => RdsUpdate::Idle,
        }
    }

    /// Blank both buffers and show the placeholder for `reason`
    pub fn reset(&mut self, reason: RdsReset) {
        self.station_name.fill(b' ');
        self.radio_text.fill(b' ');
        self.name.clear();
        let _ = self.name.push_str(reason.placeholder());
        self.text.clear();
    }

    /// Joined station name (or a placeholder after a reset)
    #[must_use]
    pub fn station_name(&self) -> &str {
        &self.name
    }

    /// Joined radio text, trimmed of surrounding whitespace
    #[must_use]
    pub fn radio_text(&self) -> &str {
        &self.text
    }

    /// Raw station name buffer
    #[must_use]
    pub const fn station_name_buffer(&self) -> &[u8; STATION_NAME_LEN] {
        &self.station_name
    }

    /// Raw radio text buffer
    #[must_use]
    pub const fn radio_text_buffer(&self) -> &[u8; RADIO_TEXT_LEN] {
        &self.radio_text
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Store each printable byte at its slot; anything else leaves the slot alone.
///
/// A carriage return (0x0D) marks the end of a radio text message, but is
/// treated like any other control byte: the rest of the buffer is kept.
fn write_printable(buffer: &mut [u8], start: usize, chars: &[u8]) {
    for (offset, &ch) in chars.iter().enumerate() {
        let Some(slot) = buffer.get_mut(start + offset) else {
            break;
        };
        if (0x20..=0x7E).contains(&ch) {
            *slot = ch;
        }
    }
}

fn rebuild<const N: usize>(out: &mut String<N>, buffer: &[u8], trim: bool) {
    // Only printable ASCII is ever stored, so the buffer is valid UTF-8.
    let joined = core::str::from_utf8(buffer).unwrap_or_default();
    let joined = if trim { joined.trim() } else { joined };
    out.clear();
    let _ = out.push_str(joined);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(block_b: u16, block_c: u16, block_d: u16) -> RdsGroup {
        RdsGroup {
            status: RDS_READY,
            block_b,
            block_c,
            block_d,
        }
    }

    #[test]
    fn station_name_pair_lands_at_index() {
        let mut rds = RdsDecoder::new();
        assert_eq!(rds.process(&group(0x0001, 0, 0x4243)), RdsUpdate::StationName);
        assert_eq!(rds.station_name_buffer(), b"  BC    ");
    }

    #[test]
    fn carriage_return_does_not_truncate() {
        let mut rds = RdsDecoder::new();
        rds.process(&group(0x2000, 0x4142, 0x4344));
        rds.process(&group(0x2000, 0x0D00, 0x0000));
        assert_eq!(rds.radio_text(), "ABCD");
    }
}
