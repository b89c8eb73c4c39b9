//! Register Address Decoding.
//!
//! The register file exposes one 256-word address space. This module maps a
//! bus byte address to a strongly typed register identifier with a pure
//! function, so no per-channel bus logic is duplicated. It provides:
//! 1. **Word Addresses:** A strong type for word-indexed register addresses.
//! 2. **Register Identifiers:** Per-channel registers and the shared status/timebase block.
//! 3. **Decoding:** `decode` and its inverse `ChannelReg::word` for building addresses.

use super::constants::MAX_CHANNELS;

/// Word index of the status register (tic seen, accumulator interrupt).
pub const STATUS_WORD: u8 = 0xE0;
/// Word index of the aggregate new-data register.
pub const NEW_DATA_WORD: u8 = 0xE1;
/// Word index of the tic counter.
pub const TIC_COUNT_WORD: u8 = 0xE2;
/// Word index of the accumulator-interrupt counter.
pub const ACCUM_COUNT_WORD: u8 = 0xE3;
/// Word index of the per-channel epoch desync fault bits.
pub const FAULT_WORD: u8 = 0xE4;
/// Word index of the software reset register.
pub const RESET_WORD: u8 = 0xF0;
/// Word index of the TIC divide reload register.
pub const TIC_DIVIDE_WORD: u8 = 0xF1;
/// Word index of the accumulator-interrupt divide reload register.
pub const ACCUM_DIVIDE_WORD: u8 = 0xF2;

/// A word-indexed register address (byte address / 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordAddr(pub u8);

impl WordAddr {
    /// Converts a bus byte address to a word address.
    ///
    /// The two low bits and everything above the 8-bit word index are ignored.
    #[inline(always)]
    pub fn from_byte(addr: u32) -> Self {
        Self(((addr >> 2) & 0xFF) as u8)
    }

    /// Returns the byte address of this word.
    #[inline(always)]
    pub fn byte(self) -> u32 {
        u32::from(self.0) << 2
    }
}

/// Registers replicated in every channel, by offset inside the channel's 16-word row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelReg {
    /// 0x0: PRN key (write strobes a load).
    PrnKey,
    /// 0x1: carrier NCO control word.
    CarrierNco,
    /// 0x2: code NCO control word.
    CodeNco,
    /// 0x3: signed code slew in half-chips (write strobes the slew).
    CodeSlew,
    /// 0x4: early in-phase sum.
    IEarly,
    /// 0x5: early quadrature sum.
    QEarly,
    /// 0x6: prompt in-phase sum.
    IPrompt,
    /// 0x7: prompt quadrature sum.
    QPrompt,
    /// 0x8: late in-phase sum.
    ILate,
    /// 0x9: late quadrature sum.
    QLate,
    /// 0xA: tic-latched carrier phase and cycle count.
    CarrierValue,
    /// 0xB: tic-latched code phase and half-chip index.
    CodeValue,
    /// 0xC: tic-latched epoch.
    Epoch,
    /// 0xD: tic-latched epoch check.
    EpochCheck,
    /// 0xE: epoch load (write strobes the load).
    EpochLoad,
    /// 0xF: free-running epoch, not latched.
    EpochLive,
}

impl ChannelReg {
    /// Decodes a 4-bit register offset.
    pub fn from_offset(offset: u8) -> Option<Self> {
        let reg = match offset {
            0x0 => Self::PrnKey,
            0x1 => Self::CarrierNco,
            0x2 => Self::CodeNco,
            0x3 => Self::CodeSlew,
            0x4 => Self::IEarly,
            0x5 => Self::QEarly,
            0x6 => Self::IPrompt,
            0x7 => Self::QPrompt,
            0x8 => Self::ILate,
            0x9 => Self::QLate,
            0xA => Self::CarrierValue,
            0xB => Self::CodeValue,
            0xC => Self::Epoch,
            0xD => Self::EpochCheck,
            0xE => Self::EpochLoad,
            0xF => Self::EpochLive,
            _ => return None,
        };
        Some(reg)
    }

    /// Returns the 4-bit register offset.
    pub const fn offset(self) -> u8 {
        match self {
            Self::PrnKey => 0x0,
            Self::CarrierNco => 0x1,
            Self::CodeNco => 0x2,
            Self::CodeSlew => 0x3,
            Self::IEarly => 0x4,
            Self::QEarly => 0x5,
            Self::IPrompt => 0x6,
            Self::QPrompt => 0x7,
            Self::ILate => 0x8,
            Self::QLate => 0x9,
            Self::CarrierValue => 0xA,
            Self::CodeValue => 0xB,
            Self::Epoch => 0xC,
            Self::EpochCheck => 0xD,
            Self::EpochLoad => 0xE,
            Self::EpochLive => 0xF,
        }
    }

    /// Returns the word address of this register in the given channel.
    pub fn word(self, channel: usize) -> WordAddr {
        WordAddr(((channel as u8) << 4) | self.offset())
    }

    /// Returns the bus byte address of this register in the given channel.
    pub fn byte(self, channel: usize) -> u32 {
        self.word(channel).byte()
    }
}

/// Decoded register identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterId {
    /// A register inside channel `.0`.
    Channel(usize, ChannelReg),
    /// Status (read-clears).
    Status,
    /// Aggregate new-data bits (read-clears).
    NewData,
    /// Tic counter.
    TicCount,
    /// Accumulator-interrupt counter.
    AccumCount,
    /// Epoch desync fault bits.
    Fault,
    /// Software reset.
    Reset,
    /// TIC divide reload.
    TicDivide,
    /// Accumulator-interrupt divide reload.
    AccumDivide,
}

/// Maps a bus byte address to a register, for a bank of `channels` channels.
///
/// # Arguments
///
/// * `addr` - Byte address presented on the bus.
/// * `channels` - Number of channels instantiated.
///
/// # Returns
///
/// The register, or `None` for an unmapped address (including rows of
/// channels that are not instantiated).
pub fn decode(addr: u32, channels: usize) -> Option<RegisterId> {
    let WordAddr(word) = WordAddr::from_byte(addr);
    let row = usize::from(word >> 4);
    if row < MAX_CHANNELS {
        if row >= channels {
            return None;
        }
        return ChannelReg::from_offset(word & 0xF).map(|reg| RegisterId::Channel(row, reg));
    }
    match word {
        STATUS_WORD => Some(RegisterId::Status),
        NEW_DATA_WORD => Some(RegisterId::NewData),
        TIC_COUNT_WORD => Some(RegisterId::TicCount),
        ACCUM_COUNT_WORD => Some(RegisterId::AccumCount),
        FAULT_WORD => Some(RegisterId::Fault),
        RESET_WORD => Some(RegisterId::Reset),
        TIC_DIVIDE_WORD => Some(RegisterId::TicDivide),
        ACCUM_DIVIDE_WORD => Some(RegisterId::AccumDivide),
        _ => None,
    }
}
