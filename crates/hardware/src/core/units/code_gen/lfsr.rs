//! C/A Gold code LFSR pair.
//!
//! Stage `n` (1-based, as in IS-GPS-200) is held in bit `n - 1` of a `u16`.
//! Each shift moves stage `n` into stage `n + 1` and feeds the XOR of the
//! polynomial taps into stage 1.
//!
//! * G1 = 1 + x^3 + x^10
//! * G2 = 1 + x^2 + x^3 + x^6 + x^8 + x^9 + x^10

use crate::common::constants::{CA_CODE_LENGTH, PRN_COUNT};

const STAGE_MASK: u16 = 0x3FF;
const ALL_ONES: u16 = STAGE_MASK;

/// G2 phase-selector tap pairs for PRN 1..=37.
pub const G2_TAPS: [(u8, u8); 37] = [
    (2, 6),
    (3, 7),
    (4, 8),
    (5, 9),
    (1, 9),
    (2, 10),
    (1, 8),
    (2, 9),
    (3, 10),
    (2, 3),
    (3, 4),
    (5, 6),
    (6, 7),
    (7, 8),
    (8, 9),
    (9, 10),
    (1, 4),
    (2, 5),
    (3, 6),
    (4, 7),
    (5, 8),
    (6, 9),
    (1, 3),
    (4, 6),
    (5, 7),
    (6, 8),
    (7, 9),
    (8, 10),
    (1, 6),
    (2, 7),
    (3, 8),
    (4, 9),
    (5, 10),
    (4, 10),
    (1, 7),
    (2, 8),
    (4, 10),
];

#[inline(always)]
const fn stage(reg: u16, n: u8) -> u16 {
    (reg >> (n - 1)) & 1
}

/// Returns the G2 taps for a PRN, or `None` outside 1..=37.
pub const fn taps_for(prn: u32) -> Option<(u8, u8)> {
    if prn == 0 || prn > PRN_COUNT {
        return None;
    }
    Some(G2_TAPS[(prn - 1) as usize])
}

/// The G1/G2 register pair of one PRN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoldLfsr {
    g1: u16,
    g2: u16,
    taps: (u8, u8),
}

impl GoldLfsr {
    /// Creates the register pair for the given taps, initialised to all ones.
    pub const fn new(taps: (u8, u8)) -> Self {
        Self {
            g1: ALL_ONES,
            g2: ALL_ONES,
            taps,
        }
    }

    /// Returns the G2 tap pair.
    pub const fn taps(&self) -> (u8, u8) {
        self.taps
    }

    /// Returns both registers to all ones.
    pub const fn reset(&mut self) {
        self.g1 = ALL_ONES;
        self.g2 = ALL_ONES;
    }

    /// Returns the current chip bit (1 maps to -1 on the replica).
    #[inline(always)]
    pub const fn chip(&self) -> bool {
        (stage(self.g1, 10) ^ stage(self.g2, self.taps.0) ^ stage(self.g2, self.taps.1)) != 0
    }

    /// Shifts both registers by one chip.
    #[inline(always)]
    pub const fn shift(&mut self) {
        let fb1 = stage(self.g1, 3) ^ stage(self.g1, 10);
        let fb2 = stage(self.g2, 2)
            ^ stage(self.g2, 3)
            ^ stage(self.g2, 6)
            ^ stage(self.g2, 8)
            ^ stage(self.g2, 9)
            ^ stage(self.g2, 10);
        self.g1 = ((self.g1 << 1) | fb1) & STAGE_MASK;
        self.g2 = ((self.g2 << 1) | fb2) & STAGE_MASK;
    }
}

/// Generates the full 1023-chip C/A sequence of a PRN as bits (0 or 1).
///
/// # Returns
///
/// `None` when `prn` is outside 1..=37.
pub fn gold_code(prn: u32) -> Option<Vec<u8>> {
    let mut lfsr = GoldLfsr::new(taps_for(prn)?);
    let mut chips = Vec::with_capacity(CA_CODE_LENGTH);
    for _ in 0..CA_CODE_LENGTH {
        chips.push(u8::from(lfsr.chip()));
        lfsr.shift();
    }
    Some(chips)
}
