//! Carrier NCO.
//!
//! The carrier oscillator produces a coarse 8-phase quantized replica of the
//! IF carrier and counts whole carrier cycles between TICs. It provides:
//! 1. **Reference:** Sign/magnitude I and Q levels from an 8-entry table centred on 22.5° + k·45°.
//! 2. **Lookahead:** The table is indexed with the pre-registered sum, so the
//!    registered output matches the registered accumulator with no extra latency.
//! 3. **Carrier Value:** A 32-bit word latched on TIC: bits [9:0] fine phase,
//!    bits [31:10] cycle count since the previous TIC.

use super::PhaseAccumulator;
use crate::common::constants::{
    CARRIER_CYCLE_MASK, CARRIER_NCO_WIDTH, PHASE_FIELD_BITS, PHASE_FIELD_MASK,
};
use crate::common::signal::{CarrierRef, RefLevel};

/// Shift of the 4-bit table key (top four accumulator bits).
const KEY_SHIFT: u32 = CARRIER_NCO_WIDTH - 4;

/// Shift of the 10-bit fine phase field inside the 29-bit accumulator.
const FINE_PHASE_SHIFT: u32 = CARRIER_NCO_WIDTH - PHASE_FIELD_BITS;

/// (I, Q) levels per 45° sector. Q is the negated sine.
const SECTOR_TABLE: [(i8, i8); 8] = [
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
];

/// Looks up the carrier reference for a 4-bit key; adjacent keys share a sector.
pub const fn reference_for_key(key: u32) -> CarrierRef {
    let (i, q) = SECTOR_TABLE[((key >> 1) & 0x7) as usize];
    CarrierRef {
        i: RefLevel::from_value(i),
        q: RefLevel::from_value(q),
    }
}

/// Carrier-rate oscillator with cycle counter.
#[derive(Clone, Debug)]
pub struct CarrierNco {
    acc: PhaseAccumulator,
    ref_q: CarrierRef,
    cycles: u32,
    carrier_val: u32,
}

impl Default for CarrierNco {
    fn default() -> Self {
        Self::new()
    }
}

impl CarrierNco {
    /// Creates a carrier NCO at phase zero with a zero control word.
    pub const fn new() -> Self {
        Self {
            acc: PhaseAccumulator::new(CARRIER_NCO_WIDTH),
            ref_q: reference_for_key(0),
            cycles: 0,
            carrier_val: 0,
        }
    }

    /// Sets the control word (29 bits).
    pub const fn set_fcw(&mut self, fcw: u32) {
        self.acc.set_fcw(fcw);
    }

    /// Returns the control word.
    pub const fn fcw(&self) -> u32 {
        self.acc.fcw()
    }

    /// Returns the registered accumulator value.
    pub const fn value(&self) -> u32 {
        self.acc.value()
    }

    /// Returns the registered carrier reference for this cycle.
    #[inline(always)]
    pub const fn reference(&self) -> CarrierRef {
        self.ref_q
    }

    /// Returns the carrier cycles counted since the last TIC.
    pub const fn cycle_count(&self) -> u32 {
        self.cycles
    }

    /// Returns the carrier value latched at the last TIC.
    pub const fn latched_value(&self) -> u32 {
        self.carrier_val
    }

    /// Advances one sample.
    ///
    /// # Arguments
    ///
    /// * `tic` - TIC strobe visible this cycle; latches phase and cycle count
    ///   and restarts the count with this edge's carry.
    pub const fn clock(&mut self, tic: bool) {
        let (next, carry) = self.acc.sum();
        if tic {
            let phase = (self.acc.value() >> FINE_PHASE_SHIFT) & PHASE_FIELD_MASK;
            self.carrier_val = ((self.cycles & CARRIER_CYCLE_MASK) << PHASE_FIELD_BITS) | phase;
            self.cycles = carry as u32;
        } else if carry {
            self.cycles = self.cycles.wrapping_add(1) & CARRIER_CYCLE_MASK;
        }
        self.ref_q = reference_for_key(next >> KEY_SHIFT);
        let _ = self.acc.step();
    }

    /// Returns to phase zero with cleared counters. The control word is kept.
    pub const fn reset(&mut self) {
        self.acc.reset();
        self.ref_q = reference_for_key(0);
        self.cycles = 0;
        self.carrier_val = 0;
    }
}
