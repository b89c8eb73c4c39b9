//! Code NCO.
//!
//! A 28-bit phase accumulator clocked at the sample rate. Each carry-out
//! marks one half-chip of the replica code. The carry is registered and
//! passed through a rising-edge detector, so a control word near full scale
//! (carry high on consecutive samples) still yields a single enable.
//!
//! The fine code phase, accumulator bits [27:18], is latched on TIC.

use super::PhaseAccumulator;
use crate::common::constants::{CODE_NCO_WIDTH, PHASE_FIELD_MASK};

/// Shift of the 10-bit fine phase field inside the 28-bit accumulator.
const FINE_PHASE_SHIFT: u32 = CODE_NCO_WIDTH - 10;

/// Half-chip rate oscillator.
#[derive(Clone, Debug)]
pub struct CodeNco {
    acc: PhaseAccumulator,
    carry_q: bool,
    carry_prev_q: bool,
    phase_latch: u32,
}

impl Default for CodeNco {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeNco {
    /// Creates a code NCO at phase zero with a zero control word.
    pub const fn new() -> Self {
        Self {
            acc: PhaseAccumulator::new(CODE_NCO_WIDTH),
            carry_q: false,
            carry_prev_q: false,
            phase_latch: 0,
        }
    }

    /// Sets the control word (28 bits).
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

    /// Half-chip enable: registered carry rose this cycle.
    #[inline(always)]
    pub const fn hc_enable(&self) -> bool {
        self.carry_q && !self.carry_prev_q
    }

    /// Fine code phase latched at the last TIC.
    pub const fn latched_phase(&self) -> u32 {
        self.phase_latch
    }

    /// Advances one sample.
    ///
    /// # Arguments
    ///
    /// * `tic` - TIC strobe visible this cycle; latches the current fine phase.
    pub const fn clock(&mut self, tic: bool) {
        if tic {
            self.phase_latch = (self.acc.value() >> FINE_PHASE_SHIFT) & PHASE_FIELD_MASK;
        }
        self.carry_prev_q = self.carry_q;
        self.carry_q = self.acc.step();
    }

    /// Returns to phase zero with no pending enable. The control word is kept.
    pub const fn reset(&mut self) {
        self.acc.reset();
        self.carry_q = false;
        self.carry_prev_q = false;
        self.phase_latch = 0;
    }
}
