//! Epoch Counter.
//!
//! Counts completed code periods in two independent ways and checks that
//! they agree. It provides:
//! 1. **Epoch:** 1 ms and 20 ms counters advanced by the code generator's epoch strobe.
//! 2. **Epoch Check:** The same counters advanced by a tally of raw code NCO half-chip enables.
//! 3. **Desync Detection:** A sticky fault raised when the two strobes disagree.
//! 4. **Latching:** Both packed words are latched on TIC for readout.
//!
//! A packed epoch word holds the data-bit count in bits [10:5] and the
//! millisecond count in bits [4:0].

use crate::common::constants::{
    BITS_PER_WRAP, EPOCH_BIT_MASK, EPOCH_BIT_SHIFT, EPOCH_MS_MASK, EPOCHS_PER_BIT,
    HALF_CHIPS_PER_EPOCH,
};

/// A millisecond (0..20) plus data-bit (0..50) counter pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EpochCount {
    /// Code epochs within the current data bit.
    pub ms: u8,
    /// Data bits within the current second.
    pub bit: u8,
}

impl EpochCount {
    /// Unpacks a register word; out-of-range fields wrap into range.
    pub const fn from_packed(word: u16) -> Self {
        Self {
            ms: ((word & EPOCH_MS_MASK) as u8) % EPOCHS_PER_BIT,
            bit: (((word >> EPOCH_BIT_SHIFT) & EPOCH_BIT_MASK) as u8) % BITS_PER_WRAP,
        }
    }

    /// Packs the counters into a register word.
    pub const fn packed(self) -> u16 {
        ((self.bit as u16) << EPOCH_BIT_SHIFT) | self.ms as u16
    }

    /// Counts one epoch. Returns `true` when a data-bit boundary is crossed.
    pub const fn advance(&mut self) -> bool {
        self.ms += 1;
        if self.ms < EPOCHS_PER_BIT {
            return false;
        }
        self.ms = 0;
        self.bit += 1;
        if self.bit == BITS_PER_WRAP {
            self.bit = 0;
        }
        true
    }
}

/// Inputs of one epoch counter edge, all visible in the current cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct EpochInputs {
    /// TIC strobe; latches both words.
    pub tic: bool,
    /// Code generator epoch strobe.
    pub code_epoch: bool,
    /// Code NCO half-chip enable.
    pub hc_enable: bool,
}

/// Dual epoch counter with consistency check.
#[derive(Clone, Debug, Default)]
pub struct EpochCounter {
    epoch: EpochCount,
    check: EpochCount,
    tally: u16,
    tally_wrapped_q: bool,
    bit_boundary_q: bool,
    desync: bool,
    epoch_latch: u16,
    check_latch: u16,
}

impl EpochCounter {
    /// Creates a counter at zero, aligned with a freshly primed generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live epoch counters.
    pub const fn epoch(&self) -> EpochCount {
        self.epoch
    }

    /// Returns the live epoch check counters.
    pub const fn check(&self) -> EpochCount {
        self.check
    }

    /// Returns the epoch word latched at the last TIC.
    pub const fn latched_epoch(&self) -> u16 {
        self.epoch_latch
    }

    /// Returns the epoch check word latched at the last TIC.
    pub const fn latched_check(&self) -> u16 {
        self.check_latch
    }

    /// Returns the half-chip tally position (0..2046).
    pub const fn tally(&self) -> u16 {
        self.tally
    }

    /// Registered strobe: the epoch counter crossed a data-bit boundary at the last edge.
    pub const fn bit_boundary(&self) -> bool {
        self.bit_boundary_q
    }

    /// Returns `true` once the code generator and the NCO tally have diverged.
    pub const fn desync(&self) -> bool {
        self.desync
    }

    /// Advances one clock.
    ///
    /// Returns `true` on the edge that first raises the desync fault.
    pub const fn clock(&mut self, inputs: EpochInputs) -> bool {
        if inputs.tic {
            self.epoch_latch = self.epoch.packed();
            self.check_latch = self.check.packed();
        }

        let raised = !self.desync && (inputs.code_epoch != self.tally_wrapped_q);
        if raised {
            self.desync = true;
        }

        self.bit_boundary_q = inputs.code_epoch && self.epoch.advance();
        if self.tally_wrapped_q {
            let _ = self.check.advance();
        }

        self.tally_wrapped_q = false;
        if inputs.hc_enable {
            self.tally += 1;
            if self.tally == HALF_CHIPS_PER_EPOCH {
                self.tally = 0;
            }
            self.tally_wrapped_q = self.tally == 0;
        }
        raised
    }

    /// Realigns the tally with the code generator and clears the fault.
    ///
    /// # Arguments
    ///
    /// * `prompt_hc` - Generator prompt half-chip index after this edge.
    /// * `epoch_start` - Generator epoch strobe after this edge.
    pub const fn realign(&mut self, prompt_hc: u16, epoch_start: bool) {
        self.tally = prompt_hc;
        self.tally_wrapped_q = epoch_start;
        self.desync = false;
    }

    /// Sets both counters from a packed word and realigns the tally.
    pub const fn load(&mut self, word: u16, prompt_hc: u16, epoch_start: bool) {
        self.epoch = EpochCount::from_packed(word);
        self.check = self.epoch;
        self.realign(prompt_hc, epoch_start);
    }

    /// Returns every counter and latch to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
