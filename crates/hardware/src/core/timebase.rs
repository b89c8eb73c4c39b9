//! TimeBase.
//!
//! Divides the sample clock into the two timing grids shared by every
//! channel. It provides:
//! 1. **TIC Grid:** A self-reloading down-counter raising preTIC, with TIC one sample later.
//! 2. **Accumulator Grid:** An independent down-counter raising the accumulator interrupt pulse.
//! 3. **Counters:** Running totals of TICs and accumulator pulses for the status block.
//!
//! Each counter pulses when it reaches zero and reloads on the same edge, so
//! the period is `reload + 1` samples. A reload of zero pulses every sample.

use crate::common::constants::DIVIDE_MASK;

/// Single-cycle timing strobes broadcast to every channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingPulses {
    /// Precedes `tic` by one sample.
    pub pre_tic: bool,
    /// Measurement latch strobe.
    pub tic: bool,
    /// Accumulator interrupt strobe.
    pub accum_pulse: bool,
}

/// Sample-clock divider for the TIC and accumulator grids.
#[derive(Clone, Debug)]
pub struct TimeBase {
    tic_divide: u32,
    accum_divide: u32,
    tic_counter: u32,
    accum_counter: u32,
    tic_q: bool,
    tic_count: u32,
    accum_count: u32,
}

impl TimeBase {
    /// Creates a TimeBase with both counters loaded from their reload values.
    ///
    /// # Arguments
    ///
    /// * `tic_divide` - preTIC reload (24 bits).
    /// * `accum_divide` - Accumulator pulse reload (24 bits).
    pub const fn new(tic_divide: u32, accum_divide: u32) -> Self {
        let tic_divide = tic_divide & DIVIDE_MASK;
        let accum_divide = accum_divide & DIVIDE_MASK;
        Self {
            tic_divide,
            accum_divide,
            tic_counter: tic_divide,
            accum_counter: accum_divide,
            tic_q: false,
            tic_count: 0,
            accum_count: 0,
        }
    }

    /// Returns the strobes visible this cycle.
    #[inline(always)]
    pub const fn pulses(&self) -> TimingPulses {
        TimingPulses {
            pre_tic: self.tic_counter == 0,
            tic: self.tic_q,
            accum_pulse: self.accum_counter == 0,
        }
    }

    /// Returns the TIC reload value.
    pub const fn tic_divide(&self) -> u32 {
        self.tic_divide
    }

    /// Returns the accumulator pulse reload value.
    pub const fn accum_divide(&self) -> u32 {
        self.accum_divide
    }

    /// Sets the TIC reload; takes effect at the next reload.
    pub const fn set_tic_divide(&mut self, value: u32) {
        self.tic_divide = value & DIVIDE_MASK;
    }

    /// Sets the accumulator pulse reload; takes effect at the next reload.
    pub const fn set_accum_divide(&mut self, value: u32) {
        self.accum_divide = value & DIVIDE_MASK;
    }

    /// Returns the number of TICs since reset.
    pub const fn tic_count(&self) -> u32 {
        self.tic_count
    }

    /// Returns the number of accumulator pulses since reset.
    pub const fn accum_count(&self) -> u32 {
        self.accum_count
    }

    /// Advances one sample.
    pub const fn clock(&mut self) {
        let pulses = self.pulses();

        self.tic_q = pulses.pre_tic;
        self.tic_counter = if pulses.pre_tic {
            self.tic_divide
        } else {
            self.tic_counter - 1
        };
        self.accum_counter = if pulses.accum_pulse {
            self.accum_divide
        } else {
            self.accum_counter - 1
        };

        if pulses.tic {
            self.tic_count = self.tic_count.wrapping_add(1);
        }
        if pulses.accum_pulse {
            self.accum_count = self.accum_count.wrapping_add(1);
        }
    }
}
