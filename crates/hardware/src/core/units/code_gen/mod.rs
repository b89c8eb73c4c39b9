//! C/A Code Generator.
//!
//! Produces the early, prompt, and late replica chips of one PRN, advancing
//! one half-chip per code NCO enable. It provides:
//! 1. **Gold Code LFSRs:** G1/G2 registers with the 37 standard tap programs.
//! 2. **Delay Line:** Early leads and late trails the prompt by [`EARLY_LATE_SPACING`] half-chips.
//! 3. **Slew:** Positive slews swallow enables (delay); negative slews insert extra steps (advance).
//! 4. **Strobes:** Registered epoch (prompt entered half-chip 0) and full-chip strobes.

/// G1/G2 shift registers and the reference sequence generator.
pub mod lfsr;

pub use lfsr::{GoldLfsr, gold_code, taps_for};

use crate::common::constants::HALF_CHIPS_PER_EPOCH;

/// Spacing between adjacent replica taps in half-chips.
///
/// Early is `EARLY_LATE_SPACING` half-chips ahead of prompt and late is the
/// same distance behind.
pub const EARLY_LATE_SPACING: u32 = 1;

/// Delay line holds the head (early) plus two spacings of history.
const LINE_MASK: u32 = (1 << (2 * EARLY_LATE_SPACING + 1)) - 1;

/// Replica chip values of the three correlator branches (bit 1 maps to -1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplicaChips {
    /// Early replica chip.
    pub early: bool,
    /// Prompt replica chip.
    pub prompt: bool,
    /// Late replica chip.
    pub late: bool,
}

/// Half-chip stepped C/A replica generator.
#[derive(Clone, Debug, Default)]
pub struct CodeGenerator {
    lfsr: Option<GoldLfsr>,
    prn: u32,
    /// Head (early tap) sits in the second half of its chip.
    second_half: bool,
    line: u32,
    prompt_hc: u16,
    epoch_q: bool,
    full_chip_q: bool,
    swallow: u16,
    advance: u16,
}

impl CodeGenerator {
    /// Creates an idle generator with no PRN loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the loaded PRN, or 0 when idle.
    pub const fn prn(&self) -> u32 {
        self.prn
    }

    /// Returns `true` once a PRN has been loaded.
    pub const fn is_loaded(&self) -> bool {
        self.lfsr.is_some()
    }

    /// Loads a PRN and primes the generator so the prompt sits at half-chip 0.
    ///
    /// Pending slews are discarded and no epoch strobe is raised.
    ///
    /// # Returns
    ///
    /// `false` (and no state change) when `prn` has no tap program.
    pub fn load_prn(&mut self, prn: u32) -> bool {
        let Some(taps) = taps_for(prn) else {
            return false;
        };
        self.prn = prn;
        self.lfsr = Some(GoldLfsr::new(taps));
        self.prime();
        true
    }

    /// Returns the generator to the all-ones start of the loaded PRN.
    pub fn prime(&mut self) {
        let Some(lfsr) = self.lfsr.as_mut() else {
            return;
        };
        lfsr.reset();
        self.second_half = false;
        self.line = u32::from(lfsr.chip());
        for _ in 0..u32::from(HALF_CHIPS_PER_EPOCH) + EARLY_LATE_SPACING {
            let _ = self.step();
        }
        self.prompt_hc = 0;
        self.epoch_q = false;
        self.full_chip_q = false;
        self.swallow = 0;
        self.advance = 0;
    }

    /// Drops the PRN and returns to the idle state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Queues a code slew in half-chips.
    ///
    /// Positive values delay the replica by swallowing that many enables;
    /// negative values advance it by inserting one extra step per clock.
    pub fn slew(&mut self, half_chips: i16) {
        let amount = half_chips.unsigned_abs();
        if half_chips >= 0 {
            self.swallow = self.swallow.saturating_add(amount);
        } else {
            self.advance = self.advance.saturating_add(amount);
        }
    }

    /// Returns the number of enables still to be swallowed and steps still to be inserted.
    pub const fn pending_slew(&self) -> (u16, u16) {
        (self.swallow, self.advance)
    }

    /// Returns the three replica taps for this cycle.
    #[inline(always)]
    pub const fn chips(&self) -> ReplicaChips {
        ReplicaChips {
            early: self.line & 1 != 0,
            prompt: (self.line >> EARLY_LATE_SPACING) & 1 != 0,
            late: (self.line >> (2 * EARLY_LATE_SPACING)) & 1 != 0,
        }
    }

    /// Returns the prompt half-chip index (0..2046).
    pub const fn prompt_hc(&self) -> u16 {
        self.prompt_hc
    }

    /// Registered strobe: the prompt entered half-chip 0 at the last edge.
    #[inline(always)]
    pub const fn epoch_start(&self) -> bool {
        self.epoch_q
    }

    /// Registered strobe: the prompt crossed a chip boundary at the last edge.
    pub const fn full_chip(&self) -> bool {
        self.full_chip_q
    }

    /// Advances one clock.
    ///
    /// # Arguments
    ///
    /// * `hc_enable` - Half-chip enable from the code NCO, visible this cycle.
    pub fn clock(&mut self, hc_enable: bool) {
        let mut steps = 0_u8;
        if hc_enable {
            if self.swallow > 0 {
                self.swallow -= 1;
            } else {
                steps += 1;
            }
        }
        if self.advance > 0 {
            self.advance -= 1;
            steps += 1;
        }

        let mut epoch = false;
        let mut full_chip = false;
        for _ in 0..steps {
            let (e, f) = self.step();
            epoch |= e;
            full_chip |= f;
        }
        self.epoch_q = epoch;
        self.full_chip_q = full_chip;
    }

    /// Moves every tap one half-chip forward.
    ///
    /// Returns whether the prompt entered half-chip 0 and whether it entered a new chip.
    fn step(&mut self) -> (bool, bool) {
        let Some(lfsr) = self.lfsr.as_mut() else {
            return (false, false);
        };
        if self.second_half {
            lfsr.shift();
        }
        self.second_half = !self.second_half;
        self.line = ((self.line << 1) | u32::from(lfsr.chip())) & LINE_MASK;
        self.prompt_hc += 1;
        if self.prompt_hc == HALF_CHIPS_PER_EPOCH {
            self.prompt_hc = 0;
        }
        (self.prompt_hc == 0, self.prompt_hc % 2 == 0)
    }
}
