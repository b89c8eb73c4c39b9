//! Correlator Accumulator.
//!
//! Integrates the mixer output of one branch (early, prompt, or late) over a
//! code epoch. The replica chip gates the sign of each contribution. On dump
//! the running sum is snapshot into the visible 16-bit pair and the sum
//! restarts with the contribution of the sample on which the dump falls.

use tracing::warn;

use crate::common::signal::IqPair;

/// Result of an accumulator dump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dumped {
    /// Saturated I/Q sums.
    pub value: IqPair,
    /// Samples integrated into this dump.
    pub samples: u32,
    /// `true` when either arm clipped to the 16-bit range.
    pub saturated: bool,
}

/// One branch integrate-and-dump.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    sum_i: i32,
    sum_q: i32,
    samples: u32,
    value: IqPair,
}

const fn saturate(v: i32) -> (i16, bool) {
    if v > i16::MAX as i32 {
        (i16::MAX, true)
    } else if v < i16::MIN as i32 {
        (i16::MIN, true)
    } else {
        (v as i16, false)
    }
}

impl Accumulator {
    /// Creates a cleared accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last dumped pair.
    pub const fn value(&self) -> IqPair {
        self.value
    }

    /// Returns the running (not yet dumped) sums.
    pub const fn running(&self) -> (i32, i32) {
        (self.sum_i, self.sum_q)
    }

    /// Integrates one sample, dumping first when `dump` is set.
    ///
    /// # Arguments
    ///
    /// * `mixed` - (I, Q) mixer products of this sample.
    /// * `chip` - Replica chip bit of this branch; 1 negates the contribution.
    /// * `dump` - Epoch boundary strobe visible this cycle.
    pub fn clock(&mut self, mixed: (i16, i16), chip: bool, dump: bool) -> Option<Dumped> {
        let (ci, cq) = if chip {
            (-i32::from(mixed.0), -i32::from(mixed.1))
        } else {
            (i32::from(mixed.0), i32::from(mixed.1))
        };

        if !dump {
            self.sum_i = self.sum_i.saturating_add(ci);
            self.sum_q = self.sum_q.saturating_add(cq);
            self.samples = self.samples.saturating_add(1);
            return None;
        }

        let (i, sat_i) = saturate(self.sum_i);
        let (q, sat_q) = saturate(self.sum_q);
        if sat_i || sat_q {
            warn!(
                sum_i = self.sum_i,
                sum_q = self.sum_q,
                "correlator sum saturated to 16 bits"
            );
        }
        let dumped = Dumped {
            value: IqPair::new(i, q),
            samples: self.samples,
            saturated: sat_i || sat_q,
        };
        self.value = dumped.value;
        self.sum_i = ci;
        self.sum_q = cq;
        self.samples = 1;
        Some(dumped)
    }

    /// Clears the sums and the visible pair.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
