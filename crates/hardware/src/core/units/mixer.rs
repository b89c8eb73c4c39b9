//! Carrier Mixer.
//!
//! Downconverts one 2-bit IF sample against the carrier reference. The
//! product sign is the XOR of the operand signs and the product magnitude
//! comes from a 2×2 table indexed by the two magnitude bits, so no
//! multiplier is needed.

use crate::common::signal::{CarrierRef, IfSample, RefLevel};

/// Sign/magnitude multiplier for the I and Q arms.
#[derive(Clone, Copy, Debug)]
pub struct CarrierMixer {
    /// `[if_high][ref_high]` product magnitudes.
    magnitude: [[i16; 2]; 2],
}

impl Default for CarrierMixer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl CarrierMixer {
    /// Creates a mixer for an IF high level of `if_high` (low level is 1).
    pub const fn new(if_high: i16) -> Self {
        Self {
            magnitude: [[1, 2], [if_high, 2 * if_high]],
        }
    }

    /// Multiplies one IF sample by one reference level.
    #[inline(always)]
    pub const fn product(&self, sample: IfSample, level: RefLevel) -> i16 {
        let mag = self.magnitude[sample.mag as usize][level.high as usize];
        if sample.is_negative() ^ level.negative {
            -mag
        } else {
            mag
        }
    }

    /// Returns the (I, Q) contributions of one sample.
    #[inline(always)]
    pub const fn mix(&self, sample: IfSample, carrier: CarrierRef) -> (i16, i16) {
        (
            self.product(sample, carrier.i),
            self.product(sample, carrier.q),
        )
    }
}
