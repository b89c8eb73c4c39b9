//! Quantized Signal Types.
//!
//! This module defines the small fixed-point values that flow between the
//! datapath blocks. It provides the following:
//! 1. **IF Samples:** The 2-bit sign/magnitude input delivered once per sample.
//! 2. **Reference Levels:** The sign/magnitude carrier reference produced by the carrier NCO.
//! 3. **Correlator Values:** Signed I/Q pairs produced by the accumulators.

use serde::Serialize;

/// One 2-bit quantized IF sample.
///
/// The sign bit is 1 for a positive sample; the magnitude bit selects the
/// high level. The numeric value of the high level is not part of the sample
/// (it is a mixer parameter), so the same stream can be replayed against
/// different quantizer scales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IfSample {
    /// Sign bit: `true` for a positive sample.
    pub sign: bool,
    /// Magnitude bit: `true` for the high level.
    pub mag: bool,
}

impl IfSample {
    /// Creates a sample from its raw sign and magnitude bits.
    #[inline]
    pub const fn from_bits(sign: u8, mag: u8) -> Self {
        Self {
            sign: sign & 1 != 0,
            mag: mag & 1 != 0,
        }
    }

    /// Returns `true` when the sample is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        !self.sign
    }

    /// Returns the signed amplitude of the sample for a given high level.
    ///
    /// # Arguments
    ///
    /// * `high` - The numeric value of the high magnitude (3 for the stimulus generator).
    pub fn value(self, high: i16) -> i16 {
        let mag = if self.mag { high } else { 1 };
        if self.sign { mag } else { -mag }
    }
}

/// One quantized carrier reference level.
///
/// Encodes sign and magnitude separately so the mixer can form products with
/// an XOR and a table lookup. The magnitude is 1 or 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RefLevel {
    /// `true` for a negative level.
    pub negative: bool,
    /// `true` for magnitude 2, `false` for magnitude 1.
    pub high: bool,
}

impl RefLevel {
    /// Builds a reference level from a signed value in {-2, -1, 1, 2}.
    pub const fn from_value(value: i8) -> Self {
        Self {
            negative: value < 0,
            high: value == 2 || value == -2,
        }
    }

    /// Returns the signed numeric value of the level.
    pub const fn value(self) -> i8 {
        let mag = if self.high { 2 } else { 1 };
        if self.negative { -mag } else { mag }
    }
}

/// In-phase and quadrature reference pair emitted by the carrier NCO.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarrierRef {
    /// Cosine-like in-phase reference.
    pub i: RefLevel,
    /// Negative-sine-like quadrature reference.
    pub q: RefLevel,
}

/// Signed correlator output of one branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IqPair {
    /// In-phase sum.
    pub i: i16,
    /// Quadrature sum.
    pub q: i16,
}

impl IqPair {
    /// Creates a new pair.
    pub const fn new(i: i16, q: i16) -> Self {
        Self { i, q }
    }

    /// Returns the branch power I² + Q².
    pub fn power(self) -> i64 {
        let i = i64::from(self.i);
        let q = i64::from(self.q);
        i * i + q * q
    }
}
