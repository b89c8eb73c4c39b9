//! Numerically Controlled Oscillators.
//!
//! Both NCOs are built on the same fixed-width phase accumulator. This module
//! provides:
//! 1. **Phase Accumulator:** A wrapping `width`-bit adder with a carry-out per sample.
//! 2. **Control Word Helpers:** Conversions between frequency and control word.
//! 3. **Code NCO:** Half-chip enable generation for the code generator.
//! 4. **Carrier NCO:** Quantized I/Q carrier reference and cycle counting.

/// Carrier NCO with 8-phase reference table and cycle counter.
pub mod carrier;

/// Code NCO with half-chip enable edge detector.
pub mod code;

pub use carrier::CarrierNco;
pub use code::CodeNco;

/// A wrapping phase accumulator of `width` bits.
///
/// The value advances by the control word once per sample. The carry-out of
/// the addition marks one full cycle of the synthesized frequency, so the
/// output frequency is `fcw * sample_rate / 2^width`.
#[derive(Clone, Debug)]
pub struct PhaseAccumulator {
    width: u32,
    value: u32,
    fcw: u32,
}

impl PhaseAccumulator {
    /// Creates an accumulator of `width` bits (at most 31) at phase zero with a zero control word.
    pub const fn new(width: u32) -> Self {
        Self {
            width,
            value: 0,
            fcw: 0,
        }
    }

    /// Returns the accumulator width in bits.
    #[inline(always)]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the mask of valid accumulator bits.
    #[inline(always)]
    pub const fn mask(&self) -> u32 {
        (1 << self.width) - 1
    }

    /// Returns the current (registered) phase value.
    #[inline(always)]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Returns the control word.
    #[inline(always)]
    pub const fn fcw(&self) -> u32 {
        self.fcw
    }

    /// Sets the control word, truncated to the accumulator width.
    pub const fn set_fcw(&mut self, fcw: u32) {
        self.fcw = fcw & self.mask();
    }

    /// Returns the next value and carry-out without registering them.
    ///
    /// This is the pre-registered sum used for one-cycle lookahead.
    #[inline(always)]
    pub const fn sum(&self) -> (u32, bool) {
        let wide = self.value as u64 + self.fcw as u64;
        ((wide as u32) & self.mask(), (wide >> self.width) != 0)
    }

    /// Registers the next value and returns the carry-out of this edge.
    #[inline(always)]
    pub const fn step(&mut self) -> bool {
        let (next, carry) = self.sum();
        self.value = next;
        carry
    }

    /// Returns the phase to zero. The control word is kept.
    pub const fn reset(&mut self) {
        self.value = 0;
    }
}

/// Returns the control word that synthesizes `freq_hz` at `sample_rate_hz`.
///
/// # Arguments
///
/// * `freq_hz` - Desired output frequency; negative values wrap like the hardware adder.
/// * `sample_rate_hz` - Accumulator update rate.
/// * `width` - Accumulator width in bits.
pub fn fcw_for(freq_hz: f64, sample_rate_hz: f64, width: u32) -> u32 {
    let modulus = (1_u64 << width) as f64;
    let word = (freq_hz / sample_rate_hz * modulus).round().rem_euclid(modulus);
    (word as u64 & ((1_u64 << width) - 1)) as u32
}

/// Returns the frequency synthesized by `fcw` at `sample_rate_hz`.
pub fn freq_of(fcw: u32, sample_rate_hz: f64, width: u32) -> f64 {
    f64::from(fcw) * sample_rate_hz / (1_u64 << width) as f64
}
