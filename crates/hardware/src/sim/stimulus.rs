//! IF stimulus generator.
//!
//! Synthesizes the 2-bit sign/magnitude sample stream of one GPS L1 C/A
//! satellite at a real IF. The generator:
//! 1. **Spreads:** Multiplies the carrier by the PRN's C/A chips at the nominal chip rate,
//!    starting `delay` chips into the code.
//! 2. **Adds Noise:** Scales the signal for the requested C/N0 against unit-variance Gaussian noise.
//! 3. **Modulates Data:** Flips the sign of the stream every [`DATA_BIT_EPOCHS`] code epochs.
//! 4. **Quantizes:** Maps each value to a sign bit and a magnitude bit.
//!
//! The noise comes from a seeded ChaCha stream, so a given seed always
//! reproduces the same samples.

use std::f64::consts::TAU;
use std::io::{self, BufRead, Write};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::common::constants::{CA_CODE_LENGTH, CHIP_RATE_HZ};
use crate::common::error::StimulusError;
use crate::common::signal::IfSample;
use crate::core::units::code_gen::gold_code;

/// Magnitude threshold: P(|x| < T) = 0.68 for unit Gaussian noise.
pub const QUANT_THRESHOLD: f64 = 0.9944578832;

/// Code epochs between data bit transitions.
pub const DATA_BIT_EPOCHS: u64 = 5;

const CODE_LEN: f64 = CA_CODE_LENGTH as f64;

/// Generator parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct StimulusConfig {
    /// Satellite PRN (1..=37).
    pub prn: u32,
    /// Code delay in chips, in [0, 1023].
    pub delay_chips: f64,
    /// Carrier Doppler in Hz.
    pub doppler_hz: f64,
    /// IF centre frequency in Hz.
    pub if_hz: f64,
    /// Sample rate in Hz.
    pub sample_rate_hz: f64,
    /// Carrier-to-noise density in dB-Hz.
    pub cn0_dbhz: f64,
    /// Noise seed.
    pub seed: u64,
    /// Toggle the data bit every [`DATA_BIT_EPOCHS`] epochs.
    pub data_bits: bool,
}

impl Default for StimulusConfig {
    fn default() -> Self {
        Self {
            prn: 1,
            delay_chips: 0.0,
            doppler_hz: 0.0,
            if_hz: 4.092e6,
            sample_rate_hz: 16.368e6,
            cn0_dbhz: 45.0,
            seed: 1,
            data_bits: true,
        }
    }
}

/// Maps a real value to a 2-bit sample.
pub fn quantize(x: f64) -> IfSample {
    IfSample {
        sign: x >= 0.0,
        mag: x.abs() >= QUANT_THRESHOLD,
    }
}

/// Sample stream of one satellite; iterates forever.
#[derive(Debug)]
pub struct IfGenerator {
    chips: Vec<f64>,
    amplitude: f64,
    phase: f64,
    phase_step: f64,
    code_start: f64,
    chip_step: f64,
    n: u64,
    prev_chip: Option<f64>,
    epochs: u64,
    data_bit: f64,
    data_bits: bool,
    rng: ChaCha8Rng,
}

impl IfGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`StimulusError`] for a PRN without taps, a delay outside one
    /// code period, or a non-positive sample rate.
    pub fn new(config: &StimulusConfig) -> Result<Self, StimulusError> {
        if !(config.sample_rate_hz.is_finite() && config.sample_rate_hz > 0.0) {
            return Err(StimulusError::SampleRate(config.sample_rate_hz));
        }
        if !(0.0..=CODE_LEN).contains(&config.delay_chips) {
            return Err(StimulusError::Delay(config.delay_chips));
        }
        let code = gold_code(config.prn).ok_or(StimulusError::Prn(config.prn))?;
        let chips = code
            .iter()
            .map(|&bit| if bit == 0 { 1.0 } else { -1.0 })
            .collect();

        let cn0 = 10_f64.powf(config.cn0_dbhz / 10.0);
        Ok(Self {
            chips,
            amplitude: (4.0 * cn0 / config.sample_rate_hz).sqrt(),
            phase: 0.0,
            phase_step: TAU * (config.if_hz + config.doppler_hz) / config.sample_rate_hz,
            code_start: (CODE_LEN - config.delay_chips).rem_euclid(CODE_LEN),
            chip_step: CHIP_RATE_HZ / config.sample_rate_hz,
            n: 0,
            prev_chip: None,
            epochs: 0,
            data_bit: 1.0,
            data_bits: config.data_bits,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Returns the signal amplitude relative to unit noise.
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Returns the number of complete code epochs generated so far.
    pub const fn epochs(&self) -> u64 {
        self.epochs
    }

    /// Returns the next unquantized value.
    pub fn next_value(&mut self) -> f64 {
        let chip_f = (self.code_start + self.n as f64 * self.chip_step).rem_euclid(CODE_LEN);
        if let Some(prev) = self.prev_chip
            && chip_f < prev
        {
            self.epochs += 1;
            if self.data_bits && self.epochs % DATA_BIT_EPOCHS == 0 {
                self.data_bit = -self.data_bit;
            }
        }
        self.prev_chip = Some(chip_f);

        let chip = self.chips[(chip_f as usize).min(CA_CODE_LENGTH - 1)];
        let noise: f64 = StandardNormal.sample(&mut self.rng);
        let value = (self.amplitude * chip * self.phase.cos() + noise) * self.data_bit;

        self.phase += self.phase_step;
        if self.phase > TAU {
            self.phase = self.phase.rem_euclid(TAU);
        }
        self.n += 1;
        value
    }
}

impl Iterator for IfGenerator {
    type Item = IfSample;

    fn next(&mut self) -> Option<IfSample> {
        Some(quantize(self.next_value()))
    }
}

/// Writes samples as `"sign mag"` lines.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_text<W: Write>(
    out: &mut W,
    samples: impl IntoIterator<Item = IfSample>,
) -> io::Result<()> {
    for s in samples {
        writeln!(out, "{} {}", u8::from(s.sign), u8::from(s.mag))?;
    }
    Ok(())
}

/// Parses one `"sign mag"` line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidData`] for a malformed line.
pub fn parse_line(line: &str) -> io::Result<Option<IfSample>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut fields = line.split_whitespace().map(str::parse::<u8>);
    match (fields.next(), fields.next()) {
        (Some(Ok(sign @ 0..=1)), Some(Ok(mag @ 0..=1))) => Ok(Some(IfSample::from_bits(sign, mag))),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("malformed IF sample line: {line:?}"),
        )),
    }
}

/// Streaming reader of `"sign mag"` lines.
///
/// Yields one item per sample line; blank and comment lines are skipped.
#[derive(Debug)]
pub struct TextSamples<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> TextSamples<R> {
    /// Wraps a buffered reader.
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
        }
    }
}

impl<R: BufRead> Iterator for TextSamples<R> {
    type Item = io::Result<IfSample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            match parse_line(&line) {
                Ok(Some(sample)) => return Some(Ok(sample)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Reads every sample of a text stream.
///
/// # Errors
///
/// Returns I/O errors and malformed lines.
pub fn read_text<R: BufRead>(input: R) -> io::Result<Vec<IfSample>> {
    TextSamples::new(input).collect()
}
