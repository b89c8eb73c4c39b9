//! Error and Fault definitions.
//!
//! The clocked core never fails at runtime; every error here belongs to the
//! layers around it. This module provides:
//! 1. **Configuration Errors:** Rejected configuration files and out-of-range fields.
//! 2. **Stimulus Errors:** Invalid IF generator parameters.
//! 3. **Faults:** Runtime conditions that controlling software must act on.
//! 4. **Simulation Errors:** The umbrella type returned by the simulator and CLI.

use std::io;

use thiserror::Error;

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The channel count is zero or exceeds what the register map can address.
    #[error("channel count {count} outside 1..={max}")]
    ChannelCount {
        /// Requested number of channels.
        count: usize,
        /// Highest addressable channel count.
        max: usize,
    },

    /// More power-on channel entries were given than channels exist.
    #[error("{given} channel entries configured but only {count} channels exist")]
    TooManyChannelEntries {
        /// Number of entries in the `channels` list.
        given: usize,
        /// Configured channel count.
        count: usize,
    },

    /// The sample-enable divide is zero or the phase does not fall inside it.
    #[error("sample enable phase {phase} must be below divide {divide} (divide >= 1)")]
    SampleEnable {
        /// Sample-enable divide ratio.
        divide: u32,
        /// Sample-enable phase.
        phase: u32,
    },

    /// A numeric field does not fit its hardware register.
    #[error("{field} = {value:#x} does not fit in {bits} bits")]
    FieldWidth {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: u64,
        /// Register width in bits.
        bits: u32,
    },

    /// A PRN outside the standard tap table was requested.
    #[error("PRN {0} not supported (1..=37)")]
    Prn(u32),

    /// The IF high magnitude must be at least 2 to be distinguishable from the low level.
    #[error("IF high magnitude {0} must be at least 2")]
    IfMagnitude(i16),

    /// The sample rate must be positive.
    #[error("sample rate {0} Hz must be positive")]
    SampleRate(f64),

    /// The configuration text is not valid JSON for this schema.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by the IF stimulus generator.
#[derive(Debug, Error, PartialEq)]
pub enum StimulusError {
    /// PRN outside the 37 standard programs.
    #[error("PRN {0} not supported (1..=37)")]
    Prn(u32),

    /// Code delay outside one code period.
    #[error("code delay {0} chips must be in [0, 1023]")]
    Delay(f64),

    /// Sample rate is zero, negative, or not finite.
    #[error("sample rate {0} Hz must be positive")]
    SampleRate(f64),
}

/// Runtime faults surfaced to controlling software.
///
/// A fault means the channel's measurements can no longer be trusted and the
/// satellite must be re-acquired; the core never clears one on its own.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The code generator's epoch strobe and the NCO-derived epoch tally diverged.
    #[error(
        "channel {channel}: code generator and NCO epochs diverged \
         (epoch {epoch:#06x}, epoch_check {epoch_check:#06x}); re-acquire"
    )]
    EpochDesync {
        /// Channel index.
        channel: usize,
        /// Last tic-latched epoch.
        epoch: u16,
        /// Last tic-latched epoch check.
        epoch_check: u16,
    },
}

/// Umbrella error for simulation runs.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Stimulus parameters rejected.
    #[error(transparent)]
    Stimulus(#[from] StimulusError),

    /// A runtime fault was raised by a channel.
    #[error(transparent)]
    Fault(#[from] Fault),

    /// A channel index outside the configured bank was requested.
    #[error("channel {channel} not present ({count} channels configured)")]
    NoSuchChannel {
        /// Requested channel.
        channel: usize,
        /// Configured channel count.
        count: usize,
    },

    /// Writing dump records failed.
    #[error("dump output failed: {0}")]
    Io(#[from] io::Error),

    /// Serializing a dump record failed.
    #[error("dump serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
