//! Configuration system for the baseband model.
//!
//! This module defines the structures used to parameterize a [`Baseband`](crate::soc::Baseband)
//! instance. It provides:
//! 1. **Defaults:** The nominal 16.368 MHz sample grid, TimeBase divides, and channel start-up values.
//! 2. **Structures:** Hierarchical config for the system, the TimeBase, and power-on channel state.
//! 3. **Validation:** Range checks that mirror the register widths of the hardware.
//!
//! Configuration is supplied as JSON (`Config::from_json_str`, `Config::from_file`) or built
//! from `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{
    CARRIER_NCO_WIDTH, CODE_NCO_WIDTH, DIVIDE_BITS, DIVIDE_MASK, MAX_CHANNELS, PRN_COUNT,
};
use crate::common::error::ConfigError;

/// Default configuration constants for the baseband.
mod defaults {
    /// Nominal IF sample rate (16 × 1.023 MHz).
    pub const SAMPLE_RATE_HZ: f64 = 16.368e6;

    /// Number of tracking channels instantiated.
    pub const CHANNEL_COUNT: usize = 4;

    /// Numeric value of the high IF magnitude; matches the stimulus quantiser.
    pub const IF_HIGH_MAGNITUDE: i16 = 3;

    /// Datapath runs on every clock.
    pub const SAMPLE_ENABLE_DIVIDE: u32 = 1;

    /// Sample-enable phase inside the divide window.
    pub const SAMPLE_ENABLE_PHASE: u32 = 0;

    /// TIC reload for a 10 ms grid at the nominal rate (period = reload + 1).
    pub const TIC_DIVIDE: u32 = 163_679;

    /// Accumulator-interrupt reload for a ~0.9 ms grid at the nominal rate.
    pub const ACCUM_DIVIDE: u32 = 14_730;

    /// Carrier control word for a 4.092 MHz IF at the nominal rate.
    pub const CARRIER_FCW: u32 = 1 << 27;

    /// Code control word for the 2.046 MHz half-chip rate at the nominal rate.
    pub const CODE_FCW: u32 = 1 << 25;

    /// PRN loaded into a configured channel when none is given.
    pub const PRN: u32 = 1;
}

/// Top-level configuration.
///
/// # Example
///
/// ```
/// use gpsbb_core::config::Config;
///
/// let json = r#"{ "system": { "channel_count": 2 }, "channels": [ { "prn": 7 } ] }"#;
/// let config = Config::from_json_str(json).expect("valid config");
/// assert_eq!(config.system.channel_count, 2);
/// assert_eq!(config.channels[0].prn, 7);
/// assert_eq!(config.timebase.tic_divide, 163_679);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Sample grid and channel bank settings.
    #[serde(default)]
    pub system: SystemConfig,

    /// TimeBase divide reload values.
    #[serde(default)]
    pub timebase: TimeBaseConfig,

    /// Power-on state of the first channels; remaining channels start idle.
    #[serde(default)]
    pub channels: Vec<ChannelInit>,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and any validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every field against the width of the register it programs.
    ///
    /// A zero divide reload is accepted; it yields a pulse every sample.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sys = &self.system;
        if sys.channel_count == 0 || sys.channel_count > MAX_CHANNELS {
            return Err(ConfigError::ChannelCount {
                count: sys.channel_count,
                max: MAX_CHANNELS,
            });
        }
        if self.channels.len() > sys.channel_count {
            return Err(ConfigError::TooManyChannelEntries {
                given: self.channels.len(),
                count: sys.channel_count,
            });
        }
        if sys.sample_enable_divide == 0 || sys.sample_enable_phase >= sys.sample_enable_divide {
            return Err(ConfigError::SampleEnable {
                divide: sys.sample_enable_divide,
                phase: sys.sample_enable_phase,
            });
        }
        if sys.if_high_magnitude < 2 {
            return Err(ConfigError::IfMagnitude(sys.if_high_magnitude));
        }
        if !(sys.sample_rate_hz.is_finite() && sys.sample_rate_hz > 0.0) {
            return Err(ConfigError::SampleRate(sys.sample_rate_hz));
        }

        check_width("timebase.tic_divide", self.timebase.tic_divide, DIVIDE_BITS)?;
        check_width("timebase.accum_divide", self.timebase.accum_divide, DIVIDE_BITS)?;

        for ch in &self.channels {
            if ch.prn == 0 || ch.prn > PRN_COUNT {
                return Err(ConfigError::Prn(ch.prn));
            }
            check_width("channels.carrier_fcw", ch.carrier_fcw, CARRIER_NCO_WIDTH)?;
            check_width("channels.code_fcw", ch.code_fcw, CODE_NCO_WIDTH)?;
        }
        Ok(())
    }
}

fn check_width(field: &'static str, value: u32, bits: u32) -> Result<(), ConfigError> {
    if u64::from(value) >> bits != 0 {
        return Err(ConfigError::FieldWidth {
            field,
            value: u64::from(value),
            bits,
        });
    }
    Ok(())
}

/// Sample grid and channel bank configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// IF sample rate in Hz; used to convert frequencies to control words.
    #[serde(default = "SystemConfig::default_sample_rate")]
    pub sample_rate_hz: f64,

    /// Number of tracking channels (1..=14).
    #[serde(default = "SystemConfig::default_channel_count")]
    pub channel_count: usize,

    /// Numeric value of the high IF magnitude used by the mixer.
    #[serde(default = "SystemConfig::default_if_high")]
    pub if_high_magnitude: i16,

    /// The datapath is clocked once every `sample_enable_divide` bus clocks.
    #[serde(default = "SystemConfig::default_enable_divide")]
    pub sample_enable_divide: u32,

    /// Bus clock, counted from reset, on which the datapath enable fires inside each divide window.
    #[serde(default = "SystemConfig::default_enable_phase")]
    pub sample_enable_phase: u32,
}

impl SystemConfig {
    fn default_sample_rate() -> f64 {
        defaults::SAMPLE_RATE_HZ
    }

    fn default_channel_count() -> usize {
        defaults::CHANNEL_COUNT
    }

    fn default_if_high() -> i16 {
        defaults::IF_HIGH_MAGNITUDE
    }

    fn default_enable_divide() -> u32 {
        defaults::SAMPLE_ENABLE_DIVIDE
    }

    fn default_enable_phase() -> u32 {
        defaults::SAMPLE_ENABLE_PHASE
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: defaults::SAMPLE_RATE_HZ,
            channel_count: defaults::CHANNEL_COUNT,
            if_high_magnitude: defaults::IF_HIGH_MAGNITUDE,
            sample_enable_divide: defaults::SAMPLE_ENABLE_DIVIDE,
            sample_enable_phase: defaults::SAMPLE_ENABLE_PHASE,
        }
    }
}

/// TimeBase reload values (period = reload + 1 samples).
#[derive(Debug, Clone, Deserialize)]
pub struct TimeBaseConfig {
    /// preTIC/TIC reload (24 bits).
    #[serde(default = "TimeBaseConfig::default_tic_divide")]
    pub tic_divide: u32,

    /// Accumulator-interrupt reload (24 bits).
    #[serde(default = "TimeBaseConfig::default_accum_divide")]
    pub accum_divide: u32,
}

impl TimeBaseConfig {
    fn default_tic_divide() -> u32 {
        defaults::TIC_DIVIDE
    }

    fn default_accum_divide() -> u32 {
        defaults::ACCUM_DIVIDE
    }

    /// Returns the reload value that produces a period of `seconds` at `sample_rate_hz`.
    ///
    /// The result is clamped to the 24-bit register.
    pub fn divide_for(seconds: f64, sample_rate_hz: f64) -> u32 {
        let samples = (seconds * sample_rate_hz).round();
        if samples <= 1.0 {
            return 0;
        }
        let reload = (samples - 1.0).min(f64::from(DIVIDE_MASK));
        reload as u32
    }
}

impl Default for TimeBaseConfig {
    fn default() -> Self {
        Self {
            tic_divide: defaults::TIC_DIVIDE,
            accum_divide: defaults::ACCUM_DIVIDE,
        }
    }
}

/// Power-on programming of one channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelInit {
    /// PRN key (1..=37).
    #[serde(default = "ChannelInit::default_prn")]
    pub prn: u32,

    /// Carrier NCO control word (29 bits).
    #[serde(default = "ChannelInit::default_carrier_fcw")]
    pub carrier_fcw: u32,

    /// Code NCO control word (28 bits).
    #[serde(default = "ChannelInit::default_code_fcw")]
    pub code_fcw: u32,
}

impl ChannelInit {
    fn default_prn() -> u32 {
        defaults::PRN
    }

    fn default_carrier_fcw() -> u32 {
        defaults::CARRIER_FCW
    }

    fn default_code_fcw() -> u32 {
        defaults::CODE_FCW
    }
}

impl Default for ChannelInit {
    fn default() -> Self {
        Self {
            prn: defaults::PRN,
            carrier_fcw: defaults::CARRIER_FCW,
            code_fcw: defaults::CODE_FCW,
        }
    }
}
