//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization, and validation
//! against the register widths.

use std::io::Write;

use gpsbb_core::common::constants::DIVIDE_MASK;
use gpsbb_core::common::error::ConfigError;
use gpsbb_core::config::{ChannelInit, Config, SystemConfig, TimeBaseConfig};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.system.channel_count, 4);
    assert!((config.system.sample_rate_hz - 16.368e6).abs() < 1e-3);
    assert_eq!(config.system.if_high_magnitude, 3);
    assert_eq!(config.system.sample_enable_divide, 1);
    assert_eq!(config.system.sample_enable_phase, 0);
    assert_eq!(config.timebase.tic_divide, 163_679);
    assert_eq!(config.timebase.accum_divide, 14_730);
    assert!(config.channels.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_channel_init_default() {
    let init = ChannelInit::default();
    assert_eq!(init.prn, 1);
    assert_eq!(init.carrier_fcw, 1 << 27);
    assert_eq!(init.code_fcw, 1 << 25);
}

#[test]
fn test_json_partial_fields_take_defaults() {
    let json = r#"{
        "system": { "channel_count": 2 },
        "timebase": { "tic_divide": 1000 },
        "channels": [ { "prn": 7 }, { "prn": 9, "code_fcw": 33554433 } ]
    }"#;
    let config = Config::from_json_str(json).expect("valid");
    assert_eq!(config.system.channel_count, 2);
    assert_eq!(config.system.if_high_magnitude, 3);
    assert_eq!(config.timebase.tic_divide, 1000);
    assert_eq!(config.timebase.accum_divide, 14_730);
    assert_eq!(config.channels[0].prn, 7);
    assert_eq!(config.channels[0].carrier_fcw, 1 << 27);
    assert_eq!(config.channels[1].code_fcw, (1 << 25) + 1);
}

#[test]
fn test_empty_json_is_default() {
    let config = Config::from_json_str("{}").expect("valid");
    assert_eq!(config.system.channel_count, 4);
    assert_eq!(config.timebase.tic_divide, 163_679);
}

#[test]
fn test_malformed_json() {
    let err = Config::from_json_str("{ \"system\": ").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_channel_count_bounds() {
    let mut config = Config::default();
    config.system.channel_count = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ChannelCount { count: 0, max: 14 })
    ));
    config.system.channel_count = 15;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ChannelCount { count: 15, .. })
    ));
    config.system.channel_count = 14;
    assert!(config.validate().is_ok());
}

#[test]
fn test_too_many_channel_entries() {
    let mut config = Config::default();
    config.system.channel_count = 1;
    config.channels = vec![ChannelInit::default(), ChannelInit::default()];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TooManyChannelEntries { given: 2, count: 1 })
    ));
}

#[test]
fn test_prn_range() {
    let mut config = Config::default();
    config.channels = vec![ChannelInit {
        prn: 38,
        ..ChannelInit::default()
    }];
    assert!(matches!(config.validate(), Err(ConfigError::Prn(38))));
    config.channels[0].prn = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Prn(0))));
    config.channels[0].prn = 37;
    assert!(config.validate().is_ok());
}

#[test]
fn test_field_widths() {
    let mut config = Config::default();
    config.channels = vec![ChannelInit {
        carrier_fcw: 1 << 29,
        ..ChannelInit::default()
    }];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FieldWidth {
            field: "channels.carrier_fcw",
            bits: 29,
            ..
        })
    ));

    config.channels[0].carrier_fcw = (1 << 29) - 1;
    config.channels[0].code_fcw = 1 << 28;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FieldWidth {
            field: "channels.code_fcw",
            bits: 28,
            ..
        })
    ));

    let mut config = Config::default();
    config.timebase.tic_divide = 1 << 24;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FieldWidth {
            field: "timebase.tic_divide",
            ..
        })
    ));
}

#[test]
fn test_zero_divides_are_accepted() {
    let mut config = Config::default();
    config.timebase = TimeBaseConfig {
        tic_divide: 0,
        accum_divide: 0,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_sample_enable_constraints() {
    let mut config = Config::default();
    config.system.sample_enable_divide = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SampleEnable { divide: 0, .. })
    ));
    config.system.sample_enable_divide = 4;
    config.system.sample_enable_phase = 4;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::SampleEnable { divide: 4, phase: 4 })
    ));
    config.system.sample_enable_phase = 3;
    assert!(config.validate().is_ok());
}

#[test]
fn test_if_magnitude_and_rate() {
    let mut config = Config::default();
    config.system.if_high_magnitude = 1;
    assert!(matches!(config.validate(), Err(ConfigError::IfMagnitude(1))));

    let mut config = Config::default();
    config.system = SystemConfig {
        sample_rate_hz: 0.0,
        ..SystemConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::SampleRate(_))));
}

#[test]
fn test_divide_for() {
    assert_eq!(TimeBaseConfig::divide_for(0.01, 16.368e6), 163_679);
    assert_eq!(TimeBaseConfig::divide_for(0.0, 16.368e6), 0);
    assert_eq!(TimeBaseConfig::divide_for(1.0 / 16.368e6, 16.368e6), 0);
    assert_eq!(TimeBaseConfig::divide_for(10.0, 16.368e6), DIVIDE_MASK);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, r#"{{ "system": {{ "channel_count": 3 }} }}"#).expect("write");
    let config = Config::from_file(file.path()).expect("valid file");
    assert_eq!(config.system.channel_count, 3);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_error_messages() {
    let err = ConfigError::FieldWidth {
        field: "timebase.tic_divide",
        value: 0x100_0000,
        bits: 24,
    };
    assert_eq!(
        err.to_string(),
        "timebase.tic_divide = 0x1000000 does not fit in 24 bits"
    );
    assert_eq!(
        ConfigError::Prn(40).to_string(),
        "PRN 40 not supported (1..=37)"
    );
}
