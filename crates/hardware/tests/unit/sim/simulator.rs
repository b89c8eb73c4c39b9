//! Simulator Integration Tests.
//!
//! Runs the full stack (stimulus, baseband, interrupt-driven register reads)
//! and checks dump sequencing, correlation peak shape, and fault reporting.

use gpsbb_core::common::addr::{ChannelReg, TIC_DIVIDE_WORD, WordAddr};
use gpsbb_core::common::error::{Fault, SimError};
use gpsbb_core::common::signal::IfSample;
use gpsbb_core::config::{ChannelInit, Config};
use gpsbb_core::sim::{CorrelationRecord, IfGenerator, Simulator, StimulusConfig};

use crate::common::init_tracing;

const EPOCH_SAMPLES: usize = 16 * 1023;

fn matched_config() -> Config {
    let mut config = Config::default();
    config.system.channel_count = 1;
    config.channels = vec![ChannelInit {
        prn: 1,
        carrier_fcw: 1 << 27,
        code_fcw: 1 << 25,
    }];
    config
}

fn stimulus(cn0_dbhz: f64, data_bits: bool) -> IfGenerator {
    let config = StimulusConfig {
        prn: 1,
        delay_chips: 0.0,
        cn0_dbhz,
        seed: 7,
        data_bits,
        ..StimulusConfig::default()
    };
    IfGenerator::new(&config).expect("valid stimulus")
}

/// Runs `epochs` code periods of a zero-delay PRN 1 signal and collects every dump.
fn run_matched(cn0_dbhz: f64, data_bits: bool, epochs: usize) -> (Simulator, Vec<CorrelationRecord>) {
    let mut sim = Simulator::new(&matched_config()).expect("valid config");
    let mut records = Vec::new();
    sim.run(
        stimulus(cn0_dbhz, data_bits).take(epochs * EPOCH_SAMPLES + 100),
        |r| {
            records.push(*r);
            Ok(())
        },
    )
    .expect("run completes");
    (sim, records)
}

fn mean(values: impl Iterator<Item = i64>) -> f64 {
    let v: Vec<i64> = values.collect();
    v.iter().sum::<i64>() as f64 / v.len() as f64
}

#[test]
fn prompt_peaks_on_every_dump() {
    init_tracing();
    let (sim, records) = run_matched(50.0, true, 18);

    assert!(records.len() >= 17, "only {} dumps", records.len());
    for (n, r) in records.iter().enumerate() {
        assert_eq!(r.channel, 0);
        assert_eq!(r.dump_count, n as u64);
    }
    assert_eq!(sim.baseband.stats.dumps, vec![records.len() as u64]);

    // The first two dumps straddle the initial load.
    for r in &records[2..] {
        let (e, p, l) = r.powers();
        assert!(p > e && p > l, "dump {}: E={e} P={p} L={l}", r.dump_count);
    }
}

#[test]
fn replica_trails_zero_delay_signal_by_an_eighth_chip() {
    let (_, records) = run_matched(60.0, false, 18);
    let tail = &records[2..];
    for r in tail {
        let (e, _, l) = r.powers();
        assert!(e > l, "dump {}: E={e} L={l}", r.dump_count);
    }

    // Two samples of lag at 16 samples per chip: amplitudes 14:10:6 for P:E:L.
    let early = mean(tail.iter().map(|r| r.early.power()));
    let prompt = mean(tail.iter().map(|r| r.prompt.power()));
    let late = mean(tail.iter().map(|r| r.late.power()));
    let e_ratio = (early / prompt).sqrt();
    let l_ratio = (late / prompt).sqrt();
    assert!((0.64..0.80).contains(&e_ratio), "E/P {e_ratio}");
    assert!((0.35..0.51).contains(&l_ratio), "L/P {l_ratio}");
}

#[test]
fn unsynchronised_slew_stops_run() {
    init_tracing();
    let mut sim = Simulator::new(&matched_config()).expect("valid config");
    sim.queue_write(ChannelReg::CodeSlew.byte(0), 1);

    let mut dumps = 0;
    let result = sim.run(stimulus(45.0, false).take(6 * EPOCH_SAMPLES), |_| {
        dumps += 1;
        Ok(())
    });
    match result {
        Err(SimError::Fault(Fault::EpochDesync { channel, .. })) => assert_eq!(channel, 0),
        other => panic!("expected desync fault, got {other:?}"),
    }
    assert!(dumps <= 1, "{dumps} dumps before the fault");
}

#[test]
fn queued_writes_reach_registers() {
    let mut sim = Simulator::new(&matched_config()).expect("valid config");
    assert!(sim.is_quiet());

    let addr = WordAddr(TIC_DIVIDE_WORD).byte();
    sim.queue_write(addr, 99);
    assert!(!sim.is_quiet());
    for _ in 0..8 {
        assert!(sim.clock(IfSample::default()).expect("no fault").is_none());
    }
    assert!(sim.is_quiet());
    assert_eq!(sim.baseband.regfile().peek(addr), 99);
    assert_eq!(sim.baseband.stats.bus_writes, 1);
}
