//! Accumulator Unit Tests.
//!
//! Verifies chip-gated integration, the dump snapshot, restart with the
//! sample on which the dump falls, and 16-bit saturation.

use gpsbb_core::common::signal::IqPair;
use gpsbb_core::core::units::accumulator::{Accumulator, Dumped};

#[test]
fn chip_gates_contribution_sign() {
    let mut acc = Accumulator::new();
    for _ in 0..3 {
        assert_eq!(acc.clock((2, -1), false, false), None);
    }
    assert_eq!(acc.clock((2, -1), true, false), None);
    assert_eq!(acc.running(), (4, -2));
}

#[test]
fn dump_snapshots_and_restarts_with_current_sample() {
    let mut acc = Accumulator::new();
    for _ in 0..4 {
        let _ = acc.clock((3, 1), false, false);
    }
    let dumped = acc.clock((1, 1), true, true);
    assert_eq!(
        dumped,
        Some(Dumped {
            value: IqPair::new(12, 4),
            samples: 4,
            saturated: false,
        })
    );
    assert_eq!(acc.value(), IqPair::new(12, 4));
    assert_eq!(acc.running(), (-1, -1));

    let next = acc.clock((0, 0), false, true).expect("dump");
    assert_eq!(next.value, IqPair::new(-1, -1));
    assert_eq!(next.samples, 1);
}

#[test]
fn saturates_to_sixteen_bits() {
    let mut acc = Accumulator::new();
    for _ in 0..20_000 {
        let _ = acc.clock((2, -2), false, false);
    }
    let dumped = acc.clock((0, 0), false, true).expect("dump");
    assert!(dumped.saturated);
    assert_eq!(dumped.value, IqPair::new(i16::MAX, i16::MIN));
    assert_eq!(dumped.samples, 20_000);
}

#[test]
fn reset_clears_value() {
    let mut acc = Accumulator::new();
    let _ = acc.clock((5, 5), false, false);
    let _ = acc.clock((5, 5), false, true);
    acc.reset();
    assert_eq!(acc.value(), IqPair::default());
    assert_eq!(acc.running(), (0, 0));
}
