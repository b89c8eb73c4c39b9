//! Statistics counter tests.

use gpsbb_core::soc::RegisterAccess;
use gpsbb_core::stats::BasebandStats;

#[test]
fn starts_zeroed() {
    let stats = BasebandStats::new(4);
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.dumps, vec![0; 4]);
    assert_eq!(stats.total_dumps(), 0);
}

#[test]
fn counts_accesses_by_kind() {
    let mut stats = BasebandStats::new(1);
    stats.record_access(RegisterAccess::Read { addr: 0 });
    stats.record_access(RegisterAccess::Write { addr: 4, data: 1 });
    stats.record_access(RegisterAccess::Read { addr: 8 });
    assert_eq!(stats.bus_reads, 2);
    assert_eq!(stats.bus_writes, 1);
}

#[test]
fn dump_mask_counts_per_channel() {
    let mut stats = BasebandStats::new(3);
    stats.record_dumps(0b101);
    stats.record_dumps(0b001);
    // Bits beyond the configured bank are ignored.
    stats.record_dumps(0b1000);
    assert_eq!(stats.dumps, vec![2, 0, 1]);
    assert_eq!(stats.total_dumps(), 3);
}
