//! Bus Adapter Unit Tests.
//!
//! Verifies the valid-to-response latencies, one strobe per transaction,
//! response backpressure, independent write address/data acceptance, and
//! write-over-read priority.

use gpsbb_core::sim::BusOp;
use gpsbb_core::soc::bus_adapter::{BusAdapter, MasterSignals, RESP_OKAY};
use gpsbb_core::soc::RegisterAccess;

use crate::common::{BusHarness, MockTarget};

#[test]
fn write_completes_in_four_cycles() {
    let mut h = BusHarness::new(MockTarget::new());
    h.master.write(0x40, 0xABCD);
    let done = h.run_until_done(20).expect("write completes");
    assert_eq!(done.op, BusOp::Write { addr: 0x40, data: 0xABCD });
    assert_eq!(done.latency, 4);
    assert_eq!(done.resp, RESP_OKAY);
    assert_eq!(
        h.target.strobes,
        vec![RegisterAccess::Write { addr: 0x40, data: 0xABCD }]
    );
    assert_eq!(h.target.regs.get(&0x40), Some(&0xABCD));
}

#[test]
fn read_completes_in_five_cycles() {
    let mut h = BusHarness::new(MockTarget::new().with_reg(0x84, 0x1234_5678));
    h.master.read(0x84);
    let done = h.run_until_done(20).expect("read completes");
    assert_eq!(done.latency, 5);
    assert_eq!(done.data, 0x1234_5678);
    assert_eq!(done.resp, RESP_OKAY);
    assert_eq!(h.target.strobes, vec![RegisterAccess::Read { addr: 0x84 }]);
}

#[test]
fn write_then_read_back() {
    let mut h = BusHarness::new(MockTarget::new());
    h.master.write(0x10, 42);
    h.master.read(0x10);
    let w = h.run_until_done(20).expect("write");
    let r = h.run_until_done(20).expect("read");
    assert!(matches!(w.op, BusOp::Write { .. }));
    assert_eq!(r.data, 42);
    assert_eq!(r.latency, 5);
    assert!(h.adapter.is_idle());
    assert!(h.master.is_idle());
}

#[test]
fn back_to_back_reads_see_their_own_data() {
    let mut h = BusHarness::new(
        MockTarget::new()
            .with_reg(0x0, 1)
            .with_reg(0x4, 2)
            .with_reg(0x8, 3),
    );
    for addr in [0x0, 0x4, 0x8] {
        h.master.read(addr);
    }
    let data: Vec<u32> = (0..3)
        .map(|_| h.run_until_done(20).expect("read").data)
        .collect();
    assert_eq!(data, vec![1, 2, 3]);
    assert_eq!(h.target.strobes.len(), 3);
}

#[test]
fn read_response_waits_for_rready() {
    let mut h = BusHarness::new(MockTarget::new().with_reg(0x20, 99));
    h.master.set_ready(true, false);
    h.master.read(0x20);
    for _ in 0..30 {
        assert!(h.step().is_none());
    }
    assert!(h.last_slave.rvalid);
    assert_eq!(h.last_slave.rdata, 99);

    h.master.set_ready(true, true);
    let done = h.run_until_done(5).expect("read completes");
    assert_eq!(done.data, 99);
    assert_eq!(done.latency, 30);
    assert_eq!(h.target.strobes.len(), 1);
}

#[test]
fn write_response_waits_for_bready() {
    let mut h = BusHarness::new(MockTarget::new());
    h.master.set_ready(false, true);
    h.master.write(0x20, 5);
    for _ in 0..10 {
        assert!(h.step().is_none());
    }
    assert!(h.last_slave.bvalid);
    assert!(!h.adapter.is_idle());
    h.master.set_ready(true, true);
    assert!(h.run_until_done(5).is_some());
    assert_eq!(h.target.strobes.len(), 1);
}

#[test]
fn address_and_data_accepted_independently() {
    let mut adapter = BusAdapter::new();

    let aw_only = MasterSignals {
        awvalid: true,
        awaddr: 0x30,
        bready: true,
        rready: true,
        ..MasterSignals::default()
    };
    let out = adapter.outputs(&aw_only);
    assert!(out.awready && out.wready);
    adapter.clock(&aw_only, 0);
    assert_eq!(adapter.access(), None);

    let w_only = MasterSignals {
        wvalid: true,
        wdata: 7,
        bready: true,
        rready: true,
        ..MasterSignals::default()
    };
    let out = adapter.outputs(&w_only);
    assert!(!out.awready);
    assert!(out.wready);
    adapter.clock(&w_only, 0);
    assert_eq!(
        adapter.access(),
        Some(RegisterAccess::Write { addr: 0x30, data: 7 })
    );
}

#[test]
fn write_has_priority_over_simultaneous_read() {
    let mut adapter = BusAdapter::new();
    let both = MasterSignals {
        awvalid: true,
        awaddr: 0x4,
        wvalid: true,
        wdata: 1,
        bready: true,
        arvalid: true,
        araddr: 0x8,
        rready: true,
    };
    let out = adapter.outputs(&both);
    assert!(out.awready && out.wready);
    assert!(!out.arready);
    adapter.clock(&both, 0);
    assert_eq!(
        adapter.access(),
        Some(RegisterAccess::Write { addr: 0x4, data: 1 })
    );

    let read_only = MasterSignals {
        arvalid: true,
        araddr: 0x8,
        bready: true,
        rready: true,
        ..MasterSignals::default()
    };
    assert!(!adapter.outputs(&read_only).arready);
}

#[test]
fn reset_drops_transaction() {
    let mut h = BusHarness::new(MockTarget::new());
    h.master.write(0x0, 1);
    let _ = h.step();
    assert!(!h.adapter.is_idle());
    h.adapter.reset();
    assert!(h.adapter.is_idle());
}
