//! Bus-master driver.
//!
//! Drives the valid/ready channels of the baseband's bus adapter the way a
//! testbench or a host processor would: one queued operation at a time,
//! holding each valid until it is accepted. Each cycle the caller:
//! 1. **Drives:** `signals()` returns the master outputs, starting the next queued op if idle.
//! 2. **Observes:** `observe()` consumes the adapter outputs visible in the same cycle and
//!    reports a completed operation together with its valid-to-response latency.

use std::collections::VecDeque;

use crate::soc::bus_adapter::{MasterSignals, SlaveSignals};

/// One register operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusOp {
    /// Read a word.
    Read {
        /// Byte address.
        addr: u32,
    },
    /// Write a word.
    Write {
        /// Byte address.
        addr: u32,
        /// Data.
        data: u32,
    },
}

/// A finished operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// The operation.
    pub op: BusOp,
    /// Read data (0 for writes).
    pub data: u32,
    /// Response code.
    pub resp: u8,
    /// Cycles from the first valid cycle to the response handshake cycle.
    pub latency: u64,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    op: BusOp,
    addr_done: bool,
    data_done: bool,
    start: u64,
}

/// Single-outstanding bus master.
#[derive(Clone, Debug)]
pub struct BusMaster {
    queue: VecDeque<BusOp>,
    current: Option<InFlight>,
    driven: MasterSignals,
    bready: bool,
    rready: bool,
    cycle: u64,
}

impl Default for BusMaster {
    fn default() -> Self {
        Self::new()
    }
}

impl BusMaster {
    /// Creates an idle master that is always ready for responses.
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            current: None,
            driven: MasterSignals {
                awvalid: false,
                awaddr: 0,
                wvalid: false,
                wdata: 0,
                bready: true,
                arvalid: false,
                araddr: 0,
                rready: true,
            },
            bready: true,
            rready: true,
            cycle: 0,
        }
    }

    /// Queues an operation.
    pub fn push(&mut self, op: BusOp) {
        self.queue.push_back(op);
    }

    /// Queues a read.
    pub fn read(&mut self, addr: u32) {
        self.push(BusOp::Read { addr });
    }

    /// Queues a write.
    pub fn write(&mut self, addr: u32, data: u32) {
        self.push(BusOp::Write { addr, data });
    }

    /// Returns `true` when nothing is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Sets the response ready signals (backpressure when `false`).
    pub const fn set_ready(&mut self, bready: bool, rready: bool) {
        self.bready = bready;
        self.rready = rready;
    }

    /// Returns the master outputs for this cycle.
    pub fn signals(&mut self) -> MasterSignals {
        if self.current.is_none()
            && let Some(op) = self.queue.pop_front()
        {
            self.current = Some(InFlight {
                op,
                addr_done: false,
                data_done: false,
                start: self.cycle,
            });
        }

        let mut m = MasterSignals {
            bready: self.bready,
            rready: self.rready,
            ..MasterSignals::default()
        };
        if let Some(f) = self.current {
            match f.op {
                BusOp::Write { addr, data } => {
                    m.awvalid = !f.addr_done;
                    m.awaddr = addr;
                    m.wvalid = !f.data_done;
                    m.wdata = data;
                }
                BusOp::Read { addr } => {
                    m.arvalid = !f.addr_done;
                    m.araddr = addr;
                }
            }
        }
        self.driven = m;
        m
    }

    /// Consumes the adapter outputs of this cycle and ends the cycle.
    ///
    /// # Returns
    ///
    /// The operation whose response handshake happened in this cycle, if any.
    pub fn observe(&mut self, slave: &SlaveSignals) -> Option<Completion> {
        let m = self.driven;
        let cycle = self.cycle;
        self.cycle += 1;

        let f = self.current.as_mut()?;
        let done = match f.op {
            BusOp::Write { .. } => {
                f.addr_done |= m.awvalid && slave.awready;
                f.data_done |= m.wvalid && slave.wready;
                (slave.bvalid && m.bready).then_some((0, slave.bresp))
            }
            BusOp::Read { .. } => {
                f.addr_done |= m.arvalid && slave.arready;
                (slave.rvalid && m.rready).then_some((slave.rdata, slave.rresp))
            }
        };
        let (data, resp) = done?;
        let completion = Completion {
            op: f.op,
            data,
            resp,
            latency: cycle - f.start,
        };
        self.current = None;
        Some(completion)
    }
}
