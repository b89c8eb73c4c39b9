//! AXI4-Lite style bus adapter.
//!
//! Bridges the five valid/ready channels of a pipelined bus to the single-cycle
//! strobes of a [`RegisterTarget`](crate::soc::traits::RegisterTarget). Two small
//! state machines share one outstanding transaction:
//!
//! * Write: `Idle -> Issue -> Wait -> Resp -> Idle` (valid to BVALID in 4 cycles)
//! * Read: `Idle -> Issue -> Wait -> Capture -> Resp -> Idle` (valid to RVALID in 5 cycles)
//!
//! The write address and data channels are accepted independently. When a read
//! and a write are both presented to an idle adapter, the write goes first.
//! Responses are always OKAY and are held until the master is ready.

use crate::soc::traits::RegisterAccess;

/// OKAY response code.
pub const RESP_OKAY: u8 = 0b00;

/// Signals driven by the bus master.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MasterSignals {
    /// Write address valid.
    pub awvalid: bool,
    /// Write address.
    pub awaddr: u32,
    /// Write data valid.
    pub wvalid: bool,
    /// Write data.
    pub wdata: u32,
    /// Write response ready.
    pub bready: bool,
    /// Read address valid.
    pub arvalid: bool,
    /// Read address.
    pub araddr: u32,
    /// Read data ready.
    pub rready: bool,
}

/// Signals driven by the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlaveSignals {
    /// Write address ready.
    pub awready: bool,
    /// Write data ready.
    pub wready: bool,
    /// Write response valid.
    pub bvalid: bool,
    /// Write response code.
    pub bresp: u8,
    /// Read address ready.
    pub arready: bool,
    /// Read data valid.
    pub rvalid: bool,
    /// Read data.
    pub rdata: u32,
    /// Read response code.
    pub rresp: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriteState {
    Idle {
        addr: Option<u32>,
        data: Option<u32>,
    },
    Issue {
        addr: u32,
        data: u32,
    },
    Wait,
    Resp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadState {
    Idle,
    Issue { addr: u32 },
    Wait,
    Capture,
    Resp,
}

/// Valid/ready to strobe bridge.
#[derive(Clone, Debug)]
pub struct BusAdapter {
    write: WriteState,
    read: ReadState,
    bvalid_q: bool,
    rvalid_q: bool,
    rdata_q: u32,
}

impl Default for BusAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl BusAdapter {
    /// Creates an idle adapter.
    pub const fn new() -> Self {
        Self {
            write: WriteState::Idle {
                addr: None,
                data: None,
            },
            read: ReadState::Idle,
            bvalid_q: false,
            rvalid_q: false,
            rdata_q: 0,
        }
    }

    /// Returns `true` when no transaction is in flight or partially accepted.
    pub const fn is_idle(&self) -> bool {
        matches!(
            self.write,
            WriteState::Idle {
                addr: None,
                data: None
            }
        ) && matches!(self.read, ReadState::Idle)
    }

    /// Returns the adapter outputs for this cycle.
    ///
    /// Ready signals depend combinationally on the master's valid signals so
    /// that a write presented alongside a read takes priority.
    pub const fn outputs(&self, master: &MasterSignals) -> SlaveSignals {
        let read_idle = matches!(self.read, ReadState::Idle);
        let (awready, wready, write_empty) = match self.write {
            WriteState::Idle { addr, data } => (
                addr.is_none() && read_idle,
                data.is_none() && read_idle,
                addr.is_none() && data.is_none(),
            ),
            _ => (false, false, false),
        };
        SlaveSignals {
            awready,
            wready,
            bvalid: self.bvalid_q,
            bresp: RESP_OKAY,
            arready: read_idle && write_empty && !master.awvalid && !master.wvalid,
            rvalid: self.rvalid_q,
            rdata: self.rdata_q,
            rresp: RESP_OKAY,
        }
    }

    /// Returns the strobe presented to the register target on the coming edge.
    pub const fn access(&self) -> Option<RegisterAccess> {
        if let WriteState::Issue { addr, data } = self.write {
            return Some(RegisterAccess::Write { addr, data });
        }
        if let ReadState::Issue { addr } = self.read {
            return Some(RegisterAccess::Read { addr });
        }
        None
    }

    /// Advances one clock edge.
    ///
    /// # Arguments
    ///
    /// * `master` - Master signals visible this cycle.
    /// * `read_data` - The register target's registered read data, sampled before its edge.
    pub const fn clock(&mut self, master: &MasterSignals, read_data: u32) {
        let out = self.outputs(master);

        self.write = match self.write {
            WriteState::Idle { addr, data } => {
                let addr = if out.awready && master.awvalid {
                    Some(master.awaddr)
                } else {
                    addr
                };
                let data = if out.wready && master.wvalid {
                    Some(master.wdata)
                } else {
                    data
                };
                match (addr, data) {
                    (Some(addr), Some(data)) => WriteState::Issue { addr, data },
                    _ => WriteState::Idle { addr, data },
                }
            }
            WriteState::Issue { .. } => WriteState::Wait,
            WriteState::Wait => WriteState::Resp,
            WriteState::Resp => {
                if !self.bvalid_q {
                    self.bvalid_q = true;
                    WriteState::Resp
                } else if master.bready {
                    self.bvalid_q = false;
                    WriteState::Idle {
                        addr: None,
                        data: None,
                    }
                } else {
                    WriteState::Resp
                }
            }
        };

        self.read = match self.read {
            ReadState::Idle => {
                if out.arready && master.arvalid {
                    ReadState::Issue {
                        addr: master.araddr,
                    }
                } else {
                    ReadState::Idle
                }
            }
            ReadState::Issue { .. } => ReadState::Wait,
            ReadState::Wait => ReadState::Capture,
            ReadState::Capture => {
                self.rdata_q = read_data;
                ReadState::Resp
            }
            ReadState::Resp => {
                if !self.rvalid_q {
                    self.rvalid_q = true;
                    ReadState::Resp
                } else if master.rready {
                    self.rvalid_q = false;
                    ReadState::Idle
                } else {
                    ReadState::Resp
                }
            }
        };
    }

    /// Returns both state machines to idle and drops any response.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }
}
