//! Multi-channel Register File.
//!
//! Replicates the tracking channels behind one address space and owns the
//! shared TimeBase. It provides:
//! 1. **Address Decode:** A pure decode maps each access to a channel register or a shared register.
//! 2. **Shadow Registers:** Each dump snapshots the channel's E/P/L pairs; reads are served
//!    from the snapshot until the next dump.
//! 3. **New Data:** One read-clearing bit per channel drives the interrupt line. A dump in
//!    the same cycle as the clearing read survives the clear.
//! 4. **Status:** Read-clearing TIC and accumulator-interrupt flags plus running counters.
//!
//! # Memory Map (word index)
//!
//! * `ch*0x10 + 0x0..0xE`: channel registers
//! * `0xE0`: status
//! * `0xE1`: new data
//! * `0xE2`/`0xE3`: TIC and accumulator-interrupt counters
//! * `0xE4`: epoch desync faults
//! * `0xF0`: software reset
//! * `0xF1`/`0xF2`: TIC and accumulator-interrupt divides

use tracing::{debug, info, warn};

use crate::common::addr::{ChannelReg, RegisterId, decode};
use crate::common::signal::{IfSample, IqPair};
use crate::config::Config;
use crate::core::channel::TrackingChannel;
use crate::core::timebase::{TimeBase, TimingPulses};
use crate::soc::traits::{RegisterAccess, RegisterTarget};

/// Status bit: a TIC occurred since the last status read.
pub const STATUS_TIC: u32 = 1 << 0;
/// Status bit: an accumulator interrupt pulse occurred since the last status read.
pub const STATUS_ACCUM: u32 = 1 << 1;

/// What happened on one register file edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeReport {
    /// TimeBase strobes, when the datapath was enabled on this edge.
    pub pulses: Option<TimingPulses>,
    /// Channels that dumped on this edge.
    pub dumped: u32,
    /// Channels whose desync fault was first raised on this edge.
    pub faults_raised: u32,
    /// The access performed on this edge.
    pub access: Option<RegisterAccess>,
}

/// Channel bank, shared TimeBase, and status block.
#[derive(Debug)]
pub struct RegisterFile {
    config: Config,
    timebase: TimeBase,
    channels: Vec<TrackingChannel>,
    shadow: Vec<[IqPair; 3]>,
    new_data: u32,
    status: u32,
    fault_bits: u32,
    access: Option<RegisterAccess>,
    rdata_q: u32,
}

fn build_channels(config: &Config) -> Vec<TrackingChannel> {
    let if_high = config.system.if_high_magnitude;
    (0..config.system.channel_count)
        .map(|n| match config.channels.get(n) {
            Some(init) => TrackingChannel::with_init(n, if_high, init),
            None => TrackingChannel::new(n, if_high),
        })
        .collect()
}

const fn sext16(v: i16) -> u32 {
    v as i32 as u32
}

impl RegisterFile {
    /// Builds the channel bank from an already validated configuration.
    pub fn new(config: &Config) -> Self {
        let channels = build_channels(config);
        Self {
            config: config.clone(),
            timebase: TimeBase::new(config.timebase.tic_divide, config.timebase.accum_divide),
            shadow: vec![[IqPair::default(); 3]; channels.len()],
            channels,
            new_data: 0,
            status: 0,
            fault_bits: 0,
            access: None,
            rdata_q: 0,
        }
    }

    /// Returns the number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns a channel by index.
    pub fn channel(&self, index: usize) -> Option<&TrackingChannel> {
        self.channels.get(index)
    }

    /// Returns the shared TimeBase.
    pub const fn timebase(&self) -> &TimeBase {
        &self.timebase
    }

    /// Returns the new-data bits.
    pub const fn new_data(&self) -> u32 {
        self.new_data
    }

    /// Returns the status bits.
    pub const fn status(&self) -> u32 {
        self.status
    }

    /// Returns the per-channel epoch desync fault bits.
    pub const fn fault_bits(&self) -> u32 {
        self.fault_bits
    }

    /// Returns the E/P/L shadow snapshot of a channel.
    pub fn shadow(&self, index: usize) -> Option<[IqPair; 3]> {
        self.shadow.get(index).copied()
    }

    /// Interrupt line: asserted while any new-data bit is set.
    pub const fn irq(&self) -> bool {
        self.new_data != 0
    }

    /// Returns the word a read of `addr` would return this cycle.
    ///
    /// Has no side effects; the clearing of read-clear registers happens in [`RegisterFile::clock`].
    pub fn peek(&self, addr: u32) -> u32 {
        let Some(id) = decode(addr, self.channels.len()) else {
            return 0;
        };
        match id {
            RegisterId::Channel(n, reg) => self.read_channel(n, reg),
            RegisterId::Status => self.status,
            RegisterId::NewData => self.new_data,
            RegisterId::TicCount => self.timebase.tic_count(),
            RegisterId::AccumCount => self.timebase.accum_count(),
            RegisterId::Fault => self.fault_bits,
            RegisterId::Reset => 0,
            RegisterId::TicDivide => self.timebase.tic_divide(),
            RegisterId::AccumDivide => self.timebase.accum_divide(),
        }
    }

    fn read_channel(&self, n: usize, reg: ChannelReg) -> u32 {
        let [early, prompt, late] = self.shadow[n];
        match reg {
            ChannelReg::IEarly => sext16(early.i),
            ChannelReg::QEarly => sext16(early.q),
            ChannelReg::IPrompt => sext16(prompt.i),
            ChannelReg::QPrompt => sext16(prompt.q),
            ChannelReg::ILate => sext16(late.i),
            ChannelReg::QLate => sext16(late.q),
            _ => self.channels[n].read(reg),
        }
    }

    fn write(&mut self, addr: u32, data: u32) {
        let Some(id) = decode(addr, self.channels.len()) else {
            debug!(addr, data, "write to unmapped register ignored");
            return;
        };
        match id {
            RegisterId::Channel(n, reg) => self.channels[n].write(reg, data),
            RegisterId::Reset => self.soft_reset(),
            RegisterId::TicDivide => self.timebase.set_tic_divide(data),
            RegisterId::AccumDivide => self.timebase.set_accum_divide(data),
            RegisterId::Status
            | RegisterId::NewData
            | RegisterId::TicCount
            | RegisterId::AccumCount
            | RegisterId::Fault => {
                debug!(addr, data, ?id, "write to read-only register ignored");
            }
        }
    }

    /// Returns the datapath to its configured power-on state.
    ///
    /// Channels are rebuilt from the configuration; divides written over the
    /// bus are discarded.
    pub fn soft_reset(&mut self) {
        info!(channels = self.channels.len(), "baseband soft reset");
        *self = Self::new(&self.config);
    }

    /// Advances one clock edge.
    ///
    /// # Arguments
    ///
    /// * `sample` - IF sample for this edge (ignored unless `sample_enable`).
    /// * `sample_enable` - Clocks the TimeBase and channels on this edge.
    ///
    /// # Returns
    ///
    /// A report of the strobes, dumps, faults, and access of this edge.
    pub fn clock(&mut self, sample: IfSample, sample_enable: bool) -> EdgeReport {
        let access = self.access.take();
        let mut report = EdgeReport {
            access,
            ..EdgeReport::default()
        };

        // Read data and clear masks come from pre-edge state.
        let mut read_data = None;
        let mut clear_new = 0;
        let mut clear_status = 0;
        if let Some(RegisterAccess::Read { addr }) = access {
            let value = self.peek(addr);
            match decode(addr, self.channels.len()) {
                Some(RegisterId::NewData) => clear_new = value,
                Some(RegisterId::Status) => clear_status = value,
                _ => {}
            }
            read_data = Some(value);
        }

        let mut set_status = 0;
        if sample_enable {
            let pulses = self.timebase.pulses();
            self.timebase.clock();
            if pulses.tic {
                set_status |= STATUS_TIC;
            }
            if pulses.accum_pulse {
                set_status |= STATUS_ACCUM;
            }
            for (n, ch) in self.channels.iter_mut().enumerate() {
                let bit = 1_u32 << n;
                if let Some(event) = ch.clock(&pulses, sample) {
                    self.shadow[n] = [event.early, event.prompt, event.late];
                    report.dumped |= bit;
                }
                if ch.desync() {
                    if self.fault_bits & bit == 0 {
                        report.faults_raised |= bit;
                        warn!(channel = n, "epoch desync fault raised");
                    }
                    self.fault_bits |= bit;
                } else {
                    self.fault_bits &= !bit;
                }
            }
            report.pulses = Some(pulses);
        }

        self.new_data = (self.new_data & !clear_new) | report.dumped;
        self.status = (self.status & !clear_status) | set_status;

        if let Some(RegisterAccess::Write { addr, data }) = access {
            self.write(addr, data);
        }
        if let Some(value) = read_data {
            self.rdata_q = value;
        }
        report
    }
}

impl RegisterTarget for RegisterFile {
    fn read_data(&self) -> u32 {
        self.rdata_q
    }

    fn strobe(&mut self, access: RegisterAccess) {
        self.access = Some(access);
    }
}
