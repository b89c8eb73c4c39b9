//! Simulator: drives the baseband the way controlling software would.
//!
//! The simulator owns a [`Baseband`] and a [`BusMaster`] side by side and
//! services the interrupt line over the bus:
//! 1. **New Data:** On interrupt, read the new-data register (clearing the bits read).
//! 2. **Faults:** Read the desync fault register; a set bit stops the run with
//!    [`Fault::EpochDesync`] after reading that channel's epoch words.
//! 3. **Correlations:** Read the six I/Q registers of each flagged channel and emit a
//!    [`CorrelationRecord`].

use std::collections::VecDeque;

use tracing::{debug, error};

use crate::common::addr::{ChannelReg, FAULT_WORD, NEW_DATA_WORD, WordAddr};
use crate::common::error::{Fault, SimError};
use crate::common::signal::{IfSample, IqPair};
use crate::config::Config;
use crate::sim::dump::CorrelationRecord;
use crate::sim::master::{BusMaster, BusOp, Completion};
use crate::soc::Baseband;

/// I/Q registers in the order they are read.
const IQ_REGS: [ChannelReg; 6] = [
    ChannelReg::IEarly,
    ChannelReg::QEarly,
    ChannelReg::IPrompt,
    ChannelReg::QPrompt,
    ChannelReg::ILate,
    ChannelReg::QLate,
];

#[derive(Clone, Copy, Debug)]
enum Service {
    Idle,
    NewData,
    Faults { pending: u32 },
    Correlations { pending: u32, channel: usize, values: [i16; 6], got: usize },
    FaultDetail { channel: usize, epoch: Option<u16> },
}

/// Baseband plus interrupt-driven register reader.
#[derive(Debug)]
pub struct Simulator {
    /// The core under simulation.
    pub baseband: Baseband,
    master: BusMaster,
    service: Service,
    dump_counts: Vec<u64>,
    writes: VecDeque<(u32, u32)>,
}

impl Simulator {
    /// Creates a simulator for a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is rejected.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let baseband = Baseband::new(config)?;
        Ok(Self {
            baseband,
            master: BusMaster::new(),
            service: Service::Idle,
            dump_counts: vec![0; config.system.channel_count],
            writes: VecDeque::new(),
        })
    }

    /// Queues a register write, issued when the bus is free.
    pub fn queue_write(&mut self, addr: u32, data: u32) {
        self.writes.push_back((addr, data));
    }

    /// Returns `true` when no bus traffic is queued or in flight.
    pub fn is_quiet(&self) -> bool {
        self.master.is_idle() && self.writes.is_empty() && matches!(self.service, Service::Idle)
    }

    /// Advances one bus clock with the given sample.
    ///
    /// The sample is consumed only when [`Baseband::sample_enable`] was set.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fault`] once a channel's desync fault has been read back.
    pub fn clock(&mut self, sample: IfSample) -> Result<Option<CorrelationRecord>, SimError> {
        if self.master.is_idle() {
            if let Some((addr, data)) = self.writes.pop_front() {
                self.master.write(addr, data);
            } else if matches!(self.service, Service::Idle) && self.baseband.irq() {
                self.master.read(WordAddr(NEW_DATA_WORD).byte());
                self.service = Service::NewData;
            }
        }

        let m = self.master.signals();
        let s = self.baseband.outputs(&m);
        let done = self.master.observe(&s);
        let _ = self.baseband.clock(&m, sample, true);

        match done {
            Some(completion) => self.complete(completion),
            None => Ok(None),
        }
    }

    /// Runs until the sample stream ends.
    ///
    /// # Arguments
    ///
    /// * `samples` - IF samples, one per enabled datapath edge.
    /// * `sink` - Receives each correlation record.
    ///
    /// # Errors
    ///
    /// Stops at the first fault or sink error.
    pub fn run<I, F>(&mut self, samples: I, mut sink: F) -> Result<(), SimError>
    where
        I: IntoIterator<Item = IfSample>,
        F: FnMut(&CorrelationRecord) -> Result<(), SimError>,
    {
        let mut samples = samples.into_iter();
        loop {
            let sample = if self.baseband.sample_enable() {
                match samples.next() {
                    Some(s) => s,
                    None => return Ok(()),
                }
            } else {
                IfSample::default()
            };
            if let Some(record) = self.clock(sample)? {
                sink(&record)?;
            }
        }
    }

    fn complete(&mut self, completion: Completion) -> Result<Option<CorrelationRecord>, SimError> {
        let BusOp::Read { .. } = completion.op else {
            return Ok(None);
        };
        let data = completion.data;

        match self.service {
            Service::Idle => Ok(None),
            Service::NewData => {
                self.master.read(WordAddr(FAULT_WORD).byte());
                self.service = Service::Faults { pending: data };
                Ok(None)
            }
            Service::Faults { pending } => {
                if data != 0 {
                    let channel = data.trailing_zeros() as usize;
                    self.master.read(ChannelReg::Epoch.byte(channel));
                    self.master.read(ChannelReg::EpochCheck.byte(channel));
                    self.service = Service::FaultDetail {
                        channel,
                        epoch: None,
                    };
                } else {
                    self.start_channel(pending);
                }
                Ok(None)
            }
            Service::FaultDetail { channel, epoch } => match epoch {
                None => {
                    self.service = Service::FaultDetail {
                        channel,
                        epoch: Some(data as u16),
                    };
                    Ok(None)
                }
                Some(epoch) => {
                    self.service = Service::Idle;
                    let fault = Fault::EpochDesync {
                        channel,
                        epoch,
                        epoch_check: data as u16,
                    };
                    error!(%fault, "stopping on channel fault");
                    Err(fault.into())
                }
            },
            Service::Correlations {
                pending,
                channel,
                mut values,
                got,
            } => {
                values[got] = data as i16;
                if got + 1 < IQ_REGS.len() {
                    self.service = Service::Correlations {
                        pending,
                        channel,
                        values,
                        got: got + 1,
                    };
                    return Ok(None);
                }

                let count = &mut self.dump_counts[channel];
                let record = CorrelationRecord {
                    channel,
                    dump_count: *count,
                    early: IqPair::new(values[0], values[1]),
                    prompt: IqPair::new(values[2], values[3]),
                    late: IqPair::new(values[4], values[5]),
                };
                *count += 1;
                self.start_channel(pending & !(1 << channel));
                Ok(Some(record))
            }
        }
    }

    fn start_channel(&mut self, pending: u32) {
        if pending == 0 {
            self.service = Service::Idle;
            return;
        }
        let channel = pending.trailing_zeros() as usize;
        debug!(channel, "reading correlations");
        for reg in IQ_REGS {
            self.master.read(reg.byte(channel));
        }
        self.service = Service::Correlations {
            pending,
            channel,
            values: [0; 6],
            got: 0,
        };
    }
}
