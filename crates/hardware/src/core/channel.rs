//! Tracking Channel.
//!
//! Composes the datapath units into one channel with a register-level
//! contract. Per sample the channel:
//! 1. **Applies Staged Writes:** Control words, PRN load, slew, and epoch load written over
//!    the bus during the previous cycle take effect on this edge.
//! 2. **Mixes:** The IF sample is multiplied by the registered carrier reference.
//! 3. **Correlates:** Early, prompt, and late accumulators integrate the mixer output, gated
//!    by the replica chips, and dump together when the prompt starts a new epoch.
//! 4. **Latches:** On TIC the carrier value, code value, and epoch words are captured.

use tracing::{debug, trace, warn};

use crate::common::addr::ChannelReg;
use crate::common::constants::{
    CARRIER_NCO_WIDTH, CODE_NCO_WIDTH, HALF_CHIP_INDEX_MASK, PHASE_FIELD_BITS, SLEW_BITS,
};
use crate::common::signal::{IfSample, IqPair};
use crate::config::ChannelInit;
use crate::core::timebase::TimingPulses;
use crate::core::units::accumulator::Accumulator;
use crate::core::units::code_gen::CodeGenerator;
use crate::core::units::epoch::{EpochCounter, EpochInputs};
use crate::core::units::mixer::CarrierMixer;
use crate::core::units::nco::{CarrierNco, CodeNco};

/// Snapshot produced when the prompt replica completes an epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpEvent {
    /// Early branch sums.
    pub early: IqPair,
    /// Prompt branch sums.
    pub prompt: IqPair,
    /// Late branch sums.
    pub late: IqPair,
    /// Samples integrated by the prompt branch.
    pub samples: u32,
    /// Carrier value latched at the last TIC.
    pub carrier_val: u32,
    /// Code value latched at the last TIC.
    pub code_val: u32,
}

/// Writes staged by the bus, consumed at the next edge.
#[derive(Clone, Copy, Debug, Default)]
struct PendingWrites {
    prn: Option<u32>,
    carrier_fcw: Option<u32>,
    code_fcw: Option<u32>,
    slew: Option<i16>,
    epoch_load: Option<u16>,
}

/// Sign-extends the low `bits` of `value`.
#[inline(always)]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

#[inline(always)]
const fn sext16(v: i16) -> u32 {
    v as i32 as u32
}

/// One tracking channel.
#[derive(Clone, Debug)]
pub struct TrackingChannel {
    index: usize,
    code_nco: CodeNco,
    carrier_nco: CarrierNco,
    code_gen: CodeGenerator,
    epoch: EpochCounter,
    mixer: CarrierMixer,
    early: Accumulator,
    prompt: Accumulator,
    late: Accumulator,
    prn_key: u32,
    carrier_fcw: u32,
    code_fcw: u32,
    pending: PendingWrites,
    code_val: u32,
    last_samples: u32,
}

impl TrackingChannel {
    /// Creates an idle channel (no PRN, zero control words).
    ///
    /// # Arguments
    ///
    /// * `index` - Channel number, used for logging.
    /// * `if_high` - Numeric value of the high IF magnitude.
    pub fn new(index: usize, if_high: i16) -> Self {
        Self::idle(index, CarrierMixer::new(if_high))
    }

    fn idle(index: usize, mixer: CarrierMixer) -> Self {
        Self {
            index,
            code_nco: CodeNco::new(),
            carrier_nco: CarrierNco::new(),
            code_gen: CodeGenerator::new(),
            epoch: EpochCounter::new(),
            mixer,
            early: Accumulator::new(),
            prompt: Accumulator::new(),
            late: Accumulator::new(),
            prn_key: 0,
            carrier_fcw: 0,
            code_fcw: 0,
            pending: PendingWrites::default(),
            code_val: 0,
            last_samples: 0,
        }
    }

    /// Creates a channel already programmed with a PRN and control words.
    pub fn with_init(index: usize, if_high: i16, init: &ChannelInit) -> Self {
        let mut ch = Self::new(index, if_high);
        ch.program(init);
        ch
    }

    /// Applies power-on programming immediately, bypassing the staging registers.
    pub fn program(&mut self, init: &ChannelInit) {
        self.carrier_fcw = init.carrier_fcw & mask(CARRIER_NCO_WIDTH);
        self.code_fcw = init.code_fcw & mask(CODE_NCO_WIDTH);
        self.carrier_nco.set_fcw(self.carrier_fcw);
        self.code_nco.set_fcw(self.code_fcw);
        self.prn_key = init.prn;
        let _ = self.load_prn(init.prn);
    }

    /// Returns the channel number.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the loaded PRN, or 0 when idle.
    pub const fn prn(&self) -> u32 {
        self.code_gen.prn()
    }

    /// Returns `true` when the next enabled edge dumps the accumulators.
    pub const fn dump_due(&self) -> bool {
        self.code_gen.epoch_start()
    }

    /// Returns `true` once the epoch counters have diverged.
    pub const fn desync(&self) -> bool {
        self.epoch.desync()
    }

    /// Returns the latest (early, prompt, late) dumped pairs.
    pub const fn correlations(&self) -> [IqPair; 3] {
        [self.early.value(), self.prompt.value(), self.late.value()]
    }

    /// Returns the code generator.
    pub const fn code_gen(&self) -> &CodeGenerator {
        &self.code_gen
    }

    /// Returns the code NCO.
    pub const fn code_nco(&self) -> &CodeNco {
        &self.code_nco
    }

    /// Returns the carrier NCO.
    pub const fn carrier_nco(&self) -> &CarrierNco {
        &self.carrier_nco
    }

    /// Returns the epoch counter.
    pub const fn epoch(&self) -> &EpochCounter {
        &self.epoch
    }

    /// Stages a bus write.
    ///
    /// Control words read back immediately; every write reaches the datapath
    /// at the next enabled edge.
    pub fn write(&mut self, reg: ChannelReg, value: u32) {
        match reg {
            ChannelReg::PrnKey => {
                self.prn_key = value;
                self.pending.prn = Some(value);
            }
            ChannelReg::CarrierNco => {
                self.carrier_fcw = value & mask(CARRIER_NCO_WIDTH);
                self.pending.carrier_fcw = Some(self.carrier_fcw);
            }
            ChannelReg::CodeNco => {
                self.code_fcw = value & mask(CODE_NCO_WIDTH);
                self.pending.code_fcw = Some(self.code_fcw);
            }
            ChannelReg::CodeSlew => {
                self.pending.slew = Some(sign_extend(value, SLEW_BITS) as i16);
            }
            ChannelReg::EpochLoad => {
                self.pending.epoch_load = Some(value as u16);
            }
            _ => debug!(
                channel = self.index,
                ?reg,
                value,
                "write to read-only channel register ignored"
            ),
        }
    }

    /// Returns the value of a channel register as seen this cycle.
    pub const fn read(&self, reg: ChannelReg) -> u32 {
        match reg {
            ChannelReg::PrnKey => self.prn_key,
            ChannelReg::CarrierNco => self.carrier_fcw,
            ChannelReg::CodeNco => self.code_fcw,
            ChannelReg::IEarly => sext16(self.early.value().i),
            ChannelReg::QEarly => sext16(self.early.value().q),
            ChannelReg::IPrompt => sext16(self.prompt.value().i),
            ChannelReg::QPrompt => sext16(self.prompt.value().q),
            ChannelReg::ILate => sext16(self.late.value().i),
            ChannelReg::QLate => sext16(self.late.value().q),
            ChannelReg::CarrierValue => self.carrier_nco.latched_value(),
            ChannelReg::CodeValue => self.code_val,
            ChannelReg::Epoch => self.epoch.latched_epoch() as u32,
            ChannelReg::EpochCheck => self.epoch.latched_check() as u32,
            ChannelReg::EpochLive => self.epoch.epoch().packed() as u32,
            ChannelReg::CodeSlew | ChannelReg::EpochLoad => 0,
        }
    }

    /// Advances one sample.
    ///
    /// # Arguments
    ///
    /// * `pulses` - TimeBase strobes visible this cycle.
    /// * `sample` - IF sample of this cycle.
    ///
    /// # Returns
    ///
    /// The dump event when the prompt replica completed an epoch on this edge.
    pub fn clock(&mut self, pulses: &TimingPulses, sample: IfSample) -> Option<DumpEvent> {
        let pending = std::mem::take(&mut self.pending);
        if let Some(fcw) = pending.carrier_fcw {
            self.carrier_nco.set_fcw(fcw);
        }
        if let Some(fcw) = pending.code_fcw {
            self.code_nco.set_fcw(fcw);
        }
        if let Some(half_chips) = pending.slew {
            debug!(channel = self.index, half_chips, "code slew");
            self.code_gen.slew(half_chips);
        }

        // Everything below samples pre-edge state.
        let hc_enable = self.code_nco.hc_enable() && self.code_gen.is_loaded();
        let code_epoch = self.code_gen.epoch_start();
        let chips = self.code_gen.chips();
        let prompt_hc = self.code_gen.prompt_hc();
        let mixed = self.mixer.mix(sample, self.carrier_nco.reference());

        let early = self.early.clock(mixed, chips.early, code_epoch);
        let prompt = self.prompt.clock(mixed, chips.prompt, code_epoch);
        let late = self.late.clock(mixed, chips.late, code_epoch);

        self.code_nco.clock(pulses.tic);
        self.carrier_nco.clock(pulses.tic);
        if pulses.tic {
            self.code_val = ((u32::from(prompt_hc) & HALF_CHIP_INDEX_MASK) << PHASE_FIELD_BITS)
                | self.code_nco.latched_phase();
        }

        let prn_loaded = pending.prn.is_some_and(|prn| self.load_prn(prn));
        if !prn_loaded {
            self.code_gen.clock(hc_enable);
        }

        let raised = self.epoch.clock(EpochInputs {
            tic: pulses.tic,
            code_epoch,
            hc_enable,
        });
        if raised {
            warn!(
                channel = self.index,
                prompt_hc,
                tally = self.epoch.tally(),
                "code generator and NCO epoch tally diverged"
            );
        }
        if prn_loaded {
            self.epoch
                .realign(self.code_gen.prompt_hc(), self.code_gen.epoch_start());
        }
        if let Some(word) = pending.epoch_load {
            debug!(channel = self.index, word, "epoch load");
            self.epoch
                .load(word, self.code_gen.prompt_hc(), self.code_gen.epoch_start());
        }

        let (Some(early), Some(prompt), Some(late)) = (early, prompt, late) else {
            return None;
        };
        if self.last_samples != 0 && prompt.samples != self.last_samples {
            debug!(
                channel = self.index,
                samples = prompt.samples,
                previous = self.last_samples,
                "integration interval changed"
            );
        }
        self.last_samples = prompt.samples;

        let event = DumpEvent {
            early: early.value,
            prompt: prompt.value,
            late: late.value,
            samples: prompt.samples,
            carrier_val: self.carrier_nco.latched_value(),
            code_val: self.code_val,
        };
        trace!(
            channel = self.index,
            ip = event.prompt.i,
            qp = event.prompt.q,
            samples = event.samples,
            "dump"
        );
        Some(event)
    }

    /// Returns the channel to the idle power-on state.
    pub fn reset(&mut self) {
        *self = Self::idle(self.index, self.mixer);
    }

    fn load_prn(&mut self, prn: u32) -> bool {
        if self.code_gen.load_prn(prn) {
            debug!(channel = self.index, prn, "PRN loaded");
            true
        } else {
            warn!(channel = self.index, key = prn, "PRN key has no tap program; ignored");
            false
        }
    }
}

const fn mask(bits: u32) -> u32 {
    (1 << bits) - 1
}
