//! Baseband construction and top-level `Baseband` type.
//!
//! This module assembles the complete core from configuration. It performs:
//! 1. **Validation:** Rejects configurations the register widths cannot represent.
//! 2. **Assembly:** Instantiates the register file (channels and TimeBase) behind the bus adapter.
//! 3. **Sample Enable:** Gates the datapath to one edge in `sample_enable_divide` while the
//!    bus side runs every clock.
//! 4. **Reset:** Applies the synchronous active-low reset.

use tracing::debug;

use crate::common::error::ConfigError;
use crate::common::signal::IfSample;
use crate::config::Config;
use crate::soc::bus_adapter::{BusAdapter, MasterSignals, SlaveSignals};
use crate::soc::regfile::{EdgeReport, RegisterFile};
use crate::soc::traits::RegisterTarget;
use crate::stats::BasebandStats;

/// Top-level baseband instance: bus adapter, register file, and sample-enable generator.
#[derive(Debug)]
pub struct Baseband {
    adapter: BusAdapter,
    regfile: RegisterFile,
    enable_divide: u32,
    enable_phase: u32,
    enable_count: u32,
    /// Activity counters.
    pub stats: BasebandStats,
}

impl Baseband {
    /// Builds a baseband from configuration.
    ///
    /// # Errors
    ///
    /// Returns the first constraint violated by `config`.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            channels = config.system.channel_count,
            tic_divide = config.timebase.tic_divide,
            accum_divide = config.timebase.accum_divide,
            "building baseband"
        );
        Ok(Self {
            adapter: BusAdapter::new(),
            regfile: RegisterFile::new(config),
            enable_divide: config.system.sample_enable_divide,
            enable_phase: config.system.sample_enable_phase,
            enable_count: 0,
            stats: BasebandStats::new(config.system.channel_count),
        })
    }

    /// Returns the register file.
    pub const fn regfile(&self) -> &RegisterFile {
        &self.regfile
    }

    /// Returns the bus adapter.
    pub const fn adapter(&self) -> &BusAdapter {
        &self.adapter
    }

    /// Returns the adapter outputs for this cycle.
    pub const fn outputs(&self, master: &MasterSignals) -> SlaveSignals {
        self.adapter.outputs(master)
    }

    /// Returns `true` when the coming edge clocks the datapath (consumes an IF sample).
    pub const fn sample_enable(&self) -> bool {
        self.enable_count == self.enable_phase
    }

    /// Interrupt line: any channel has unread data.
    pub const fn irq(&self) -> bool {
        self.regfile.irq()
    }

    /// Advances one bus clock edge.
    ///
    /// # Arguments
    ///
    /// * `master` - Master signals visible this cycle.
    /// * `sample` - IF sample for this edge; ignored unless [`Baseband::sample_enable`] is set.
    /// * `aresetn` - Active-low synchronous reset.
    ///
    /// # Returns
    ///
    /// The register file's report for this edge (empty while in reset).
    pub fn clock(&mut self, master: &MasterSignals, sample: IfSample, aresetn: bool) -> EdgeReport {
        self.stats.cycles += 1;
        if !aresetn {
            self.reset();
            return EdgeReport::default();
        }

        let sample_enable = self.sample_enable();
        let read_data = self.regfile.read_data();
        if let Some(access) = self.adapter.access() {
            self.regfile.strobe(access);
            self.stats.record_access(access);
        }
        let report = self.regfile.clock(sample, sample_enable);
        self.adapter.clock(master, read_data);

        self.enable_count += 1;
        if self.enable_count == self.enable_divide {
            self.enable_count = 0;
        }

        if let Some(pulses) = report.pulses {
            self.stats.sample_ticks += 1;
            self.stats.tics += u64::from(pulses.tic);
            self.stats.accum_pulses += u64::from(pulses.accum_pulse);
        }
        self.stats.record_dumps(report.dumped);
        self.stats.desync_faults += u64::from(report.faults_raised.count_ones());
        report
    }

    /// Returns the adapter, register file, and sample-enable phase to power-on state.
    ///
    /// Statistics are kept.
    pub fn reset(&mut self) {
        self.adapter.reset();
        self.regfile.soft_reset();
        self.enable_count = 0;
    }
}
