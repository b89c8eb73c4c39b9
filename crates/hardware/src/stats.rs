//! Simulation statistics collection and reporting.
//!
//! This module tracks activity counters for the baseband model. It provides:
//! 1. **Clocking:** Bus clocks elapsed and datapath sample ticks.
//! 2. **Timing Grid:** TICs and accumulator interrupt pulses.
//! 3. **Correlation:** Dumps per channel and desync faults raised.
//! 4. **Bus Traffic:** Register reads and writes performed through the adapter.

use std::time::Instant;

use crate::soc::traits::RegisterAccess;

/// Activity counters of one baseband instance.
#[derive(Clone, Debug)]
pub struct BasebandStats {
    start_time: Instant,
    /// Bus clock edges elapsed.
    pub cycles: u64,
    /// Edges on which the datapath was enabled (IF samples consumed).
    pub sample_ticks: u64,
    /// TIC strobes.
    pub tics: u64,
    /// Accumulator interrupt pulses.
    pub accum_pulses: u64,
    /// Accumulator dumps per channel.
    pub dumps: Vec<u64>,
    /// Register reads performed.
    pub bus_reads: u64,
    /// Register writes performed.
    pub bus_writes: u64,
    /// Epoch desync faults raised.
    pub desync_faults: u64,
}

impl BasebandStats {
    /// Creates zeroed counters for `channels` channels.
    pub fn new(channels: usize) -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            sample_ticks: 0,
            tics: 0,
            accum_pulses: 0,
            dumps: vec![0; channels],
            bus_reads: 0,
            bus_writes: 0,
            desync_faults: 0,
        }
    }

    /// Counts one register access.
    pub const fn record_access(&mut self, access: RegisterAccess) {
        match access {
            RegisterAccess::Read { .. } => self.bus_reads += 1,
            RegisterAccess::Write { .. } => self.bus_writes += 1,
        }
    }

    /// Counts the channels set in a dump mask.
    pub fn record_dumps(&mut self, mask: u32) {
        for (n, count) in self.dumps.iter_mut().enumerate() {
            if mask & (1 << n) != 0 {
                *count += 1;
            }
        }
    }

    /// Returns the total number of dumps over every channel.
    pub fn total_dumps(&self) -> u64 {
        self.dumps.iter().sum()
    }

    /// Prints a summary to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64().max(f64::EPSILON);
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("GPS BASEBAND SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {khz:.2} kHz");
        println!("sample_ticks             {}", self.sample_ticks);
        println!("tics                     {}", self.tics);
        println!("accum_pulses             {}", self.accum_pulses);
        println!("----------------------------------------------------------");
        println!("CORRELATION");
        for (n, count) in self.dumps.iter().enumerate() {
            if *count != 0 {
                println!("  ch{n:<2}.dumps             {count}");
            }
        }
        println!("  dumps.total            {}", self.total_dumps());
        println!("  desync_faults          {}", self.desync_faults);
        println!("----------------------------------------------------------");
        println!("BUS");
        println!("  reads                  {}", self.bus_reads);
        println!("  writes                 {}", self.bus_writes);
        println!("==========================================================");
    }
}
