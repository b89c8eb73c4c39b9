//! GPS L1 C/A baseband tracking core model.
//!
//! This crate implements a cycle-accurate model of a multi-channel GPS
//! tracking core with the following:
//! 1. **Core:** Code and carrier NCOs, C/A code generator, mixer, E/P/L accumulators, epoch
//!    counters, and the shared TimeBase.
//! 2. **SoC:** Multi-channel register file and an AXI4-Lite style bus adapter.
//! 3. **Simulation:** IF stimulus generator, bus-master driver, interrupt-servicing
//!    simulator, and correlation dump records.
//! 4. **Support:** Configuration, error types, and statistics collection.
//!
//! One call to a `clock` method models one rising edge of the sample clock.

/// Common types and constants (addresses, signal types, errors).
pub mod common;
/// Baseband configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Tracking core (TimeBase, channel, datapath units).
pub mod core;
/// Stimulus, bus master, simulator, and dump output.
pub mod sim;
/// Register file, bus adapter, and top-level assembly.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level baseband; construct with `Baseband::new`.
pub use crate::soc::Baseband;
/// Interrupt-driven simulator around a `Baseband`.
pub use crate::sim::Simulator;
