//! Simulation support around the core.
//!
//! Provides the IF stimulus generator, the bus-master driver, the
//! interrupt-servicing simulator, and correlation dump output.

/// Correlation records and dump file writer.
pub mod dump;

/// Single-outstanding valid/ready bus master.
pub mod master;

/// Interrupt-driven simulator.
pub mod simulator;

/// Seeded 2-bit IF sample generator.
pub mod stimulus;

pub use dump::{CorrelationRecord, DumpFormat, DumpWriter};
pub use master::{BusMaster, BusOp, Completion};
pub use simulator::Simulator;
pub use stimulus::{IfGenerator, StimulusConfig, TextSamples};
