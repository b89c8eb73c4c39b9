//! Tracking core.
//!
//! This module contains the clocked datapath of the baseband: the shared
//! TimeBase, the tracking channel, and the units each channel is built from.

/// Tracking channel composed of NCOs, code generator, mixer, and accumulators.
pub mod channel;

/// TIC/preTIC and accumulator-interrupt grid generator.
pub mod timebase;

/// Datapath units (NCOs, code generator, mixer, accumulator, epoch counter).
pub mod units;

pub use self::channel::{DumpEvent, TrackingChannel};
pub use self::timebase::{TimeBase, TimingPulses};
