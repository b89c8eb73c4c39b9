//! Datapath units of a tracking channel.
//!
//! This module contains the leaf blocks composed by
//! [`TrackingChannel`](crate::core::channel::TrackingChannel): the code and
//! carrier NCOs, the C/A code generator, the carrier mixer, the correlator
//! accumulators, and the epoch counter.

/// Integrate-and-dump correlator accumulators.
pub mod accumulator;

/// C/A code generator with early/prompt/late delay line.
pub mod code_gen;

/// Dual epoch counter with desync detection.
pub mod epoch;

/// Sign/magnitude carrier mixer.
pub mod mixer;

/// Phase accumulators, code NCO, and carrier NCO.
pub mod nco;
