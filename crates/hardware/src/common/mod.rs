//! Common utilities and types used throughout the baseband model.
//!
//! This module provides the building blocks shared by every datapath block and
//! by the register file. It includes:
//! 1. **Address Types:** Word addresses and the pure register decode function.
//! 2. **Constants:** Code lengths, accumulator widths, and register field masks.
//! 3. **Signal Types:** Quantized IF samples, carrier reference levels, and I/Q pairs.
//! 4. **Error Handling:** Configuration, stimulus, fault, and simulation errors.

/// Register address types and decoding.
pub mod addr;

/// Common constants used throughout the model.
pub mod constants;

/// Error types and runtime fault definitions.
pub mod error;

/// Quantized signal value types.
pub mod signal;

pub use addr::{ChannelReg, RegisterId, WordAddr, decode};
pub use error::{ConfigError, Fault, SimError, StimulusError};
pub use signal::{CarrierRef, IfSample, IqPair, RefLevel};
