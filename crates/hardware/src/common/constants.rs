//! Global Baseband Constants.
//!
//! This module defines constants shared across the tracking core. It includes:
//! 1. **Signal Constants:** C/A code length, chip rate, and half-chip counts.
//! 2. **Accumulator Widths:** Bit widths of the code and carrier phase accumulators.
//! 3. **Register Fields:** Masks and shifts of the composite measurement words.
//! 4. **Epoch Constants:** Epochs per data bit and data bits per counter wrap.

/// Number of chips in one C/A code period.
pub const CA_CODE_LENGTH: usize = 1023;

/// Number of half-chips in one C/A code period.
pub const HALF_CHIPS_PER_EPOCH: u16 = 2046;

/// C/A code chipping rate in chips per second.
pub const CHIP_RATE_HZ: f64 = 1.023e6;

/// Number of standard PRN tap programs supported by the code generator.
pub const PRN_COUNT: u32 = 37;

/// Width of the code NCO phase accumulator in bits.
pub const CODE_NCO_WIDTH: u32 = 28;

/// Width of the carrier NCO phase accumulator in bits.
pub const CARRIER_NCO_WIDTH: u32 = 29;

/// Width of the fine phase fields latched from either NCO.
pub const PHASE_FIELD_BITS: u32 = 10;

/// Mask of a 10-bit fine phase field.
pub const PHASE_FIELD_MASK: u32 = (1 << PHASE_FIELD_BITS) - 1;

/// Width of the carrier cycle counter held in bits [31:10] of the carrier value.
pub const CARRIER_CYCLE_BITS: u32 = 22;

/// Mask of the carrier cycle counter.
pub const CARRIER_CYCLE_MASK: u32 = (1 << CARRIER_CYCLE_BITS) - 1;

/// Mask of the 11-bit prompt half-chip index held in bits [20:10] of the code value.
pub const HALF_CHIP_INDEX_MASK: u32 = 0x7FF;

/// Width of the TimeBase divide reload registers.
pub const DIVIDE_BITS: u32 = 24;

/// Mask of a 24-bit TimeBase divide reload register.
pub const DIVIDE_MASK: u32 = (1 << DIVIDE_BITS) - 1;

/// Width of the signed code slew field in half-chips.
pub const SLEW_BITS: u32 = 12;

/// Code epochs (1 ms each) per navigation data bit.
pub const EPOCHS_PER_BIT: u8 = 20;

/// Data bits counted before the bit counter wraps (one second).
pub const BITS_PER_WRAP: u8 = 50;

/// Shift of the bit count inside a packed epoch word.
pub const EPOCH_BIT_SHIFT: u32 = 5;

/// Mask of the 1 ms count inside a packed epoch word.
pub const EPOCH_MS_MASK: u16 = 0x1F;

/// Mask of the bit count (after shifting) inside a packed epoch word.
pub const EPOCH_BIT_MASK: u16 = 0x3F;

/// Highest number of channels the register map can address (rows 0x0..0xD).
pub const MAX_CHANNELS: usize = 14;
