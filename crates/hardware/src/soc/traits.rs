//! Register target trait for strobe-based access.
//!
//! This module defines the seam between the [`BusAdapter`](crate::soc::bus_adapter::BusAdapter)
//! and whatever register block sits behind it. It provides:
//! 1. **Access Strobes:** A single read or write presented for one edge.
//! 2. **Registered Read Data:** Read data appears the cycle after its strobe and holds until
//!    the next read.

/// One register access presented by the bus adapter for exactly one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read strobe; the data is registered on the edge.
    Read {
        /// Byte address.
        addr: u32,
    },
    /// Write strobe.
    Write {
        /// Byte address.
        addr: u32,
        /// Write data.
        data: u32,
    },
}

/// A register block addressed with single-cycle strobes.
pub trait RegisterTarget {
    /// Returns the registered read data of the most recent read strobe.
    fn read_data(&self) -> u32;

    /// Presents an access to be performed on the coming edge.
    fn strobe(&mut self, access: RegisterAccess);
}
