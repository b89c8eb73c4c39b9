//! Bus-facing side of the baseband.
//!
//! This module organizes the components that expose the tracking channels to
//! a bus master: the register file, the bus adapter, the register target
//! trait between them, and the top-level builder that clocks them together.

/// Top-level baseband assembly.
pub mod builder;

/// AXI4-Lite style valid/ready to strobe adapter.
pub mod bus_adapter;

/// Multi-channel register file with shared TimeBase and status block.
pub mod regfile;

/// Register target trait and access strobes.
pub mod traits;

pub use builder::Baseband;
pub use bus_adapter::{BusAdapter, MasterSignals, SlaveSignals};
pub use regfile::RegisterFile;
pub use traits::{RegisterAccess, RegisterTarget};
