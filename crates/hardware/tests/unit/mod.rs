//! # Unit Components
//!
//! This module mirrors the library tree: shared types, the CPU core and its units,
//! the ISA layer, the memory system and devices, configuration, loading and statistics.






/// Physical memory, I/O routing and the console.
pub mod soc;

/// Statistics counters and report.
pub mod stats;
