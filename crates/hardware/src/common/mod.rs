//! Common utilities and types used throughout the Twin64 emulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the emulator. It includes:
//! 1. **Constants:** Word type, page geometry, I/O window and instruction width.
//! 2. **Memory Access:** Access kinds and access lengths.
//! 3. **Error Handling:** Trap codes, trap values and host-facing errors.
//! 4. **Register Management:** The unified architectural register file.

/// Common constants used throughout the emulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use constants::{IO_MEM_LIMIT, IO_MEM_START, PAGE_SHIFT, PAGE_SIZE, Word};
pub use data::{AccessLen, AccessType};
pub use error::{CpuError, Trap, TrapCode};
pub use reg::{RegisterFile, Reservation};
