//! Twin64 architectural state components.
//!
//! This module contains the architectural elements of a Twin64 CPU.
//! It includes the following modules:
//! 1. **Control Registers:** The versioned control register enumeration and storage.
//! 2. **General Registers:** The 16-entry general register file.
//! 3. **PSW:** Program status word layout and accessors.

/// Control register definitions and storage.
pub mod control;

/// General register file implementation.
pub mod gpr;

/// Program status word layout.
pub mod psw;
