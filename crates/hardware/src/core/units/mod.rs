//! Execution units and functional components.
//!
//! This module contains the processor's functional units: the integer ALU
//! and the memory management unit with its TLB.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Memory Management Unit with the software-managed TLB.
pub mod mmu;
