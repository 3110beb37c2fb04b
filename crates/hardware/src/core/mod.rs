//! Core processor implementation.
//!
//! This module contains the CPU implementation: architectural state, the
//! functional units, and the execution engine that coordinates them.

/// Architecture-specific components (control registers, general registers, PSW).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Execution units (ALU, MMU/TLB).
pub mod units;

pub use self::cpu::{Cpu, CpuState, StopReason, TrapRecord};
