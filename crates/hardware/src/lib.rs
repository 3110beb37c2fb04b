//! Twin64 CPU emulator library.
//!
//! This crate implements an instruction-set emulator for the Twin64 64-bit architecture:
//! 1. **Core:** Register file, PSW, control registers, and the fetch-decode-execute engine.
//! 2. **Memory:** Software-managed TLB with protection checks, physical memory, and the I/O window.
//! 3. **ISA:** Decoding, opcode tables and disassembly for the ALU, MEM, BR and SYS groups.
//! 4. **SoC:** Memory-mapped devices (console) routed through the I/O window.
//! 5. **Simulation:** Image loader, configuration, and statistics collection.
//!
//! # Examples
//!
//! ```
//! use twin64_core::{Config, Cpu, StopReason};
//! use twin64_core::common::AccessLen;
//!
//! let program: [u32; 3] = [
//!     0x0448_0005, // ADD R1, R0, #5
//!     0x0488_800A, // ADD R2, R1, #10
//!     0x6480_4000, // ST.W R2, 0(R0)
//! ];
//! let image: Vec<u8> = program.iter().flat_map(|w| w.to_le_bytes()).collect();
//!
//! let mut cpu = Cpu::new(&Config::default()).unwrap();
//! cpu.memory_mut().load_physical(0, &image).unwrap();
//! cpu.reset();
//! assert_eq!(cpu.step(3).unwrap(), StopReason::Completed);
//! assert_eq!(cpu.general_reg(2).unwrap(), 15);
//! assert_eq!(cpu.memory().read_physical(0, AccessLen::Word, false).unwrap(), 15);
//! ```

/// Common types and constants (Word, access kinds, traps, register file).
pub mod common;
/// Emulator configuration (defaults, trap policy, JSON loading).
pub mod config;
/// CPU core (arch state, units, execution engine, traps).
pub mod core;
/// Instruction set (encoding, opcodes, decode, disassembly).
pub mod isa;
/// Binary image loading.
pub mod sim;
/// Physical memory, I/O window and devices.
pub mod soc;
/// Execution statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; owns registers, MMU, memory and statistics.
pub use crate::core::{Cpu, CpuState, StopReason, TrapRecord};
