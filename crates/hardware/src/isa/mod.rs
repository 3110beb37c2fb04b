//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the Twin64 instruction encoding, the opcode tables for the four
//! opcode groups, the decoder and the disassembler.
//!
//! # Groups
//!
//! * `ALU` (0): register and immediate arithmetic, logic, bit fields.
//! * `MEM` (1): loads, stores, memory-operand arithmetic, load-reserve/store-conditional.
//! * `BR` (2): relative, indirect, bit-test, compare and table branches.
//! * `SYS` (3): control registers, TLB maintenance, status, traps.

/// Instruction decoding into the `Decoded` structure.
pub mod decode;

/// Instruction disassembler for trace logs and diagnostics.
pub mod disasm;

/// Instruction field layout and bit extraction utilities.
pub mod instruction;

/// Opcode group and family numbers.
pub mod opcodes;
