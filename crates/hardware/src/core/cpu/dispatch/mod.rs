//! Instruction Dispatch.
//!
//! One submodule per opcode group. Every handler validates operands and
//! addresses before committing anything, so a trapping instruction leaves
//! registers and memory exactly as they were.

/// ALU group: arithmetic, logic, compare, bit fields, immediates.
pub mod alu;

/// BR group: relative, indirect, bit-test, compare and table branches.
pub mod branch;

/// MEM group: loads, stores, memory operands and LDR/STC.
pub mod mem;

/// SYS group: control registers, TLB, status, traps and diagnostics.
pub mod system;

use super::Cpu;
use crate::common::{Trap, Word};
use crate::core::arch::psw::Psw;
use crate::isa::instruction::Decoded;

/// How an executed instruction continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Continue at `IA + 4`.
    Next,
    /// Continue at the given instruction address.
    Branch(u64),
    /// Replace the whole PSW (`RFI`).
    Restore(Psw),
    /// Stop in `Halted` after this instruction.
    Halt,
}

impl Cpu {
    /// Reads a general register named by a decoded field.
    #[inline]
    pub(crate) fn gpr(&self, idx: usize) -> Result<Word, Trap> {
        self.regs.general(idx)
    }

    /// Writes a general register named by a decoded field.
    #[inline]
    pub(crate) fn set_gpr(&mut self, idx: usize, val: Word) -> Result<(), Trap> {
        self.regs.set_general(idx, val)
    }
}

/// `ILLEGAL_INSTR` trap for a decoded instruction.
pub(crate) const fn illegal(d: &Decoded) -> Trap {
    Trap::illegal(d.raw, d.group, d.family)
}
