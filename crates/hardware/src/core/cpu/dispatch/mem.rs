//! MEM group execution.
//!
//! Addressing is `B + sext(imm13)` when qualifier bit 0 is clear and `B + A`
//! when it is set. The access length comes from the `dw` field.
//!
//! Arithmetic with a memory operand previews the operand first and commits the
//! load only after the overflow check, so a trapping instruction never consumes
//! device input.

use super::alu::{binary_mods, binary_op};
use super::{Flow, illegal};
use crate::common::{AccessLen, AccessType, Reservation, Trap, Word};
use crate::core::cpu::Cpu;
use crate::core::units::alu::{Alu, Cond};
use crate::isa::instruction::Decoded;
use crate::isa::opcodes::mem;

/// Qualifier bit selecting the indexed (`B + A`) address mode.
const Q_INDEXED: u32 = 0b001;
/// `LD` qualifier bit requesting sign extension.
const Q_SIGNED: u32 = 0b010;

impl Cpu {
    /// Effective virtual address of a MEM group instruction.
    fn effective_address(&self, d: &Decoded) -> Result<u64, Trap> {
        let base = self.gpr(d.b)?;
        let offset = if d.qualifier & Q_INDEXED != 0 {
            self.gpr(d.a)?
        } else {
            d.imm13
        };
        Ok(base.wrapping_add(offset) as u64)
    }

    /// Executes a MEM group instruction.
    pub(crate) fn exec_mem(&mut self, d: &Decoded) -> Result<Flow, Trap> {
        let len = AccessLen::from_dw(d.dw);
        match d.family {
            mem::ADD | mem::SUB | mem::AND | mem::OR | mem::XOR => {
                let op = binary_op(d.family).ok_or(illegal(d))?;
                // The address-mode bit doubles as qualifier bit 0, which is the
                // immediate flag in the ALU group; only bits 1..2 are modifiers here.
                let mods = binary_mods(op, d.qualifier & !Q_INDEXED).ok_or(illegal(d))?;
                let addr = self.effective_address(d)?;
                let checked = self.regs.psw().overflow_checks();
                let r = self.gpr(d.r)?;
                let (paddr, m) = self.preview_load(addr, len, true)?;
                let val = Alu::execute(op, r, m, mods, checked)
                    .ok_or(Trap::overflow(d.raw, d.group, d.family))?;
                self.commit_load(paddr, len)?;
                self.set_gpr(d.r, val)?;
            }
            mem::CMP => {
                let cond = Cond::from_cmp_bits(d.qualifier >> 1);
                let addr = self.effective_address(d)?;
                let r = self.gpr(d.r)?;
                let (paddr, m) = self.preview_load(addr, len, true)?;
                self.commit_load(paddr, len)?;
                self.set_gpr(d.r, Word::from(cond.eval(r, m)))?;
            }
            mem::LD => {
                let addr = self.effective_address(d)?;
                let val = self.load(addr, len, d.qualifier & Q_SIGNED != 0)?;
                self.set_gpr(d.r, val)?;
            }
            mem::ST => {
                let addr = self.effective_address(d)?;
                let val = self.gpr(d.r)?;
                self.store(addr, len, val)?;
            }
            mem::LDR => {
                let addr = self.effective_address(d)?;
                let (paddr, val) = self.load_physical_addr(addr, len, false)?;
                self.regs.reserve(Reservation {
                    address: paddr,
                    length: len.bytes(),
                    value: val,
                });
                self.set_gpr(d.r, val)?;
            }
            mem::STC => {
                let addr = self.effective_address(d)?;
                let val = self.gpr(d.r)?;
                let paddr = self.translate_and_check(addr, len, AccessType::Write)?;
                let reserved = self
                    .regs
                    .take_reservation()
                    .is_some_and(|r| r.address == paddr);
                if reserved {
                    self.store_physical_addr(paddr, len, val)?;
                } else {
                    self.stats.store_conditional_failures += 1;
                }
                self.set_gpr(d.r, Word::from(reserved))?;
            }
            _ => return Err(illegal(d)),
        }
        Ok(Flow::Next)
    }
}
