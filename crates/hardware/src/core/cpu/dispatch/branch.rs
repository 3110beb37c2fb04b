//! BR group execution.
//!
//! Branch offsets count instructions, so they are scaled by 4. A link writes
//! `IA + 4` into R; linking into R0 discards it.
//!
//! Every taken branch checks its target before anything is committed: a target
//! that is not word aligned, or that does not fit in the 52-bit instruction
//! address, raises `Alignment` with the full target address.

use super::{Flow, illegal};
use crate::common::constants::INSTR_BYTES;
use crate::common::{AccessLen, Trap, Word};
use crate::core::arch::control::ControlReg;
use crate::core::arch::psw::PSW_IA_MASK;
use crate::core::cpu::Cpu;
use crate::core::units::alu::Cond;
use crate::isa::instruction::Decoded;
use crate::isa::opcodes::br;

/// `BB` qualifier bit: branch when the tested bit is 1.
const Q_BB_SENSE: u32 = 0b001;
/// `BB` qualifier bit: take the bit position from `SHAMT`.
const Q_BB_SHAMT: u32 = 0b010;
/// Largest table index accepted by `MBR`.
const MBR_INDEX_MASK: u64 = 0x3FFF;

/// Adds a signed instruction offset to an instruction address.
#[inline]
const fn relative(ia: u64, offset: Word) -> u64 {
    ia.wrapping_add_signed(offset.wrapping_mul(INSTR_BYTES as Word))
}

/// Validates a taken branch target.
fn checked_target(target: u64) -> Result<Flow, Trap> {
    if !AccessLen::Word.is_aligned(target) || target & !PSW_IA_MASK != 0 {
        return Err(Trap::alignment(target, AccessLen::Word));
    }
    Ok(Flow::Branch(target))
}

impl Cpu {
    /// Executes a BR group instruction at `ia`.
    pub(crate) fn exec_branch(&mut self, d: &Decoded, ia: u64) -> Result<Flow, Trap> {
        let link = ia.wrapping_add(INSTR_BYTES) as Word;
        match d.family {
            br::B => {
                let flow = checked_target(relative(ia, d.imm19))?;
                self.set_gpr(d.r, link)?;
                Ok(flow)
            }
            br::BR | br::BV => {
                let mut target = self.gpr(d.b)?;
                if d.family == br::BV {
                    target = target.wrapping_add(self.gpr(d.a)?.wrapping_mul(INSTR_BYTES as Word));
                }
                let flow = checked_target(target as u64)?;
                self.set_gpr(d.r, link)?;
                Ok(flow)
            }
            br::BB => {
                let pos = if d.qualifier & Q_BB_SHAMT != 0 {
                    (self.regs.control(ControlReg::Shamt) & 0x3F) as u32
                } else {
                    d.bit_pos
                };
                let bit = (self.gpr(d.r)? >> pos) & 1;
                let want = Word::from(d.qualifier & Q_BB_SENSE != 0);
                if bit == want {
                    checked_target(relative(ia, d.imm13))
                } else {
                    Ok(Flow::Next)
                }
            }
            br::CBR => {
                let cond = Cond::from_cbr_bits(d.qualifier);
                if cond.eval(self.gpr(d.r)?, self.gpr(d.b)?) {
                    checked_target(relative(ia, d.imm15))
                } else {
                    Ok(Flow::Next)
                }
            }
            br::MBR => {
                let limit = d.imm15 as u64 & MBR_INDEX_MASK;
                let idx = (self.gpr(d.b)? as u64).min(limit);
                checked_target(ia.wrapping_add(INSTR_BYTES).wrapping_add(idx * INSTR_BYTES))
            }
            _ => Err(illegal(d)),
        }
    }
}
