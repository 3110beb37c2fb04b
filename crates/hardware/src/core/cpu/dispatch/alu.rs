//! ALU group execution.

use super::{Flow, illegal};
use crate::common::{Trap, Word};
use crate::core::arch::control::ControlReg;
use crate::core::cpu::Cpu;
use crate::core::units::alu::{Alu, AluOp, Cond, LogicMods, arithmetic, bitfield};
use crate::isa::instruction::Decoded;
use crate::isa::opcodes::alu;

/// Qualifier bit selecting the immediate operand.
const Q_IMMEDIATE: u32 = 0b001;
/// Qualifier bit complementing the second operand (AND, OR).
const Q_COMPLEMENT: u32 = 0b010;
/// Qualifier bit complementing the result (AND, OR, XOR).
const Q_NEGATE: u32 = 0b100;

/// Maps an arithmetic/logic family to its operation.
///
/// Shared with the memory-operand families, which use the same numbers.
pub(crate) const fn binary_op(family: u32) -> Option<AluOp> {
    match family {
        alu::ADD => Some(AluOp::Add),
        alu::SUB => Some(AluOp::Sub),
        alu::AND => Some(AluOp::And),
        alu::OR => Some(AluOp::Or),
        alu::XOR => Some(AluOp::Xor),
        _ => None,
    }
}

/// Decodes and validates the qualifier modifiers of a binary operation.
///
/// # Returns
///
/// The modifiers, or `None` if a reserved qualifier bit is set.
pub(crate) const fn binary_mods(op: AluOp, qualifier: u32) -> Option<LogicMods> {
    let reserved = match op {
        AluOp::Add | AluOp::Sub => Q_COMPLEMENT | Q_NEGATE,
        AluOp::Xor => Q_COMPLEMENT,
        AluOp::And | AluOp::Or => 0,
    };
    if qualifier & reserved != 0 {
        return None;
    }
    Some(LogicMods {
        complement_operand: qualifier & Q_COMPLEMENT != 0,
        negate_result: qualifier & Q_NEGATE != 0,
    })
}

impl Cpu {
    /// Second operand of the register-or-immediate forms.
    fn alu_operand2(&self, d: &Decoded) -> Result<Word, Trap> {
        if d.qualifier & Q_IMMEDIATE != 0 {
            Ok(d.imm15)
        } else {
            self.gpr(d.a)
        }
    }

    /// Executes an ALU group instruction.
    pub(crate) fn exec_alu(&mut self, d: &Decoded) -> Result<Flow, Trap> {
        let checked = self.regs.psw().overflow_checks();
        let result = match d.family {
            alu::NOP => return Ok(Flow::Next),
            alu::ADD | alu::SUB | alu::AND | alu::OR | alu::XOR => {
                let op = binary_op(d.family).ok_or(illegal(d))?;
                let mods = binary_mods(op, d.qualifier).ok_or(illegal(d))?;
                let b = self.gpr(d.b)?;
                let op2 = self.alu_operand2(d)?;
                Alu::execute(op, b, op2, mods, checked)
                    .ok_or(Trap::overflow(d.raw, d.group, d.family))?
            }
            alu::CMP => {
                let cond = Cond::from_cmp_bits(d.qualifier >> 1);
                Word::from(cond.eval(self.gpr(d.b)?, self.alu_operand2(d)?))
            }
            alu::BITOP => self.bitop(d)?,
            alu::SHAOP => {
                let (amount, left) = match d.qualifier {
                    q @ 0..=2 => (q + 1, true),
                    q @ 4..=6 => (q - 3, false),
                    _ => return Err(illegal(d)),
                };
                arithmetic::shift_add(self.gpr(d.b)?, amount, left, self.gpr(d.a)?, checked)
                    .ok_or(Trap::overflow(d.raw, d.group, d.family))?
            }
            alu::IMMOP => {
                let imm = d.imm20u as Word;
                let r = self.gpr(d.r)?;
                match d.qualifier >> 1 {
                    alu::IMMOP_LDI_L => imm,
                    alu::IMMOP_LDI_M => bitfield::deposit(r, imm, 20, 20),
                    alu::IMMOP_LDI_U => bitfield::deposit(r, imm, 40, 20),
                    _ => bitfield::deposit(r, imm, 60, 4),
                }
            }
            alu::LDO => self.gpr(d.b)?.wrapping_add(d.imm15),
            _ => return Err(illegal(d)),
        };
        self.set_gpr(d.r, result)?;
        Ok(Flow::Next)
    }

    /// Executes `BITOP` (EXTR, EXTR.S, DEP, DEP.Z, DSR).
    fn bitop(&self, d: &Decoded) -> Result<Word, Trap> {
        if d.qualifier == alu::BITOP_DSR {
            let shamt = (self.regs.control(ControlReg::Shamt) & 0x3F) as u32;
            return Ok(bitfield::double_shift_right(
                self.gpr(d.b)?,
                self.gpr(d.a)?,
                shamt,
            ));
        }
        let field = d.imm13 as u32;
        let pos = (field >> 6) & 0x3F;
        let len = (field & 0x3F) + 1;
        if !bitfield::is_valid_field(pos, len) {
            return Err(illegal(d));
        }
        let b = self.gpr(d.b)?;
        match d.qualifier {
            alu::BITOP_EXTR => Ok(bitfield::extract(b, pos, len, false)),
            alu::BITOP_EXTR_S => Ok(bitfield::extract(b, pos, len, true)),
            alu::BITOP_DEP => Ok(bitfield::deposit(self.gpr(d.r)?, b, pos, len)),
            alu::BITOP_DEP_Z => Ok(bitfield::deposit(0, b, pos, len)),
            _ => Err(illegal(d)),
        }
    }
}
