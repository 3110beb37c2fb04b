//! Bitwise logical and comparison operations.

use super::{AluOp, LogicMods};
use crate::common::Word;

/// Comparison conditions used by `CMP` and `CBR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Signed less than.
    Lt,
    /// Signed less than or equal.
    Le,
    /// Signed greater than.
    Gt,
    /// Signed greater than or equal.
    Ge,
    /// Unsigned less than.
    Ltu,
    /// Unsigned greater than or equal.
    Geu,
}

impl Cond {
    /// Decodes the 2-bit `CMP` condition (0 EQ, 1 LT, 2 NE, 3 LE).
    pub const fn from_cmp_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => Self::Eq,
            1 => Self::Lt,
            2 => Self::Ne,
            _ => Self::Le,
        }
    }

    /// Decodes the 3-bit `CBR` condition (0 EQ, 1 NE, 2 LT, 3 LE, 4 GT, 5 GE, 6 LTU, 7 GEU).
    pub const fn from_cbr_bits(bits: u32) -> Self {
        match bits & 0x7 {
            0 => Self::Eq,
            1 => Self::Ne,
            2 => Self::Lt,
            3 => Self::Le,
            4 => Self::Gt,
            5 => Self::Ge,
            6 => Self::Ltu,
            _ => Self::Geu,
        }
    }

    /// Evaluates `a cond b`.
    pub const fn eval(self, a: Word, b: Word) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => a < b,
            Self::Le => a <= b,
            Self::Gt => a > b,
            Self::Ge => a >= b,
            Self::Ltu => (a as u64) < (b as u64),
            Self::Geu => (a as u64) >= (b as u64),
        }
    }

    /// Assembler suffix of the condition.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Lt => "LT",
            Self::Le => "LE",
            Self::Gt => "GT",
            Self::Ge => "GE",
            Self::Ltu => "LTU",
            Self::Geu => "GEU",
        }
    }
}

/// Executes And, Or or Xor with the given modifiers.
///
/// Add and Sub are not logical operations and yield 0.
pub const fn execute(op: AluOp, a: Word, b: Word, mods: LogicMods) -> Word {
    let b = if mods.complement_operand { !b } else { b };
    let res = match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Add | AluOp::Sub => 0,
    };
    if mods.negate_result { !res } else { res }
}
