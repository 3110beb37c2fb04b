//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction functions and the `Decoded` structure for Twin64
//! instruction fields. Bit positions count from the least significant bit.
//!
//! | field     | bits   |
//! |-----------|--------|
//! | group     | 31..30 |
//! | family    | 29..26 |
//! | R         | 25..22 |
//! | qualifier | 21..19 |
//! | B         | 18..15 |
//! | dw        | 14..13 |
//! | A         | 12..9  |
//! | imm13     | 12..0  |
//! | imm15     | 14..0  |
//! | imm19     | 18..0  |
//! | imm20u    | 19..0  |

use crate::common::Word;
use crate::core::units::alu::bitfield::sign_extend;

/// Bit position of the group field.
pub const GROUP_SHIFT: u32 = 30;
/// Bit mask for the group field (2 bits).
pub const GROUP_MASK: u32 = 0x3;
/// Bit position of the family field.
pub const FAMILY_SHIFT: u32 = 26;
/// Bit mask for the family field (4 bits).
pub const FAMILY_MASK: u32 = 0xF;
/// Bit position of the R register field.
pub const R_SHIFT: u32 = 22;
/// Bit position of the qualifier field.
pub const QUALIFIER_SHIFT: u32 = 19;
/// Bit mask for the qualifier field (3 bits).
pub const QUALIFIER_MASK: u32 = 0x7;
/// Bit position of the B register field.
pub const B_SHIFT: u32 = 15;
/// Bit position of the data width field.
pub const DW_SHIFT: u32 = 13;
/// Bit mask for the data width field (2 bits).
pub const DW_MASK: u32 = 0x3;
/// Bit position of the A register field.
pub const A_SHIFT: u32 = 9;
/// Bit mask for any register field (4 bits).
pub const REG_MASK: u32 = 0xF;
/// Bit position of the `BB` bit position field.
pub const BIT_POS_SHIFT: u32 = 13;
/// Bit mask for the `BB` bit position field (6 bits).
pub const BIT_POS_MASK: u32 = 0x3F;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode group (bits 30-31).
    fn group(&self) -> u32;

    /// Extracts the opcode family (bits 26-29). Its meaning depends on the group.
    fn family(&self) -> u32;

    /// Extracts the R register field (bits 22-25), the destination or first operand.
    fn r(&self) -> usize;

    /// Extracts the qualifier field (bits 19-21).
    fn qualifier(&self) -> u32;

    /// Extracts the B register field (bits 15-18).
    fn b(&self) -> usize;

    /// Extracts the data width field (bits 13-14).
    fn dw(&self) -> u32;

    /// Extracts the A register field (bits 9-12).
    fn a(&self) -> usize;

    /// Extracts the 6-bit bit position used by `BB` (bits 13-18).
    fn bit_pos(&self) -> u32;

    /// Sign-extended 13-bit immediate (bits 0-12).
    fn imm13(&self) -> Word;

    /// Sign-extended 15-bit immediate (bits 0-14).
    fn imm15(&self) -> Word;

    /// Sign-extended 19-bit immediate (bits 0-18).
    fn imm19(&self) -> Word;

    /// Zero-extended 20-bit immediate (bits 0-19).
    fn imm20u(&self) -> u64;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn group(&self) -> u32 {
        (self >> GROUP_SHIFT) & GROUP_MASK
    }

    #[inline(always)]
    fn family(&self) -> u32 {
        (self >> FAMILY_SHIFT) & FAMILY_MASK
    }

    #[inline(always)]
    fn r(&self) -> usize {
        ((self >> R_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn qualifier(&self) -> u32 {
        (self >> QUALIFIER_SHIFT) & QUALIFIER_MASK
    }

    #[inline(always)]
    fn b(&self) -> usize {
        ((self >> B_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn dw(&self) -> u32 {
        (self >> DW_SHIFT) & DW_MASK
    }

    #[inline(always)]
    fn a(&self) -> usize {
        ((self >> A_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn bit_pos(&self) -> u32 {
        (self >> BIT_POS_SHIFT) & BIT_POS_MASK
    }

    #[inline(always)]
    fn imm13(&self) -> Word {
        sign_extend(u64::from(*self), 13)
    }

    #[inline(always)]
    fn imm15(&self) -> Word {
        sign_extend(u64::from(*self), 15)
    }

    #[inline(always)]
    fn imm19(&self) -> Word {
        sign_extend(u64::from(*self), 19)
    }

    #[inline(always)]
    fn imm20u(&self) -> u64 {
        u64::from(*self & 0xF_FFFF)
    }
}

/// Decoded instruction fields.
///
/// Every field is extracted unconditionally; the execute stage decides which
/// register fields and which immediate width a family uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// The raw 32-bit instruction word.
    pub raw: u32,
    /// Opcode group (ALU=0, MEM=1, BR=2, SYS=3).
    pub group: u32,
    /// Opcode family within the group.
    pub family: u32,
    /// Qualifier bits.
    pub qualifier: u32,
    /// R register index.
    pub r: usize,
    /// B register index.
    pub b: usize,
    /// A register index.
    pub a: usize,
    /// Data width field (`length = 1 << dw`).
    pub dw: u32,
    /// `BB` bit position field.
    pub bit_pos: u32,
    /// Sign-extended 13-bit immediate.
    pub imm13: Word,
    /// Sign-extended 15-bit immediate.
    pub imm15: Word,
    /// Sign-extended 19-bit immediate.
    pub imm19: Word,
    /// Zero-extended 20-bit immediate.
    pub imm20u: u64,
}
