//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer operations shared by the ALU group and the
//! memory-operand forms of the MEM group. All arithmetic is 64-bit two's complement.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub and shift-and-add, with optional overflow detection
//! - [`logic`]:      And, Or, Xor with operand/result complement, and comparisons
//! - [`bitfield`]:   Field extract, field deposit and double shift right

/// Integer arithmetic operations (add, subtract, shift-and-add).
pub mod arithmetic;

/// Bit field operations (extract, deposit, double shift).
pub mod bitfield;

/// Bitwise logical and comparison operations.
pub mod logic;

use crate::common::Word;

pub use logic::Cond;

/// Binary operations available as ALU families and memory-operand families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    /// Signed addition.
    Add,
    /// Signed subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
}

/// Modifiers applied to logical operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogicMods {
    /// Complement the second operand before the operation.
    pub complement_operand: bool,
    /// Complement the result.
    pub negate_result: bool,
}

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes a binary ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op`      - The operation to perform.
    /// * `a`       - First operand.
    /// * `b`       - Second operand.
    /// * `mods`    - Complement modifiers (ignored by Add and Sub).
    /// * `checked` - Detect signed overflow in Add and Sub.
    ///
    /// # Returns
    ///
    /// `Some(result)`, or `None` if `checked` is set and the operation overflowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use twin64_core::core::units::alu::{Alu, AluOp, LogicMods};
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 5, 10, LogicMods::default(), true), Some(15));
    /// assert_eq!(Alu::execute(AluOp::Add, i64::MAX, 1, LogicMods::default(), true), None);
    /// assert_eq!(Alu::execute(AluOp::Add, i64::MAX, 1, LogicMods::default(), false), Some(i64::MIN));
    /// ```
    pub fn execute(op: AluOp, a: Word, b: Word, mods: LogicMods, checked: bool) -> Option<Word> {
        match op {
            AluOp::Add => arithmetic::add(a, b, checked),
            AluOp::Sub => arithmetic::sub(a, b, checked),
            AluOp::And | AluOp::Or | AluOp::Xor => Some(logic::execute(op, a, b, mods)),
        }
    }
}
