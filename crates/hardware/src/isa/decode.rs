//! Twin64 Instruction Decoder.
//!
//! Decoding is a pure bit-extraction step. It never fails: an undefined
//! group/family pair is still a syntactically decoded instruction, and the
//! execute stage is responsible for rejecting it.

use crate::isa::instruction::{Decoded, InstructionBits};

/// Decodes a raw 32-bit instruction into its fields.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction word.
///
/// # Returns
///
/// A `Decoded` structure with every field extracted.
///
/// # Examples
///
/// ```
/// use twin64_core::isa::decode::decode;
///
/// // ADD R1, R0, #5: group 0, family 1, R=1, qualifier=1 (immediate), imm15=5.
/// let d = decode(0x0448_0005);
/// assert_eq!((d.group, d.family, d.r, d.qualifier, d.imm15), (0, 1, 1, 1, 5));
/// ```
pub fn decode(inst: u32) -> Decoded {
    Decoded {
        raw: inst,
        group: inst.group(),
        family: inst.family(),
        qualifier: inst.qualifier(),
        r: inst.r(),
        b: inst.b(),
        a: inst.a(),
        dw: inst.dw(),
        bit_pos: inst.bit_pos(),
        imm13: inst.imm13(),
        imm15: inst.imm15(),
        imm19: inst.imm19(),
        imm20u: inst.imm20u(),
    }
}
