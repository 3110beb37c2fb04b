//! Bit field operations.
//!
//! Fields are described by a starting bit `pos` (0 = LSB) and a length `len` in
//! 1..=64. A field with `pos + len > 64` is invalid and rejected by the callers.

use crate::common::Word;

/// Returns a mask of `len` low bits (`len` in 1..=64).
#[inline]
const fn low_mask(len: u32) -> u64 {
    if len >= 64 { u64::MAX } else { (1u64 << len) - 1 }
}

/// Returns `true` if the field lies within a 64-bit Word.
#[inline]
pub const fn is_valid_field(pos: u32, len: u32) -> bool {
    len >= 1 && pos + len <= 64
}

/// Extracts the field `[pos, pos + len)` of `val`, zero- or sign-extended.
pub const fn extract(val: Word, pos: u32, len: u32, signed: bool) -> Word {
    let field = ((val as u64) >> pos) & low_mask(len);
    if signed && len < 64 {
        let shift = 64 - len;
        ((field << shift) as Word) >> shift
    } else {
        field as Word
    }
}

/// Replaces the field `[pos, pos + len)` of `target` with the low `len` bits of `val`.
pub const fn deposit(target: Word, val: Word, pos: u32, len: u32) -> Word {
    let mask = low_mask(len) << pos;
    (((target as u64) & !mask) | (((val as u64) << pos) & mask)) as Word
}

/// Double shift right: the low 64 bits of the 128-bit value `hi:lo` shifted right by `amount`.
pub const fn double_shift_right(hi: Word, lo: Word, amount: u32) -> Word {
    let wide = ((hi as u64 as u128) << 64) | (lo as u64 as u128);
    (wide >> (amount & 63)) as u64 as Word
}

/// Sign-extends the low `bits` bits of `val`.
#[inline]
pub const fn sign_extend(val: u64, bits: u32) -> Word {
    if bits >= 64 {
        return val as Word;
    }
    let shift = 64 - bits;
    ((val << shift) as Word) >> shift
}
