//! ALU arithmetic operations.
//!
//! Addition and subtraction either wrap or report signed overflow, depending on
//! whether the caller runs with PSW.V set.

use crate::common::Word;

/// Adds two Words.
///
/// # Returns
///
/// `None` on signed overflow when `checked` is set; otherwise the (wrapped) sum.
#[inline]
pub const fn add(a: Word, b: Word, checked: bool) -> Option<Word> {
    if checked {
        a.checked_add(b)
    } else {
        Some(a.wrapping_add(b))
    }
}

/// Subtracts `b` from `a`.
///
/// # Returns
///
/// `None` on signed overflow when `checked` is set; otherwise the (wrapped) difference.
#[inline]
pub const fn sub(a: Word, b: Word, checked: bool) -> Option<Word> {
    if checked {
        a.checked_sub(b)
    } else {
        Some(a.wrapping_sub(b))
    }
}

/// Shift-and-add: `(b << amount) + a` or `(b >> amount) + a` (arithmetic right shift).
///
/// Only the final addition is overflow-checked.
///
/// # Arguments
///
/// * `b`      - Value to shift.
/// * `amount` - Shift distance (1..=3 in the encoding).
/// * `left`   - Shift direction.
/// * `a`      - Addend.
/// * `checked` - Detect signed overflow in the addition.
pub const fn shift_add(b: Word, amount: u32, left: bool, a: Word, checked: bool) -> Option<Word> {
    let shifted = if left {
        b.wrapping_shl(amount)
    } else {
        b.wrapping_shr(amount)
    };
    add(shifted, a, checked)
}
