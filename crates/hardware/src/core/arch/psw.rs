//! Program Status Word.
//!
//! The PSW packs the address of the next instruction together with the
//! processor mode flags into a single Word:
//!
//! | bits    | field                                   |
//! |---------|-----------------------------------------|
//! | 0..=51  | instruction address (IA)                |
//! | 52      | `X` privileged (executive) mode         |
//! | 53      | `V` overflow trap enable                |
//! | 54      | `T` address translation enable          |
//! | 55..=63 | reserved, preserved as written          |

use std::fmt;

use crate::common::Word;

/// Mask selecting the instruction address field.
pub const PSW_IA_MASK: u64 = (1 << 52) - 1;

/// Bit position of the first status bit.
pub const PSW_STATUS_SHIFT: u32 = 52;

/// Privileged mode bit.
pub const PSW_X: u64 = 1 << 52;

/// Overflow trap enable bit.
pub const PSW_V: u64 = 1 << 53;

/// Translation enable bit.
pub const PSW_T: u64 = 1 << 54;

/// Status bits `MST` may set or clear (`X`, `V`, `T`).
pub const MST_MODIFIABLE: u64 = 0x7;

/// Program status word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Psw(pub Word);

impl Psw {
    /// PSW loaded at reset: privileged, no overflow traps, no translation.
    pub const fn reset(start_address: u64) -> Self {
        Self(((start_address & PSW_IA_MASK) | PSW_X) as Word)
    }

    /// Returns the raw Word.
    #[inline]
    pub const fn raw(self) -> Word {
        self.0
    }

    #[inline]
    const fn bits(self) -> u64 {
        self.0 as u64
    }

    /// Instruction address of the next instruction.
    #[inline]
    pub const fn address(self) -> u64 {
        self.bits() & PSW_IA_MASK
    }

    /// Returns a copy with the instruction address replaced.
    #[inline]
    pub const fn with_address(self, addr: u64) -> Self {
        Self(((self.bits() & !PSW_IA_MASK) | (addr & PSW_IA_MASK)) as Word)
    }

    /// `true` in privileged mode.
    #[inline]
    pub const fn is_privileged(self) -> bool {
        self.bits() & PSW_X != 0
    }

    /// `true` when signed overflow in checked arithmetic traps.
    #[inline]
    pub const fn overflow_checks(self) -> bool {
        self.bits() & PSW_V != 0
    }

    /// `true` when non-I/O addresses are translated through the TLB.
    #[inline]
    pub const fn translation(self) -> bool {
        self.bits() & PSW_T != 0
    }

    /// Returns a copy with the given flag bits set or cleared.
    #[inline]
    pub const fn with_flag(self, flag: u64, on: bool) -> Self {
        if on {
            Self((self.bits() | flag) as Word)
        } else {
            Self((self.bits() & !flag) as Word)
        }
    }

    /// Status bits (PSW bits 52..=63) shifted down to bit 0.
    #[inline]
    pub const fn status(self) -> u64 {
        self.bits() >> PSW_STATUS_SHIFT
    }

    /// Sets the `MST`-modifiable status bits given in `mask` (bit 0 = X, 1 = V, 2 = T).
    pub const fn set_status(self, mask: u64) -> Self {
        Self((self.bits() | ((mask & MST_MODIFIABLE) << PSW_STATUS_SHIFT)) as Word)
    }

    /// Clears the `MST`-modifiable status bits given in `mask`.
    pub const fn clear_status(self, mask: u64) -> Self {
        Self((self.bits() & !((mask & MST_MODIFIABLE) << PSW_STATUS_SHIFT)) as Word)
    }
}

impl fmt::Debug for Psw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Psw")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("privileged", &self.is_privileged())
            .field("overflow_checks", &self.overflow_checks())
            .field("translation", &self.translation())
            .finish()
    }
}

impl fmt::Display for Psw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IA={:#x} [{}{}{}]",
            self.address(),
            if self.is_privileged() { 'X' } else { '-' },
            if self.overflow_checks() { 'V' } else { '-' },
            if self.translation() { 'T' } else { '-' },
        )
    }
}
