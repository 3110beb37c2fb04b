//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the emulator.
//! These types are used for the following:
//! 1. **Permission Validation:** Checking read/write/execute rights against a TLB entry.
//! 2. **Fault Generation:** Recording the access kind in `TlbAccess` and `Protection` traps.
//! 3. **Probing:** Selecting the access kind queried by the `PRB` instruction.

use super::constants::Word;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access (loads, memory-operand arithmetic, `LDR`).
    Read,

    /// Data write access (stores, `STC`).
    Write,

    /// Instruction fetch access.
    Execute,
}

impl AccessType {
    /// Numeric access kind carried in trap info words (0 read, 1 write, 2 execute).
    pub const fn code(self) -> u32 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
            Self::Execute => 2,
        }
    }

    /// Decodes the access kind used by `PRB` from a qualifier value.
    ///
    /// # Returns
    ///
    /// `None` for values outside 0..=2.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Read),
            1 => Some(Self::Write),
            2 => Some(Self::Execute),
            _ => None,
        }
    }
}

/// Length of a data access in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessLen {
    /// One byte.
    Byte = 1,
    /// Two bytes.
    Half = 2,
    /// Four bytes.
    Word = 4,
    /// Eight bytes.
    Double = 8,
}

impl AccessLen {
    /// Builds an access length from the 2-bit `dw` field (`len = 1 << dw`).
    pub const fn from_dw(dw: u32) -> Self {
        match dw & 0x3 {
            0 => Self::Byte,
            1 => Self::Half,
            2 => Self::Word,
            _ => Self::Double,
        }
    }

    /// Builds an access length from a byte count.
    ///
    /// # Returns
    ///
    /// `None` unless `bytes` is 1, 2, 4 or 8.
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::Byte),
            2 => Some(Self::Half),
            4 => Some(Self::Word),
            8 => Some(Self::Double),
            _ => None,
        }
    }

    /// Number of bytes covered by the access.
    #[inline]
    pub const fn bytes(self) -> u64 {
        self as u64
    }

    /// Returns `true` if `addr` is a multiple of the access length.
    #[inline]
    pub const fn is_aligned(self, addr: u64) -> bool {
        addr & (self.bytes() - 1) == 0
    }

    /// Mask covering the low `bytes()` bytes of a Word.
    #[inline]
    pub const fn mask(self) -> u64 {
        match self {
            Self::Double => u64::MAX,
            _ => (1u64 << (self.bytes() * 8)) - 1,
        }
    }

    /// Widens a raw loaded value to a Word.
    ///
    /// With `signed` set, the most significant loaded bit is replicated into the
    /// upper bits; otherwise the upper bits are cleared.
    ///
    /// # Examples
    ///
    /// ```
    /// use twin64_core::common::AccessLen;
    ///
    /// assert_eq!(AccessLen::Byte.extend(0xFF, true), -1);
    /// assert_eq!(AccessLen::Byte.extend(0xFF, false), 0xFF);
    /// ```
    pub const fn extend(self, raw: u64, signed: bool) -> Word {
        let raw = raw & self.mask();
        if signed {
            let shift = 64 - self.bytes() * 8;
            ((raw << shift) as Word) >> shift
        } else {
            raw as Word
        }
    }
}
