//! Trap and Error definitions.
//!
//! This module defines the error handling and trap mechanisms for the emulator. It provides:
//! 1. **Trap Codes:** The closed taxonomy of synchronous, precise traps.
//! 2. **Trap Values:** A code plus three independent 32-bit diagnostic words.
//! 3. **Host Errors:** `CpuError` for API misuse by the embedding host, kept apart from
//!    architectural traps.

use std::fmt;

use thiserror::Error;

use super::data::{AccessLen, AccessType};
use crate::core::cpu::CpuState;

/// Twin64 trap codes.
///
/// The numeric value of each code is architecturally visible: it is written to
/// `CTL_REG_TRAP_CODE` on delivery and selects the vector slot below `IVA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TrapCode {
    /// No trap pending.
    NoTrap = 0,
    /// Undefined group/family combination, reserved qualifier or reserved register.
    IllegalInstruction = 1,
    /// Data or instruction address not a multiple of the access length.
    Alignment = 2,
    /// Access outside the configured physical memory.
    PhysicalMemoryAddress = 3,
    /// Access inside the I/O window that no device or backing store claims.
    IoMemoryAddress = 4,
    /// Signed overflow in checked arithmetic while PSW.V is set.
    Overflow = 5,
    /// TLB entry denies the access kind, privilege or protection id.
    Protection = 6,
    /// Privileged operation executed in user mode.
    PrivilegeViolation = 7,
    /// No TLB entry maps the virtual page.
    TlbAccess = 8,
    /// Raised on purpose by the `TRAP` instruction.
    Software = 9,
}

impl TrapCode {
    /// All trap codes in numeric order.
    pub const ALL: [Self; 10] = [
        Self::NoTrap,
        Self::IllegalInstruction,
        Self::Alignment,
        Self::PhysicalMemoryAddress,
        Self::IoMemoryAddress,
        Self::Overflow,
        Self::Protection,
        Self::PrivilegeViolation,
        Self::TlbAccess,
        Self::Software,
    ];

    /// Returns the numeric code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable name of the trap code.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoTrap => "NoTrap",
            Self::IllegalInstruction => "IllegalInstruction",
            Self::Alignment => "Alignment",
            Self::PhysicalMemoryAddress => "PhysicalMemoryAddress",
            Self::IoMemoryAddress => "IoMemoryAddress",
            Self::Overflow => "Overflow",
            Self::Protection => "Protection",
            Self::PrivilegeViolation => "PrivilegeViolation",
            Self::TlbAccess => "TlbAccess",
            Self::Software => "Software",
        }
    }
}

impl fmt::Display for TrapCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A synchronous, precise trap.
///
/// Traps are plain values: any component may construct one and return it as
/// the error side of a `Result`. Only the execution engine turns a trap into
/// a CPU state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("{code} trap (info1={info1:#x}, info2={info2:#x}, info3={info3:#x})")]
pub struct Trap {
    /// Trap classification.
    pub code: TrapCode,
    /// First diagnostic word.
    pub info1: u32,
    /// Second diagnostic word.
    pub info2: u32,
    /// Third diagnostic word.
    pub info3: u32,
}

impl Trap {
    /// Creates a trap with explicit diagnostic words.
    ///
    /// Each info word is stored from its own argument.
    pub const fn new(code: TrapCode, info1: u32, info2: u32, info3: u32) -> Self {
        Self {
            code,
            info1,
            info2,
            info3,
        }
    }

    /// Undefined instruction. Carries the raw word, group and family.
    pub const fn illegal(raw: u32, group: u32, family: u32) -> Self {
        Self::new(TrapCode::IllegalInstruction, raw, group, family)
    }

    /// Privileged instruction executed in user mode.
    pub const fn privilege(raw: u32, group: u32, family: u32) -> Self {
        Self::new(TrapCode::PrivilegeViolation, raw, group, family)
    }

    /// Signed overflow in checked arithmetic.
    pub const fn overflow(raw: u32, group: u32, family: u32) -> Self {
        Self::new(TrapCode::Overflow, raw, group, family)
    }

    /// Misaligned access of `len` bytes at `addr`.
    pub const fn alignment(addr: u64, len: AccessLen) -> Self {
        Self::new(TrapCode::Alignment, addr as u32, len as u32, (addr >> 32) as u32)
    }

    /// Physical memory bounds violation.
    pub const fn phys_mem(addr: u64, len: AccessLen) -> Self {
        Self::new(
            TrapCode::PhysicalMemoryAddress,
            addr as u32,
            len as u32,
            (addr >> 32) as u32,
        )
    }

    /// I/O window access that nothing claims.
    pub const fn io_mem(addr: u64, len: AccessLen) -> Self {
        Self::new(
            TrapCode::IoMemoryAddress,
            addr as u32,
            len as u32,
            (addr >> 32) as u32,
        )
    }

    /// TLB miss for `addr`.
    pub const fn tlb_access(addr: u64, access: AccessType) -> Self {
        Self::new(
            TrapCode::TlbAccess,
            addr as u32,
            access.code(),
            (addr >> 32) as u32,
        )
    }

    /// Protection check failure for `addr`.
    pub const fn protection(addr: u64, access: AccessType) -> Self {
        Self::new(
            TrapCode::Protection,
            addr as u32,
            access.code(),
            (addr >> 32) as u32,
        )
    }

    /// Software trap raised by the `TRAP` instruction.
    pub const fn software(imm: u32, value: u32) -> Self {
        Self::new(TrapCode::Software, imm, value, 0)
    }

    /// Reassembles the faulting address of a memory-class trap.
    ///
    /// # Returns
    ///
    /// `Some(address)` for alignment, bounds, TLB and protection traps; `None` otherwise.
    pub const fn address(&self) -> Option<u64> {
        match self.code {
            TrapCode::Alignment
            | TrapCode::PhysicalMemoryAddress
            | TrapCode::IoMemoryAddress
            | TrapCode::TlbAccess
            | TrapCode::Protection => Some(((self.info3 as u64) << 32) | self.info1 as u64),
            _ => None,
        }
    }
}

/// Errors caused by the host driving the CPU incorrectly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CpuError {
    /// `step`/`run` called while the CPU is not running.
    #[error("CPU is {0}, it must be reset or resumed before stepping")]
    NotRunning(CpuState),

    /// `resume` called while the CPU is not trapped.
    #[error("CPU is {0}, only a trapped CPU can be resumed")]
    NotTrapped(CpuState),
}
