//! Control register definitions and storage.
//!
//! This module implements the control register set. It provides:
//! 1. **Identifiers:** The closed, versioned `ControlReg` enumeration.
//! 2. **Storage:** The `ControlRegs` struct holding one Word per recognized id.
//! 3. **Contract Checks:** Conversion from raw ids rejects reserved slots.
//!
//! Enumeration version 2 keeps the original ids 0..=8 and adds ids 9..=13 for
//! trap delivery. Ids 2, 3, 14 and 15 are reserved.

use std::fmt;

use crate::common::Word;
use crate::common::constants::CONTROL_REG_COUNT;

/// Recognized control register ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ControlReg {
    /// CPU identification (version and TLB capacity). Read-only for software.
    CpuInfo = 0,
    /// Shift amount used by `DSR` and `BB` (low 6 bits).
    Shamt = 1,
    /// Protection identifier 0.
    Pid0 = 4,
    /// Protection identifier 1.
    Pid1 = 5,
    /// Protection identifier 2.
    Pid2 = 6,
    /// Protection identifier 3.
    Pid3 = 7,
    /// Interrupt vector address; 0 means no handler is registered.
    Iva = 8,
    /// PSW saved on trap delivery, restored by `RFI`.
    TrapPsw = 9,
    /// Code of the last delivered trap.
    TrapCode = 10,
    /// First info word of the last delivered trap.
    TrapInfo1 = 11,
    /// Second info word of the last delivered trap.
    TrapInfo2 = 12,
    /// Third info word of the last delivered trap.
    TrapInfo3 = 13,
}

impl ControlReg {
    /// All recognized control registers in id order.
    pub const ALL: [Self; 12] = [
        Self::CpuInfo,
        Self::Shamt,
        Self::Pid0,
        Self::Pid1,
        Self::Pid2,
        Self::Pid3,
        Self::Iva,
        Self::TrapPsw,
        Self::TrapCode,
        Self::TrapInfo1,
        Self::TrapInfo2,
        Self::TrapInfo3,
    ];

    /// The four protection identifier registers.
    pub const PIDS: [Self; 4] = [Self::Pid0, Self::Pid1, Self::Pid2, Self::Pid3];

    /// Returns the raw id.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Converts a raw id into a control register.
    ///
    /// # Returns
    ///
    /// `None` for reserved or out-of-range ids.
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::CpuInfo),
            1 => Some(Self::Shamt),
            4 => Some(Self::Pid0),
            5 => Some(Self::Pid1),
            6 => Some(Self::Pid2),
            7 => Some(Self::Pid3),
            8 => Some(Self::Iva),
            9 => Some(Self::TrapPsw),
            10 => Some(Self::TrapCode),
            11 => Some(Self::TrapInfo1),
            12 => Some(Self::TrapInfo2),
            13 => Some(Self::TrapInfo3),
            _ => None,
        }
    }

    /// Returns the assembler name of the register.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CpuInfo => "CPU_INFO",
            Self::Shamt => "SHAMT",
            Self::Pid0 => "PID0",
            Self::Pid1 => "PID1",
            Self::Pid2 => "PID2",
            Self::Pid3 => "PID3",
            Self::Iva => "IVA",
            Self::TrapPsw => "TRAP_PSW",
            Self::TrapCode => "TRAP_CODE",
            Self::TrapInfo1 => "TRAP_INFO1",
            Self::TrapInfo2 => "TRAP_INFO2",
            Self::TrapInfo3 => "TRAP_INFO3",
        }
    }
}

impl fmt::Display for ControlReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Control register storage, indexed by raw id.
#[derive(Clone, Debug, Default)]
pub struct ControlRegs {
    regs: [Word; CONTROL_REG_COUNT],
}

impl ControlRegs {
    /// Reads a control register.
    #[inline]
    pub const fn read(&self, reg: ControlReg) -> Word {
        self.regs[reg as usize]
    }

    /// Writes a control register.
    #[inline]
    pub const fn write(&mut self, reg: ControlReg, val: Word) {
        self.regs[reg as usize] = val;
    }

    /// Zeroes every control register.
    pub fn clear(&mut self) {
        self.regs = [0; CONTROL_REG_COUNT];
    }
}
