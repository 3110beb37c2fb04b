//! Unified Register File.
//!
//! This module provides the `RegisterFile` struct, the complete architectural register
//! state of one Twin64 CPU. It provides:
//! 1. **Unified Storage:** General registers, control registers, PSW, instruction
//!    register and reservation register.
//! 2. **Contract Checks:** Out-of-range general indices and reserved control ids fail with
//!    an `IllegalInstruction` trap instead of being clamped.
//! 3. **Observability:** Side-effect-free getters and a formatted dump for monitors.

use crate::common::{Trap, Word};
use crate::core::arch::control::{ControlReg, ControlRegs};
use crate::core::arch::gpr::Gpr;
use crate::core::arch::psw::Psw;

/// Outstanding load-reserve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reservation {
    /// Physical address of the reserved bytes.
    pub address: u64,
    /// Number of reserved bytes.
    pub length: u64,
    /// Value returned by the `LDR` that created the reservation.
    pub value: Word,
}

impl Reservation {
    /// Returns `true` if `[addr, addr + len)` overlaps the reserved bytes.
    pub const fn overlaps(&self, addr: u64, len: u64) -> bool {
        addr < self.address.wrapping_add(self.length) && self.address < addr.wrapping_add(len)
    }
}

/// Architectural register state of one CPU.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    gpr: Gpr,
    ctl: ControlRegs,
    psw: Psw,
    instr: u32,
    reservation: Option<Reservation>,
}

impl RegisterFile {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Register `R0` always returns 0.
    ///
    /// # Returns
    ///
    /// The stored Word, or an `IllegalInstruction` trap for an out-of-range index.
    pub fn general(&self, idx: usize) -> Result<Word, Trap> {
        self.gpr.read(idx).ok_or_else(|| Trap::illegal(idx as u32, 0, 0))
    }

    /// Writes a general register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Writes to `R0` are discarded.
    /// * `val` - The Word to write.
    pub fn set_general(&mut self, idx: usize, val: Word) -> Result<(), Trap> {
        if self.gpr.write(idx, val) {
            Ok(())
        } else {
            Err(Trap::illegal(idx as u32, 0, 0))
        }
    }

    /// Reads a control register.
    #[inline]
    pub const fn control(&self, reg: ControlReg) -> Word {
        self.ctl.read(reg)
    }

    /// Writes a control register.
    #[inline]
    pub const fn set_control(&mut self, reg: ControlReg, val: Word) {
        self.ctl.write(reg, val);
    }

    /// Reads a control register by raw id.
    ///
    /// # Returns
    ///
    /// The stored Word, or an `IllegalInstruction` trap for a reserved id.
    pub fn control_by_id(&self, id: u32) -> Result<Word, Trap> {
        ControlReg::from_id(id)
            .map(|reg| self.ctl.read(reg))
            .ok_or(Trap::illegal(id, 0, 0))
    }

    /// Writes a control register by raw id.
    pub fn set_control_by_id(&mut self, id: u32, val: Word) -> Result<(), Trap> {
        let reg = ControlReg::from_id(id).ok_or(Trap::illegal(id, 0, 0))?;
        self.ctl.write(reg, val);
        Ok(())
    }

    /// Returns the program status word.
    #[inline]
    pub const fn psw(&self) -> Psw {
        self.psw
    }

    /// Replaces the program status word.
    #[inline]
    pub const fn set_psw(&mut self, psw: Psw) {
        self.psw = psw;
    }

    /// Returns the instruction register (the last fetched raw instruction).
    #[inline]
    pub const fn instruction(&self) -> u32 {
        self.instr
    }

    /// Loads the instruction register.
    #[inline]
    pub const fn set_instruction(&mut self, raw: u32) {
        self.instr = raw;
    }

    /// Returns the outstanding reservation, if any.
    #[inline]
    pub const fn reservation(&self) -> Option<Reservation> {
        self.reservation
    }

    /// Records a new reservation, replacing any previous one.
    #[inline]
    pub const fn reserve(&mut self, reservation: Reservation) {
        self.reservation = Some(reservation);
    }

    /// Removes and returns the outstanding reservation.
    #[inline]
    pub const fn take_reservation(&mut self) -> Option<Reservation> {
        self.reservation.take()
    }

    /// Drops the outstanding reservation, if any.
    #[inline]
    pub const fn clear_reservation(&mut self) {
        self.reservation = None;
    }

    /// Drops the reservation if a store to `[addr, addr + len)` touches it.
    pub fn invalidate_reservation(&mut self, addr: u64, len: u64) {
        if self.reservation.is_some_and(|r| r.overlaps(addr, len)) {
            self.reservation = None;
        }
    }

    /// Zeroes every register and drops the reservation.
    pub fn clear(&mut self) {
        self.gpr.clear();
        self.ctl.clear();
        self.psw = Psw::default();
        self.instr = 0;
        self.reservation = None;
    }

    /// Formats the register state for monitor output.
    pub fn dump(&self) -> String {
        let mut out = format!("PSW {}  IR={:#010x}\n", self.psw, self.instr);
        out.push_str(&self.gpr.dump());
        for reg in ControlReg::ALL {
            out.push_str(&format!("{:<10}={:#018x}\n", reg.name(), self.ctl.read(reg)));
        }
        out
    }
}
