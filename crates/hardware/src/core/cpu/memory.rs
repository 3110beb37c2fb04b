//! Memory Access Helpers.
//!
//! This module provides the interface between the CPU and the memory subsystem.
//! It performs the following:
//! 1. **Alignment:** Rejects misaligned accesses before any translation or memory access.
//! 2. **Address Translation:** Interfaces with the MMU under the current PSW and PIDs.
//! 3. **Routing:** Sends the physical address to physical memory or the I/O window.
//! 4. **Reservations:** Breaks an outstanding load reservation on overlapping stores.

use super::Cpu;
use crate::common::constants::INSTR_BYTES;
use crate::common::{AccessLen, AccessType, Trap, Word};
use crate::core::arch::control::ControlReg;
use crate::core::units::mmu::AccessContext;

impl Cpu {
    /// Builds the protection context from the PSW and `PID0..PID3`.
    pub(crate) fn access_context(&self) -> AccessContext {
        AccessContext {
            psw: self.regs.psw(),
            pids: ControlReg::PIDS.map(|reg| self.regs.control(reg) as u32),
        }
    }

    /// Checks alignment and translates a virtual address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address of the access.
    /// * `len` - Access length; `vaddr` must be a multiple of it.
    /// * `access` - Kind of access, checked against the TLB entry.
    ///
    /// # Returns
    ///
    /// The physical address, or an `Alignment`, `TlbAccess` or `Protection` trap.
    pub fn translate_and_check(
        &mut self,
        vaddr: u64,
        len: AccessLen,
        access: AccessType,
    ) -> Result<u64, Trap> {
        if !len.is_aligned(vaddr) {
            return Err(Trap::alignment(vaddr, len));
        }
        let ctx = self.access_context();
        self.mmu.translate(vaddr, access, &ctx)
    }

    /// Loads a Word from a virtual address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Virtual address.
    /// * `len` - Access length.
    /// * `signed` - Sign-extend instead of zero-extend.
    pub fn load(&mut self, vaddr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        self.load_physical_addr(vaddr, len, signed).map(|(_, val)| val)
    }

    /// Loads a Word and also returns the physical address it came from.
    pub(crate) fn load_physical_addr(
        &mut self,
        vaddr: u64,
        len: AccessLen,
        signed: bool,
    ) -> Result<(u64, Word), Trap> {
        let paddr = self.translate_and_check(vaddr, len, AccessType::Read)?;
        let val = self.memory.read(paddr, len, signed)?;
        self.stats.loads += 1;
        Ok((paddr, val))
    }

    /// Translates and reads an operand without committing device side effects.
    ///
    /// Used by instructions that can still trap after the load. Once nothing
    /// else can fail, `commit_load` performs the real access.
    ///
    /// # Returns
    ///
    /// The physical address and the value a load would return.
    pub(crate) fn preview_load(
        &mut self,
        vaddr: u64,
        len: AccessLen,
        signed: bool,
    ) -> Result<(u64, Word), Trap> {
        let paddr = self.translate_and_check(vaddr, len, AccessType::Read)?;
        let val = self.memory.preview(paddr, len, signed)?;
        Ok((paddr, val))
    }

    /// Performs a load previously checked by `preview_load`.
    pub(crate) fn commit_load(&mut self, paddr: u64, len: AccessLen) -> Result<(), Trap> {
        self.memory.read(paddr, len, false).map(drop)?;
        self.stats.loads += 1;
        Ok(())
    }

    /// Stores the low `len` bytes of `val` to a virtual address.
    ///
    /// A store that overlaps the reserved bytes breaks the reservation.
    pub fn store(&mut self, vaddr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        let paddr = self.translate_and_check(vaddr, len, AccessType::Write)?;
        self.store_physical_addr(paddr, len, val)
    }

    /// Stores to an already translated physical address.
    pub(crate) fn store_physical_addr(
        &mut self,
        paddr: u64,
        len: AccessLen,
        val: Word,
    ) -> Result<(), Trap> {
        self.memory.write(paddr, len, val)?;
        self.regs.invalidate_reservation(paddr, len.bytes());
        self.stats.stores += 1;
        Ok(())
    }

    /// Stores from the host to a physical address.
    ///
    /// Behaves like a store from another agent: it bypasses translation but
    /// still breaks an overlapping reservation.
    pub fn host_store(&mut self, paddr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        self.memory.write(paddr, len, val)?;
        self.regs.invalidate_reservation(paddr, len.bytes());
        Ok(())
    }

    /// Fetches the instruction word at `ia`.
    ///
    /// # Returns
    ///
    /// The raw instruction, or a trap from alignment, translation or memory.
    pub fn fetch(&mut self, ia: u64) -> Result<u32, Trap> {
        let len = AccessLen::Word;
        debug_assert_eq!(len.bytes(), INSTR_BYTES);
        let paddr = self.translate_and_check(ia, len, AccessType::Execute)?;
        let raw = self.memory.read(paddr, len, false)?;
        Ok(raw as u32)
    }
}
