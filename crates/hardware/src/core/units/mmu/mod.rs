//! Memory Management Unit (MMU).
//!
//! This module implements virtual-to-physical translation on top of the
//! software-managed TLB. It provides:
//! 1. **Routing:** I/O window addresses and untranslated (PSW.T clear) addresses pass through.
//! 2. **Translation:** TLB lookup with `TlbAccess` on a miss.
//! 3. **Protection:** Access-kind, user-page and protection-id checks.
//! 4. **Probing:** Fault-free permission queries for `PRB`.

/// Translation Lookaside Buffer (TLB) for caching virtual-to-physical address translations.
pub mod tlb;

use crate::common::constants::is_io_address;
use crate::common::{AccessType, Trap};
use crate::core::arch::psw::Psw;

use self::tlb::{ACC_EXECUTE, ACC_READ, ACC_USER, ACC_WRITE, Tlb, TlbEntry};

/// Protection context for a translation: the PSW and the four PIDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessContext {
    /// Current program status word.
    pub psw: Psw,
    /// Low 32 bits of `PID0..PID3`.
    pub pids: [u32; 4],
}

/// Memory Management Unit for virtual-to-physical address translation.
#[derive(Clone, Debug)]
pub struct Mmu {
    /// The fully associative TLB.
    pub tlb: Tlb,
}

impl Mmu {
    /// Creates a new MMU with a TLB of `tlb_entries` slots.
    pub fn new(tlb_entries: usize) -> Self {
        Self {
            tlb: Tlb::new(tlb_entries),
        }
    }

    /// Translates a virtual address to a physical address.
    ///
    /// # Arguments
    ///
    /// * `vaddr` - Address to translate.
    /// * `access` - Kind of access being performed.
    /// * `ctx` - PSW and protection ids at the time of the access.
    ///
    /// # Returns
    ///
    /// The physical address, or a `TlbAccess`/`Protection` trap.
    pub fn translate(
        &mut self,
        vaddr: u64,
        access: AccessType,
        ctx: &AccessContext,
    ) -> Result<u64, Trap> {
        if is_io_address(vaddr) || !ctx.psw.translation() {
            return Ok(vaddr);
        }
        let entry = self
            .tlb
            .lookup(vaddr as i64)
            .ok_or(Trap::tlb_access(vaddr, access))?;
        check_access(&entry, vaddr, access, ctx)?;
        Ok(entry.translate(vaddr))
    }

    /// Translates an address without checking access rights (`LPA`).
    ///
    /// # Returns
    ///
    /// The physical address, or `TlbAccess` on a miss.
    pub fn resolve(&mut self, vaddr: u64, ctx: &AccessContext) -> Result<u64, Trap> {
        if is_io_address(vaddr) || !ctx.psw.translation() {
            return Ok(vaddr);
        }
        self.tlb
            .lookup(vaddr as i64)
            .map(|entry| entry.translate(vaddr))
            .ok_or(Trap::tlb_access(vaddr, AccessType::Read))
    }

    /// Reports whether an access would succeed, without faulting or touching LRU state.
    pub fn probe(&self, vaddr: u64, access: AccessType, ctx: &AccessContext) -> bool {
        if is_io_address(vaddr) || !ctx.psw.translation() {
            return true;
        }
        self.tlb
            .peek(vaddr as i64)
            .is_some_and(|entry| check_access(&entry, vaddr, access, ctx).is_ok())
    }
}

/// Checks a TLB entry's rights against an access.
///
/// Privileged mode bypasses the user-page and protection-id checks but not the
/// access-kind check.
pub fn check_access(
    entry: &TlbEntry,
    vaddr: u64,
    access: AccessType,
    ctx: &AccessContext,
) -> Result<(), Trap> {
    let required = match access {
        AccessType::Read => ACC_READ,
        AccessType::Write => ACC_WRITE,
        AccessType::Execute => ACC_EXECUTE,
    };
    let denied = entry.access_id & required == 0
        || (!ctx.psw.is_privileged()
            && (entry.access_id & ACC_USER == 0
                || (entry.protect_id != 0 && !ctx.pids.contains(&entry.protect_id))));
    if denied {
        Err(Trap::protection(vaddr, access))
    } else {
        Ok(())
    }
}
