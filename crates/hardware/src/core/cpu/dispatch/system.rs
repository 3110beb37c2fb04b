//! SYS group execution.
//!
//! Privileged operations are rejected in user mode before any other check,
//! including qualifier validation.

use super::{Flow, illegal};
use crate::common::{AccessType, Trap, Word};
use crate::core::arch::control::ControlReg;
use crate::core::cpu::Cpu;
use crate::isa::instruction::Decoded;
use crate::isa::opcodes::sys;

/// Mask of the 13-bit immediate field.
const IMM13_FIELD: u32 = 0x1FFF;

/// Returns `true` if the operation requires privileged mode.
const fn is_privileged_op(family: u32, qualifier: u32) -> bool {
    matches!(
        (family, qualifier),
        (sys::MR, sys::MR_MTCR)
            | (sys::LPA | sys::TLB | sys::MST | sys::RFI | sys::DIAG, _)
    )
}

impl Cpu {
    /// Executes a SYS group instruction.
    pub(crate) fn exec_system(&mut self, d: &Decoded) -> Result<Flow, Trap> {
        if is_privileged_op(d.family, d.qualifier) && !self.regs.psw().is_privileged() {
            return Err(Trap::privilege(d.raw, d.group, d.family));
        }

        match d.family {
            sys::MR => {
                let reg = ControlReg::from_id(d.b as u32).ok_or(illegal(d))?;
                match d.qualifier {
                    sys::MR_MFCR => {
                        let val = self.regs.control(reg);
                        self.set_gpr(d.r, val)?;
                    }
                    sys::MR_MTCR if reg != ControlReg::CpuInfo => {
                        let val = self.gpr(d.r)?;
                        self.regs.set_control(reg, val);
                    }
                    _ => return Err(illegal(d)),
                }
            }
            sys::LPA => {
                let vaddr = self.gpr(d.b)? as u64;
                let ctx = self.access_context();
                let paddr = self.mmu.resolve(vaddr, &ctx)?;
                self.set_gpr(d.r, paddr as Word)?;
            }
            sys::PRB => {
                let access = AccessType::from_code(d.qualifier & 0x3).ok_or(illegal(d))?;
                let vaddr = self.gpr(d.b)? as u64;
                let ctx = self.access_context();
                let ok = self.mmu.probe(vaddr, access, &ctx);
                self.set_gpr(d.r, Word::from(ok))?;
            }
            sys::TLB => match d.qualifier {
                sys::TLB_INSERT => {
                    let r = self.gpr(d.r)?;
                    let vaddr = self.gpr(d.b)?;
                    let paddr = self.gpr(d.a)?;
                    let access_id = ((r >> 32) & 0xFF) as u8;
                    let protect_id = r as u32;
                    let slot = self.mmu.tlb.insert(vaddr, paddr, access_id, protect_id);
                    tracing::debug!(
                        slot,
                        vaddr = format_args!("{vaddr:#x}"),
                        paddr = format_args!("{paddr:#x}"),
                        access_id,
                        protect_id,
                        "tlb insert"
                    );
                }
                sys::TLB_PURGE => {
                    let vaddr = self.gpr(d.b)?;
                    if !self.mmu.tlb.purge(vaddr) {
                        tracing::debug!(vaddr = format_args!("{vaddr:#x}"), "tlb purge missed");
                    }
                }
                sys::TLB_RESET => self.mmu.tlb.reset(),
                _ => return Err(illegal(d)),
            },
            // No cache is modelled: flush and purge have nothing to do.
            sys::CA if d.qualifier <= 1 => {}
            sys::MST => {
                let psw = self.regs.psw();
                let mask = d.imm13 as u64;
                let updated = match d.qualifier {
                    sys::MST_SET => psw.set_status(mask),
                    sys::MST_CLEAR => psw.clear_status(mask),
                    _ => return Err(illegal(d)),
                };
                self.set_gpr(d.r, psw.status() as Word)?;
                self.regs.set_psw(updated);
            }
            sys::RFI => return Ok(Flow::Restore(self.saved_trap_psw())),
            sys::TRAP => {
                let value = self.gpr(d.r)? as u32;
                return Err(Trap::software(d.raw & IMM13_FIELD, value));
            }
            sys::DIAG if d.qualifier == sys::DIAG_HALT => return Ok(Flow::Halt),
            sys::DIAG => {}
            _ => return Err(illegal(d)),
        }
        Ok(Flow::Next)
    }
}
