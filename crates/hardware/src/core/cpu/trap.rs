//! Trap Handling Logic.
//!
//! This module is the single place where a trap becomes a CPU state transition. It performs
//! the following:
//! 1. **Recording:** Stores the trap and its instruction address as the last trap.
//! 2. **Reservation:** Drops any outstanding load reservation.
//! 3. **Policy:** Stops in `Trapped` (halt policy, or vector policy with `IVA == 0`).
//!    A trap raised by a handler before it retires its first instruction is also a
//!    stop, since delivering it would re-enter the same failing vector forever.
//! 4. **Delivery:** Saves PSW and trap details into control registers and enters the
//!    handler at `IVA + code * TRAP_VECTOR_STRIDE` in privileged mode.
//!
//! A `Software` trap counts as a completed instruction: the saved and stopped
//! instruction address is the one after `TRAP`. Every other trap leaves the
//! instruction address on the faulting instruction so it can be retried.

use super::{Cpu, CpuState, StopReason, TrapRecord};
use crate::common::constants::{INSTR_BYTES, TRAP_VECTOR_STRIDE};
use crate::common::{Trap, TrapCode, Word};
use crate::config::TrapPolicy;
use crate::core::arch::control::ControlReg;
use crate::core::arch::psw::Psw;

impl Cpu {
    /// Handles a trap raised by the instruction at `ia`.
    ///
    /// # Arguments
    ///
    /// * `trap` - The trap raised.
    /// * `ia` - Address of the instruction that raised it.
    ///
    /// # Returns
    ///
    /// `None` if the trap was delivered to a handler and execution continues,
    /// otherwise the `StopReason` to hand back to the caller.
    pub(crate) fn take_trap(&mut self, trap: Trap, ia: u64) -> Option<StopReason> {
        self.regs.clear_reservation();
        self.stats.record_trap(trap.code);

        let record = TrapRecord { trap, address: ia };
        self.last_trap = Some(record);

        let resume_at = if trap.code == TrapCode::Software {
            ia.wrapping_add(INSTR_BYTES)
        } else {
            ia
        };
        let psw = self.regs.psw().with_address(resume_at);

        tracing::debug!(
            code = %trap.code,
            ia = format_args!("{ia:#x}"),
            info1 = format_args!("{:#x}", trap.info1),
            info2 = format_args!("{:#x}", trap.info2),
            info3 = format_args!("{:#x}", trap.info3),
            "trap raised"
        );

        let iva = self.regs.control(ControlReg::Iva) as u64;
        let nested = self.handler_entry.take();
        if self.trap_policy == TrapPolicy::Vector && iva != 0 {
            let Some(entry) = nested else {
                self.deliver(trap, psw, iva);
                return None;
            };
            tracing::warn!(
                code = %trap.code,
                entry = format_args!("{entry:#x}"),
                "trap at handler entry, stopping"
            );
        }

        self.regs.set_psw(psw);
        self.state = CpuState::Trapped;
        Some(StopReason::Trapped(record))
    }

    /// Enters the trap handler for `trap`.
    fn deliver(&mut self, trap: Trap, saved: Psw, iva: u64) {
        let vector = iva.wrapping_add(u64::from(trap.code.code()) * TRAP_VECTOR_STRIDE);
        self.regs.set_control(ControlReg::TrapPsw, saved.raw());
        self.regs
            .set_control(ControlReg::TrapCode, Word::from(trap.code.code()));
        self.regs
            .set_control(ControlReg::TrapInfo1, Word::from(trap.info1));
        self.regs
            .set_control(ControlReg::TrapInfo2, Word::from(trap.info2));
        self.regs
            .set_control(ControlReg::TrapInfo3, Word::from(trap.info3));
        self.regs.set_psw(Psw::reset(vector));
        self.handler_entry = Some(vector);
        self.stats.traps_vectored += 1;
        tracing::debug!(
            code = %trap.code,
            vector = format_args!("{vector:#x}"),
            "trap delivered"
        );
    }

    /// PSW saved by the last delivery, as restored by `RFI`.
    pub(crate) fn saved_trap_psw(&self) -> Psw {
        Psw(self.regs.control(ControlReg::TrapPsw))
    }
}
