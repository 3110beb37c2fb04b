//! Main Execution Loop.
//!
//! This module implements the run-state machine and the per-instruction cycle. It performs
//! the following:
//! 1. **Lifecycle:** `reset`, `step`, `run` and `resume` with their state preconditions.
//! 2. **Cycle:** Fetch into the instruction register, decode, dispatch by opcode group.
//! 3. **Retire:** Commit the next instruction address (sequential, branch or restored PSW).
//! 4. **Observability:** Per-instruction `trace` events with disassembly when enabled.

use super::dispatch::Flow;
use super::{Cpu, CpuState, StopReason};
use crate::common::CpuError;
use crate::common::constants::INSTR_BYTES;
use crate::core::arch::control::ControlReg;
use crate::core::arch::psw::Psw;
use crate::isa::decode::decode;
use crate::isa::disasm::disasm;
use crate::isa::opcodes::group;

impl Cpu {
    /// Resets the CPU and enters `Running`.
    ///
    /// Zeroes every register, drops the reservation, invalidates the TLB, clears the
    /// last trap and the statistics, and loads the reset PSW. Memory is left untouched
    /// so that an image loaded beforehand survives.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.mmu.tlb.reset();
        self.mmu.tlb.clear_counters();
        self.regs.set_control(ControlReg::CpuInfo, self.cpu_info());
        self.regs.set_psw(Psw::reset(self.start_address));
        self.last_trap = None;
        self.handler_entry = None;
        self.stats = crate::stats::CpuStats::default();
        self.state = CpuState::Running;
        tracing::info!(
            start = format_args!("{:#x}", self.start_address),
            tlb_entries = self.mmu.tlb.capacity(),
            "cpu reset"
        );
    }

    /// Executes up to `n` instructions.
    ///
    /// # Returns
    ///
    /// `Completed` after `n` cycles, or earlier `Halted`/`Trapped`; `CpuError::NotRunning`
    /// if the CPU is not in `Running`.
    pub fn step(&mut self, n: u64) -> Result<StopReason, CpuError> {
        self.ensure_running()?;
        for _ in 0..n {
            if let Some(stop) = self.cycle() {
                return Ok(stop);
            }
        }
        Ok(StopReason::Completed)
    }

    /// Executes until a halt, an undelivered trap, or the budget runs out.
    ///
    /// # Arguments
    ///
    /// * `budget` - Maximum number of cycles; `None` runs without limit.
    pub fn run(&mut self, budget: Option<u64>) -> Result<StopReason, CpuError> {
        self.ensure_running()?;
        let mut executed: u64 = 0;
        loop {
            if budget.is_some_and(|limit| executed >= limit) {
                return Ok(StopReason::BudgetExhausted);
            }
            if let Some(stop) = self.cycle() {
                return Ok(stop);
            }
            executed += 1;
        }
    }

    /// Moves a trapped CPU back to `Running`.
    ///
    /// Execution continues at the current PSW instruction address; a monitor
    /// may change it first with `set_program_address`.
    pub fn resume(&mut self) -> Result<(), CpuError> {
        if self.state != CpuState::Trapped {
            return Err(CpuError::NotTrapped(self.state));
        }
        self.state = CpuState::Running;
        tracing::info!(ia = format_args!("{:#x}", self.regs.psw().address()), "cpu resumed");
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), CpuError> {
        if self.state == CpuState::Running {
            Ok(())
        } else {
            Err(CpuError::NotRunning(self.state))
        }
    }

    /// Runs one fetch-decode-execute cycle.
    ///
    /// # Returns
    ///
    /// `None` to keep going, or the reason execution must stop.
    fn cycle(&mut self) -> Option<StopReason> {
        self.stats.cycles += 1;
        let ia = self.regs.psw().address();

        let flow = match self.execute_at(ia) {
            Ok(flow) => flow,
            Err(trap) => return self.take_trap(trap, ia),
        };

        let psw = self.regs.psw();
        let next = match flow {
            Flow::Next => psw.with_address(ia.wrapping_add(INSTR_BYTES)),
            Flow::Branch(target) => {
                self.stats.branches_taken += 1;
                psw.with_address(target)
            }
            Flow::Restore(saved) => saved,
            Flow::Halt => psw.with_address(ia.wrapping_add(INSTR_BYTES)),
        };
        self.regs.set_psw(next);
        self.handler_entry = None;
        self.stats.instructions_retired += 1;

        if self.trace {
            let raw = self.regs.instruction();
            tracing::trace!(
                ia = format_args!("{ia:#010x}"),
                raw = format_args!("{raw:#010x}"),
                "{}",
                disasm(raw)
            );
        }

        if flow == Flow::Halt {
            self.state = CpuState::Halted;
            tracing::info!(ia = format_args!("{ia:#x}"), "cpu halted");
            return Some(StopReason::Halted);
        }
        None
    }

    /// Fetches, decodes and executes the instruction at `ia`.
    fn execute_at(&mut self, ia: u64) -> Result<Flow, crate::common::Trap> {
        let raw = self.fetch(ia)?;
        self.regs.set_instruction(raw);
        let d = decode(raw);
        let flow = match d.group {
            group::ALU => self.exec_alu(&d)?,
            group::MEM => self.exec_mem(&d)?,
            group::BR => self.exec_branch(&d, ia)?,
            _ => self.exec_system(&d)?,
        };
        match d.group {
            group::ALU => self.stats.inst_alu += 1,
            group::MEM => self.stats.inst_mem += 1,
            group::BR => self.stats.inst_branch += 1,
            _ => self.stats.inst_system += 1,
        }
        Ok(flow)
    }
}
