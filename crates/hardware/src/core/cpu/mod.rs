//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Maintains the register file, PSW and the run-state machine.
//! 2. **Translation:** Owns the MMU and its software-managed TLB.
//! 3. **Memory:** Owns the physical memory and the I/O window with its devices.
//! 4. **Observability:** Read-only getters, the last trap and execution statistics.
//!
//! The run-state machine is `Reset -> Running <-> Trapped -> Halted`. A CPU is created in
//! `Reset`; `reset()` moves it to `Running`.

/// Per-group instruction execution.
pub mod dispatch;

/// Reset, step/run loops and the fetch-decode-execute cycle.
pub mod execution;

/// Address translation, data loads/stores and instruction fetch.
pub mod memory;

/// Trap recording and delivery.
pub mod trap;

use std::fmt;

use crate::common::constants::CPU_VERSION;
use crate::common::{RegisterFile, Reservation, Trap, Word};
use crate::config::{Config, ConfigError, TrapPolicy};
use crate::core::arch::control::ControlReg;
use crate::core::arch::psw::Psw;
use crate::core::units::mmu::Mmu;
use crate::core::units::mmu::tlb::Tlb;
use crate::soc::memory::MemorySubsystem;
use crate::stats::CpuStats;

/// Run state of a CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CpuState {
    /// Constructed, not yet reset.
    Reset,
    /// Executing instructions.
    Running,
    /// Stopped on a trap; `resume()` continues.
    Trapped,
    /// Stopped by `DIAG` halt; only `reset()` leaves this state.
    Halted,
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reset => "RESET",
            Self::Running => "RUNNING",
            Self::Trapped => "TRAPPED",
            Self::Halted => "HALTED",
        })
    }
}

/// A trap together with the instruction address that raised it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapRecord {
    /// The trap.
    pub trap: Trap,
    /// Address of the instruction that raised it.
    pub address: u64,
}

impl fmt::Display for TrapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:#x}", self.trap, self.address)
    }
}

/// Why `step` or `run` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// All requested cycles executed.
    Completed,
    /// A `DIAG` halt was executed.
    Halted,
    /// A trap stopped execution; the CPU is in `Trapped`.
    Trapped(TrapRecord),
    /// `run` used up its cycle budget.
    BudgetExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Halted => f.write_str("halted"),
            Self::Trapped(record) => write!(f, "trapped: {record}"),
            Self::BudgetExhausted => f.write_str("budget exhausted"),
        }
    }
}

/// Main CPU structure containing all processor state and components.
#[derive(Debug)]
pub struct Cpu {
    /// Architectural registers.
    regs: RegisterFile,
    /// Memory Management Unit.
    mmu: Mmu,
    /// Physical memory and I/O window.
    memory: MemorySubsystem,
    /// Current run state.
    state: CpuState,
    /// Most recent trap, kept until the next reset.
    last_trap: Option<TrapRecord>,
    /// Execution statistics.
    stats: CpuStats,
    /// What to do when an instruction traps.
    trap_policy: TrapPolicy,
    /// Instruction address loaded at reset.
    start_address: u64,
    /// Log each retired instruction.
    trace: bool,
    /// Vector entered by the last delivery, until the handler retires an instruction.
    handler_entry: Option<u64>,
}

impl Cpu {
    /// Creates a new CPU from a configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Emulator configuration; validated before use.
    ///
    /// # Returns
    ///
    /// A CPU in the `Reset` state with zeroed memory, or the first configuration error.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            regs: RegisterFile::new(),
            mmu: Mmu::new(config.tlb.entries),
            memory: MemorySubsystem::new(config),
            state: CpuState::Reset,
            last_trap: None,
            stats: CpuStats::default(),
            trap_policy: config.general.trap_policy,
            start_address: config.general.start_address,
            trace: config.general.trace_instructions,
            handler_entry: None,
        })
    }

    /// Value of `CPU_INFO` after reset: version in the upper half, TLB capacity in the lower.
    fn cpu_info(&self) -> Word {
        ((CPU_VERSION << 32) | self.mmu.tlb.capacity() as u64) as Word
    }

    /// Returns the current run state.
    pub const fn state(&self) -> CpuState {
        self.state
    }

    /// Returns the most recent trap, if any occurred since reset.
    pub const fn last_trap(&self) -> Option<TrapRecord> {
        self.last_trap
    }

    /// Returns execution statistics with the TLB counters filled in.
    pub fn stats(&self) -> CpuStats {
        CpuStats {
            tlb_hits: self.mmu.tlb.hits(),
            tlb_misses: self.mmu.tlb.misses(),
            ..self.stats.clone()
        }
    }

    /// Returns the configured trap policy.
    pub const fn trap_policy(&self) -> TrapPolicy {
        self.trap_policy
    }

    /// Reads a general register.
    ///
    /// # Returns
    ///
    /// The value, or an `IllegalInstruction` trap for an index outside 0..16.
    pub fn general_reg(&self, idx: usize) -> Result<Word, Trap> {
        self.regs.general(idx)
    }

    /// Reads a control register by raw id.
    ///
    /// # Returns
    ///
    /// The value, or an `IllegalInstruction` trap for a reserved id.
    pub fn control_reg(&self, id: u32) -> Result<Word, Trap> {
        self.regs.control_by_id(id)
    }

    /// Returns the program status word.
    pub const fn psw(&self) -> Psw {
        self.regs.psw()
    }

    /// Returns the instruction register.
    pub const fn instruction_register(&self) -> u32 {
        self.regs.instruction()
    }

    /// Returns the outstanding load reservation.
    pub const fn reservation(&self) -> Option<Reservation> {
        self.regs.reservation()
    }

    /// Returns the whole register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Returns the TLB.
    pub const fn tlb(&self) -> &Tlb {
        &self.mmu.tlb
    }

    /// Returns the memory subsystem.
    pub const fn memory(&self) -> &MemorySubsystem {
        &self.memory
    }

    /// Returns the memory subsystem mutably, for image loading and device access.
    ///
    /// Host writes through this handle bypass the reservation register; use
    /// [`Cpu::host_store`] when a host store must break an outstanding reservation.
    pub const fn memory_mut(&mut self) -> &mut MemorySubsystem {
        &mut self.memory
    }

    /// Writes a general register from the host (monitor or test set-up).
    pub fn set_general_reg(&mut self, idx: usize, val: Word) -> Result<(), Trap> {
        self.regs.set_general(idx, val)
    }

    /// Writes a control register from the host.
    ///
    /// Unlike `MTCR`, the host may also set `CPU_INFO`.
    pub fn set_control_reg(&mut self, reg: ControlReg, val: Word) {
        self.regs.set_control(reg, val);
    }

    /// Sets the instruction address in the PSW, keeping the status bits.
    ///
    /// Used by a monitor to point the CPU at a trap handler before `resume()`.
    pub fn set_program_address(&mut self, addr: u64) {
        self.handler_entry = None;
        self.regs.set_psw(self.regs.psw().with_address(addr));
    }
}
