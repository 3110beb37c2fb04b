//! Execution statistics collection and reporting.
//!
//! This module tracks counters for one CPU instance. It provides:
//! 1. **Retirement:** Retired instructions by opcode group.
//! 2. **Memory:** Data loads and stores that reached memory.
//! 3. **Control flow:** Taken branches.
//! 4. **Traps:** Raised traps broken down by trap code.
//! 5. **TLB:** Hit and miss counts, sampled from the TLB when the report is built.

use std::fmt;

use serde::Serialize;

use crate::common::TrapCode;

/// Execution statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuStats {
    /// Fetch-decode-execute cycles started (including ones that trapped).
    pub cycles: u64,
    /// Number of instructions that completed without a trap.
    pub instructions_retired: u64,

    /// Retired ALU group instructions.
    pub inst_alu: u64,
    /// Retired MEM group instructions.
    pub inst_mem: u64,
    /// Retired BR group instructions.
    pub inst_branch: u64,
    /// Retired SYS group instructions.
    pub inst_system: u64,

    /// Data reads that reached memory (loads, memory operands, `LDR`).
    pub loads: u64,
    /// Data writes that reached memory (stores, successful `STC`).
    pub stores: u64,
    /// Branches that changed the instruction address.
    pub branches_taken: u64,
    /// `STC` instructions that failed.
    pub store_conditional_failures: u64,

    /// Raised traps indexed by trap code.
    pub traps: [u64; TrapCode::ALL.len()],
    /// Traps delivered through `IVA`.
    pub traps_vectored: u64,

    /// TLB lookup hits.
    pub tlb_hits: u64,
    /// TLB lookup misses.
    pub tlb_misses: u64,
}

impl CpuStats {
    /// Counts a raised trap.
    pub fn record_trap(&mut self, code: TrapCode) {
        self.traps[code.code() as usize] += 1;
    }

    /// Total number of raised traps.
    pub fn traps_total(&self) -> u64 {
        self.traps.iter().sum()
    }

    /// Number of traps raised with `code`.
    pub fn traps_of(&self, code: TrapCode) -> u64 {
        self.traps[code.code() as usize]
    }
}

impl fmt::Display for CpuStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |n: u64| {
            if self.instructions_retired == 0 {
                0.0
            } else {
                n as f64 / self.instructions_retired as f64 * 100.0
            }
        };
        writeln!(f, "==========================================================")?;
        writeln!(f, "TWIN64 EXECUTION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "cycles                   {}", self.cycles)?;
        writeln!(f, "insts_retired            {}", self.instructions_retired)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "INSTRUCTION MIX")?;
        writeln!(f, "  op.alu                 {} ({:.2}%)", self.inst_alu, pct(self.inst_alu))?;
        writeln!(f, "  op.mem                 {} ({:.2}%)", self.inst_mem, pct(self.inst_mem))?;
        writeln!(f, "  op.branch              {} ({:.2}%)", self.inst_branch, pct(self.inst_branch))?;
        writeln!(f, "  op.system              {} ({:.2}%)", self.inst_system, pct(self.inst_system))?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "MEMORY")?;
        writeln!(f, "  mem.loads              {}", self.loads)?;
        writeln!(f, "  mem.stores             {}", self.stores)?;
        writeln!(f, "  mem.stc_failures       {}", self.store_conditional_failures)?;
        writeln!(f, "  tlb.hits               {}", self.tlb_hits)?;
        writeln!(f, "  tlb.misses             {}", self.tlb_misses)?;
        writeln!(f, "  branch.taken           {}", self.branches_taken)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "TRAPS")?;
        writeln!(f, "  trap.total             {}", self.traps_total())?;
        writeln!(f, "  trap.vectored          {}", self.traps_vectored)?;
        for code in TrapCode::ALL.iter().skip(1) {
            let n = self.traps_of(*code);
            if n > 0 {
                writeln!(f, "  trap.{:<17} {}", code.name(), n)?;
            }
        }
        write!(f, "==========================================================")
    }
}
