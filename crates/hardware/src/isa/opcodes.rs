//! Twin64 opcode groups and families.
//!
//! Family numbers are group-relative: family 8 is `SHAOP` in the ALU group but
//! `LD` in the MEM group. Any pair not listed here is an illegal instruction.

/// Opcode groups (bits 30-31).
pub mod group {
    /// Arithmetic and logic.
    pub const ALU: u32 = 0;
    /// Memory access.
    pub const MEM: u32 = 1;
    /// Branches.
    pub const BR: u32 = 2;
    /// System control.
    pub const SYS: u32 = 3;
}

/// ALU group families.
pub mod alu {
    /// No operation.
    pub const NOP: u32 = 0;
    /// Signed add.
    pub const ADD: u32 = 1;
    /// Signed subtract.
    pub const SUB: u32 = 2;
    /// Bitwise AND.
    pub const AND: u32 = 3;
    /// Bitwise OR.
    pub const OR: u32 = 4;
    /// Bitwise XOR.
    pub const XOR: u32 = 5;
    /// Compare and set.
    pub const CMP: u32 = 6;
    /// Bit field operations.
    pub const BITOP: u32 = 7;
    /// Shift and add.
    pub const SHAOP: u32 = 8;
    /// Immediate loads.
    pub const IMMOP: u32 = 9;
    /// Load offset (address arithmetic).
    pub const LDO: u32 = 10;

    /// `BITOP` qualifier: extract, zero-extended.
    pub const BITOP_EXTR: u32 = 0;
    /// `BITOP` qualifier: extract, sign-extended.
    pub const BITOP_EXTR_S: u32 = 1;
    /// `BITOP` qualifier: deposit into R.
    pub const BITOP_DEP: u32 = 2;
    /// `BITOP` qualifier: deposit into a cleared R.
    pub const BITOP_DEP_Z: u32 = 3;
    /// `BITOP` qualifier: double shift right by `SHAMT`.
    pub const BITOP_DSR: u32 = 4;

    /// `IMMOP` operation: load low 20 bits.
    pub const IMMOP_LDI_L: u32 = 0;
    /// `IMMOP` operation: replace bits 39..20.
    pub const IMMOP_LDI_M: u32 = 1;
    /// `IMMOP` operation: replace bits 59..40.
    pub const IMMOP_LDI_U: u32 = 2;
    /// `IMMOP` operation: replace bits 63..60.
    pub const IMMOP_LDI_X: u32 = 3;
}

/// MEM group families.
pub mod mem {
    /// `R <- R + mem`.
    pub const ADD: u32 = 1;
    /// `R <- R - mem`.
    pub const SUB: u32 = 2;
    /// `R <- R & mem`.
    pub const AND: u32 = 3;
    /// `R <- R | mem`.
    pub const OR: u32 = 4;
    /// `R <- R ^ mem`.
    pub const XOR: u32 = 5;
    /// `R <- R cond mem`.
    pub const CMP: u32 = 6;
    /// Load.
    pub const LD: u32 = 8;
    /// Store.
    pub const ST: u32 = 9;
    /// Load and reserve.
    pub const LDR: u32 = 10;
    /// Store conditional.
    pub const STC: u32 = 11;
}

/// BR group families.
pub mod br {
    /// IA-relative branch.
    pub const B: u32 = 1;
    /// Register-indirect branch.
    pub const BR: u32 = 2;
    /// Vectored branch (base + index * 4).
    pub const BV: u32 = 3;
    /// Branch on bit.
    pub const BB: u32 = 4;
    /// Compare and branch.
    pub const CBR: u32 = 5;
    /// Multiway table branch.
    pub const MBR: u32 = 6;
}

/// SYS group families.
pub mod sys {
    /// Move from/to control register.
    pub const MR: u32 = 1;
    /// Load physical address.
    pub const LPA: u32 = 2;
    /// Probe access.
    pub const PRB: u32 = 3;
    /// TLB maintenance.
    pub const TLB: u32 = 4;
    /// Cache maintenance.
    pub const CA: u32 = 5;
    /// Modify status.
    pub const MST: u32 = 6;
    /// Return from interrupt.
    pub const RFI: u32 = 7;
    /// Software trap.
    pub const TRAP: u32 = 14;
    /// Diagnostics.
    pub const DIAG: u32 = 15;

    /// `MR` qualifier: move from control register.
    pub const MR_MFCR: u32 = 0;
    /// `MR` qualifier: move to control register.
    pub const MR_MTCR: u32 = 1;
    /// `TLB` qualifier: insert.
    pub const TLB_INSERT: u32 = 0;
    /// `TLB` qualifier: purge one address.
    pub const TLB_PURGE: u32 = 1;
    /// `TLB` qualifier: reset.
    pub const TLB_RESET: u32 = 2;
    /// `MST` qualifier: set status bits.
    pub const MST_SET: u32 = 0;
    /// `MST` qualifier: clear status bits.
    pub const MST_CLEAR: u32 = 1;
    /// `DIAG` qualifier: halt the CPU.
    pub const DIAG_HALT: u32 = 7;
}
