//! Global System Constants.
//!
//! This module defines system-wide constants used across the emulator. It includes:
//! 1. **Memory Constants:** Page size, page masks, and the fixed I/O address window.
//! 2. **Instruction Constants:** Instruction width and alignment.
//! 3. **Trap Constants:** Vector stride used when delivering traps through `IVA`.

/// The universal register and memory-cell value type.
pub type Word = i64;

/// Page size in bytes (16 KiB).
pub const PAGE_SIZE: u64 = 16 * 1024;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u32 = 14;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u64 = PAGE_SIZE - 1;

/// First address of the memory-mapped I/O window.
pub const IO_MEM_START: u64 = 0xF000_0000;

/// Last address (inclusive) of the memory-mapped I/O window.
pub const IO_MEM_LIMIT: u64 = 0xFFFF_FFFF;

/// Size of the I/O window in bytes.
pub const IO_MEM_WINDOW: u64 = IO_MEM_LIMIT - IO_MEM_START + 1;

/// Size of one instruction in bytes.
pub const INSTR_BYTES: u64 = 4;

/// Distance in bytes between two consecutive trap vector entries.
pub const TRAP_VECTOR_STRIDE: u64 = 32;

/// Number of general registers.
pub const GENERAL_REG_COUNT: usize = 16;

/// Number of control register slots (recognized or reserved).
pub const CONTROL_REG_COUNT: usize = 16;

/// Architecture version reported in the upper half of `CPU_INFO`.
pub const CPU_VERSION: u64 = 2;

/// Returns `true` if `addr` lies inside the I/O window.
#[inline]
pub const fn is_io_address(addr: u64) -> bool {
    addr >= IO_MEM_START && addr <= IO_MEM_LIMIT
}

/// Returns the page-aligned part of an address.
#[inline]
pub const fn page_of(addr: u64) -> u64 {
    addr & !PAGE_OFFSET_MASK
}
