//! Device trait for memory-mapped I/O.
//!
//! This module defines the `Device` trait implemented by every component attached
//! to the I/O window. It provides:
//! 1. **Identification:** `name` and `address_range` for routing inside the window.
//! 2. **Access:** Byte, half, word, and doubleword read/write at device-relative offsets.
//! 3. **Preview:** A side-effect-free read used before an instruction is known to retire.
//! 4. **Downcasting:** An optional cast to `Console` for host-side access to its buffers.
//!
//! Devices see only offsets that the I/O memory has already bounds-checked
//! against their `address_range`.

use crate::common::AccessLen;
use crate::soc::devices::Console;

/// A component attached to the I/O window.
///
/// Offsets passed to the accessors are relative to the base returned by
/// `address_range`; multi-byte values are little-endian.
pub trait Device: Send {
    /// Short identifier used in logs and device listings (e.g. `"CONSOLE"`).
    fn name(&self) -> &str;
    /// Absolute base address in the I/O window and the size of the register block.
    fn address_range(&self) -> (u64, u64);
    /// Byte register read.
    fn read_u8(&mut self, offset: u64) -> u8;
    /// Halfword register read.
    fn read_u16(&mut self, offset: u64) -> u16;
    /// Word register read.
    fn read_u32(&mut self, offset: u64) -> u32;
    /// Doubleword register read.
    fn read_u64(&mut self, offset: u64) -> u64;
    /// Byte register write.
    fn write_u8(&mut self, offset: u64, val: u8);
    /// Halfword register write.
    fn write_u16(&mut self, offset: u64, val: u16);
    /// Word register write.
    fn write_u32(&mut self, offset: u64, val: u32);
    /// Doubleword register write.
    fn write_u64(&mut self, offset: u64, val: u64);
    /// Returns what a read of `len` bytes at `offset` would return, without
    /// any of the read's side effects (queue pops, status clears).
    fn peek(&self, offset: u64, len: AccessLen) -> u64;

    /// Returns `true` if `[addr, addr + len)` lies inside this device's range.
    fn contains(&self, addr: u64, len: u64) -> bool {
        let (base, size) = self.address_range();
        addr >= base && addr.saturating_add(len) <= base.saturating_add(size)
    }

    /// Host-side view of the console, if this device is one.
    fn as_console(&self) -> Option<&Console> {
        None
    }
    /// Mutable host-side view of the console, for feeding input.
    fn as_console_mut(&mut self) -> Option<&mut Console> {
        None
    }
}
