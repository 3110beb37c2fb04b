//! Memory Subsystem.
//!
//! This module implements the two disjoint address spaces of a Twin64 machine. It provides:
//! 1. **Physical:** Flat RAM starting at address 0 (`PhysicalMemory`).
//! 2. **I/O:** The fixed window `[IO_MEM_START, IO_MEM_LIMIT]` with devices and a backing store (`IoMemory`).
//! 3. **Routing:** `read`/`write` pick the space from the physical address class.
//!
//! Translation happens before this layer; callers pass physical addresses.
//! Alignment is also checked by the caller, so a misaligned access never gets here.

/// I/O window with device routing.
pub mod io;

/// Flat physical memory.
pub mod physical;

use crate::common::constants::{IO_MEM_START, is_io_address};
use crate::common::{AccessLen, Trap, Word};
use crate::config::Config;
use crate::soc::devices::{Console, Device};

use self::io::IoMemory;
use self::physical::PhysicalMemory;

/// Physical memory plus the I/O window.
#[derive(Debug)]
pub struct MemorySubsystem {
    physical: PhysicalMemory,
    io: IoMemory,
}

impl MemorySubsystem {
    /// Builds the memory subsystem described by `config`.
    ///
    /// Attaches the console when `config.console.enabled` is set.
    pub fn new(config: &Config) -> Self {
        let mut io = IoMemory::new(config.memory.io_mem_size as usize);
        if config.console.enabled {
            io.add_device(Box::new(Console::new(IO_MEM_START + config.console.offset)));
        }
        Self {
            physical: PhysicalMemory::new(config.memory.phys_mem_size as usize),
            io,
        }
    }

    /// Returns the physical memory.
    pub const fn physical(&self) -> &PhysicalMemory {
        &self.physical
    }

    /// Returns the I/O window.
    pub const fn io(&self) -> &IoMemory {
        &self.io
    }

    /// Returns the I/O window mutably (e.g., to feed console input).
    pub const fn io_mut(&mut self) -> &mut IoMemory {
        &mut self.io
    }

    /// Registers an additional device in the I/O window.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        self.io.add_device(dev);
    }

    /// Reads physical memory. Never has side effects.
    ///
    /// # Returns
    ///
    /// The value, or `PhysicalMemoryAddress` if the access leaves physical memory.
    pub fn read_physical(&self, addr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        self.physical.read(addr, len, signed)
    }

    /// Writes physical memory.
    pub fn write_physical(&mut self, addr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        self.physical.write(addr, len, val)
    }

    /// Reads the I/O window (may have device side effects).
    pub fn read_io(&mut self, addr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        self.io.read(addr, len, signed)
    }

    /// Writes the I/O window.
    pub fn write_io(&mut self, addr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        self.io.write(addr, len, val)
    }

    /// Reads a physical address, routed to I/O or physical memory by address class.
    pub fn read(&mut self, paddr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        if is_io_address(paddr) {
            self.read_io(paddr, len, signed)
        } else {
            self.read_physical(paddr, len, signed)
        }
    }

    /// Reads a physical address without device side effects.
    ///
    /// Returns the same value or trap that `read` would at this moment.
    pub fn preview(&self, paddr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        if is_io_address(paddr) {
            self.io.preview(paddr, len, signed)
        } else {
            self.read_physical(paddr, len, signed)
        }
    }

    /// Writes a physical address, routed to I/O or physical memory by address class.
    pub fn write(&mut self, paddr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        if is_io_address(paddr) {
            self.write_io(paddr, len, val)
        } else {
            self.write_physical(paddr, len, val)
        }
    }

    /// Copies a binary image into physical memory at `addr`.
    pub fn load_physical(&mut self, addr: u64, image: &[u8]) -> Result<(), Trap> {
        self.physical.load(addr, image)
    }

    /// Returns the console device, if attached.
    pub fn console(&self) -> Option<&Console> {
        self.io.console()
    }

    /// Returns the console device mutably, if attached.
    pub fn console_mut(&mut self) -> Option<&mut Console> {
        self.io.console_mut()
    }
}
