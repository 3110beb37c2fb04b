//! I/O Memory.
//!
//! This module implements the memory-mapped I/O window. It provides:
//! 1. **Device registration:** Devices are added by absolute address range.
//! 2. **Access routing:** An access goes to the first device whose range contains it,
//!    then to the plain backing store at the start of the window.
//! 3. **Bounds checking:** Anything else raises `IoMemoryAddress` without side effects.
//! 4. **Preview:** `preview` routes like `read` but asks devices to `peek`.

use crate::common::constants::IO_MEM_START;
use crate::common::{AccessLen, Trap, Word};
use crate::soc::devices::Device;

/// Memory-mapped I/O window with attached devices.
pub struct IoMemory {
    /// Plain storage for `[IO_MEM_START, IO_MEM_START + len)`.
    backing: Vec<u8>,
    /// Registered devices, searched in registration order.
    devices: Vec<Box<dyn Device>>,
}

impl std::fmt::Debug for IoMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoMemory")
            .field("backing_size", &self.backing.len())
            .field(
                "devices",
                &self.devices.iter().map(|d| d.name().to_owned()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Where an I/O access lands.
enum Target {
    Device(usize),
    Backing(usize),
}

impl IoMemory {
    /// Creates an I/O window with `backing_size` bytes of plain storage and no devices.
    pub fn new(backing_size: usize) -> Self {
        Self {
            backing: vec![0; backing_size],
            devices: Vec::new(),
        }
    }

    /// Registers a device.
    ///
    /// # Arguments
    ///
    /// * `dev` - The device; its `address_range` must lie inside the I/O window.
    pub fn add_device(&mut self, dev: Box<dyn Device>) {
        tracing::debug!(name = dev.name(), range = ?dev.address_range(), "device attached");
        self.devices.push(dev);
    }

    /// Returns the registered devices.
    pub fn devices(&self) -> impl Iterator<Item = &dyn Device> {
        self.devices.iter().map(|d| &**d)
    }

    /// Returns the console device, if one is attached.
    pub fn console(&self) -> Option<&crate::soc::devices::Console> {
        self.devices.iter().find_map(|d| d.as_console())
    }

    /// Returns the console device mutably, if one is attached.
    pub fn console_mut(&mut self) -> Option<&mut crate::soc::devices::Console> {
        self.devices.iter_mut().find_map(|d| d.as_console_mut())
    }

    /// Size of the plain backing store.
    pub fn backing_size(&self) -> u64 {
        self.backing.len() as u64
    }

    fn route(&self, addr: u64, len: AccessLen) -> Result<Target, Trap> {
        if let Some(idx) = self.devices.iter().position(|d| d.contains(addr, len.bytes())) {
            return Ok(Target::Device(idx));
        }
        let offset = addr.checked_sub(IO_MEM_START);
        match offset {
            Some(off) if off.saturating_add(len.bytes()) <= self.backing_size() => {
                Ok(Target::Backing(off as usize))
            }
            _ => Err(Trap::io_mem(addr, len)),
        }
    }

    /// Reads `len` bytes at absolute address `addr`.
    ///
    /// # Returns
    ///
    /// The widened value, or `IoMemoryAddress` if nothing claims the address.
    pub fn read(&mut self, addr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        let raw = match self.route(addr, len)? {
            Target::Device(idx) => {
                let dev = &mut self.devices[idx];
                let offset = addr - dev.address_range().0;
                match len {
                    AccessLen::Byte => u64::from(dev.read_u8(offset)),
                    AccessLen::Half => u64::from(dev.read_u16(offset)),
                    AccessLen::Word => u64::from(dev.read_u32(offset)),
                    AccessLen::Double => dev.read_u64(offset),
                }
            }
            Target::Backing(off) => {
                let n = len.bytes() as usize;
                let mut buf = [0u8; 8];
                buf[..n].copy_from_slice(&self.backing[off..off + n]);
                u64::from_le_bytes(buf)
            }
        };
        Ok(len.extend(raw, signed))
    }

    /// Reads `len` bytes at `addr` the way `read` would, but without device side effects.
    ///
    /// Routing and trap behavior match `read` exactly, so a successful preview
    /// guarantees the following `read` succeeds with the same value.
    pub fn preview(&self, addr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        let raw = match self.route(addr, len)? {
            Target::Device(idx) => {
                let dev = &self.devices[idx];
                dev.peek(addr - dev.address_range().0, len)
            }
            Target::Backing(off) => {
                let n = len.bytes() as usize;
                let mut buf = [0u8; 8];
                buf[..n].copy_from_slice(&self.backing[off..off + n]);
                u64::from_le_bytes(buf)
            }
        };
        Ok(len.extend(raw, signed))
    }

    /// Writes the low `len` bytes of `val` at absolute address `addr`.
    pub fn write(&mut self, addr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        let bits = val as u64;
        match self.route(addr, len)? {
            Target::Device(idx) => {
                let dev = &mut self.devices[idx];
                let offset = addr - dev.address_range().0;
                match len {
                    AccessLen::Byte => dev.write_u8(offset, bits as u8),
                    AccessLen::Half => dev.write_u16(offset, bits as u16),
                    AccessLen::Word => dev.write_u32(offset, bits as u32),
                    AccessLen::Double => dev.write_u64(offset, bits),
                }
            }
            Target::Backing(off) => {
                let n = len.bytes() as usize;
                self.backing[off..off + n].copy_from_slice(&bits.to_le_bytes()[..n]);
            }
        }
        Ok(())
    }

    /// Reads the plain backing store without going through devices.
    ///
    /// Never has side effects, so monitors can use it freely.
    pub fn peek(&self, addr: u64, len: AccessLen) -> Option<Word> {
        let off = addr.checked_sub(IO_MEM_START)?;
        if off.saturating_add(len.bytes()) > self.backing_size() {
            return None;
        }
        let n = len.bytes() as usize;
        let off = off as usize;
        let mut buf = [0u8; 8];
        buf[..n].copy_from_slice(&self.backing[off..off + n]);
        Some(len.extend(u64::from_le_bytes(buf), false))
    }
}
