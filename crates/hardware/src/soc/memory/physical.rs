//! Physical Memory.
//!
//! A flat, byte-addressable region starting at address 0. Every access is
//! bounds-checked as a whole: an access that starts inside the region but runs
//! past its end fails before any byte is touched.

use crate::common::{AccessLen, Trap, Word};

/// Physical memory backing store.
#[derive(Clone, Debug)]
pub struct PhysicalMemory {
    data: Vec<u8>,
}

impl PhysicalMemory {
    /// Creates a zero-filled physical memory of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Returns the size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns the whole memory contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the byte range of an access, if it lies fully inside memory.
    fn range(&self, addr: u64, len: u64) -> Option<std::ops::Range<usize>> {
        let end = addr.checked_add(len)?;
        if end > self.size() {
            return None;
        }
        Some(addr as usize..end as usize)
    }

    /// Reads `len` bytes (little-endian) at `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Physical address.
    /// * `len` - Access length.
    /// * `signed` - Sign-extend the loaded value instead of zero-extending it.
    ///
    /// # Returns
    ///
    /// The widened value, or `PhysicalMemoryAddress` if the access leaves the region.
    pub fn read(&self, addr: u64, len: AccessLen, signed: bool) -> Result<Word, Trap> {
        let range = self
            .range(addr, len.bytes())
            .ok_or(Trap::phys_mem(addr, len))?;
        let mut buf = [0u8; 8];
        buf[..range.len()].copy_from_slice(&self.data[range]);
        Ok(len.extend(u64::from_le_bytes(buf), signed))
    }

    /// Writes the low `len` bytes of `val` (little-endian) at `addr`.
    ///
    /// Nothing is written if the access leaves the region.
    pub fn write(&mut self, addr: u64, len: AccessLen, val: Word) -> Result<(), Trap> {
        let range = self
            .range(addr, len.bytes())
            .ok_or(Trap::phys_mem(addr, len))?;
        let bytes = val.to_le_bytes();
        let n = range.len();
        self.data[range].copy_from_slice(&bytes[..n]);
        Ok(())
    }

    /// Copies a byte image into memory at `addr`.
    ///
    /// Used by the host to place programs and data before execution.
    pub fn load(&mut self, addr: u64, image: &[u8]) -> Result<(), Trap> {
        let range = self
            .range(addr, image.len() as u64)
            .ok_or(Trap::phys_mem(addr, AccessLen::Byte))?;
        self.data[range].copy_from_slice(image);
        Ok(())
    }
}
