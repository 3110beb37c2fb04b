//! Twin64 General Register File.
//!
//! This module implements the general register file. It performs the following:
//! 1. **Storage:** Maintains 16 general registers (`R0`-`R15`).
//! 2. **Invariant Enforcement:** Register `R0` reads as zero and ignores writes.
//! 3. **Bounds Checking:** Out-of-range indices are reported, never clamped.

use crate::common::Word;
use crate::common::constants::GENERAL_REG_COUNT;

/// General register file.
///
/// Contains 16 general registers holding 64-bit Words. Register `R0` is
/// hardwired to zero and cannot be modified.
#[derive(Clone, Debug, Default)]
pub struct Gpr {
    regs: [Word; GENERAL_REG_COUNT],
}

impl Gpr {
    /// Creates a new general register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15).
    ///
    /// # Returns
    ///
    /// `Some(value)` for a valid index (`R0` always yields 0), `None` otherwise.
    pub fn read(&self, idx: usize) -> Option<Word> {
        match idx {
            0 => Some(0),
            _ => self.regs.get(idx).copied(),
        }
    }

    /// Writes a value to a general register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Writes to `R0` are discarded.
    /// * `val` - The Word to write.
    ///
    /// # Returns
    ///
    /// `false` if the index is out of range.
    pub fn write(&mut self, idx: usize, val: Word) -> bool {
        match self.regs.get_mut(idx) {
            Some(_) if idx == 0 => true,
            Some(slot) => {
                *slot = val;
                true
            }
            None => false,
        }
    }

    /// Zeroes every register.
    pub fn clear(&mut self) {
        self.regs = [0; GENERAL_REG_COUNT];
    }

    /// Formats all registers, four per line, for monitor output.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (i, chunk) in self.regs.chunks(4).enumerate() {
            let line: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(j, v)| format!("R{:<2}={:#018x}", i * 4 + j, v))
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}
