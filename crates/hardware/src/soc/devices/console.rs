//! Character Console.
//!
//! A minimal memory-mapped terminal. The host feeds input bytes into a queue and
//! collects output bytes from a buffer; nothing here touches stdin or stdout
//! directly, so the console is usable from tests and from the CLI alike.
//!
//! Register map (offsets from the device base):
//! - `0x0` DATA: read pops one input byte (all ones when the queue is empty);
//!   write appends the low byte to the output buffer.
//! - `0x4` STATUS: bit 0 input available, bit 1 transmitter ready (always set).

use std::collections::VecDeque;

use crate::common::AccessLen;
use crate::soc::devices::Device;

/// Data register offset.
pub const REG_DATA: u64 = 0;
/// Status register offset.
pub const REG_STATUS: u64 = 4;
/// Size of the register block in bytes.
pub const CONSOLE_SIZE: u64 = 8;

/// Status bit: input byte available.
pub const STATUS_RX_AVAILABLE: u64 = 1 << 0;
/// Status bit: ready to transmit.
pub const STATUS_TX_READY: u64 = 1 << 1;

/// Value read from DATA when the input queue is empty (-1 as a Word).
const DATA_EMPTY: u64 = u64::MAX;

/// Console device.
#[derive(Debug)]
pub struct Console {
    /// Absolute base address inside the I/O window.
    base_addr: u64,
    /// Bytes waiting to be read by the guest.
    rx_queue: VecDeque<u8>,
    /// Bytes written by the guest.
    tx_buffer: Vec<u8>,
}

impl Console {
    /// Creates a console whose registers start at `base_addr`.
    pub const fn new(base_addr: u64) -> Self {
        Self {
            base_addr,
            rx_queue: VecDeque::new(),
            tx_buffer: Vec::new(),
        }
    }

    /// Queues bytes for the guest to read.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.rx_queue.extend(bytes);
    }

    /// Returns everything the guest has written so far.
    pub fn output(&self) -> &[u8] {
        &self.tx_buffer
    }

    /// Removes and returns the output written so far.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx_buffer)
    }

    /// Reads a register as a 64-bit value. Unmapped offsets read as 0.
    fn read_register(&mut self, offset: u64) -> u64 {
        if offset == REG_DATA {
            return self.rx_queue.pop_front().map_or(DATA_EMPTY, u64::from);
        }
        self.register_value(offset)
    }

    /// Current register contents, leaving the input queue untouched.
    fn register_value(&self, offset: u64) -> u64 {
        match offset {
            REG_DATA => self.rx_queue.front().map_or(DATA_EMPTY, |&b| u64::from(b)),
            REG_STATUS => {
                let mut status = STATUS_TX_READY;
                if !self.rx_queue.is_empty() {
                    status |= STATUS_RX_AVAILABLE;
                }
                status
            }
            _ => 0,
        }
    }

    /// Writes a register. Only DATA is writable.
    fn write_register(&mut self, offset: u64, val: u64) {
        if offset == REG_DATA {
            let byte = val as u8;
            self.tx_buffer.push(byte);
            tracing::debug!(target: "twin64::console", byte, ch = %char::from(byte), "console output");
        }
    }
}

impl Device for Console {
    fn name(&self) -> &str {
        "CONSOLE"
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, CONSOLE_SIZE)
    }

    fn read_u8(&mut self, offset: u64) -> u8 {
        self.read_register(offset) as u8
    }
    fn read_u16(&mut self, offset: u64) -> u16 {
        self.read_register(offset) as u16
    }
    fn read_u32(&mut self, offset: u64) -> u32 {
        self.read_register(offset) as u32
    }
    fn read_u64(&mut self, offset: u64) -> u64 {
        self.read_register(offset)
    }

    fn write_u8(&mut self, offset: u64, val: u8) {
        self.write_register(offset, u64::from(val));
    }
    fn write_u16(&mut self, offset: u64, val: u16) {
        self.write_register(offset, u64::from(val));
    }
    fn write_u32(&mut self, offset: u64, val: u32) {
        self.write_register(offset, u64::from(val));
    }
    fn write_u64(&mut self, offset: u64, val: u64) {
        self.write_register(offset, val);
    }

    fn peek(&self, offset: u64, len: AccessLen) -> u64 {
        len.extend(self.register_value(offset), false) as u64
    }

    fn as_console(&self) -> Option<&Console> {
        Some(self)
    }

    fn as_console_mut(&mut self) -> Option<&mut Console> {
        Some(self)
    }
}
