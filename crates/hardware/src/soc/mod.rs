//! Machine components outside the CPU core.
//!
//! A Twin64 machine has two physical address classes: RAM from address 0 and
//! the fixed I/O window at the top of the 32-bit range. Devices live in the window.

/// Built-in I/O devices.
pub mod devices;

/// Physical memory, I/O window and address-class routing.
pub mod memory;

/// The `Device` trait implemented by everything in the I/O window.
pub mod traits;

pub use memory::MemorySubsystem;
