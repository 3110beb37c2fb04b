//! Memory-Mapped I/O Devices.
//!
//! This module contains the devices that can be attached to the I/O window.
//! The only built-in device is the character console.

/// Character console with data and status registers.
pub mod console;

pub use console::Console;

pub use crate::soc::traits::Device;
