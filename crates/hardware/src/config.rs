//! Configuration system for the Twin64 emulator.
//!
//! This module defines all configuration structures used to parameterize a CPU
//! instance. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory sizes, TLB capacity, console placement).
//! 2. **Structures:** Hierarchical config for general, memory, TLB, and console settings.
//! 3. **Validation:** Consistency checks between the configured regions and the fixed I/O window.
//!
//! Configuration is supplied as JSON (`Config::from_json` / `Config::from_file`) or built
//! with `Config::default()`. The config is passed once at construction; there is no
//! process-wide option state.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::common::constants::{IO_MEM_START, IO_MEM_WINDOW, PAGE_SIZE};

/// Default configuration constants for the emulator.
mod defaults {
    /// Initial instruction address loaded into the PSW at reset.
    pub const START_ADDRESS: u64 = 0;

    /// Physical memory size (1 MiB).
    ///
    /// Physical memory always starts at address 0. Accesses at or beyond this
    /// size raise a physical memory address trap.
    pub const PHYS_MEM_SIZE: u64 = 1024 * 1024;

    /// Plain I/O backing store size (64 KiB) at the start of the I/O window.
    pub const IO_MEM_SIZE: u64 = 64 * 1024;

    /// Translation Lookaside Buffer entry count.
    pub const TLB_ENTRIES: usize = 64;

    /// Offset of the console device from the start of the I/O window.
    pub const CONSOLE_OFFSET: u64 = 0x1000;
}

/// What the engine does when an instruction traps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TrapPolicy {
    /// Stop in the TRAPPED state and return the trap to the caller.
    #[default]
    Halt,
    /// Deliver the trap through `IVA` when a handler is registered; otherwise behave like `Halt`.
    Vector,
}

/// Errors produced while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for `Config`.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Physical memory size is zero or not a whole number of pages.
    #[error("physical memory size {0:#x} must be a non-zero multiple of the page size")]
    PhysMemSize(u64),

    /// Physical memory would reach into the I/O window.
    #[error("physical memory size {0:#x} overlaps the I/O window")]
    PhysMemOverlapsIo(u64),

    /// I/O backing store does not fit in the I/O window.
    #[error("I/O memory size {0:#x} exceeds the I/O window")]
    IoMemSize(u64),

    /// TLB capacity is zero.
    #[error("TLB must have at least one entry")]
    TlbEntries,

    /// Console registers do not fit inside the I/O backing store.
    #[error("console at offset {offset:#x} does not fit in {io_size:#x} bytes of I/O memory")]
    ConsolePlacement {
        /// Configured console offset.
        offset: u64,
        /// Configured I/O backing size.
        io_size: u64,
    },
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use twin64_core::config::{Config, TrapPolicy};
///
/// let json = r#"{
///     "general": { "trace_instructions": true, "trap_policy": "Vector" },
///     "memory": { "phys_mem_size": 65536 },
///     "tlb": { "entries": 8 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.general.trap_policy, TrapPolicy::Vector);
/// assert_eq!(config.memory.phys_mem_size, 65536);
/// assert_eq!(config.tlb.entries, 8);
/// assert!(config.console.enabled);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General execution settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Physical and I/O memory sizes
    #[serde(default)]
    pub memory: MemoryConfig,
    /// TLB configuration
    #[serde(default)]
    pub tlb: TlbConfig,
    /// Console device configuration
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that the configured regions are consistent with the fixed I/O window.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let phys = self.memory.phys_mem_size;
        if phys == 0 || phys % PAGE_SIZE != 0 {
            return Err(ConfigError::PhysMemSize(phys));
        }
        if phys > IO_MEM_START {
            return Err(ConfigError::PhysMemOverlapsIo(phys));
        }
        let io = self.memory.io_mem_size;
        if io > IO_MEM_WINDOW {
            return Err(ConfigError::IoMemSize(io));
        }
        if self.tlb.entries == 0 {
            return Err(ConfigError::TlbEntries);
        }
        if self.console.enabled
            && self
                .console
                .offset
                .checked_add(crate::soc::devices::console::CONSOLE_SIZE)
                .is_none_or(|end| end > io)
        {
            return Err(ConfigError::ConsolePlacement {
                offset: self.console.offset,
                io_size: io,
            });
        }
        Ok(())
    }
}

/// General execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Log every retired instruction with its disassembly at `trace` level
    #[serde(default)]
    pub trace_instructions: bool,

    /// Instruction address loaded into the PSW at reset
    #[serde(default = "GeneralConfig::default_start_address")]
    pub start_address: u64,

    /// Trap handling policy
    #[serde(default)]
    pub trap_policy: TrapPolicy,
}

impl GeneralConfig {
    /// Returns the default reset instruction address.
    const fn default_start_address() -> u64 {
        defaults::START_ADDRESS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_address: defaults::START_ADDRESS,
            trap_policy: TrapPolicy::Halt,
        }
    }
}

/// Memory region sizes.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Physical memory size in bytes
    #[serde(default = "MemoryConfig::default_phys_mem_size")]
    pub phys_mem_size: u64,

    /// I/O backing store size in bytes
    #[serde(default = "MemoryConfig::default_io_mem_size")]
    pub io_mem_size: u64,
}

impl MemoryConfig {
    const fn default_phys_mem_size() -> u64 {
        defaults::PHYS_MEM_SIZE
    }

    const fn default_io_mem_size() -> u64 {
        defaults::IO_MEM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            phys_mem_size: defaults::PHYS_MEM_SIZE,
            io_mem_size: defaults::IO_MEM_SIZE,
        }
    }
}

/// TLB configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TlbConfig {
    /// Number of fully associative entries
    #[serde(default = "TlbConfig::default_entries")]
    pub entries: usize,
}

impl TlbConfig {
    const fn default_entries() -> usize {
        defaults::TLB_ENTRIES
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            entries: defaults::TLB_ENTRIES,
        }
    }
}

/// Console device configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Attach the console device to the I/O window
    #[serde(default = "ConsoleConfig::default_enabled")]
    pub enabled: bool,

    /// Offset of the console registers from `IO_MEM_START`
    #[serde(default = "ConsoleConfig::default_offset")]
    pub offset: u64,
}

impl ConsoleConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_offset() -> u64 {
        defaults::CONSOLE_OFFSET
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: defaults::CONSOLE_OFFSET,
        }
    }
}
