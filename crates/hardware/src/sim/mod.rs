//! Simulation utilities and program loading.
//!
//! Provides utilities for reading binary images from disk and placing them
//! into physical memory before execution.

/// Raw binary image loading.
pub mod loader;
