//! Binary image loader.
//!
//! Twin64 programs are flat binary images: raw little-endian instruction and
//! data words with no header. The host reads an image from disk and copies it
//! into physical memory before the first `reset`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::common::Trap;
use crate::core::Cpu;

/// Errors produced while loading an image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("cannot read image '{path}': {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The image file is empty.
    #[error("image '{0}' is empty")]
    Empty(PathBuf),

    /// The image does not fit in physical memory at the requested address.
    #[error("image of {len} bytes does not fit at {addr:#x}: {trap}")]
    DoesNotFit {
        /// Image length in bytes.
        len: usize,
        /// Requested load address.
        addr: u64,
        /// Bounds trap reported by physical memory.
        trap: Trap,
    },
}

/// Reads a raw binary image from disk.
///
/// # Arguments
///
/// * `path` - Path to the image file.
///
/// # Returns
///
/// The raw bytes of the file, or `LoadError` if it cannot be read or is empty.
pub fn load_image(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    tracing::info!(path = %path.display(), len = bytes.len(), "image read");
    Ok(bytes)
}

/// Copies an image into the CPU's physical memory at `addr`.
pub fn install_image(cpu: &mut Cpu, image: &[u8], addr: u64) -> Result<(), LoadError> {
    cpu.memory_mut()
        .load_physical(addr, image)
        .map_err(|trap| LoadError::DoesNotFit {
            len: image.len(),
            addr,
            trap,
        })?;
    tracing::info!(addr = format_args!("{addr:#x}"), len = image.len(), "image installed");
    Ok(())
}
