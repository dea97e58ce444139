//! Kernel statistics readers.
//!
//! This module reads the Linux proc filesystem and turns its text into
//! typed counters. Readers are stateless; anything that needs a previous
//! sample goes through [`crate::rates`].

mod parser;
mod reader;
mod source;

pub use parser::{
    parse_cpu_times, parse_disk_sectors, parse_labeled_counter, parse_meminfo,
    parse_meminfo_field, parse_net_bytes, CpuTimes, DiskSectors, MemInfo, NetBytes,
};
pub use reader::KernelStats;
pub use source::{ProcFile, ProcFs, StatSource, StaticSource, DEFAULT_PROC_ROOT};

use std::path::PathBuf;
use thiserror::Error;

/// Size of a diskstats sector in bytes, independent of the device's real sector size.
pub const SECTOR_SIZE: u64 = 512;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Converts a byte count to megabytes (MiB).
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Errors that can occur while reading a statistic.
///
/// All variants are recoverable: the sampling loop skips the metric for
/// the current cycle and tries again on the next one.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The pseudo-file could not be read from disk.
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        /// Full path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The source has no content for this file.
    #[error("{0} is not available")]
    Unavailable(ProcFile),
    /// The file was read but the requested entry is absent.
    #[error("{file} has no `{field}` entry")]
    MissingField {
        /// File that was searched.
        file: ProcFile,
        /// Label, key or device name that was not found.
        field: String,
    },
    /// An entry was found but its value could not be parsed.
    #[error("malformed line in {file}: {line:?}")]
    Malformed {
        /// File containing the line.
        file: ProcFile,
        /// The offending line.
        line: String,
    },
}

impl ReadError {
    pub(crate) fn missing(file: ProcFile, field: impl Into<String>) -> Self {
        ReadError::MissingField {
            file,
            field: field.into(),
        }
    }

    pub(crate) fn malformed(file: ProcFile, line: impl Into<String>) -> Self {
        ReadError::Malformed {
            file,
            line: line.into(),
        }
    }
}
