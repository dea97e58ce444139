//! Where kernel statistics text comes from.
//!
//! Readers never open files directly; they ask a [`StatSource`] for the
//! content of a [`ProcFile`]. The real implementation reads below a
//! configurable root, the static one serves canned text for tests.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::ReadError;

/// Default mount point of the proc filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// The pseudo-files the agent knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcFile {
    /// `stat`: CPU jiffies, context switches, process count.
    Stat,
    /// `meminfo`: memory totals in kB.
    Meminfo,
    /// `diskstats`: per block device I/O counters.
    Diskstats,
    /// `net/dev`: per interface byte counters.
    NetDev,
    /// `vmstat`: virtual memory event counters.
    Vmstat,
}

impl ProcFile {
    /// Path relative to the proc root.
    pub fn relative_path(self) -> &'static str {
        match self {
            ProcFile::Stat => "stat",
            ProcFile::Meminfo => "meminfo",
            ProcFile::Diskstats => "diskstats",
            ProcFile::NetDev => "net/dev",
            ProcFile::Vmstat => "vmstat",
        }
    }
}

impl fmt::Display for ProcFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/proc/{}", self.relative_path())
    }
}

/// Trait for kernel statistics sources.
///
/// This abstraction allows swapping between the live proc filesystem
/// and canned content for testing.
pub trait StatSource: Send {
    /// Returns the full text content of `file`.
    fn read(&self, file: ProcFile) -> Result<String, ReadError>;
}

/// Reads pseudo-files from a proc filesystem mount.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    /// Creates a source rooted at `root` (normally `/proc`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl StatSource for ProcFs {
    fn read(&self, file: ProcFile) -> Result<String, ReadError> {
        let path = self.root.join(file.relative_path());
        std::fs::read_to_string(&path).map_err(|source| ReadError::Io { path, source })
    }
}

/// In-memory source serving fixed text per file.
///
/// Clones share the same contents, so a test can keep one handle and
/// rewrite counters between sampling cycles while the sampler owns another.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    files: Arc<Mutex<HashMap<ProcFile, String>>>,
}

impl StaticSource {
    /// Creates a source with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the content served for `file`.
    pub fn set(&self, file: ProcFile, content: impl Into<String>) {
        self.lock().insert(file, content.into());
    }

    /// Makes `file` unreadable, as if it did not exist.
    pub fn remove(&self, file: ProcFile) {
        self.lock().remove(&file);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ProcFile, String>> {
        // Poisoning leaves the map intact.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatSource for StaticSource {
    fn read(&self, file: ProcFile) -> Result<String, ReadError> {
        self.lock()
            .get(&file)
            .cloned()
            .ok_or(ReadError::Unavailable(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proc_file_display() {
        assert_eq!(ProcFile::NetDev.to_string(), "/proc/net/dev");
        assert_eq!(ProcFile::Stat.to_string(), "/proc/stat");
    }

    #[test]
    fn test_procfs_reads_below_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vmstat"), "pgfault 12\n").unwrap();

        let source = ProcFs::new(dir.path());
        assert_eq!(source.read(ProcFile::Vmstat).unwrap(), "pgfault 12\n");
    }

    #[test]
    fn test_procfs_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ProcFs::new(dir.path());
        assert!(matches!(
            source.read(ProcFile::Meminfo),
            Err(ReadError::Io { .. })
        ));
    }

    #[test]
    fn test_static_source_clones_share_content() {
        let source = StaticSource::new();
        let handle = source.clone();

        assert!(matches!(
            source.read(ProcFile::Stat),
            Err(ReadError::Unavailable(ProcFile::Stat))
        ));

        handle.set(ProcFile::Stat, "ctxt 1\n");
        assert_eq!(source.read(ProcFile::Stat).unwrap(), "ctxt 1\n");

        handle.remove(ProcFile::Stat);
        assert!(source.read(ProcFile::Stat).is_err());
    }
}
