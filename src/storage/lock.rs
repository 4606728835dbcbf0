//! Exclusive table locking
//!
//! Writers serialize on an OS-level advisory lock held on a sidecar file
//! (`users.csv.lock` next to `users.csv`). The table file itself cannot carry
//! the lock because every write replaces it with a new inode.
//!
//! Locks are `flock`-style: they conflict across processes and across
//! separately opened handles within one process, and the OS drops them if
//! the holder crashes.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{debug, warn};

use super::errors::{StoreError, StoreResult};

/// Default wait before giving up on a busy table
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Held exclusive lock on one table. Released on drop.
#[derive(Debug)]
pub struct TableLock {
    file: File,
    path: PathBuf,
}

impl TableLock {
    /// Acquires the lock for `table_path`, polling until `timeout` elapses.
    ///
    /// # Errors
    ///
    /// - `StoreError::LockTimeout` if another holder keeps the lock past `timeout`
    /// - `StoreError::Io` if the lock file cannot be opened
    pub fn acquire(table_path: &Path, timeout: Duration) -> StoreResult<Self> {
        let path = lock_path_for(table_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let started = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    debug!(
                        path = %path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "table lock acquired"
                    );
                    return Ok(Self { file, path });
                }
                Err(e) if is_contended(&e) => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        warn!(path = %path.display(), ?waited, "table lock timed out");
                        return Err(StoreError::LockTimeout {
                            path: table_path.to_path_buf(),
                            waited,
                        });
                    }
                    thread::sleep(POLL_INTERVAL.min(timeout - waited));
                }
                Err(e) => return Err(StoreError::Io(e)),
            }
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TableLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release table lock");
        } else {
            debug!(path = %self.path.display(), "table lock released");
        }
    }
}

/// `<table file name>.lock` in the same directory.
pub fn lock_path_for(table_path: &Path) -> PathBuf {
    let mut name = table_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table"));
    name.push(".lock");
    table_path.with_file_name(name)
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
