//! # File I/O Module
//!
//! Ledger file operations:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the ledger
//! - **File locking**: one writer at a time, even across terminals
//! - **Version validation**: refuse ledgers written by a newer schema
//!
//! ## File Format
//!
//! Ledgers are saved as `.bullion` files containing pretty-printed JSON.
//! A `.lock` file sits next to each one; it carries the OS lock and, while
//! a writer holds it, a record of who that is.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bullion_core::file_io::{save_ledger, load_or_create_ledger, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("shop.bullion");
//! let lock = FileLock::acquire(path, "counter-1")?;
//! let mut ledger = load_or_create_ledger(path, "Main Street Jewellers")?;
//! ledger.touch();
//! save_ledger(&ledger, path)?;
//! drop(lock);
//! # Ok::<(), bullion_core::errors::BillError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{BillError, BillResult};
use crate::ledger::{Ledger, SCHEMA_VERSION};

/// Who holds a ledger, as recorded in its `.lock` file.
///
/// The OS lock on the file is what excludes other writers; this record only
/// lets a refused writer name the holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (login name or counter name)
    pub holder: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(holder: impl Into<String>) -> Self {
        LockInfo {
            holder: holder.into(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Exclusive ledger lock, released on drop.
///
/// The `.lock` file is created once and never removed: every writer locks
/// the same inode, so a writer that opened it just before the previous
/// holder finished cannot end up holding a lock on a file nobody else sees.
/// A holder that crashes loses its fs2 lock with its process; whatever
/// metadata it left behind is overwritten by the next writer.
pub struct FileLock {
    ledger_path: PathBuf,
    lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a ledger file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(BillError::FileLocked)` - Another live process holds it
    pub fn acquire(path: &Path, holder: impl Into<String>) -> BillResult<Self> {
        let lock_path = sibling_path(path, "lock");
        let lock_error = |op: &str, e: std::io::Error| {
            BillError::file_error(op, lock_path.display().to_string(), e.to_string())
        };

        // No truncate here: until we hold the lock, the contents belong to
        // whoever does.
        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| lock_error("open lock", e))?;

        if FileExt::try_lock_exclusive(&lock_file).is_err() {
            return Err(match read_lock_info(&mut lock_file) {
                Some(held) => BillError::file_locked(
                    path.display().to_string(),
                    format!("{} (pid {})", held.holder, held.pid),
                    held.locked_at.to_rfc3339(),
                ),
                None => BillError::file_locked(path.display().to_string(), "another process", "unknown"),
            });
        }

        if let Some(leftover) = read_lock_info(&mut lock_file) {
            warn!(
                holder = %leftover.holder,
                pid = leftover.pid,
                "previous ledger writer exited without releasing, taking over"
            );
        }

        let info = LockInfo::new(holder);
        let lock_json = serde_json::to_string_pretty(&info).map_err(BillError::serialization)?;
        lock_file.set_len(0).map_err(|e| lock_error("write lock", e))?;
        lock_file.seek(SeekFrom::Start(0)).map_err(|e| lock_error("write lock", e))?;
        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| lock_error("write lock", e))?;
        lock_file.sync_all().map_err(|e| lock_error("sync lock", e))?;

        debug!(path = %path.display(), holder = %info.holder, "acquired ledger lock");
        Ok(FileLock {
            ledger_path: path.to_path_buf(),
            lock_file,
            info,
        })
    }

    /// Who holds the ledger right now, if anyone. Does not take the lock.
    pub fn holder(path: &Path) -> Option<LockInfo> {
        let mut file = File::open(sibling_path(path, "lock")).ok()?;
        if FileExt::try_lock_shared(&file).is_ok() {
            let _ = FileExt::unlock(&file);
            return None;
        }
        read_lock_info(&mut file)
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Clear the record while still holding the lock, then release.
        let _ = self.lock_file.set_len(0);
        let _ = FileExt::unlock(&self.lock_file);
    }
}

/// `shop.bullion` + "lock" -> `shop.bullion.lock`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

/// Parse holder metadata; empty or half-written files read as `None`.
fn read_lock_info(file: &mut File) -> Option<LockInfo> {
    let mut contents = String::new();
    file.seek(SeekFrom::Start(0)).ok()?;
    file.read_to_string(&mut contents).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a ledger with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to `<path>.tmp`
/// 3. fsync
/// 4. Rename over `path`
pub fn save_ledger(ledger: &Ledger, path: &Path) -> BillResult<()> {
    let json = serde_json::to_string_pretty(ledger).map_err(BillError::serialization)?;

    let tmp_path = sibling_path(path, "tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        BillError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        BillError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        BillError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BillError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved ledger");
    Ok(())
}

/// Load a ledger from a file.
///
/// # Returns
///
/// * `Ok(Ledger)` - Successfully loaded
/// * `Err(BillError::VersionMismatch)` - Written by an incompatible schema
/// * `Err(BillError::SerializationError)` - Invalid JSON
/// * `Err(BillError::FileError)` - I/O error
pub fn load_ledger(path: &Path) -> BillResult<Ledger> {
    let contents = fs::read_to_string(path)
        .map_err(|e| BillError::file_error("read", path.display().to_string(), e.to_string()))?;

    let ledger: Ledger = serde_json::from_str(&contents).map_err(|e| BillError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&ledger.meta.version)?;

    debug!(path = %path.display(), "loaded ledger");
    Ok(ledger)
}

/// Load the ledger at `path`, or start a fresh one if the file doesn't
/// exist yet. The fresh ledger is not written until the caller saves it.
pub fn load_or_create_ledger(path: &Path, shop_name: &str) -> BillResult<Ledger> {
    if path.exists() {
        load_ledger(path)
    } else {
        info!(path = %path.display(), "starting new ledger");
        Ok(Ledger::new(shop_name))
    }
}

/// A ledger is readable when its major version matches ours and, while
/// the schema is still 0.x, its minor version is not newer.
fn validate_version(file_version: &str) -> BillResult<()> {
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(str::parse::<u32>);
        let major = parts.next()?.ok()?;
        let minor = parts.next().unwrap_or(Ok(0)).ok()?;
        Some((major, minor))
    };

    let compatible = match (parse(file_version), parse(SCHEMA_VERSION)) {
        (Some((major, minor)), Some((ours_major, ours_minor))) => {
            major == ours_major && (ours_major > 0 || minor <= ours_minor)
        }
        _ => false,
    };

    if compatible {
        Ok(())
    } else {
        Err(BillError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        })
    }
}
