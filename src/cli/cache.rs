//! Per-run memoization of source reads, path resolution and existence checks.
//!
//! All three caches live inside one driver instance and are discarded with
//! it. They never evict: a value observed once is returned for the rest of
//! the run even if the filesystem changes underneath.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::debug;
use tsb_common::ByteOrderMark;

use crate::cli::host::IoHost;

/// Decoded text of one source file plus the marker it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub text: Arc<str>,
    pub byte_order_mark: ByteOrderMark,
}

impl SourceRecord {
    fn empty() -> Self {
        Self {
            text: Arc::from(""),
            byte_order_mark: ByteOrderMark::None,
        }
    }
}

#[derive(Default)]
pub struct SourceCache {
    records: RefCell<FxHashMap<String, SourceRecord>>,
}

impl SourceCache {
    /// Return the cached record for `path`, reading it on first access.
    ///
    /// An unreadable file yields an empty record; the compiler then reports
    /// whatever that empty text implies.
    pub fn get_or_read<H: IoHost + ?Sized>(&self, host: &H, path: &str) -> SourceRecord {
        if let Some(record) = self.records.borrow().get(path) {
            return record.clone();
        }

        let record = match host.read_file(path) {
            Ok(info) => SourceRecord {
                text: Arc::from(info.contents),
                byte_order_mark: info.byte_order_mark,
            },
            Err(err) => {
                debug!(path, error = %err, "unreadable source, using empty text");
                SourceRecord::empty()
            }
        };
        self.records
            .borrow_mut()
            .insert(path.to_string(), record.clone());
        record
    }
}

/// Memoized `path -> absolute normalized path`.
#[derive(Default)]
pub struct PathCache {
    resolved: RefCell<FxHashMap<String, String>>,
}

impl PathCache {
    pub fn resolve<H: IoHost + ?Sized>(&self, host: &H, path: &str) -> String {
        if let Some(resolved) = self.resolved.borrow().get(path) {
            return resolved.clone();
        }
        let resolved = host.resolve_path(path);
        self.resolved
            .borrow_mut()
            .insert(path.to_string(), resolved.clone());
        resolved
    }
}

/// Memoized `path -> file exists`.
#[derive(Default)]
pub struct ExistenceCache {
    exists: RefCell<FxHashMap<String, bool>>,
}

impl ExistenceCache {
    pub fn file_exists<H: IoHost + ?Sized>(&self, host: &H, path: &str) -> bool {
        if let Some(&exists) = self.exists.borrow().get(path) {
            return exists;
        }
        let exists = host.file_exists(path);
        self.exists.borrow_mut().insert(path.to_string(), exists);
        exists
    }
}
