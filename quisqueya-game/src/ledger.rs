//! Append-only score ledger with atomic file persistence and leaderboard queries.
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use serde_json::Value;
use thiserror::Error;

use crate::constants::STAGING_EXTENSION;
use crate::score::{PlayerStats, ScoreRecord};

/// Failures raised by a score store.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("score store {} I/O failure: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score store {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode score records: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("score store is unavailable")]
    Unavailable,
}

/// Backing storage for the ledger. The store is the only source of truth:
/// implementations must not cache between calls.
pub trait ScoreStore {
    /// Read every persisted record in append order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or decoded.
    fn read_all(&self) -> Result<Vec<ScoreRecord>, LedgerError>;

    /// Add `record` after everything already persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing history cannot be read back, or if the
    /// updated history cannot be written. The stored history is unchanged then.
    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError>;
}

/// Pretty-printed JSON array on disk, replaced through a staging file and an atomic rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the store as an empty array when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn ensure_exists(&self) -> Result<(), LedgerError> {
        if self.path.is_file() {
            return Ok(());
        }
        log::info!("creating empty score store at {}", self.path.display());
        self.write_entries(&[])
    }

    /// The stored array with each entry left undecoded.
    ///
    /// A missing file is an empty array; anything but a JSON array is corrupt.
    fn read_entries(&self) -> Result<Vec<Value>, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&raw).map_err(|source| LedgerError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &[Value]) -> Result<(), LedgerError> {
        let encoded = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // The live file stays untouched until the staging copy is complete.
        let staging = self.staging_path();
        let written = File::create(&staging).and_then(|mut file| {
            file.write_all(encoded.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        });
        if let Err(err) = written.and_then(|()| fs::rename(&staging, &self.path)) {
            let _ = fs::remove_file(&staging);
            return Err(self.io_error(err));
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("scores"), OsString::from);
        name.push(".");
        name.push(STAGING_EXTENSION);
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for JsonFileStore {
    /// Undecodable entries are skipped with a warning; the rest still count.
    fn read_all(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        let records: Vec<ScoreRecord> = self
            .read_entries()?
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value::<ScoreRecord>(entry)
                    .inspect_err(|err| {
                        log::warn!(
                            "skipping score record #{} in {}: {err}",
                            index + 1,
                            self.path.display()
                        );
                    })
                    .ok()
            })
            .collect();
        Ok(records)
    }

    /// Entries this version cannot decode are written back verbatim, and a store
    /// that is not a JSON array is never overwritten.
    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        let mut entries = self.read_entries()?;
        log::debug!(
            "appending game {} as entry #{}",
            record.game_id,
            entries.len() + 1
        );
        entries.push(serde_json::to_value(record)?);
        self.write_entries(&entries)
    }
}

/// Volatile store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<ScoreRecord>>,
    fail_writes: Cell<bool>,
    corrupt: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every subsequent read report corruption.
    pub fn corrupt(&self, corrupt: bool) {
        self.corrupt.set(corrupt);
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<ScoreRecord> {
        self.records.borrow().clone()
    }
}

impl ScoreStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<ScoreRecord>, LedgerError> {
        if self.corrupt.get() {
            return Err(LedgerError::Unavailable);
        }
        Ok(self.records.borrow().clone())
    }

    fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        if self.fail_writes.get() || self.corrupt.get() {
            return Err(LedgerError::Unavailable);
        }
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

/// Read-through view over a score store. Every query re-reads the store.
#[derive(Debug)]
pub struct Ledger<S: ScoreStore> {
    store: S,
}

impl<S: ScoreStore> Ledger<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// All records in append order. A missing or corrupt store reads as no history.
    pub fn load_all(&self) -> Vec<ScoreRecord> {
        self.store.read_all().unwrap_or_else(|err| {
            log::warn!("treating score history as empty: {err}");
            Vec::new()
        })
    }

    /// Persist one completed game after the existing history.
    ///
    /// Unlike the queries, a save does not treat an unreadable store as empty:
    /// it fails and leaves the stored history alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read back or the updated
    /// history cannot be written.
    pub fn append(&self, record: ScoreRecord) -> Result<(), LedgerError> {
        self.store.append(&record).inspect_err(|err| {
            log::error!("failed to save score: {err}");
        })
    }

    /// The best `n` records, optionally restricted to one theme.
    ///
    /// Ranked by score, then percentage (both descending), then timestamp text ascending.
    pub fn top_n(&self, n: usize, theme: Option<&str>) -> Vec<ScoreRecord> {
        let mut records: Vec<ScoreRecord> = self
            .load_all()
            .into_iter()
            .filter(|record| theme.is_none_or(|wanted| record.theme == wanted))
            .collect();
        records.sort_by(rank);
        records.truncate(n);
        records
    }

    /// Theme labels present in the history, alphabetical and de-duplicated.
    pub fn distinct_themes(&self) -> Vec<String> {
        self.load_all()
            .into_iter()
            .map(|record| record.theme)
            .filter(|theme| !theme.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of games recorded under `name`, ignoring case.
    pub fn count_by_player(&self, name: &str) -> usize {
        self.load_all()
            .iter()
            .filter(|record| record.is_player(name))
            .count()
    }

    pub fn stats_for_player(&self, name: &str) -> PlayerStats {
        let records = self.load_all();
        PlayerStats::from_records(records.iter().filter(|record| record.is_player(name)))
    }
}

fn rank(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.percentage.total_cmp(&a.percentage))
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}
