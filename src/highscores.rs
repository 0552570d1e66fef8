//! High score leaderboard system
//!
//! An append-only log of `(name, score)` records. Every finished run is
//! appended (no dedup by name, no trimming); the top-K view is computed on
//! read. The on-disk form is JSON lines, one record per line.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Errors raised by a leaderboard backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode score record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("score store at {} is unavailable: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Durable leaderboard: append a record, query the best K
pub trait ScoreStore {
    /// Append a record. Persistent backends must have it on disk once
    /// this returns `Ok`.
    fn save(&mut self, name: &str, score: u64) -> Result<(), StoreError>;

    /// Up to `k` records, highest score first, ties in insertion order
    fn top_k(&self, k: usize) -> Result<Vec<ScoreRecord>, StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn save(&mut self, name: &str, score: u64) -> Result<(), StoreError> {
        (**self).save(name, score)
    }

    fn top_k(&self, k: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        (**self).top_k(k)
    }
}

/// Sort records (given in insertion order) by descending score and keep
/// the first `k`. The sort is stable, so equal scores stay in insertion order.
pub fn rank(mut records: Vec<ScoreRecord>, k: usize) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(k);
    records
}

/// Leaderboard backed by a JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonlScoreStore {
    path: PathBuf,
}

impl JsonlScoreStore {
    /// Open the store at `path`, creating an empty file (and parent
    /// directories) if missing. Safe to call on every start.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        Self::append_handle(&path)?;
        log::info!("Score store ready at {}", path.display());
        Ok(Self { path })
    }

    fn append_handle(path: &Path) -> Result<File, StoreError> {
        OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| StoreError::io(path, e))
    }

    /// All records in insertion order. Lines that fail to parse (a torn
    /// final write, hand edits) are skipped.
    fn read_all(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let records = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| match serde_json::from_str::<ScoreRecord>(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!(
                        "Skipping malformed score line {} in {}: {}",
                        i + 1,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect();
        Ok(records)
    }

    fn append_line(file: &mut File, line: &str) -> io::Result<()> {
        // Start on a fresh line so a torn record cannot swallow this one
        if Self::has_torn_tail(file)? {
            file.write_all(b"\n")?;
        }
        file.write_all(line.as_bytes())?;
        file.sync_data()
    }

    /// True if the file is non-empty and its last byte is not a newline
    fn has_torn_tail(file: &mut File) -> io::Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(false);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }
}

impl ScoreStore for JsonlScoreStore {
    fn save(&mut self, name: &str, score: u64) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(&ScoreRecord::new(name, score))?;
        line.push('\n');

        let mut file = Self::append_handle(&self.path)?;
        Self::append_line(&mut file, &line).map_err(|e| StoreError::io(&self.path, e))?;

        log::info!("Saved score {} for {:?}", score, name);
        Ok(())
    }

    fn top_k(&self, k: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(rank(self.read_all()?, k))
    }
}

/// Non-durable leaderboard kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record in insertion order
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn save(&mut self, name: &str, score: u64) -> Result<(), StoreError> {
        self.records.push(ScoreRecord::new(name, score));
        Ok(())
    }

    fn top_k(&self, k: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(rank(self.records.clone(), k))
    }
}

/// Stand-in for a store that could not be opened. Every call fails, so
/// callers report the run as unsaved instead of silently dropping it.
#[derive(Debug, Clone)]
pub struct UnavailableScoreStore {
    path: PathBuf,
    reason: String,
}

impl UnavailableScoreStore {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            reason: self.reason.clone(),
        }
    }
}

impl ScoreStore for UnavailableScoreStore {
    fn save(&mut self, _name: &str, _score: u64) -> Result<(), StoreError> {
        Err(self.error())
    }

    fn top_k(&self, _k: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        Err(self.error())
    }
}
