//! # Fee Schedule
//!
//! Named cost constants used when pricing a transaction. Only two of them
//! matter to the transaction core:
//!
//! - `TRANSACTION` — flat base cost of every transaction.
//! - `TXDATA` — cost per byte of payload.
//!
//! The rest (`STEP`, `SLOAD`, `CALL`, ...) belong to the execution engine and
//! are carried so that one schedule file can configure the whole node.
//!
//! A schedule is read-only once built. The process-wide instance is installed
//! at most once, typically at startup from `--fee-schedule`; anything that
//! reads it first gets the genesis values.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading a fee schedule.
#[derive(Debug, Error)]
pub enum FeeScheduleError {
    #[error("fee schedule is not a JSON object of name to integer: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fee schedule is missing required entry {name}")]
    MissingEntry { name: &'static str },

    #[error("failed to read fee schedule {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fee names the transaction core looks up itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeName {
    /// Flat cost charged once per transaction.
    Transaction,
    /// Cost per byte of payload.
    TxData,
}

impl FeeName {
    pub const fn as_str(self) -> &'static str {
        match self {
            FeeName::Transaction => "TRANSACTION",
            FeeName::TxData => "TXDATA",
        }
    }

    const REQUIRED: [FeeName; 2] = [FeeName::Transaction, FeeName::TxData];
}

/// A read-only mapping from upper-case fee names to amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, u64>", try_from = "BTreeMap<String, u64>")]
pub struct FeeSchedule {
    entries: BTreeMap<String, u64>,
}

impl FeeSchedule {
    /// The schedule every network starts with.
    pub fn genesis() -> Self {
        let entries = [
            ("STEP", 1),
            ("STOP", 0),
            ("SUICIDE", 0),
            ("SHA3", 20),
            ("SLOAD", 20),
            ("SSTORE", 100),
            ("BALANCE", 20),
            ("CREATE", 100),
            ("CALL", 20),
            ("MEMORY", 1),
            ("TXDATA", 5),
            ("TRANSACTION", 500),
        ]
        .into_iter()
        .map(|(name, fee)| (name.to_string(), fee))
        .collect();
        Self { entries }
    }

    /// Parses a JSON object such as `{"TRANSACTION": 500, "TXDATA": 5}`.
    ///
    /// Names are upper-cased. `TRANSACTION` and `TXDATA` must be present.
    pub fn from_json(json: &str) -> Result<Self, FeeScheduleError> {
        let raw: BTreeMap<String, u64> = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Reads and parses a JSON schedule file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeeScheduleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FeeScheduleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let schedule = Self::from_json(&json)?;
        debug!(path = %path.display(), entries = schedule.len(), "loaded fee schedule");
        Ok(schedule)
    }

    /// Returns a copy with one entry added or replaced.
    pub fn with_fee(mut self, name: &str, fee: u64) -> Self {
        self.entries.insert(name.to_ascii_uppercase(), fee);
        self
    }

    /// Looks up a fee by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(&name.to_ascii_uppercase()).copied()
    }

    /// Looks up a fee that must exist.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not in the schedule. An unknown name means the
    /// caller and the schedule disagree about the protocol, which is a bug,
    /// not bad input.
    pub fn fee_for(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(fee) => fee,
            None => panic!("fee schedule has no entry named {name:?}"),
        }
    }

    /// Typed lookup for the fees the transaction core uses.
    pub fn fee(&self, name: FeeName) -> u64 {
        self.fee_for(name.as_str())
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, fee)| (name.as_str(), *fee))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Upper-cases names and requires `TRANSACTION` and `TXDATA`.
impl TryFrom<BTreeMap<String, u64>> for FeeSchedule {
    type Error = FeeScheduleError;

    fn try_from(raw: BTreeMap<String, u64>) -> Result<Self, Self::Error> {
        let entries: BTreeMap<String, u64> = raw
            .into_iter()
            .map(|(name, fee)| (name.to_ascii_uppercase(), fee))
            .collect();

        for required in FeeName::REQUIRED {
            if !entries.contains_key(required.as_str()) {
                return Err(FeeScheduleError::MissingEntry {
                    name: required.as_str(),
                });
            }
        }
        Ok(Self { entries })
    }
}

impl From<FeeSchedule> for BTreeMap<String, u64> {
    fn from(schedule: FeeSchedule) -> Self {
        schedule.entries
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::genesis()
    }
}

// ---------------------------------------------------------------------------
// Process-wide schedule
// ---------------------------------------------------------------------------

static GLOBAL: OnceCell<FeeSchedule> = OnceCell::new();

/// Installs the process-wide schedule.
///
/// Succeeds only once, and only if nothing has read [`global`] yet. On
/// failure the rejected schedule is handed back.
pub fn install(schedule: FeeSchedule) -> Result<(), FeeSchedule> {
    GLOBAL.set(schedule).map_err(|rejected| {
        warn!("fee schedule already installed; ignoring replacement");
        rejected
    })
}

/// The process-wide schedule, defaulting to [`FeeSchedule::genesis`].
pub fn global() -> &'static FeeSchedule {
    GLOBAL.get_or_init(FeeSchedule::genesis)
}

/// Shorthand for `global().fee_for(name)`.
pub fn fee_for(name: &str) -> u64 {
    global().fee_for(name)
}
