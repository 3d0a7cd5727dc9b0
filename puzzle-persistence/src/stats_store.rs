use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use puzzle_types::{PlayerStats, StorageError};

use crate::backend::StorageBackend;

const STATS_KEY: &str = "player/stats";
const HISTORY_KEY: &str = "player/history";

/// One line of the auxiliary play-history log. The log is expendable: it
/// exists for the stats screens and is the first thing sacrificed when
/// storage runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub won: bool,
    pub guess_count: u32,
    pub stars: u8,
}

/// The per-player statistics record plus its auxiliary history log.
///
/// The statistics record must survive at all costs: a write that fails on
/// quota discards the oldest ~20% of the history log and retries once, and
/// if that still fails the whole log is dropped rather than losing the
/// record itself.
pub struct StatsStore {
    backend: Box<dyn StorageBackend>,
}

impl StatsStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Load the player's record, falling back to a fresh one on any
    /// missing, unreadable or corrupt payload.
    pub fn load(&self) -> PlayerStats {
        match self.backend.read(STATS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding corrupt stats record");
                PlayerStats::default()
            }),
            Ok(None) => PlayerStats::default(),
            Err(e) => {
                warn!(error = %e, "stats read failed");
                PlayerStats::default()
            }
        }
    }

    /// Persist the player's record, recovering from quota failures by
    /// pruning the history log. Never fails outward.
    pub fn save(&mut self, stats: &PlayerStats) {
        let raw = match serde_json::to_string(stats) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "stats serialization failed");
                return;
            }
        };

        match self.backend.write(STATS_KEY, &raw) {
            Ok(()) => {}
            Err(StorageError::QuotaExceeded) => self.recover_and_retry(&raw),
            Err(e) => warn!(error = %e, "stats write failed"),
        }
    }

    fn recover_and_retry(&mut self, raw: &str) {
        warn!("stats write over quota, pruning history log");
        let mut history = self.history();
        let drop_count = history.len().div_ceil(5); // oldest ~20%
        history.drain(..drop_count);
        self.write_history(&history);

        if self.backend.write(STATS_KEY, raw).is_ok() {
            return;
        }

        warn!("still over quota, discarding the whole history log");
        if let Err(e) = self.backend.remove(HISTORY_KEY) {
            warn!(error = %e, "history remove failed");
        }
        if let Err(e) = self.backend.write(STATS_KEY, raw) {
            warn!(error = %e, "stats record could not be written");
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        match self.backend.read(HISTORY_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding corrupt history log");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "history read failed");
                Vec::new()
            }
        }
    }

    /// Append one completed game to the history log, best-effort.
    pub fn append_history(&mut self, entry: HistoryEntry) {
        let mut history = self.history();
        history.push(entry);
        self.write_history(&history);
    }

    fn write_history(&mut self, history: &[HistoryEntry]) {
        let raw = match serde_json::to_string(history) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "history serialization failed");
                return;
            }
        };
        if let Err(e) = self.backend.write(HISTORY_KEY, &raw) {
            warn!(error = %e, "history write failed");
        }
    }
}
