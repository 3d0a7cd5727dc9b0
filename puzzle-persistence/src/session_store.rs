use tracing::warn;

use puzzle_types::{PuzzleId, SessionRecord};

use crate::backend::StorageBackend;

/// One session record per puzzle identity. Writes are fire-and-forget:
/// a failure is logged and swallowed, never allowed to roll back or fail
/// the in-memory transition that triggered it.
pub struct SessionStore {
    backend: Box<dyn StorageBackend>,
}

impl SessionStore {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn key(puzzle_id: PuzzleId) -> String {
        format!("session/{puzzle_id}")
    }

    /// Load the stored session for a puzzle. A record stored under the
    /// right key but carrying a different puzzle identity is ignored, and
    /// a corrupt payload is discarded; both read as "no session".
    pub fn load(&self, puzzle_id: PuzzleId) -> Option<SessionRecord> {
        let raw = match self.backend.read(&Self::key(puzzle_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%puzzle_id, error = %e, "session read failed");
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if record.puzzle_id == puzzle_id => Some(record),
            Ok(record) => {
                warn!(
                    %puzzle_id,
                    stored = %record.puzzle_id,
                    "stored session belongs to a different puzzle, ignoring"
                );
                None
            }
            Err(e) => {
                warn!(%puzzle_id, error = %e, "discarding corrupt session record");
                None
            }
        }
    }

    /// Persist a session snapshot, best-effort.
    pub fn save(&mut self, record: &SessionRecord) {
        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(puzzle_id = %record.puzzle_id, error = %e, "session serialization failed");
                return;
            }
        };
        if let Err(e) = self.backend.write(&Self::key(record.puzzle_id), &raw) {
            warn!(puzzle_id = %record.puzzle_id, error = %e, "session write failed");
        }
    }

    /// Drop the stored session for a puzzle, best-effort.
    pub fn clear(&mut self, puzzle_id: PuzzleId) {
        if let Err(e) = self.backend.remove(&Self::key(puzzle_id)) {
            warn!(%puzzle_id, error = %e, "session remove failed");
        }
    }
}
