use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::CrosserId;

/// Authored puzzle geometry that fails validation. Fatal at load time:
/// a puzzle carrying any of these must block play, never degrade silently.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GeometryError {
    #[error("crosser {crosser} at column {col} lies outside the main word range")]
    OutsideMainWordRange { crosser: CrosserId, col: i32 },
    #[error("crosser {crosser} does not pass through the main word row")]
    MissesMainRow { crosser: CrosserId, row: i32 },
    #[error("crosser {crosser} intersection index {index} is out of bounds for a {len}-letter word")]
    IntersectionOutOfBounds {
        crosser: CrosserId,
        index: usize,
        len: usize,
    },
    #[error("crosser {crosser} letter '{found}' does not match main word letter '{expected}'")]
    LetterMismatch {
        crosser: CrosserId,
        expected: char,
        found: char,
    },
    #[error("crosser {crosser} start row plus intersection index misses the main word row")]
    RowMisaligned { crosser: CrosserId, row: i32, index: usize },
    #[error("main word footprint leaves the grid")]
    MainWordOutsideGrid,
    #[error("crosser {crosser} footprint leaves the grid")]
    CrosserOutsideGrid { crosser: CrosserId },
}

/// Advisory warning from the horizontal-conflict scan: crosser letters on a
/// shared row may spell an accidental word. Never a hard error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HorizontalConflict {
    pub row: i32,
    pub cols: Vec<i32>,
    pub kind: ConflictKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ConflictKind {
    /// Three or more contiguous crosser letters on one row.
    Run,
    /// Two or more non-adjacent crosser letters on one row.
    Scattered,
}

/// A guess that fails its preconditions. Signaled to the user (shake),
/// never applied partially, and never an exception.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GuessRejection {
    #[error("not enough letters")]
    WrongLength { expected: usize, actual: usize },
    #[error("session is not accepting guesses")]
    NotPlaying,
    #[error("target already solved")]
    TargetAlreadySolved,
    #[error("no guesses remaining")]
    OutOfGuesses,
    #[error("selected target does not exist in this puzzle")]
    UnknownTarget,
}

/// Failure to produce a playable puzzle. Surfaced to the user with a retry
/// affordance; the engine falls back to "no active puzzle".
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LoadError {
    #[error("puzzle fetch failed: {message}")]
    FetchFailed { message: String },
    #[error("no puzzle available for {date}")]
    NoPuzzle { date: NaiveDate },
    #[error("puzzle failed geometry validation with {} error(s)", errors.len())]
    InvalidGeometry { errors: Vec<GeometryError> },
}

/// Storage trouble. Recovered locally, never surfaced to the player and
/// never allowed to block gameplay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    #[error("serialization failed: {message}")]
    Serialization { message: String },
}
