use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{CrosserId, GameOutcome, PuzzleId};

/// Which word the current guess buffer is aimed at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum TargetId {
    Main,
    Crosser(CrosserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterStatus {
    Correct, // Green - correct letter in correct position
    Present, // Yellow - correct letter in wrong position
    Absent,  // Gray - letter not in word
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LetterFeedback {
    pub letter: char,
    pub status: LetterStatus,
}

/// One submitted guess. Guesses are append-only within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub word: String,
    pub target: TargetId,
    pub feedback: Vec<LetterFeedback>,
    pub timestamp: String, // ISO 8601 string
}

/// A main-word letter uncovered by solving a crosser. `source` is absent
/// for the end-of-game answer reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevealedLetter {
    pub row: i32,
    pub col: i32,
    pub letter: char,
    pub source: Option<CrosserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionStatus {
    Playing,
    Won,
    Lost,
}

/// Persisted per-puzzle play record, keyed by puzzle identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionRecord {
    pub puzzle_id: PuzzleId,
    pub guesses: Vec<Guess>,
    pub solved: BTreeSet<TargetId>,
    pub revealed: Vec<RevealedLetter>,
    pub status: SessionStatus,
    pub selected: TargetId,
    /// One-shot flag: the session's outcome has been folded into the
    /// long-run statistics and must never be counted again.
    pub stats_recorded: bool,
}

/// Everything a caller learns from one accepted guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessOutcome {
    pub guess: Guess,
    /// The target this guess solved, if it did.
    pub solved: Option<TargetId>,
    /// Main-word letter uncovered by solving a crosser.
    pub revealed: Option<RevealedLetter>,
    pub status: SessionStatus,
    /// Where selection auto-advanced to after a crosser solve.
    pub auto_selected: Option<TargetId>,
    /// Present exactly once, on the guess that ended the session.
    pub completed: Option<GameOutcome>,
}
