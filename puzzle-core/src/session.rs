use std::collections::BTreeSet;

use tracing::{debug, info};

use puzzle_types::{
    GameOutcome, Guess, GuessOutcome, GuessRejection, LoadError, Puzzle, RevealedLetter,
    SessionRecord, SessionStatus, TargetId,
};

use crate::feedback::{compute_feedback, is_winning};
use crate::geometry::validate_puzzle;

/// Fixed guess budget shared across every target in a session.
pub const GUESS_LIMIT: usize = 6;

/// The live game for one puzzle: guess buffer, history, solved targets,
/// revealed letters and win/loss status. `Playing -> Won` and
/// `Playing -> Lost` are the only transitions; both are terminal until an
/// explicit reset recreates a fresh session for the same puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    buffer: String,
    guesses: Vec<Guess>,
    solved: BTreeSet<TargetId>,
    revealed: Vec<RevealedLetter>,
    status: SessionStatus,
    selected: TargetId,
    stats_recorded: bool,
}

impl PuzzleSession {
    /// Start a fresh session. The puzzle is re-validated defensively even
    /// though the authoring tool already validated it; a failure blocks
    /// play rather than degrading silently.
    pub fn new(puzzle: Puzzle) -> Result<Self, LoadError> {
        let report = validate_puzzle(&puzzle);
        if !report.is_valid() {
            return Err(LoadError::InvalidGeometry {
                errors: report.errors,
            });
        }

        let selected = Self::initial_target(&puzzle);
        info!(puzzle_id = %puzzle.id, "session created");
        Ok(Self {
            puzzle,
            buffer: String::new(),
            guesses: Vec::new(),
            solved: BTreeSet::new(),
            revealed: Vec::new(),
            status: SessionStatus::Playing,
            selected,
            stats_recorded: false,
        })
    }

    /// Restore a persisted session. A record stored under a different
    /// puzzle identity is treated as no session at all, never merged.
    pub fn resume(puzzle: Puzzle, record: SessionRecord) -> Result<Self, LoadError> {
        if record.puzzle_id != puzzle.id {
            debug!(
                stored = %record.puzzle_id,
                requested = %puzzle.id,
                "stored session belongs to a different puzzle, starting fresh"
            );
            return Self::new(puzzle);
        }

        let mut session = Self::new(puzzle)?;
        // Re-point selection if the stored target no longer resolves.
        let selected = match record.selected {
            TargetId::Crosser(id) if session.puzzle.crosser(id).is_none() => {
                Self::initial_target(&session.puzzle)
            }
            other => other,
        };
        session.guesses = record.guesses;
        session.solved = record.solved;
        session.revealed = record.revealed;
        session.status = record.status;
        session.selected = selected;
        session.stats_recorded = record.stats_recorded;
        info!(puzzle_id = %session.puzzle.id, status = ?session.status, "session resumed");
        Ok(session)
    }

    fn initial_target(puzzle: &Puzzle) -> TargetId {
        puzzle
            .crossers
            .first()
            .map(|c| TargetId::Crosser(c.id))
            .unwrap_or(TargetId::Main)
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn guesses_remaining(&self) -> usize {
        GUESS_LIMIT.saturating_sub(self.guesses.len())
    }

    pub fn solved(&self) -> &BTreeSet<TargetId> {
        &self.solved
    }

    pub fn revealed(&self) -> &[RevealedLetter] {
        &self.revealed
    }

    pub fn selected(&self) -> TargetId {
        self.selected
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn stats_recorded(&self) -> bool {
        self.stats_recorded
    }

    /// Crossers solved so far; each one stands for a revealed letter.
    pub fn hints_used(&self) -> u32 {
        self.solved
            .iter()
            .filter(|t| matches!(t, TargetId::Crosser(_)))
            .count() as u32
    }

    /// Point the guess buffer at another target. No-op unless the session
    /// is playing, the target exists and it is not already solved.
    pub fn select_target(&mut self, target: TargetId) {
        if self.status != SessionStatus::Playing {
            return;
        }
        if self.solved.contains(&target) || self.puzzle.target_word(&target).is_none() {
            debug!(?target, "selection rejected");
            return;
        }
        self.selected = target;
        self.buffer.clear();
    }

    /// Grow the guess buffer, bounded by the selected target's length.
    pub fn append_letter(&mut self, letter: char) {
        if self.status != SessionStatus::Playing || !letter.is_alphabetic() {
            return;
        }
        let limit = self
            .puzzle
            .target_word(&self.selected)
            .map(|w| w.chars().count())
            .unwrap_or(0);
        if self.buffer.chars().count() < limit {
            self.buffer.push(letter.to_ascii_lowercase());
        }
    }

    pub fn remove_letter(&mut self) {
        if self.status == SessionStatus::Playing {
            self.buffer.pop();
        }
    }

    /// Submit the buffered word against the selected target.
    ///
    /// Guard failures reject without any state change; the caller signals
    /// them to the user (shake) rather than treating them as faults. An
    /// accepted guess runs the whole turn: score, record, reveal, settle
    /// win/loss, advance selection, and hand the outcome to statistics
    /// exactly once.
    pub fn submit_guess(&mut self) -> Result<GuessOutcome, GuessRejection> {
        if self.status != SessionStatus::Playing {
            return Err(GuessRejection::NotPlaying);
        }
        if self.guesses.len() >= GUESS_LIMIT {
            return Err(GuessRejection::OutOfGuesses);
        }
        if self.solved.contains(&self.selected) {
            return Err(GuessRejection::TargetAlreadySolved);
        }
        let target = self.selected;
        let Some(answer) = self.puzzle.target_word(&target) else {
            return Err(GuessRejection::UnknownTarget);
        };

        let expected = answer.chars().count();
        let actual = self.buffer.chars().count();
        if actual != expected {
            debug!(expected, actual, "guess rejected: wrong length");
            return Err(GuessRejection::WrongLength { expected, actual });
        }

        let answer = answer.to_string();
        let word = std::mem::take(&mut self.buffer);
        let feedback = compute_feedback(&word, &answer);
        let solved_now = is_winning(&feedback);

        let guess = Guess {
            word,
            target,
            feedback,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        self.guesses.push(guess.clone());

        let mut revealed = None;
        if solved_now {
            self.solved.insert(target);
            if let TargetId::Crosser(id) = target
                && let Some(crosser) = self.puzzle.crosser(id)
                && let Some(letter) = crosser.intersection_letter()
            {
                let reveal = RevealedLetter {
                    row: self.puzzle.main_word.row,
                    col: crosser.col,
                    letter,
                    source: Some(id),
                };
                self.revealed.push(reveal.clone());
                revealed = Some(reveal);
            }
        }

        if solved_now && target == TargetId::Main {
            self.status = SessionStatus::Won;
            info!(puzzle_id = %self.puzzle.id, guesses = self.guesses.len(), "session won");
        } else if self.guesses.len() >= GUESS_LIMIT {
            self.status = SessionStatus::Lost;
            info!(puzzle_id = %self.puzzle.id, "session lost");
        }

        let mut auto_selected = None;
        if self.status == SessionStatus::Playing && solved_now {
            let next = self.next_unsolved_target(target);
            self.selected = next;
            self.buffer.clear();
            auto_selected = Some(next);
        }

        let mut completed = None;
        if self.status != SessionStatus::Playing && !self.stats_recorded {
            self.stats_recorded = true;
            completed = Some(self.outcome());
        }

        Ok(GuessOutcome {
            guess,
            solved: solved_now.then_some(target),
            revealed,
            status: self.status,
            auto_selected,
            completed,
        })
    }

    /// The next unsolved crosser after the one just solved, in puzzle
    /// order and wrapping around, falling back to the main word.
    fn next_unsolved_target(&self, after: TargetId) -> TargetId {
        let start = match after {
            TargetId::Crosser(id) => self
                .puzzle
                .crossers
                .iter()
                .position(|c| c.id == id)
                .map(|i| i + 1)
                .unwrap_or(0),
            TargetId::Main => 0,
        };
        let count = self.puzzle.crossers.len();
        for offset in 0..count {
            let crosser = &self.puzzle.crossers[(start + offset) % count];
            let candidate = TargetId::Crosser(crosser.id);
            if !self.solved.contains(&candidate) {
                return candidate;
            }
        }
        TargetId::Main
    }

    /// The hand-off value for the continuity engine.
    fn outcome(&self) -> GameOutcome {
        GameOutcome {
            won: self.status == SessionStatus::Won,
            guess_count: self.guesses.len() as u32,
            main_guess_count: self
                .guesses
                .iter()
                .filter(|g| g.target == TargetId::Main)
                .count() as u32,
            hints_used: self.hints_used(),
            total_crossers: self.puzzle.crossers.len() as u32,
        }
    }

    /// Explicit restart: the only way out of a terminal state. Produces a
    /// fresh playing session for the same puzzle.
    pub fn reset(&mut self) {
        info!(puzzle_id = %self.puzzle.id, "session reset");
        self.buffer.clear();
        self.guesses.clear();
        self.solved = BTreeSet::new();
        self.revealed.clear();
        self.status = SessionStatus::Playing;
        self.selected = Self::initial_target(&self.puzzle);
        self.stats_recorded = false;
    }

    /// Snapshot for persistence, taken after every mutation.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            puzzle_id: self.puzzle.id,
            guesses: self.guesses.clone(),
            solved: self.solved.clone(),
            revealed: self.revealed.clone(),
            status: self.status,
            selected: self.selected,
            stats_recorded: self.stats_recorded,
        }
    }
}
