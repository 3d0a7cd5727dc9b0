use chrono::NaiveDate;
use tracing::info;

use puzzle_core::{
    check_and_award_badges, star_rating, ContinuityEngine, PuzzleSession, SessionEvent,
    SessionEventBus, SessionEventHandler,
};
use puzzle_types::{
    GuessOutcome, GuessRejection, LoadError, PlayerStats, Puzzle, SessionStatus, TargetId,
};

use crate::session_store::SessionStore;
use crate::stats_store::{HistoryEntry, StatsStore};

/// Wires the live session, the continuity engine, the stores and the event
/// bus into the single-threaded turn loop: guess in, feedback out, session
/// persisted after every mutation, statistics folded in exactly once when
/// the session ends. Persistence stays strictly fire-and-forget here; a
/// failed write never unwinds a transition that already happened in memory.
pub struct GameCoordinator {
    session: Option<PuzzleSession>,
    engine: ContinuityEngine,
    sessions: SessionStore,
    stats_store: StatsStore,
    bus: SessionEventBus,
}

impl GameCoordinator {
    pub fn new(sessions: SessionStore, stats_store: StatsStore) -> Self {
        let engine = ContinuityEngine::from_stats(stats_store.load());
        Self {
            session: None,
            engine,
            sessions,
            stats_store,
            bus: SessionEventBus::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn SessionEventHandler>) {
        self.bus.add_handler(handler);
    }

    pub fn session(&self) -> Option<&PuzzleSession> {
        self.session.as_ref()
    }

    pub fn stats(&self) -> &PlayerStats {
        self.engine.stats()
    }

    /// Open the day's puzzle, resuming a stored session when one exists
    /// for this exact puzzle identity.
    pub fn start_or_resume(&mut self, puzzle: Puzzle) -> Result<(), LoadError> {
        let puzzle_id = puzzle.id;
        let (session, resumed) = match self.sessions.load(puzzle_id) {
            Some(record) => (PuzzleSession::resume(puzzle, record)?, true),
            None => (PuzzleSession::new(puzzle)?, false),
        };

        self.sessions.save(&session.to_record());
        self.session = Some(session);
        self.bus.publish(if resumed {
            SessionEvent::SessionResumed { puzzle_id }
        } else {
            SessionEvent::SessionStarted { puzzle_id }
        });
        Ok(())
    }

    pub fn select_target(&mut self, target: TargetId) {
        if let Some(session) = self.session.as_mut() {
            session.select_target(target);
            if session.selected() == target {
                self.sessions.save(&session.to_record());
                self.bus.publish(SessionEvent::TargetSelected { target });
            }
        }
    }

    pub fn append_letter(&mut self, letter: char) {
        if let Some(session) = self.session.as_mut() {
            session.append_letter(letter);
        }
    }

    pub fn remove_letter(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.remove_letter();
        }
    }

    /// Run one full turn of the data flow. `today` is the calendar day the
    /// outcome is recorded under.
    pub fn submit_guess(&mut self, today: NaiveDate) -> Result<GuessOutcome, GuessRejection> {
        let Some(session) = self.session.as_mut() else {
            return Err(GuessRejection::NotPlaying);
        };

        let outcome = match session.submit_guess() {
            Ok(outcome) => outcome,
            Err(rejection) => {
                self.bus.publish(SessionEvent::GuessRejected {
                    reason: rejection.clone(),
                });
                return Err(rejection);
            }
        };

        self.sessions.save(&session.to_record());
        let puzzle_id = session.puzzle().id;
        let guesses_spent = session.guesses().len() as u32;

        self.bus.publish(SessionEvent::GuessScored {
            guess: outcome.guess.clone(),
        });
        if let Some(target) = outcome.solved {
            self.bus.publish(SessionEvent::TargetSolved { target });
        }
        if let Some(letter) = outcome.revealed.clone() {
            self.bus.publish(SessionEvent::LetterRevealed { letter });
        }
        match outcome.status {
            SessionStatus::Won => self.bus.publish(SessionEvent::SessionWon {
                puzzle_id,
                guess_count: guesses_spent,
            }),
            SessionStatus::Lost => self.bus.publish(SessionEvent::SessionLost { puzzle_id }),
            SessionStatus::Playing => {}
        }

        if let Some(completed) = &outcome.completed {
            self.engine.record_game(completed, today);
            let awarded = check_and_award_badges(self.engine.stats_mut(), completed);
            for badge in awarded {
                self.bus.publish(SessionEvent::BadgeEarned { badge });
            }
            self.stats_store.append_history(HistoryEntry {
                date: today,
                won: completed.won,
                guess_count: completed.guess_count,
                stars: star_rating(completed.hints_used, completed.total_crossers),
            });
            self.stats_store.save(self.engine.stats());
            info!(%puzzle_id, won = completed.won, "game recorded");
        }

        Ok(outcome)
    }

    /// Explicit restart of the active puzzle.
    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
            self.sessions.save(&session.to_record());
        }
    }

    pub fn is_streak_paused(&self, today: NaiveDate) -> bool {
        self.engine.is_streak_paused(today)
    }

    pub fn use_grace_save(&mut self, today: NaiveDate) -> bool {
        if self.engine.use_grace_save(today) {
            self.stats_store.save(self.engine.stats());
            true
        } else {
            false
        }
    }
}
