use puzzle_types::{BadgeId, Guess, GuessRejection, PuzzleId, RevealedLetter, TargetId};

/// Everything the engine tells its collaborators about a session. The UI
/// listens for these instead of polling: rejections drive the shake
/// animation, reveals drive the grid, terminal events drive the end screen.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SessionStarted {
        puzzle_id: PuzzleId,
    },
    SessionResumed {
        puzzle_id: PuzzleId,
    },
    TargetSelected {
        target: TargetId,
    },
    GuessRejected {
        reason: GuessRejection,
    },
    GuessScored {
        guess: Guess,
    },
    TargetSolved {
        target: TargetId,
    },
    LetterRevealed {
        letter: RevealedLetter,
    },
    SessionWon {
        puzzle_id: PuzzleId,
        guess_count: u32,
    },
    SessionLost {
        puzzle_id: PuzzleId,
    },
    BadgeEarned {
        badge: BadgeId,
    },
}

/// Event handler trait for processing session events
pub trait SessionEventHandler {
    fn handle_event(&mut self, event: SessionEvent);
}

/// Simple event bus for distributing session events
pub struct SessionEventBus {
    handlers: Vec<Box<dyn SessionEventHandler>>,
}

impl SessionEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn SessionEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: SessionEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for SessionEventBus {
    fn default() -> Self {
        Self::new()
    }
}
