use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use puzzle_core::{PuzzleSession, SessionEvent, SessionEventHandler};
use puzzle_types::{Crosser, MainWord, Orientation, Puzzle, TargetId};
use uuid::Uuid;

/// Creates a crosser with a deterministic geometry for tests
pub fn create_crosser(text: &str, row: i32, col: i32, intersection_index: usize) -> Crosser {
    Crosser {
        id: Uuid::new_v4(),
        text: text.to_string(),
        clue: format!("clue for {text}"),
        orientation: Orientation::Down,
        row,
        col,
        intersection_index,
    }
}

/// Creates the standard test puzzle: "planet" across row 3 with three
/// crossers revealing p, l and a
pub fn create_test_puzzle() -> Puzzle {
    Puzzle {
        id: Uuid::new_v4(),
        date: day("2024-01-01"),
        main_word: MainWord {
            text: "planet".to_string(),
            row: 3,
            col: 1,
        },
        rows: 8,
        cols: 8,
        crossers: vec![
            create_crosser("apple", 2, 1, 1),
            create_crosser("salt", 1, 2, 2),
            create_crosser("rant", 2, 3, 1),
        ],
    }
}

/// Creates a fresh playing session on the standard puzzle
pub fn create_test_session() -> PuzzleSession {
    PuzzleSession::new(create_test_puzzle()).unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Types a whole word into the session's guess buffer
pub fn type_word(session: &mut PuzzleSession, word: &str) {
    for c in word.chars() {
        session.append_letter(c);
    }
}

/// Types and submits a word, asserting the guess is accepted
pub fn submit_word(session: &mut PuzzleSession, word: &str) -> puzzle_types::GuessOutcome {
    type_word(session, word);
    session.submit_guess().unwrap()
}

/// Solves every crosser in order, leaving the main word selected
pub fn solve_all_crossers(session: &mut PuzzleSession) {
    let words: Vec<String> = session
        .puzzle()
        .crossers
        .iter()
        .map(|c| c.text.clone())
        .collect();
    for word in words {
        submit_word(session, &word);
    }
    assert_eq!(session.selected(), TargetId::Main);
}

/// Event collector for testing event emissions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn handler(&self) -> Box<dyn SessionEventHandler> {
        Box::new(CollectingHandler {
            events: self.events.clone(),
        })
    }
}

struct CollectingHandler {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl SessionEventHandler for CollectingHandler {
    fn handle_event(&mut self, event: SessionEvent) {
        self.events.lock().unwrap().push(event);
    }
}
