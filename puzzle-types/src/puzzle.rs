use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type PuzzleId = Uuid;
pub type CrosserId = Uuid;

/// The horizontal answer word the player is ultimately trying to guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MainWord {
    pub text: String,
    pub row: i32,
    pub col: i32,
}

impl MainWord {
    /// Length is always derived from the text, never stored separately.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Letter at a zero-based offset into the word, lowercased.
    pub fn letter_at(&self, offset: usize) -> Option<char> {
        self.text.chars().nth(offset).map(|c| c.to_ascii_lowercase())
    }

    /// Rightmost grid column occupied by the word.
    pub fn end_col(&self) -> i32 {
        self.col + self.len() as i32 - 1
    }
}

/// Crossers only ever run vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Orientation {
    #[default]
    Down,
}

/// A vertical word intersecting the main word at exactly one letter.
/// Immutable once the puzzle is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Crosser {
    pub id: CrosserId,
    pub text: String,
    pub clue: String,
    pub orientation: Orientation,
    pub row: i32,
    pub col: i32,
    /// Offset within this crosser's own text that must equal the main
    /// word's letter at this crosser's column.
    pub intersection_index: usize,
}

impl Crosser {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lowermost grid row occupied by this crosser.
    pub fn end_row(&self) -> i32 {
        self.row + self.len() as i32 - 1
    }

    /// The letter this crosser contributes to the main word, lowercased.
    pub fn intersection_letter(&self) -> Option<char> {
        self.text
            .chars()
            .nth(self.intersection_index)
            .map(|c| c.to_ascii_lowercase())
    }
}

/// One day's puzzle as delivered by the authoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Puzzle {
    pub id: PuzzleId,
    pub date: NaiveDate,
    pub main_word: MainWord,
    pub rows: i32,
    pub cols: i32,
    pub crossers: Vec<Crosser>,
}

impl Puzzle {
    pub fn crosser(&self, id: CrosserId) -> Option<&Crosser> {
        self.crossers.iter().find(|c| c.id == id)
    }

    /// The answer word for a guess target, if the target exists in this puzzle.
    pub fn target_word(&self, target: &crate::TargetId) -> Option<&str> {
        match target {
            crate::TargetId::Main => Some(self.main_word.text.as_str()),
            crate::TargetId::Crosser(id) => self.crosser(*id).map(|c| c.text.as_str()),
        }
    }
}
