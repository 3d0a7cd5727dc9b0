use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

use puzzle_types::{LoadError, Puzzle};

use crate::geometry::validate_puzzle;
use crate::session::PuzzleSession;

/// The serving collaborator that produces authored puzzles. Fetching is the
/// one asynchronous boundary in the engine; everything after it is
/// synchronous and single-threaded.
#[async_trait]
pub trait PuzzleSource: Send + Sync {
    async fn fetch_puzzle(&self, date: NaiveDate) -> Result<Puzzle, LoadError>;
}

/// Fetches a puzzle and re-validates it before any session is built. The
/// loader holds no state; on failure the caller keeps "no active puzzle"
/// and may simply call again for its retry affordance.
pub struct PuzzleLoader<S: PuzzleSource> {
    source: S,
}

impl<S: PuzzleSource> PuzzleLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch and defensively re-validate the day's puzzle. Authoring
    /// already validated it, but a puzzle that fails here is a hard load
    /// error and must never reach a player.
    pub async fn load(&self, date: NaiveDate) -> Result<Puzzle, LoadError> {
        let puzzle = self.source.fetch_puzzle(date).await?;
        let report = validate_puzzle(&puzzle);
        if !report.is_valid() {
            warn!(
                puzzle_id = %puzzle.id,
                errors = report.errors.len(),
                "served puzzle failed re-validation"
            );
            return Err(LoadError::InvalidGeometry {
                errors: report.errors,
            });
        }
        info!(puzzle_id = %puzzle.id, %date, "puzzle loaded");
        Ok(puzzle)
    }

    /// Load the day's puzzle and open a fresh session on it.
    pub async fn start_session(&self, date: NaiveDate) -> Result<PuzzleSession, LoadError> {
        let puzzle = self.load(date).await?;
        PuzzleSession::new(puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_types::{Crosser, MainWord, Orientation};
    use uuid::Uuid;

    struct FixedSource {
        puzzle: Puzzle,
    }

    #[async_trait]
    impl PuzzleSource for FixedSource {
        async fn fetch_puzzle(&self, _date: NaiveDate) -> Result<Puzzle, LoadError> {
            Ok(self.puzzle.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PuzzleSource for FailingSource {
        async fn fetch_puzzle(&self, date: NaiveDate) -> Result<Puzzle, LoadError> {
            Err(LoadError::NoPuzzle { date })
        }
    }

    fn valid_puzzle() -> Puzzle {
        Puzzle {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            main_word: MainWord {
                text: "planet".to_string(),
                row: 3,
                col: 1,
            },
            rows: 8,
            cols: 8,
            crossers: vec![Crosser {
                id: Uuid::new_v4(),
                text: "apple".to_string(),
                clue: "orchard fruit".to_string(),
                orientation: Orientation::Down,
                row: 2,
                col: 1,
                intersection_index: 1,
            }],
        }
    }

    #[tokio::test]
    async fn test_load_returns_validated_puzzle() {
        let loader = PuzzleLoader::new(FixedSource {
            puzzle: valid_puzzle(),
        });
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let puzzle = loader.load(date).await.unwrap();
        assert_eq!(puzzle.main_word.text, "planet");
    }

    #[tokio::test]
    async fn test_load_rejects_bad_geometry() {
        let mut puzzle = valid_puzzle();
        puzzle.crossers[0].intersection_index = 0; // 'a' against main 'p'
        let loader = PuzzleLoader::new(FixedSource { puzzle });
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = loader.load(date).await.unwrap_err();
        assert!(matches!(err, LoadError::InvalidGeometry { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_passes_through() {
        let loader = PuzzleLoader::new(FailingSource);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = loader.load(date).await.unwrap_err();
        assert_eq!(err, LoadError::NoPuzzle { date });
    }

    #[tokio::test]
    async fn test_start_session_opens_playing_session() {
        let loader = PuzzleLoader::new(FixedSource {
            puzzle: valid_puzzle(),
        });
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let session = loader.start_session(date).await.unwrap();
        assert_eq!(session.status(), puzzle_types::SessionStatus::Playing);
    }
}
