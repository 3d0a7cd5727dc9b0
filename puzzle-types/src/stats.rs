use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BadgeId {
    FirstWin,
    Genius,
    QuickThinker,
    HintMaster,
    Streak3,
    Streak7,
    Streak30,
    Century,
    Perfectionist,
}

/// Badges are append-only per player and never revoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EarnedBadge {
    pub id: BadgeId,
    pub earned_at: String, // ISO 8601 string
}

/// The hand-off value from a completed session to the continuity engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameOutcome {
    pub won: bool,
    /// Total guesses spent across every target.
    pub guess_count: u32,
    /// Guesses spent on the main word alone.
    pub main_guess_count: u32,
    /// Crossers solved this session; each one revealed a letter.
    pub hints_used: u32,
    pub total_crossers: u32,
}

/// One record per player, across every puzzle ever played.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    /// Winning guess counts, keyed 1..=6.
    pub guess_histogram: BTreeMap<u8, u32>,
    pub last_played: Option<NaiveDate>,
    pub last_win: Option<NaiveDate>,
    pub grace_saves: u32,
    pub grace_refreshed: Option<NaiveDate>,
    /// Whether the active streak was preserved by a grace save.
    pub streak_grace_saved: bool,
    pub badges: Vec<EarnedBadge>,
    /// Consecutive wins rated 3 stars, reset by any loss or lesser win.
    pub perfect_run: u32,
}

impl PlayerStats {
    pub fn has_badge(&self, id: BadgeId) -> bool {
        self.badges.iter().any(|b| b.id == id)
    }
}
