use chrono::NaiveDate;
use tracing::{debug, info};

use puzzle_types::{GameOutcome, PlayerStats};

/// Grace saves refresh to one after this many days without a refresh.
pub const GRACE_REFRESH_DAYS: i64 = 30;

/// Owns the cross-session statistics record: play counters, the
/// day-granularity streak, the guess histogram and the grace-save balance.
/// This is the only place streak state ever changes.
#[derive(Debug, Clone, Default)]
pub struct ContinuityEngine {
    stats: PlayerStats,
}

impl ContinuityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stats(stats: PlayerStats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }

    /// Fold one completed game into the record.
    ///
    /// The streak rule is lazy: a loss leaves the streak value untouched,
    /// and the break is only applied at the next win when the gap since the
    /// previous win turns out to exceed one day. The displayed streak can
    /// therefore be stale between a miss and the next attempt; callers that
    /// need to know whether a streak is presently at risk use
    /// [`ContinuityEngine::is_streak_paused`].
    pub fn record_game(&mut self, outcome: &GameOutcome, date: NaiveDate) {
        self.refresh_grace_saves(date);

        self.stats.games_played += 1;
        if outcome.won {
            self.stats.games_won += 1;

            match self.stats.last_win {
                Some(prev) => {
                    let gap = (date - prev).num_days();
                    if gap == 1 {
                        self.stats.current_streak += 1;
                        info!(streak = self.stats.current_streak, "streak extended");
                    } else if gap == 0 {
                        // Same-day repeat; should not normally occur.
                        debug!("win recorded twice for one day, streak unchanged");
                    } else {
                        self.stats.current_streak = 1;
                        self.stats.streak_grace_saved = false;
                        info!("streak restarted");
                    }
                }
                None => {
                    self.stats.current_streak = 1;
                }
            }
            self.stats.last_win = Some(date);

            if (1..=6).contains(&outcome.guess_count) {
                *self
                    .stats
                    .guess_histogram
                    .entry(outcome.guess_count as u8)
                    .or_insert(0) += 1;
            }
        }

        self.stats.max_streak = self.stats.max_streak.max(self.stats.current_streak);
        self.stats.last_played = Some(date);
    }

    /// Whether the active streak is at risk: a last win exists, the streak
    /// is non-zero, and more than one day has passed since that win. Used
    /// by the UI to offer a grace save; `record_game` never consults it.
    pub fn is_streak_paused(&self, today: NaiveDate) -> bool {
        match self.stats.last_win {
            Some(prev) => self.stats.current_streak > 0 && (today - prev).num_days() > 1,
            None => false,
        }
    }

    /// Spend one grace save to keep the current streak alive. Rewrites the
    /// last-win date to today so the streak reads as continuous at the next
    /// recorded win. Fails without mutating anything when no balance or no
    /// streak exists.
    pub fn use_grace_save(&mut self, today: NaiveDate) -> bool {
        if self.stats.grace_saves == 0 || self.stats.current_streak == 0 {
            debug!(
                balance = self.stats.grace_saves,
                streak = self.stats.current_streak,
                "grace save refused"
            );
            return false;
        }
        self.stats.grace_saves -= 1;
        self.stats.streak_grace_saved = true;
        self.stats.last_win = Some(today);
        info!(streak = self.stats.current_streak, "streak preserved by grace save");
        true
    }

    fn refresh_grace_saves(&mut self, date: NaiveDate) {
        let due = match self.stats.grace_refreshed {
            Some(last) => (date - last).num_days() > GRACE_REFRESH_DAYS,
            None => true,
        };
        if due {
            self.stats.grace_saves = 1;
            self.stats.grace_refreshed = Some(date);
        }
    }
}
