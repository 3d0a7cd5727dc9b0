use tracing::info;

use puzzle_types::{BadgeId, EarnedBadge, GameOutcome, PlayerStats};

/// Wins needed at three stars in a row for the perfectionist badge.
const PERFECTIONIST_RUN: u32 = 5;

/// One badge-unlock rule. The table is data, not branching code: each rule
/// is independent, several can fire from one game, and a badge already held
/// never fires again.
pub struct BadgeRule {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    check: fn(&GameOutcome, &PlayerStats) -> bool,
}

pub const BADGE_RULES: &[BadgeRule] = &[
    BadgeRule {
        id: BadgeId::FirstWin,
        name: "First Win",
        description: "Solve your first puzzle",
        icon: "🏆",
        check: |outcome, _| outcome.won,
    },
    BadgeRule {
        id: BadgeId::Genius,
        name: "Genius",
        description: "Win without revealing a single letter",
        icon: "🧠",
        check: |outcome, _| outcome.won && outcome.hints_used == 0,
    },
    BadgeRule {
        id: BadgeId::QuickThinker,
        name: "Quick Thinker",
        description: "Win in two main-word guesses or fewer",
        icon: "⚡",
        check: |outcome, _| outcome.won && outcome.main_guess_count <= 2,
    },
    BadgeRule {
        id: BadgeId::HintMaster,
        name: "Hint Master",
        description: "Win after revealing every letter",
        icon: "🔍",
        check: |outcome, _| {
            outcome.won
                && outcome.total_crossers > 0
                && outcome.hints_used == outcome.total_crossers
        },
    },
    BadgeRule {
        id: BadgeId::Streak3,
        name: "On a Roll",
        description: "Reach a 3-day streak",
        icon: "🔥",
        check: |_, stats| stats.current_streak >= 3,
    },
    BadgeRule {
        id: BadgeId::Streak7,
        name: "Week Warrior",
        description: "Reach a 7-day streak",
        icon: "📅",
        check: |_, stats| stats.current_streak >= 7,
    },
    BadgeRule {
        id: BadgeId::Streak30,
        name: "Monthly Master",
        description: "Reach a 30-day streak",
        icon: "🗓️",
        check: |_, stats| stats.current_streak >= 30,
    },
    BadgeRule {
        id: BadgeId::Century,
        name: "Century Club",
        description: "Win one hundred puzzles",
        icon: "💯",
        check: |_, stats| stats.games_won >= 100,
    },
    BadgeRule {
        id: BadgeId::Perfectionist,
        name: "Perfectionist",
        description: "Five three-star wins in a row",
        icon: "⭐",
        check: |_, stats| stats.perfect_run >= PERFECTIONIST_RUN,
    },
];

pub fn rule_for(id: BadgeId) -> &'static BadgeRule {
    BADGE_RULES
        .iter()
        .find(|rule| rule.id == id)
        .expect("every badge id has a rule")
}

/// Star rating for a win, from the hint-usage ratio.
pub fn star_rating(hints_used: u32, total_crossers: u32) -> u8 {
    if hints_used == 0 {
        return 3;
    }
    let ratio = f64::from(hints_used) / f64::from(total_crossers);
    if ratio <= 0.5 {
        2
    } else if ratio < 1.0 {
        1
    } else {
        0
    }
}

/// Evaluate the rule table against a just-recorded game. Runs after
/// `record_game`, so every rule sees the updated streak and win counters.
/// Returns the badges newly earned by this game.
pub fn check_and_award_badges(stats: &mut PlayerStats, outcome: &GameOutcome) -> Vec<BadgeId> {
    if outcome.won && star_rating(outcome.hints_used, outcome.total_crossers) == 3 {
        stats.perfect_run += 1;
    } else {
        stats.perfect_run = 0;
    }

    let mut awarded = Vec::new();
    for rule in BADGE_RULES {
        if !stats.has_badge(rule.id) && (rule.check)(outcome, stats) {
            stats.badges.push(EarnedBadge {
                id: rule.id,
                earned_at: chrono::Utc::now().to_rfc3339(),
            });
            info!(badge = rule.name, "badge earned");
            awarded.push(rule.id);
        }
    }
    awarded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(won: bool, main_guesses: u32, hints: u32, crossers: u32) -> GameOutcome {
        GameOutcome {
            won,
            guess_count: main_guesses + hints,
            main_guess_count: main_guesses,
            hints_used: hints,
            total_crossers: crossers,
        }
    }

    #[test]
    fn test_star_rating_tiers() {
        assert_eq!(star_rating(0, 4), 3); // no hints
        assert_eq!(star_rating(1, 4), 2); // ratio 0.25
        assert_eq!(star_rating(2, 4), 2); // ratio exactly 0.5
        assert_eq!(star_rating(3, 4), 1); // ratio 0.75
        assert_eq!(star_rating(4, 4), 0); // every hint used
    }

    #[test]
    fn test_star_rating_with_no_crossers() {
        // A crosser-less puzzle can only ever be solved hint-free.
        assert_eq!(star_rating(0, 0), 3);
    }

    #[test]
    fn test_first_win_awarded_on_any_win() {
        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 2, 4));
        assert!(awarded.contains(&BadgeId::FirstWin));
        assert!(stats.has_badge(BadgeId::FirstWin));
    }

    #[test]
    fn test_no_badges_for_a_loss() {
        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(false, 6, 1, 4));
        assert!(awarded.is_empty());
    }

    #[test]
    fn test_badge_never_awarded_twice() {
        let mut stats = PlayerStats::default();
        check_and_award_badges(&mut stats, &outcome(true, 3, 2, 4));
        let again = check_and_award_badges(&mut stats, &outcome(true, 3, 2, 4));
        assert!(!again.contains(&BadgeId::FirstWin));
        assert_eq!(
            stats.badges.iter().filter(|b| b.id == BadgeId::FirstWin).count(),
            1
        );
    }

    #[test]
    fn test_genius_requires_zero_hints() {
        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 4, 0, 4));
        assert!(awarded.contains(&BadgeId::Genius));

        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 4, 1, 4));
        assert!(!awarded.contains(&BadgeId::Genius));
    }

    #[test]
    fn test_quick_thinker_boundary() {
        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 2, 1, 4));
        assert!(awarded.contains(&BadgeId::QuickThinker));

        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 1, 4));
        assert!(!awarded.contains(&BadgeId::QuickThinker));
    }

    #[test]
    fn test_hint_master_needs_every_hint() {
        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 1, 4, 4));
        assert!(awarded.contains(&BadgeId::HintMaster));

        let mut stats = PlayerStats::default();
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 1, 3, 4));
        assert!(!awarded.contains(&BadgeId::HintMaster));
    }

    #[test]
    fn test_streak_badges_read_updated_streak() {
        let mut stats = PlayerStats {
            current_streak: 3,
            ..Default::default()
        };
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 1, 4));
        assert!(awarded.contains(&BadgeId::Streak3));
        assert!(!awarded.contains(&BadgeId::Streak7));

        stats.current_streak = 30;
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 1, 4));
        assert!(awarded.contains(&BadgeId::Streak7));
        assert!(awarded.contains(&BadgeId::Streak30));
    }

    #[test]
    fn test_century_counts_lifetime_wins() {
        let mut stats = PlayerStats {
            games_won: 100,
            ..Default::default()
        };
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 1, 4));
        assert!(awarded.contains(&BadgeId::Century));
    }

    #[test]
    fn test_multiple_badges_from_one_game() {
        let mut stats = PlayerStats {
            current_streak: 3,
            ..Default::default()
        };
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 2, 0, 4));
        assert!(awarded.contains(&BadgeId::FirstWin));
        assert!(awarded.contains(&BadgeId::Genius));
        assert!(awarded.contains(&BadgeId::QuickThinker));
        assert!(awarded.contains(&BadgeId::Streak3));
    }

    #[test]
    fn test_perfectionist_after_five_flawless_wins() {
        let mut stats = PlayerStats::default();
        for i in 0..5 {
            let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 0, 4));
            if i < 4 {
                assert!(!awarded.contains(&BadgeId::Perfectionist));
            } else {
                assert!(awarded.contains(&BadgeId::Perfectionist));
            }
        }
        assert_eq!(stats.perfect_run, 5);
    }

    #[test]
    fn test_perfectionist_awarded_exactly_once() {
        let mut stats = PlayerStats::default();
        for _ in 0..10 {
            check_and_award_badges(&mut stats, &outcome(true, 3, 0, 4));
        }
        assert_eq!(
            stats
                .badges
                .iter()
                .filter(|b| b.id == BadgeId::Perfectionist)
                .count(),
            1
        );
    }

    #[test]
    fn test_lesser_win_resets_perfect_run() {
        let mut stats = PlayerStats::default();
        for _ in 0..4 {
            check_and_award_badges(&mut stats, &outcome(true, 3, 0, 4));
        }
        assert_eq!(stats.perfect_run, 4);

        // A two-star win breaks the run; the badge is delayed.
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 1, 4));
        assert!(!awarded.contains(&BadgeId::Perfectionist));
        assert_eq!(stats.perfect_run, 0);

        for _ in 0..4 {
            let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 0, 4));
            assert!(!awarded.contains(&BadgeId::Perfectionist));
        }
        let awarded = check_and_award_badges(&mut stats, &outcome(true, 3, 0, 4));
        assert!(awarded.contains(&BadgeId::Perfectionist));
    }

    #[test]
    fn test_loss_resets_perfect_run() {
        let mut stats = PlayerStats::default();
        for _ in 0..4 {
            check_and_award_badges(&mut stats, &outcome(true, 3, 0, 4));
        }
        check_and_award_badges(&mut stats, &outcome(false, 6, 0, 4));
        assert_eq!(stats.perfect_run, 0);
    }

    #[test]
    fn test_rule_lookup() {
        let rule = rule_for(BadgeId::Century);
        assert_eq!(rule.name, "Century Club");
        assert!(!rule.description.is_empty());
        assert!(!rule.icon.is_empty());
    }
}
