use serde::{Deserialize, Serialize};

pub const ACTIVITY_XP_PER_LEVEL: i64 = 100;
pub const ACCOUNT_XP_PER_LEVEL: i64 = 500;

// ---------------------------------------------------------------------------
// Stat point tiers: task reward -> allocatable points
// ---------------------------------------------------------------------------

/// Reward thresholds and the points they grant, highest threshold first.
///
/// A reward of 100+ grants 2 points, 50..=99 grants 1, anything lower grants none.
pub const STAT_POINT_TIERS: &[(i32, i32)] = &[(100, 2), (50, 1)];

/// Points granted for completing a task worth `reward` XP.
pub fn stat_points_for_reward(reward: i32) -> i32 {
    STAT_POINT_TIERS
        .iter()
        .find(|(threshold, _)| reward >= *threshold)
        .map_or(0, |(_, points)| *points)
}

// ---------------------------------------------------------------------------
// Level curves
// ---------------------------------------------------------------------------

/// The two independent progression curves. Both are linear and unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// Per-activity progression, 100 XP per level.
    Activity,
    /// Account-wide progression, 500 XP per level.
    Account,
}

impl Curve {
    pub const fn xp_per_level(self) -> i64 {
        match self {
            Self::Activity => ACTIVITY_XP_PER_LEVEL,
            Self::Account => ACCOUNT_XP_PER_LEVEL,
        }
    }

    /// `floor(xp / xp_per_level) + 1`. Negative XP resolves to level 1.
    pub fn level_for(self, xp: i64) -> i32 {
        let level = xp.max(0) / self.xp_per_level() + 1;
        i32::try_from(level).unwrap_or(i32::MAX)
    }

    pub fn progress(self, xp: i64) -> LevelProgress {
        let span = self.xp_per_level();
        let xp = xp.max(0);
        let into_level = xp % span;
        let percent = u8::try_from(into_level * 100 / span).unwrap_or(100);

        LevelProgress {
            level: self.level_for(xp),
            into_level,
            span,
            to_next: span - into_level,
            percent,
        }
    }
}

pub fn activity_level(xp: i64) -> i32 {
    Curve::Activity.level_for(xp)
}

pub fn account_level(xp: i64) -> i32 {
    Curve::Account.level_for(xp)
}

/// Where an XP total sits inside its current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: i32,
    pub into_level: i64,
    pub span: i64,
    pub to_next: i64,
    pub percent: u8,
}

// ---------------------------------------------------------------------------
// Task completion
// ---------------------------------------------------------------------------

/// Events raised when a reward is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    ActivityLevelUp { from: i32, to: i32 },
    AccountLevelUp { from: i32, to: i32 },
    StatPointsAwarded { points: i32 },
}

/// Absolute XP and level values after applying one task reward.
///
/// Levels are always recomputed from XP; the previous levels are derived from
/// the previous XP rather than read from storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub reward: i32,
    pub activity_xp_before: i64,
    pub activity_xp: i64,
    pub activity_level: i32,
    pub account_xp_before: i64,
    pub account_xp: i64,
    pub account_level: i32,
    pub stat_points: i32,
}

impl Completion {
    pub fn compute(activity_xp: i64, account_xp: i64, reward: i32) -> Self {
        let reward_i64 = i64::from(reward);
        let new_activity_xp = activity_xp.saturating_add(reward_i64);
        let new_account_xp = account_xp.saturating_add(reward_i64);

        Self {
            reward,
            activity_xp_before: activity_xp,
            activity_xp: new_activity_xp,
            activity_level: activity_level(new_activity_xp),
            account_xp_before: account_xp,
            account_xp: new_account_xp,
            account_level: account_level(new_account_xp),
            stat_points: stat_points_for_reward(reward),
        }
    }

    pub fn activity_level_before(&self) -> i32 {
        activity_level(self.activity_xp_before)
    }

    pub fn account_level_before(&self) -> i32 {
        account_level(self.account_xp_before)
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();

        let activity_before = self.activity_level_before();
        if self.activity_level > activity_before {
            events.push(ProgressEvent::ActivityLevelUp {
                from: activity_before,
                to: self.activity_level,
            });
        }

        let account_before = self.account_level_before();
        if self.account_level > account_before {
            events.push(ProgressEvent::AccountLevelUp {
                from: account_before,
                to: self.account_level,
            });
        }

        if self.stat_points > 0 {
            events.push(ProgressEvent::StatPointsAwarded {
                points: self.stat_points,
            });
        }

        events
    }
}
