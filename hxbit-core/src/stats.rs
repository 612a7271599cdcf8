use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every value a freshly created stat starts at.
pub const BASE_STAT_VALUE: i32 = 1;

/// The closed set of upgradable character attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Strength,
    Intelligence,
    Creativity,
    Charisma,
    Discipline,
    Leadership,
    Endurance,
    Focus,
    Wisdom,
    Resilience,
    Communication,
    Teamwork,
}

impl Stat {
    pub const ALL: [Stat; 12] = [
        Stat::Strength,
        Stat::Intelligence,
        Stat::Creativity,
        Stat::Charisma,
        Stat::Discipline,
        Stat::Leadership,
        Stat::Endurance,
        Stat::Focus,
        Stat::Wisdom,
        Stat::Resilience,
        Stat::Communication,
        Stat::Teamwork,
    ];

    /// Column name in the `stats` table. Only these literals are ever spliced into SQL.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Intelligence => "intelligence",
            Self::Creativity => "creativity",
            Self::Charisma => "charisma",
            Self::Discipline => "discipline",
            Self::Leadership => "leadership",
            Self::Endurance => "endurance",
            Self::Focus => "focus",
            Self::Wisdom => "wisdom",
            Self::Resilience => "resilience",
            Self::Communication => "communication",
            Self::Teamwork => "teamwork",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Intelligence => "Intelligence",
            Self::Creativity => "Creativity",
            Self::Charisma => "Charisma",
            Self::Discipline => "Discipline",
            Self::Leadership => "Leadership",
            Self::Endurance => "Endurance",
            Self::Focus => "Focus",
            Self::Wisdom => "Wisdom",
            Self::Resilience => "Resilience",
            Self::Communication => "Communication",
            Self::Teamwork => "Teamwork",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Stat {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Stat::ALL
            .into_iter()
            .find(|stat| stat.column() == wanted)
            .ok_or_else(|| ValidationError::UnknownStat(raw.trim().to_owned()))
    }
}

/// A user's attribute values plus their unspent point balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub stat_points: i32,
    values: [i32; 12],
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            stat_points: 0,
            values: [BASE_STAT_VALUE; 12],
        }
    }
}

impl StatBlock {
    pub fn new(stat_points: i32, values: [i32; 12]) -> Self {
        Self {
            stat_points,
            values,
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.values[stat.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::ALL.into_iter().map(|stat| (stat, self.get(stat)))
    }

    /// Spend one point on `stat`. Returns `false` and changes nothing when the balance is not positive.
    pub fn upgrade(&mut self, stat: Stat) -> bool {
        if self.stat_points <= 0 {
            return false;
        }

        self.stat_points -= 1;
        self.values[stat.index()] = self.values[stat.index()].saturating_add(1);
        true
    }

    pub fn total(&self) -> i64 {
        self.values.iter().map(|value| i64::from(*value)).sum()
    }
}
