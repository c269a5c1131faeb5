//! Tactics and personality tags.

use serde::{Deserialize, Serialize};

/// How a combatant picks among detected enemies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetPriority {
    /// Nearest enemy.
    #[default]
    Closest,
    /// Lowest current health.
    Weakest,
    /// Highest max health plus mean weapon power.
    Strongest,
    /// Highest danger relative to own health, weighted by nearness.
    Threat,
    /// Uniform random pick.
    Random,
}

impl TargetPriority {
    /// Upper-case tag used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closest => "CLOSEST",
            Self::Weakest => "WEAKEST",
            Self::Strongest => "STRONGEST",
            Self::Threat => "THREAT",
            Self::Random => "RANDOM",
        }
    }
}

/// How a combatant moves when it cannot attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeBehavior {
    /// Close in hard.
    Melee,
    /// Hold inside weapon range, back off when too close.
    Ranged,
    /// Close in like melee.
    #[default]
    Balanced,
    /// Run from the target.
    Flee,
}

/// Targeting priority plus movement behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tactics {
    /// Target selection rule.
    #[serde(default)]
    pub priority: TargetPriority,
    /// Movement rule.
    #[serde(rename = "range", default)]
    pub range_behavior: RangeBehavior,
}

impl Tactics {
    /// Creates a tactics pair.
    #[must_use]
    pub const fn new(priority: TargetPriority, range_behavior: RangeBehavior) -> Self {
        Self {
            priority,
            range_behavior,
        }
    }
}

/// NPC temperament; selects the chatter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Personality {
    /// Hot-headed brawler.
    Aggressive,
    /// Careful, risk-averse.
    Cautious,
    /// Long-range marksman.
    Sniper,
}

impl Personality {
    /// All personalities, in table order.
    pub const ALL: [Self; 3] = [Self::Aggressive, Self::Cautious, Self::Sniper];
}
