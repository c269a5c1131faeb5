//! Battle log.
//!
//! The log is the only observable trace of a battle. Entries are appended in
//! emission order and never edited. Given the same seed and inputs the log is
//! identical run to run, which is what makes replays work.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::UnitId;

/// What a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Actor moved.
    Move,
    /// Actor fired at a target.
    Attack,
    /// Actor took damage; target is the attacker.
    Damage,
    /// Attack missed.
    Miss,
    /// Actor spent the turn without acting.
    Wait,
    /// Actor was destroyed; target is the unit that destroyed it.
    Destroyed,
    /// Actor's team discovered the target.
    Detection,
    /// Actor picked a target.
    TargetSelection,
}

/// One entry of the battle log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Turn the entry was emitted in.
    pub turn: u32,
    /// Acting (or, for DESTROYED, destroyed) unit.
    pub actor_id: UnitId,
    /// Entry kind.
    #[serde(rename = "action_type")]
    pub kind: ActionKind,
    /// Other party, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<UnitId>,
    /// Damage dealt, for DAMAGE entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    /// Human-readable description.
    pub message: String,
    /// Actor position at emission time.
    pub position_snapshot: Vec3,
    /// Optional personality chatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

impl LogEntry {
    /// Creates an entry without target, damage, or flavor.
    #[must_use]
    pub fn new(turn: u32, actor_id: &UnitId, kind: ActionKind, message: String, position: Vec3) -> Self {
        Self {
            turn,
            actor_id: actor_id.clone(),
            kind,
            target_id: None,
            damage: None,
            message,
            position_snapshot: position,
            flavor: None,
        }
    }

    /// Sets the target.
    #[must_use]
    pub fn with_target(mut self, target: &UnitId) -> Self {
        self.target_id = Some(target.clone());
        self
    }

    /// Sets the damage amount.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    /// Attaches a chatter line, if one was rolled.
    #[must_use]
    pub fn with_flavor(mut self, flavor: Option<&str>) -> Self {
        self.flavor = flavor.map(str::to_string);
        self
    }
}

/// Append-only sequence of [`LogEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BattleLog {
    entries: Vec<LogEntry>,
}

impl BattleLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind.
    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Entries emitted during one turn.
    pub fn for_turn(&self, turn: u32) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.turn == turn)
    }

    /// Consumes the log, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
