//! Construction-time error taxonomy.
//!
//! Only configuration defects are errors. Running out of ammo, standing on top
//! of a target, or hitting the turn cap are ordinary battle outcomes and never
//! surface here.

use thiserror::Error;

use crate::entity::{UnitId, WeaponId};

/// Errors raised while validating combatants, weapons, skills, and catalog
/// templates before a battle session exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A unit or weapon was given an empty identifier.
    #[error("empty {kind} identifier")]
    EmptyId {
        /// What kind of identifier was empty ("unit", "weapon", "team").
        kind: &'static str,
    },

    /// Two units in the same session share an identifier.
    #[error("duplicate unit id: {0}")]
    DuplicateUnit(UnitId),

    /// A unit carries two weapons with the same identifier.
    #[error("unit {unit} carries duplicate weapon id {weapon}")]
    DuplicateWeapon {
        /// Owning unit.
        unit: UnitId,
        /// Repeated weapon id.
        weapon: WeaponId,
    },

    /// Max health must be strictly positive.
    #[error("unit {unit}: max health must be positive, got {max_health}")]
    NonPositiveMaxHealth {
        /// Offending unit.
        unit: UnitId,
        /// Supplied max health.
        max_health: i32,
    },

    /// Current health must lie in `0..=max_health`.
    #[error("unit {unit}: current health {current} outside 0..={max}")]
    HealthOutOfRange {
        /// Offending unit.
        unit: UnitId,
        /// Supplied current health.
        current: i32,
        /// Supplied max health.
        max: i32,
    },

    /// Position or velocity contains NaN or infinity.
    #[error("unit {0}: position is not finite")]
    NonFinitePosition(UnitId),

    /// A signed stat was NaN or infinite.
    #[error("unit {unit}: {stat} must be finite, got {value}")]
    NonFiniteStat {
        /// Offending unit.
        unit: UnitId,
        /// Stat name.
        stat: &'static str,
        /// Supplied value.
        value: f32,
    },

    /// A stat that must be non-negative was negative or not finite.
    #[error("unit {unit}: {stat} must be a finite non-negative value, got {value}")]
    NegativeStat {
        /// Offending unit.
        unit: UnitId,
        /// Stat name.
        stat: &'static str,
        /// Supplied value.
        value: f32,
    },

    /// Resistances are fractions in `[0, 1]`.
    #[error("unit {unit}: {kind} resistance {value} outside [0, 1]")]
    ResistanceOutOfRange {
        /// Offending unit.
        unit: UnitId,
        /// "beam" or "physical".
        kind: &'static str,
        /// Supplied value.
        value: f32,
    },

    /// Weapon range must be strictly positive.
    #[error("weapon {weapon}: range must be positive, got {range}")]
    NonPositiveRange {
        /// Offending weapon.
        weapon: WeaponId,
        /// Supplied range.
        range: f32,
    },

    /// Base accuracy is a percentage.
    #[error("weapon {weapon}: accuracy {accuracy} outside 0..=100")]
    AccuracyOutOfRange {
        /// Offending weapon.
        weapon: WeaponId,
        /// Supplied accuracy.
        accuracy: f32,
    },

    /// A weapon field that must be non-negative was negative or not finite.
    #[error("weapon {weapon}: {field} must be a finite non-negative value, got {value}")]
    InvalidWeaponField {
        /// Offending weapon.
        weapon: WeaponId,
        /// Field name.
        field: &'static str,
        /// Supplied value.
        value: f32,
    },

    /// The active weapon index does not point into the weapon list.
    #[error("unit {unit}: active weapon index {index} out of bounds for {count} weapons")]
    ActiveWeaponOutOfBounds {
        /// Offending unit.
        unit: UnitId,
        /// Supplied index.
        index: usize,
        /// Number of weapons carried.
        count: usize,
    },

    /// A session needs at least two teams to fight.
    #[error("battle has no opposing units")]
    NoOpponents,

    /// A skill was trained past its cap.
    #[error("skill {skill} level {level} exceeds max level {max}")]
    SkillLevelTooHigh {
        /// Skill identifier.
        skill: &'static str,
        /// Supplied level.
        level: u8,
        /// Maximum level.
        max: u8,
    },

    /// A catalog template used a tag outside the closed variant set.
    #[error("unknown {kind} tag: {tag}")]
    UnknownTag {
        /// Tag family ("environment", "special effect", ...).
        kind: &'static str,
        /// Supplied tag.
        tag: String,
    },

    /// Catalog or config JSON could not be parsed.
    #[error("malformed template: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
