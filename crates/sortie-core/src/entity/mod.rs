//! Combatant model.
//!
//! This module provides the entity types for a battle:
//! - [`UnitId`], [`TeamId`], [`WeaponId`]: string identifiers
//! - [`Side`]: legacy PLAYER/ENEMY grouping
//! - [`Combatant`]: the mutable combat record of one mobile suit
//! - [`Weapon`], [`Tactics`], and the component groups in [`components`]
//!
//! # Teams
//!
//! Targeting only ever compares teams. A combatant without an explicit team
//! fights for a team named after its own id, so a lobby of unteamed units is
//! a free-for-all.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use sortie_core::entity::{Combatant, Side, Weapon};
//!
//! let gm = Combatant::new("gm-1", "GM", 800)
//!     .at_position(Vec3::new(0.0, 0.0, 0.0))
//!     .with_side(Side::Player)
//!     .with_weapon(Weapon::new("bs", "Beam Spray Gun", 120, 400.0, 75.0));
//!
//! assert_eq!(gm.team().as_str(), "gm-1");
//! assert!(gm.is_alive());
//! assert!(gm.validate().is_ok());
//! ```

pub mod components;
mod tactics;
mod weapon;

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use components::{AceProfile, EnergyProfile, PilotProfile, Resistances};
pub use tactics::{Personality, RangeBehavior, Tactics, TargetPriority};
pub use weapon::{DamageType, Weapon};

use crate::error::{ConfigError, Result};
use crate::tables::TerrainAdaptability;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a string.
            #[must_use]
            pub fn new(id: &str) -> Self {
                Self(id.to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a combatant, unique within a session.
    UnitId
);

string_id!(
    /// Identifier of a team. Units sharing a team never target each other.
    TeamId
);

string_id!(
    /// Identifier of a weapon, unique within its owner.
    WeaponId
);

impl From<&UnitId> for TeamId {
    fn from(id: &UnitId) -> Self {
        Self(id.0.clone())
    }
}

/// Legacy grouping. Only decides who receives pilot skill modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// The player's unit.
    Player,
    /// Everyone else.
    #[default]
    Enemy,
}

// =============================================================================
// Combatant
// =============================================================================

fn default_mobility() -> f32 {
    1.0
}

fn default_sensor_range() -> f32 {
    500.0
}

/// One mobile suit in a battle.
///
/// Health, position, and velocity change during the battle; everything else
/// is fixed at session construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Unique identifier.
    pub id: UnitId,
    /// Display name.
    pub name: String,
    /// Health capacity.
    #[serde(rename = "max_hp")]
    pub max_health: i32,
    /// Remaining health; 0 means destroyed.
    #[serde(rename = "current_hp")]
    pub current_health: i32,
    /// Flat mitigation against non-critical hits.
    #[serde(default)]
    pub armor: i32,
    /// Movement and evasion factor.
    #[serde(default = "default_mobility")]
    pub mobility: f32,
    /// Detection radius.
    #[serde(default = "default_sensor_range")]
    pub sensor_range: f32,
    /// Legacy side tag.
    #[serde(default)]
    pub side: Side,
    /// Explicit team; `None` means the unit fights alone.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// Damage-channel resistances.
    #[serde(flatten)]
    pub resistances: Resistances,
    /// Mobility grades per environment.
    #[serde(rename = "terrain_adaptability", default)]
    pub terrain: TerrainAdaptability,
    /// Energy and propellant capacity.
    #[serde(flatten)]
    pub energy: EnergyProfile,
    /// Carried weapons.
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    /// Index of the weapon used to attack.
    #[serde(rename = "active_weapon_index", default)]
    pub active_weapon: usize,
    /// Target priority and movement behaviour.
    #[serde(default)]
    pub tactics: Tactics,
    /// NPC temperament; `Some` enables battle chatter.
    #[serde(default)]
    pub personality: Option<Personality>,
    /// Ace metadata for bounty NPCs.
    #[serde(default)]
    pub ace: Option<AceProfile>,
    /// Aptitudes and flat bonuses.
    #[serde(flatten)]
    pub pilot: PilotProfile,
    /// Current position.
    #[serde(default)]
    pub position: Vec3,
    /// Displacement of the last move.
    #[serde(default)]
    pub velocity: Vec3,
}

impl Combatant {
    /// Creates a combatant at full health with default stats and no weapons.
    #[must_use]
    pub fn new(id: &str, name: &str, max_health: i32) -> Self {
        Self {
            id: UnitId::new(id),
            name: name.to_string(),
            max_health,
            current_health: max_health,
            armor: 0,
            mobility: default_mobility(),
            sensor_range: default_sensor_range(),
            side: Side::default(),
            team_id: None,
            resistances: Resistances::default(),
            terrain: TerrainAdaptability::default(),
            energy: EnergyProfile::default(),
            weapons: Vec::new(),
            active_weapon: 0,
            tactics: Tactics::default(),
            personality: None,
            ace: None,
            pilot: PilotProfile::default(),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }

    /// Places the combatant.
    #[must_use]
    pub fn at_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the side tag.
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Joins a team.
    #[must_use]
    pub fn with_team(mut self, team: &str) -> Self {
        self.team_id = Some(TeamId::new(team));
        self
    }

    /// Adds a weapon.
    #[must_use]
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    /// Sets tactics.
    #[must_use]
    pub fn with_tactics(mut self, tactics: Tactics) -> Self {
        self.tactics = tactics;
        self
    }

    /// Sets armor and mobility.
    #[must_use]
    pub fn with_frame(mut self, armor: i32, mobility: f32) -> Self {
        self.armor = armor;
        self.mobility = mobility;
        self
    }

    /// Sets sensor range.
    #[must_use]
    pub fn with_sensor_range(mut self, sensor_range: f32) -> Self {
        self.sensor_range = sensor_range;
        self
    }

    /// Sets resistances.
    #[must_use]
    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    /// Sets terrain grades.
    #[must_use]
    pub fn with_terrain(mut self, terrain: TerrainAdaptability) -> Self {
        self.terrain = terrain;
        self
    }

    /// Sets energy capacity.
    #[must_use]
    pub fn with_energy(mut self, energy: EnergyProfile) -> Self {
        self.energy = energy;
        self
    }

    /// Sets the NPC personality.
    #[must_use]
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    /// Marks the combatant as an ace.
    #[must_use]
    pub fn with_ace(mut self, ace: AceProfile) -> Self {
        self.ace = Some(ace);
        self
    }

    /// Sets pilot aptitudes and bonuses.
    #[must_use]
    pub fn with_pilot(mut self, pilot: PilotProfile) -> Self {
        self.pilot = pilot;
        self
    }

    /// Effective team: the explicit team, or the unit's own id.
    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team_id.clone().unwrap_or_else(|| TeamId::from(&self.id))
    }

    /// Whether two combatants fight on the same team.
    #[must_use]
    pub fn is_ally_of(&self, other: &Self) -> bool {
        self.team() == other.team()
    }

    /// Whether the combatant still has health.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Weapon at the active index, if any.
    #[must_use]
    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active_weapon)
    }

    /// Mean power across carried weapons; 0 when unarmed.
    #[must_use]
    pub fn mean_weapon_power(&self) -> f32 {
        if self.weapons.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let total: f32 = self.weapons.iter().map(|w| w.power as f32).sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.weapons.len() as f32;
        total / count
    }

    /// Subtracts damage, clamping health at 0. Returns `true` if this hit
    /// destroyed the combatant.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.current_health = self.current_health.saturating_sub(amount.max(0)).max(0);
        was_alive && !self.is_alive()
    }

    /// Checks every stat a battle relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in the combatant or any of its
    /// weapons.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(ConfigError::EmptyId { kind: "unit" });
        }
        if matches!(&self.team_id, Some(team) if team.as_str().is_empty()) {
            return Err(ConfigError::EmptyId { kind: "team" });
        }
        if self.max_health <= 0 {
            return Err(ConfigError::NonPositiveMaxHealth {
                unit: self.id.clone(),
                max_health: self.max_health,
            });
        }
        if !(0..=self.max_health).contains(&self.current_health) {
            return Err(ConfigError::HealthOutOfRange {
                unit: self.id.clone(),
                current: self.current_health,
                max: self.max_health,
            });
        }
        if !(self.position.is_finite() && self.velocity.is_finite()) {
            return Err(ConfigError::NonFinitePosition(self.id.clone()));
        }
        #[allow(clippy::cast_precision_loss)]
        let stats = [
            ("armor", self.armor as f32),
            ("mobility", self.mobility),
            ("sensor_range", self.sensor_range),
            ("max_en", self.energy.max_en as f32),
            ("en_recovery", self.energy.en_recovery as f32),
            ("max_propellant", self.energy.max_propellant as f32),
            ("melee_aptitude", self.pilot.melee_aptitude),
            ("shooting_aptitude", self.pilot.shooting_aptitude),
            ("acceleration_bonus", self.pilot.acceleration_bonus),
            ("turning_bonus", self.pilot.turning_bonus),
        ];
        for (stat, value) in stats {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeStat {
                    unit: self.id.clone(),
                    stat,
                    value,
                });
            }
        }
        // Flat bonuses may be negative.
        for (stat, value) in [
            ("accuracy_bonus", self.pilot.accuracy_bonus),
            ("evasion_bonus", self.pilot.evasion_bonus),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteStat {
                    unit: self.id.clone(),
                    stat,
                    value,
                });
            }
        }
        for (kind, value) in [("beam", self.resistances.beam), ("physical", self.resistances.physical)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ResistanceOutOfRange {
                    unit: self.id.clone(),
                    kind,
                    value,
                });
            }
        }
        if !self.weapons.is_empty() && self.active_weapon >= self.weapons.len() {
            return Err(ConfigError::ActiveWeaponOutOfBounds {
                unit: self.id.clone(),
                index: self.active_weapon,
                count: self.weapons.len(),
            });
        }
        for (i, weapon) in self.weapons.iter().enumerate() {
            weapon.validate()?;
            if self.weapons[..i].iter().any(|w| w.id == weapon.id) {
                return Err(ConfigError::DuplicateWeapon {
                    unit: self.id.clone(),
                    weapon: weapon.id.clone(),
                });
            }
        }
        Ok(())
    }
}
