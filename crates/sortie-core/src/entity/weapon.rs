//! Weapon templates.
//!
//! A [`Weapon`] is immutable for the whole battle. Ammo and cooldown state
//! live in the [`resources`](crate::resources) ledger, keyed by weapon id.

use serde::{Deserialize, Serialize};

use super::WeaponId;
use crate::error::{ConfigError, Result};

/// Damage channel a weapon deals through, selecting which resistance applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageType {
    /// Beam weapons, mitigated by beam resistance.
    Beam,
    /// Solid projectiles and blades, mitigated by physical resistance.
    #[default]
    Physical,
}

fn default_optimal_range() -> f32 {
    300.0
}

fn default_decay_rate() -> f32 {
    0.05
}

/// Weapon template carried by a combatant.
///
/// # Example
///
/// ```
/// use sortie_core::entity::{DamageType, Weapon};
///
/// let rifle = Weapon::new("br", "Beam Rifle", 300, 600.0, 80.0)
///     .with_damage_type(DamageType::Beam)
///     .with_energy_cost(50);
/// assert!(rifle.validate().is_ok());
/// assert_eq!(rifle.ammo_limit(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Identifier, unique within the owning combatant.
    pub id: WeaponId,
    /// Display name.
    pub name: String,
    /// Base power before armor and modifiers.
    pub power: i32,
    /// Maximum engagement distance.
    pub range: f32,
    /// Base accuracy in percent.
    pub accuracy: f32,
    /// Damage channel.
    #[serde(rename = "type", default)]
    pub damage_type: DamageType,
    /// Distance at which accuracy is not decayed.
    #[serde(default = "default_optimal_range")]
    pub optimal_range: f32,
    /// Accuracy lost per unit of distance away from `optimal_range`.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f32,
    /// Magazine size; `None` or `Some(0)` means unlimited.
    #[serde(default)]
    pub max_ammo: Option<u32>,
    /// Energy drawn per shot.
    #[serde(default)]
    pub en_cost: i32,
    /// Turns the weapon stays unavailable after firing.
    #[serde(rename = "cool_down_turn", default)]
    pub cooldown_turns: u32,
    /// Melee weapons scale with melee aptitude instead of shooting aptitude.
    #[serde(default)]
    pub is_melee: bool,
}

impl Weapon {
    /// Creates a physical, unlimited, cooldown-free weapon.
    #[must_use]
    pub fn new(id: &str, name: &str, power: i32, range: f32, accuracy: f32) -> Self {
        Self {
            id: WeaponId::new(id),
            name: name.to_string(),
            power,
            range,
            accuracy,
            damage_type: DamageType::default(),
            optimal_range: default_optimal_range(),
            decay_rate: default_decay_rate(),
            max_ammo: None,
            en_cost: 0,
            cooldown_turns: 0,
            is_melee: false,
        }
    }

    /// Sets the damage channel.
    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    /// Sets optimal range and decay rate.
    #[must_use]
    pub fn with_falloff(mut self, optimal_range: f32, decay_rate: f32) -> Self {
        self.optimal_range = optimal_range;
        self.decay_rate = decay_rate;
        self
    }

    /// Sets a finite magazine.
    #[must_use]
    pub fn with_ammo(mut self, max_ammo: u32) -> Self {
        self.max_ammo = Some(max_ammo);
        self
    }

    /// Sets the per-shot energy cost.
    #[must_use]
    pub fn with_energy_cost(mut self, en_cost: i32) -> Self {
        self.en_cost = en_cost;
        self
    }

    /// Sets the post-fire cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown_turns = turns;
        self
    }

    /// Marks the weapon as melee.
    #[must_use]
    pub fn melee(mut self) -> Self {
        self.is_melee = true;
        self
    }

    /// Finite magazine size, if any.
    #[must_use]
    pub fn ammo_limit(&self) -> Option<u32> {
        self.max_ammo.filter(|&n| n > 0)
    }

    /// Checks ranges and percentages.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: empty id, non-positive range,
    /// accuracy outside `0..=100`, or a negative optimal range, decay rate,
    /// or energy cost.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().is_empty() {
            return Err(ConfigError::EmptyId { kind: "weapon" });
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(ConfigError::NonPositiveRange {
                weapon: self.id.clone(),
                range: self.range,
            });
        }
        if !(0.0..=100.0).contains(&self.accuracy) {
            return Err(ConfigError::AccuracyOutOfRange {
                weapon: self.id.clone(),
                accuracy: self.accuracy,
            });
        }
        #[allow(clippy::cast_precision_loss)]
        let checks = [
            ("optimal_range", self.optimal_range),
            ("decay_rate", self.decay_rate),
            ("en_cost", self.en_cost as f32),
            ("power", self.power as f32),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidWeaponField {
                    weapon: self.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}
