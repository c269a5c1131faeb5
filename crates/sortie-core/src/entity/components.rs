//! Component groups carried by a [`Combatant`](super::Combatant).
//!
//! Each struct groups fields that are validated and consumed together.

use serde::{Deserialize, Serialize};

use super::DamageType;

/// Fractional damage mitigation per damage channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    /// Fraction of beam damage absorbed, in `[0, 1]`.
    #[serde(rename = "beam_resistance", default)]
    pub beam: f32,
    /// Fraction of physical damage absorbed, in `[0, 1]`.
    #[serde(rename = "physical_resistance", default)]
    pub physical: f32,
}

impl Resistances {
    /// Creates resistances from beam and physical fractions.
    #[must_use]
    pub const fn new(beam: f32, physical: f32) -> Self {
        Self { beam, physical }
    }

    /// Resistance that applies to a damage channel.
    #[must_use]
    pub const fn against(&self, damage_type: DamageType) -> f32 {
        match damage_type {
            DamageType::Beam => self.beam,
            DamageType::Physical => self.physical,
        }
    }
}

fn default_max_en() -> i32 {
    1000
}

fn default_en_recovery() -> i32 {
    100
}

fn default_max_propellant() -> i32 {
    1000
}

/// Energy and propellant capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyProfile {
    /// Energy capacity.
    #[serde(default = "default_max_en")]
    pub max_en: i32,
    /// Energy regained at the start of every turn.
    #[serde(default = "default_en_recovery")]
    pub en_recovery: i32,
    /// Propellant capacity.
    #[serde(default = "default_max_propellant")]
    pub max_propellant: i32,
}

impl Default for EnergyProfile {
    fn default() -> Self {
        Self {
            max_en: default_max_en(),
            en_recovery: default_en_recovery(),
            max_propellant: default_max_propellant(),
        }
    }
}

fn one() -> f32 {
    1.0
}

/// Pilot aptitudes and flat bonuses.
///
/// Multipliers default to 1.0, flat bonuses to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PilotProfile {
    /// Damage multiplier for melee weapons.
    #[serde(default = "one")]
    pub melee_aptitude: f32,
    /// Damage multiplier for non-melee weapons.
    #[serde(default = "one")]
    pub shooting_aptitude: f32,
    /// Flat hit-chance bonus when attacking.
    #[serde(default)]
    pub accuracy_bonus: f32,
    /// Flat hit-chance penalty imposed on attackers.
    #[serde(default)]
    pub evasion_bonus: f32,
    /// Acceleration multiplier (reported, not used by the turn pipeline).
    #[serde(default = "one")]
    pub acceleration_bonus: f32,
    /// Turning multiplier (reported, not used by the turn pipeline).
    #[serde(default = "one")]
    pub turning_bonus: f32,
}

impl Default for PilotProfile {
    fn default() -> Self {
        Self {
            melee_aptitude: 1.0,
            shooting_aptitude: 1.0,
            accuracy_bonus: 0.0,
            evasion_bonus: 0.0,
            acceleration_bonus: 1.0,
            turning_bonus: 1.0,
        }
    }
}

impl PilotProfile {
    /// Aptitude multiplier that applies to a weapon.
    #[must_use]
    pub const fn aptitude_for(&self, is_melee: bool) -> f32 {
        if is_melee {
            self.melee_aptitude
        } else {
            self.shooting_aptitude
        }
    }
}

/// Named NPC carrying a bounty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AceProfile {
    /// Pilot display name.
    pub pilot_name: String,
    /// Experience awarded for the kill.
    #[serde(default)]
    pub bounty_exp: u32,
    /// Credits awarded for the kill.
    #[serde(default)]
    pub bounty_credits: u32,
}

impl AceProfile {
    /// Creates an ace profile.
    #[must_use]
    pub fn new(pilot_name: &str, bounty_exp: u32, bounty_credits: u32) -> Self {
        Self {
            pilot_name: pilot_name.to_string(),
            bounty_exp,
            bounty_credits,
        }
    }
}
