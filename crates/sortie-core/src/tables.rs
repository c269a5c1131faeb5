//! Static modifier tables.
//!
//! Terrain grades, environments, session-wide special effects, and pilot
//! skills. All lookups here are pure; a session copies what it needs at
//! construction and never mutates it afterwards.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// =============================================================================
// Environment & Terrain
// =============================================================================

/// Battlefield environment of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    /// Open space.
    #[default]
    Space,
    /// Planetary surface.
    Ground,
    /// Inside a space colony.
    Colony,
    /// Submerged.
    Underwater,
}

impl Environment {
    /// Upper-case tag as it appears in mission data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Space => "SPACE",
            Self::Ground => "GROUND",
            Self::Colony => "COLONY",
            Self::Underwater => "UNDERWATER",
        }
    }

    /// Parses a mission tag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTag`] for anything outside the four
    /// environments.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "SPACE" => Ok(Self::Space),
            "GROUND" => Ok(Self::Ground),
            "COLONY" => Ok(Self::Colony),
            "UNDERWATER" => Ok(Self::Underwater),
            other => Err(ConfigError::UnknownTag {
                kind: "environment",
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade describing how well a unit handles an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainGrade {
    /// Specialist.
    S,
    /// Standard.
    A,
    /// Slightly hampered.
    B,
    /// Hampered.
    C,
    /// Barely operable.
    D,
}

impl TerrainGrade {
    /// Mobility multiplier for this grade.
    #[must_use]
    pub const fn modifier(self) -> f32 {
        match self {
            Self::S => 1.2,
            Self::A => 1.0,
            Self::B => 0.8,
            Self::C => 0.6,
            Self::D => 0.4,
        }
    }
}

/// Per-environment grades for one unit.
///
/// Omitted grades fall back to the standard frame profile: A everywhere except
/// UNDERWATER, which is C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct TerrainAdaptability {
    /// Grade in open space.
    pub space: TerrainGrade,
    /// Grade on the ground.
    pub ground: TerrainGrade,
    /// Grade inside colonies.
    pub colony: TerrainGrade,
    /// Grade underwater.
    pub underwater: TerrainGrade,
}

impl Default for TerrainAdaptability {
    fn default() -> Self {
        Self {
            space: TerrainGrade::A,
            ground: TerrainGrade::A,
            colony: TerrainGrade::A,
            underwater: TerrainGrade::C,
        }
    }
}

impl TerrainAdaptability {
    /// Same grade in every environment.
    #[must_use]
    pub const fn uniform(grade: TerrainGrade) -> Self {
        Self {
            space: grade,
            ground: grade,
            colony: grade,
            underwater: grade,
        }
    }

    /// Grade for the given environment.
    #[must_use]
    pub const fn grade(&self, environment: Environment) -> TerrainGrade {
        match environment {
            Environment::Space => self.space,
            Environment::Ground => self.ground,
            Environment::Colony => self.colony,
            Environment::Underwater => self.underwater,
        }
    }
}

// =============================================================================
// Special Effects
// =============================================================================

bitflags! {
    /// Session-wide modifiers active for the whole battle.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SpecialEffects: u8 {
        /// Minovsky particle scattering: sensor ranges halved.
        const MINOVSKY = 1 << 0;
        /// Gravity well: movement slowed.
        const GRAVITY_WELL = 1 << 1;
        /// Debris and cover: accuracy reduced.
        const OBSTACLE = 1 << 2;
    }
}

impl SpecialEffects {
    /// Parses a list of mission effect tags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTag`] on the first tag that names no
    /// known effect.
    pub fn parse_tags<'a, I>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tags.into_iter().try_fold(Self::empty(), |acc, tag| {
            Self::from_name(tag)
                .map(|flag| acc | flag)
                .ok_or_else(|| ConfigError::UnknownTag {
                    kind: "special effect",
                    tag: tag.to_string(),
                })
        })
    }
}

/// Combined mobility multiplier for a grade under the active effects.
#[must_use]
pub fn terrain_modifier(grade: TerrainGrade, effects: SpecialEffects, gravity_well_factor: f32) -> f32 {
    let base = grade.modifier();
    if effects.contains(SpecialEffects::GRAVITY_WELL) {
        base * gravity_well_factor
    } else {
        base
    }
}

// =============================================================================
// Pilot Skills
// =============================================================================

/// Trainable pilot skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// +2% hit chance per level.
    AccuracyUp,
    /// +2% evasion per level.
    EvasionUp,
    /// +3% damage per level.
    DamageUp,
    /// +1% critical chance per level.
    CritRateUp,
}

impl Skill {
    /// Highest trainable level for any skill.
    pub const MAX_LEVEL: u8 = 10;

    /// Stable identifier used by the progression service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccuracyUp => "accuracy_up",
            Self::EvasionUp => "evasion_up",
            Self::DamageUp => "damage_up",
            Self::CritRateUp => "crit_rate_up",
        }
    }

    /// Effect per level, in percent.
    #[must_use]
    pub const fn effect_per_level(self) -> f32 {
        match self {
            Self::AccuracyUp | Self::EvasionUp => 2.0,
            Self::DamageUp => 3.0,
            Self::CritRateUp => 1.0,
        }
    }
}

/// Skill levels of the player-side pilot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLevels(BTreeMap<Skill, u8>);

impl SkillLevels {
    /// No trained skills.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a skill level (builder style).
    #[must_use]
    pub fn with(mut self, skill: Skill, level: u8) -> Self {
        self.0.insert(skill, level);
        self
    }

    /// Level of a skill, 0 when untrained.
    #[must_use]
    pub fn level(&self, skill: Skill) -> u8 {
        self.0.get(&skill).copied().unwrap_or(0)
    }

    /// Checks every level against [`Skill::MAX_LEVEL`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SkillLevelTooHigh`] for the first skill over
    /// the cap.
    pub fn validate(&self) -> Result<()> {
        for (&skill, &level) in &self.0 {
            if level > Skill::MAX_LEVEL {
                return Err(ConfigError::SkillLevelTooHigh {
                    skill: skill.as_str(),
                    level,
                    max: Skill::MAX_LEVEL,
                });
            }
        }
        Ok(())
    }

    /// Resolves levels into combat modifiers.
    #[must_use]
    pub fn modifiers(&self) -> SkillModifiers {
        let effect = |skill: Skill| f32::from(self.level(skill)) * skill.effect_per_level();
        SkillModifiers {
            accuracy_bonus: effect(Skill::AccuracyUp),
            evasion_bonus: effect(Skill::EvasionUp),
            damage_multiplier: 1.0 + effect(Skill::DamageUp) / 100.0,
            crit_bonus: effect(Skill::CritRateUp),
        }
    }
}

/// Combat-ready view of the player's skills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillModifiers {
    /// Added to hit chance when the player side attacks.
    pub accuracy_bonus: f32,
    /// Subtracted from hit chance when the player side is attacked.
    pub evasion_bonus: f32,
    /// Damage multiplier for player-side attacks.
    pub damage_multiplier: f32,
    /// Added to critical chance for player-side attacks.
    pub crit_bonus: f32,
}

impl Default for SkillModifiers {
    fn default() -> Self {
        Self {
            accuracy_bonus: 0.0,
            evasion_bonus: 0.0,
            damage_multiplier: 1.0,
            crit_bonus: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod terrain_tests {
        use super::*;

        #[test]
        fn grade_modifiers() {
            assert_eq!(TerrainGrade::S.modifier(), 1.2);
            assert_eq!(TerrainGrade::A.modifier(), 1.0);
            assert_eq!(TerrainGrade::B.modifier(), 0.8);
            assert_eq!(TerrainGrade::C.modifier(), 0.6);
            assert_eq!(TerrainGrade::D.modifier(), 0.4);
        }

        #[test]
        fn default_adaptability_is_weak_underwater() {
            let adapt = TerrainAdaptability::default();
            assert_eq!(adapt.grade(Environment::Space), TerrainGrade::A);
            assert_eq!(adapt.grade(Environment::Underwater), TerrainGrade::C);
        }

        #[test]
        fn gravity_well_scales_modifier() {
            let m = terrain_modifier(TerrainGrade::S, SpecialEffects::GRAVITY_WELL, 0.6);
            assert!((m - 0.72).abs() < 1e-6);
            let m = terrain_modifier(TerrainGrade::S, SpecialEffects::OBSTACLE, 0.6);
            assert!((m - 1.2).abs() < 1e-6);
        }

        #[test]
        fn partial_adaptability_json_fills_defaults() {
            let adapt: TerrainAdaptability = serde_json::from_str(r#"{"GROUND": "D"}"#).unwrap();
            assert_eq!(adapt.ground, TerrainGrade::D);
            assert_eq!(adapt.space, TerrainGrade::A);
            assert_eq!(adapt.underwater, TerrainGrade::C);
        }
    }

    mod effect_tests {
        use super::*;

        #[test]
        fn parse_known_tags() {
            let fx = SpecialEffects::parse_tags(["MINOVSKY", "OBSTACLE"]).unwrap();
            assert!(fx.contains(SpecialEffects::MINOVSKY));
            assert!(fx.contains(SpecialEffects::OBSTACLE));
            assert!(!fx.contains(SpecialEffects::GRAVITY_WELL));
        }

        #[test]
        fn parse_unknown_tag_fails() {
            let err = SpecialEffects::parse_tags(["MINOVSKY", "SANDSTORM"]).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownTag { .. }));
        }

        #[test]
        fn environment_round_trips_tag() {
            for env in [
                Environment::Space,
                Environment::Ground,
                Environment::Colony,
                Environment::Underwater,
            ] {
                assert_eq!(Environment::parse(env.as_str()).unwrap(), env);
            }
            assert!(Environment::parse("LUNAR").is_err());
        }
    }

    mod skill_tests {
        use super::*;

        #[test]
        fn untrained_modifiers_are_neutral() {
            assert_eq!(SkillLevels::new().modifiers(), SkillModifiers::default());
        }

        #[test]
        fn levels_scale_effects() {
            let mods = SkillLevels::new()
                .with(Skill::AccuracyUp, 5)
                .with(Skill::DamageUp, 10)
                .with(Skill::CritRateUp, 3)
                .modifiers();
            assert_eq!(mods.accuracy_bonus, 10.0);
            assert!((mods.damage_multiplier - 1.3).abs() < 1e-6);
            assert_eq!(mods.crit_bonus, 3.0);
            assert_eq!(mods.evasion_bonus, 0.0);
        }

        #[test]
        fn over_cap_is_rejected() {
            let levels = SkillLevels::new().with(Skill::EvasionUp, 11);
            assert!(matches!(
                levels.validate(),
                Err(ConfigError::SkillLevelTooHigh { level: 11, .. })
            ));
        }

        #[test]
        fn skill_levels_deserialize_from_progression_map() {
            let levels: SkillLevels =
                serde_json::from_str(r#"{"accuracy_up": 2, "crit_rate_up": 1}"#).unwrap();
            assert_eq!(levels.level(Skill::AccuracyUp), 2);
            assert_eq!(levels.level(Skill::CritRateUp), 1);
            assert_eq!(levels.level(Skill::DamageUp), 0);
        }
    }
}
