//! Hit chance, critical rolls, and the damage pipeline.
//!
//! The formulas are pure functions of their inputs; randomness enters only in
//! [`resolve_attack`], which draws in a fixed order (hit roll, then on a hit
//! the critical roll and the variance roll) so a seeded session replays
//! exactly.
//!
//! # Hit chance
//!
//! ```text
//! hit = base_accuracy
//!     - |distance - optimal_range| * decay_rate
//!     - target.mobility * 10
//!     + attacker.accuracy_bonus - target.evasion_bonus
//!     + attacker skill accuracy - target skill evasion
//!     - 10 if OBSTACLE
//! clamped to [0, 100]
//! ```
//!
//! # Damage
//!
//! 1. critical: `power * 1.2`, ignoring armor; otherwise `max(1, power - armor)`
//! 2. times pilot aptitude (melee or shooting)
//! 3. times skill damage multiplier
//! 4. times `1 - resistance` for the weapon's damage type
//! 5. times `1 + variance`, variance uniform in `[-0.1, 0.1]`
//! 6. truncated to an integer, never below 0

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::BattleConfig;
use crate::entity::{Combatant, Weapon};
use crate::tables::{SkillModifiers, SpecialEffects};

// =============================================================================
// Hit Chance
// =============================================================================

/// Everything outside the two combatants that shifts hit chance.
#[derive(Debug, Clone, Copy)]
pub struct Engagement<'a> {
    /// Distance between attacker and target.
    pub distance: f32,
    /// Active session effects.
    pub effects: SpecialEffects,
    /// Skill modifiers applying to the attacker (neutral if not player side).
    pub attacker_skills: &'a SkillModifiers,
    /// Skill modifiers applying to the target (neutral if not player side).
    pub target_skills: &'a SkillModifiers,
    /// Balance constants.
    pub config: &'a BattleConfig,
}

/// Percent chance that `attacker` hits `target` with `weapon`.
#[must_use]
pub fn hit_chance(attacker: &Combatant, weapon: &Weapon, target: &Combatant, env: &Engagement<'_>) -> f32 {
    let falloff = (env.distance - weapon.optimal_range).abs() * weapon.decay_rate;
    let evasion = target.mobility * env.config.evasion_per_mobility;
    let obstacle = if env.effects.contains(SpecialEffects::OBSTACLE) {
        env.config.obstacle_penalty
    } else {
        0.0
    };
    let raw = weapon.accuracy - falloff - evasion + attacker.pilot.accuracy_bonus
        - target.pilot.evasion_bonus
        + env.attacker_skills.accuracy_bonus
        - env.target_skills.evasion_bonus
        - obstacle;
    raw.clamp(0.0, 100.0)
}

/// Hit test: a roll in `[0, 100]` hits at or below the chance.
#[must_use]
pub fn is_hit(roll: f32, chance: f32) -> bool {
    roll <= chance
}

// =============================================================================
// Damage
// =============================================================================

/// How a hit's damage was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    /// Whether the critical path was taken.
    pub critical: bool,
    /// Damage before aptitude, skills, resistance, and variance.
    pub base: f32,
    /// Resistance fraction that was applied.
    pub resistance: f32,
    /// Variance that was applied, in `[-damage_variance, damage_variance]`.
    pub variance: f32,
    /// Final integer damage.
    pub amount: i32,
}

/// Runs the damage pipeline with explicit rolls.
#[must_use]
pub fn compute_damage(
    attacker: &Combatant,
    weapon: &Weapon,
    target: &Combatant,
    attacker_skills: &SkillModifiers,
    critical: bool,
    variance: f32,
    config: &BattleConfig,
) -> DamageBreakdown {
    #[allow(clippy::cast_precision_loss)]
    let base = if critical {
        weapon.power as f32 * config.crit_multiplier
    } else {
        weapon.power.saturating_sub(target.armor).max(1) as f32
    };
    let resistance = target.resistances.against(weapon.damage_type);
    let scaled = base
        * attacker.pilot.aptitude_for(weapon.is_melee)
        * attacker_skills.damage_multiplier
        * (1.0 - resistance)
        * (1.0 + variance);
    #[allow(clippy::cast_possible_truncation)]
    let amount = (scaled.trunc() as i32).max(0);
    DamageBreakdown {
        critical,
        base,
        resistance,
        variance,
        amount,
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Result of one attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackReport {
    /// Computed hit chance.
    pub hit_chance: f32,
    /// Hit roll drawn.
    pub roll: f32,
    /// Damage on a hit; `None` on a miss.
    pub damage: Option<DamageBreakdown>,
}

impl AttackReport {
    /// Whether the attack connected.
    #[must_use]
    pub const fn hit(&self) -> bool {
        self.damage.is_some()
    }
}

/// Rolls one attack. Does not mutate either combatant.
pub fn resolve_attack<R: Rng + ?Sized>(
    rng: &mut R,
    attacker: &Combatant,
    weapon: &Weapon,
    target: &Combatant,
    env: &Engagement<'_>,
) -> AttackReport {
    let chance = hit_chance(attacker, weapon, target, env);
    let roll = rng.gen_range(0.0..=100.0_f32);
    trace!(attacker = %attacker.id, target = %target.id, chance, roll, "hit roll");
    if !is_hit(roll, chance) {
        return AttackReport {
            hit_chance: chance,
            roll,
            damage: None,
        };
    }

    let crit_chance = env.config.crit_chance + env.attacker_skills.crit_bonus;
    let critical = rng.gen_range(0.0..100.0_f32) < crit_chance;
    let spread = env.config.damage_variance.abs();
    let variance = if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    };
    let damage = compute_damage(
        attacker,
        weapon,
        target,
        env.attacker_skills,
        critical,
        variance,
        env.config,
    );
    trace!(
        critical,
        base = damage.base,
        resistance = damage.resistance,
        variance,
        amount = damage.amount,
        "damage"
    );
    AttackReport {
        hit_chance: chance,
        roll,
        damage: Some(damage),
    }
}
