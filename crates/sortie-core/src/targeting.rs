//! Tactic-driven target selection.
//!
//! Candidates are living units on another team that the actor's team has
//! discovered, visited in session order. Every priority keeps the first
//! candidate on ties, so selection is stable for a given unit order.

use rand::Rng;

use crate::config::BattleConfig;
use crate::detection::DetectionMap;
use crate::entity::{Combatant, TargetPriority};
use crate::geometry::distance;

/// Outcome of a successful selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Index of the chosen unit in the session's unit list.
    pub index: usize,
    /// Priority that made the choice.
    pub priority: TargetPriority,
    /// Human-readable justification (distance, HP, or score).
    pub reason: String,
}

/// Indices of the units `actor` may attack.
#[must_use]
pub fn candidates(units: &[Combatant], actor: usize, detection: &DetectionMap) -> Vec<usize> {
    let Some(me) = units.get(actor) else {
        return Vec::new();
    };
    let team = me.team();
    units
        .iter()
        .enumerate()
        .filter(|(_, u)| u.is_alive() && u.team() != team && detection.is_discovered(&team, &u.id))
        .map(|(i, _)| i)
        .collect()
}

/// Picks a target for `units[actor]` according to its tactics.
///
/// Returns `None` when the actor's team has not discovered any living
/// opponent. Only the RANDOM priority draws from `rng`.
pub fn select_target<R: Rng + ?Sized>(
    units: &[Combatant],
    actor: usize,
    detection: &DetectionMap,
    config: &BattleConfig,
    rng: &mut R,
) -> Option<Selection> {
    let pool = candidates(units, actor, detection);
    if pool.is_empty() {
        return None;
    }
    let me = &units[actor];
    let priority = me.tactics.priority;
    let dist_to = |i: usize| distance(me.position, units[i].position);

    let (index, reason) = match priority {
        TargetPriority::Closest => {
            let index = first_min_by(&pool, dist_to)?;
            (index, format!("distance {:.1}", dist_to(index)))
        }
        TargetPriority::Weakest => {
            #[allow(clippy::cast_precision_loss)]
            let index = first_min_by(&pool, |i| units[i].current_health as f32)?;
            (index, format!("HP {}", units[index].current_health))
        }
        TargetPriority::Strongest => {
            let value = |i: usize| strategic_value(&units[i]);
            let index = first_min_by(&pool, |i| -value(i))?;
            (index, format!("value {:.1}", value(index)))
        }
        TargetPriority::Threat => {
            let score = |i: usize| threat_score(me, &units[i], config.threat_scale);
            let index = first_min_by(&pool, |i| -score(i))?;
            (index, format!("threat {:.2}", score(index)))
        }
        TargetPriority::Random => {
            let index = pool[rng.gen_range(0..pool.len())];
            (index, format!("random pick of {}", pool.len()))
        }
    };
    Some(Selection {
        index,
        priority,
        reason,
    })
}

/// Nearest living opponent regardless of detection, for search movement.
#[must_use]
pub fn nearest_opponent(units: &[Combatant], actor: usize) -> Option<usize> {
    let me = units.get(actor)?;
    let team = me.team();
    let pool: Vec<usize> = units
        .iter()
        .enumerate()
        .filter(|(_, u)| u.is_alive() && u.team() != team)
        .map(|(i, _)| i)
        .collect();
    first_min_by(&pool, |i| distance(me.position, units[i].position))
}

/// Max health plus mean weapon power.
#[must_use]
pub fn strategic_value(unit: &Combatant) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let health = unit.max_health as f32;
    health + unit.mean_weapon_power()
}

/// Danger `target` poses to `actor`: its firepower relative to the actor's
/// remaining health, weighted by nearness.
#[must_use]
pub fn threat_score(actor: &Combatant, target: &Combatant, scale: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let health = actor.current_health.max(1) as f32;
    let dist = distance(actor.position, target.position).max(1.0);
    (target.mean_weapon_power() / health) * (scale / dist)
}

/// First index in `pool` with the smallest key; later equal keys lose.
fn first_min_by(pool: &[usize], key: impl Fn(usize) -> f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for &i in pool {
        let k = key(i);
        match best {
            Some((_, b)) if k.total_cmp(&b).is_ge() => {}
            _ => best = Some((i, k)),
        }
    }
    best.map(|(i, _)| i)
}
