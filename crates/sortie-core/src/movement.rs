//! Non-attack movement.
//!
//! A unit that cannot attack this turn moves according to its range
//! behaviour. All base speeds scale with the unit's effective mobility:
//! `mobility * terrain_modifier`, where the terrain modifier comes from the
//! unit's grade for the session environment (further reduced under
//! GRAVITY_WELL).

use glam::Vec3;

use crate::config::BattleConfig;
use crate::entity::{Combatant, RangeBehavior};
use crate::geometry::{advance, direction, distance};
use crate::tables::{terrain_modifier, Environment, SpecialEffects};

/// Why a unit moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Closing toward the target.
    Close,
    /// RANGED unit backing off to its hold band.
    Retreat,
    /// FLEE unit running from the target.
    Flee,
    /// No target known; heading for the nearest opponent.
    Search,
}

/// Result of planning a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovePlan {
    /// Unit travels to `to`.
    Move {
        /// Reason for the move.
        kind: MoveKind,
        /// Destination.
        to: Vec3,
    },
    /// Unit stays put: a RANGED unit inside its band, or a move with no
    /// distance to cover.
    Hold,
    /// Actor and reference point coincide; there is no heading.
    NoRoom,
}

/// Terrain and session context shared by every move in a turn.
#[derive(Debug, Clone, Copy)]
pub struct Terrain<'a> {
    /// Session environment.
    pub environment: Environment,
    /// Active session effects.
    pub effects: SpecialEffects,
    /// Balance constants.
    pub config: &'a BattleConfig,
}

impl Terrain<'_> {
    /// `mobility * terrain_modifier` for a unit.
    #[must_use]
    pub fn effective_mobility(&self, unit: &Combatant) -> f32 {
        let grade = unit.terrain.grade(self.environment);
        unit.mobility * terrain_modifier(grade, self.effects, self.config.gravity_well_factor)
    }

    fn speed(&self, unit: &Combatant, base: f32) -> f32 {
        base * self.effective_mobility(unit)
    }
}

/// Plans a move relative to a known target.
///
/// `weapon_range` is the actor's active weapon range; RANGED units without a
/// weapon close in like BALANCED ones. Closing moves stop short of the target
/// by the approach buffer, tightened to stay inside a short weapon's reach.
///
/// The session only plans a move when the target is out of weapon range, so
/// in a battle RANGED units always close; the retreat and hold branches serve
/// callers planning from arbitrary positions.
#[must_use]
pub fn plan_tactical(actor: &Combatant, target: Vec3, weapon_range: Option<f32>, terrain: &Terrain<'_>) -> MovePlan {
    let cfg = terrain.config;
    let dist = distance(actor.position, target);
    match (actor.tactics.range_behavior, weapon_range) {
        (RangeBehavior::Flee, _) => match direction(target, actor.position) {
            Some(away) => step(
                actor,
                MoveKind::Flee,
                actor.position + away * terrain.speed(actor, cfg.flee_speed),
            ),
            None => MovePlan::NoRoom,
        },
        (RangeBehavior::Ranged, Some(range)) => {
            let hold = range * cfg.ranged_hold_fraction;
            let speed = terrain.speed(actor, cfg.ranged_speed);
            if dist < hold {
                match direction(target, actor.position) {
                    Some(away) => step(actor, MoveKind::Retreat, actor.position + away * speed),
                    None => MovePlan::NoRoom,
                }
            } else if dist > range {
                match direction(actor.position, target) {
                    Some(toward) => step(
                        actor,
                        MoveKind::Close,
                        advance(actor.position, toward, speed, dist - hold, 0.0),
                    ),
                    None => MovePlan::NoRoom,
                }
            } else {
                MovePlan::Hold
            }
        }
        (_, range) => {
            let buffer = range.map_or(cfg.approach_buffer, |r| {
                cfg.approach_buffer.min(r * cfg.ranged_hold_fraction)
            });
            close_in(actor, target, dist, buffer, MoveKind::Close, terrain)
        }
    }
}

/// Plans a search move toward an opponent the team has not yet discovered.
#[must_use]
pub fn plan_search(actor: &Combatant, toward: Vec3, terrain: &Terrain<'_>) -> MovePlan {
    let dist = distance(actor.position, toward);
    close_in(actor, toward, dist, terrain.config.approach_buffer, MoveKind::Search, terrain)
}

fn close_in(actor: &Combatant, target: Vec3, dist: f32, buffer: f32, kind: MoveKind, terrain: &Terrain<'_>) -> MovePlan {
    let Some(toward) = direction(actor.position, target) else {
        return MovePlan::NoRoom;
    };
    let speed = terrain.speed(actor, terrain.config.closing_speed);
    step(actor, kind, advance(actor.position, toward, speed, dist, buffer))
}

// A move that goes nowhere is a hold.
fn step(actor: &Combatant, kind: MoveKind, to: Vec3) -> MovePlan {
    if to == actor.position {
        MovePlan::Hold
    } else {
        MovePlan::Move { kind, to }
    }
}
