//! Team-shared fog of war.
//!
//! Every team owns a set of opposing unit ids it has discovered. A pair moves
//! from undiscovered to discovered at most once and never reverts, even if
//! the unit that made the sighting is later destroyed.
//!
//! Discovery gates targeting only. A unit inside someone's weapon range is not
//! a valid target until that unit's team has seen it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::{Combatant, TeamId, UnitId};
use crate::geometry::distance;
use crate::tables::SpecialEffects;

/// A new sighting made during a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Sighting {
    /// Unit whose sensors made the contact.
    pub observer: UnitId,
    /// Team credited with the discovery.
    pub team: TeamId,
    /// Unit that was discovered.
    pub target: UnitId,
    /// Distance at the moment of detection.
    pub distance: f32,
}

/// Discovered sets keyed by team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionMap {
    discovered: BTreeMap<TeamId, BTreeSet<UnitId>>,
}

impl DetectionMap {
    /// Creates an empty map; nobody has seen anyone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `team` has discovered `unit`.
    #[must_use]
    pub fn is_discovered(&self, team: &TeamId, unit: &UnitId) -> bool {
        self.discovered.get(team).is_some_and(|set| set.contains(unit))
    }

    /// Marks `unit` as discovered by `team`. Returns `true` if it was new.
    pub fn mark(&mut self, team: &TeamId, unit: &UnitId) -> bool {
        self.discovered.entry(team.clone()).or_default().insert(unit.clone())
    }

    /// Units discovered by `team`, in id order.
    pub fn discovered_by<'a>(&'a self, team: &TeamId) -> impl Iterator<Item = &'a UnitId> + 'a {
        self.discovered.get(team).into_iter().flat_map(BTreeSet::iter)
    }

    /// Total number of (team, unit) pairs discovered.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.discovered.values().map(BTreeSet::len).sum()
    }

    /// Runs one detection sweep over `units`.
    ///
    /// Observers and targets are visited in slice order. Each living observer
    /// checks every living opposing unit its team has not yet discovered; the
    /// first observer within range claims the sighting for the whole team.
    /// Sensor range is scaled by `minovsky_factor` while MINOVSKY is active.
    pub fn sweep(&mut self, units: &[Combatant], effects: SpecialEffects, minovsky_factor: f32) -> Vec<Sighting> {
        let scale = if effects.contains(SpecialEffects::MINOVSKY) {
            minovsky_factor
        } else {
            1.0
        };
        let mut sightings = Vec::new();
        for observer in units.iter().filter(|u| u.is_alive()) {
            let team = observer.team();
            let range = observer.sensor_range * scale;
            for target in units.iter().filter(|u| u.is_alive()) {
                if target.team() == team || self.is_discovered(&team, &target.id) {
                    continue;
                }
                let dist = distance(observer.position, target.position);
                if dist <= range {
                    self.mark(&team, &target.id);
                    sightings.push(Sighting {
                        observer: observer.id.clone(),
                        team: team.clone(),
                        target: target.id.clone(),
                        distance: dist,
                    });
                }
            }
        }
        sightings
    }
}
