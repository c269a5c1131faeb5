//! Battle results.
//!
//! An outcome can be read straight off a session, or rebuilt from the
//! starting roster plus the battle log. The two must agree; the log-based path
//! is what a persistence layer uses to verify a stored replay.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Combatant, TeamId, UnitId};
use crate::log::{ActionKind, BattleLog};
use crate::session::BattleSession;

/// Bounty awarded for downing an ace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AceKill {
    /// Destroyed ace.
    pub ace: UnitId,
    /// Ace pilot name.
    pub pilot_name: String,
    /// Unit credited with the kill.
    pub killer: UnitId,
    /// Killer's team.
    pub killer_team: TeamId,
    /// Experience bounty.
    pub bounty_exp: u32,
    /// Credit bounty.
    pub bounty_credits: u32,
}

/// Bounty totals for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyTotal {
    /// Experience.
    pub exp: u32,
    /// Credits.
    pub credits: u32,
}

/// Summary of a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Sole surviving team, if the battle was decided with survivors.
    pub winner: Option<TeamId>,
    /// Turns elapsed.
    pub turns: u32,
    /// Whether at most one team survived.
    pub finished: bool,
    /// Health of every unit at the end.
    pub final_health: BTreeMap<UnitId, i32>,
    /// Kills credited per unit; units without kills are absent.
    pub kills: BTreeMap<UnitId, u32>,
    /// Destroyed units in order of destruction.
    pub destroyed: Vec<UnitId>,
    /// Aces downed, in order.
    pub aces_downed: Vec<AceKill>,
    /// Bounty totals per killer team.
    pub bounties: BTreeMap<TeamId, BountyTotal>,
}

impl BattleOutcome {
    /// Reads the outcome from a session's current state.
    #[must_use]
    pub fn from_session(session: &BattleSession) -> Self {
        let final_health = session
            .units()
            .iter()
            .map(|u| (u.id.clone(), u.current_health))
            .collect();
        let mut outcome = Self {
            winner: session.winner(),
            turns: session.turn(),
            finished: session.is_finished(),
            final_health,
            kills: BTreeMap::new(),
            destroyed: Vec::new(),
            aces_downed: Vec::new(),
            bounties: BTreeMap::new(),
        };
        outcome.tally_destructions(session.units(), session.log());
        outcome
    }

    /// Rebuilds the outcome by replaying DAMAGE and DESTROYED entries over
    /// the roster as it stood before the first turn. Both kinds name the
    /// damaged unit as actor.
    #[must_use]
    pub fn from_log(roster: &[Combatant], log: &BattleLog) -> Self {
        let mut health: BTreeMap<UnitId, i32> = roster.iter().map(|u| (u.id.clone(), u.current_health)).collect();
        for entry in log.of_kind(ActionKind::Damage) {
            if let Some(amount) = entry.damage {
                if let Some(hp) = health.get_mut(&entry.actor_id) {
                    *hp = hp.saturating_sub(amount.max(0)).max(0);
                }
            }
        }

        let mut teams: Vec<TeamId> = roster
            .iter()
            .filter(|u| health.get(&u.id).is_some_and(|&hp| hp > 0))
            .map(Combatant::team)
            .collect();
        teams.sort();
        teams.dedup();
        let finished = teams.len() <= 1;
        let winner = if finished && teams.len() == 1 {
            teams.pop()
        } else {
            None
        };

        let mut outcome = Self {
            winner,
            turns: log.entries().last().map_or(0, |e| e.turn),
            finished,
            final_health: health,
            kills: BTreeMap::new(),
            destroyed: Vec::new(),
            aces_downed: Vec::new(),
            bounties: BTreeMap::new(),
        };
        outcome.tally_destructions(roster, log);
        outcome
    }

    fn tally_destructions(&mut self, roster: &[Combatant], log: &BattleLog) {
        let find = |id: &UnitId| roster.iter().find(|u| &u.id == id);
        for entry in log.of_kind(ActionKind::Destroyed) {
            self.destroyed.push(entry.actor_id.clone());
            let Some(killer) = entry.target_id.as_ref().and_then(|id| find(id)) else {
                continue;
            };
            *self.kills.entry(killer.id.clone()).or_default() += 1;

            let Some(ace) = find(&entry.actor_id).and_then(|u| u.ace.as_ref()) else {
                continue;
            };
            let killer_team = killer.team();
            let total = self.bounties.entry(killer_team.clone()).or_default();
            total.exp = total.exp.saturating_add(ace.bounty_exp);
            total.credits = total.credits.saturating_add(ace.bounty_credits);
            self.aces_downed.push(AceKill {
                ace: entry.actor_id.clone(),
                pilot_name: ace.pilot_name.clone(),
                killer: killer.id.clone(),
                killer_team,
                bounty_exp: ace.bounty_exp,
                bounty_credits: ace.bounty_credits,
            });
        }
    }
}
