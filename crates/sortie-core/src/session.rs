//! Battle session and turn scheduler.
//!
//! A [`BattleSession`] owns every combatant, their runtime resources, the
//! team detection map, the seeded generator, and the battle log for the
//! lifetime of one battle.
//!
//! # Turn phases
//!
//! Each [`BattleSession::process_turn`] runs:
//!
//! 1. **REFRESH**: turn counter increments; every living unit recovers energy
//!    and ticks its cooldowns.
//! 2. **INITIATIVE**: one tiebreaker is drawn per living unit (session order),
//!    then units are sorted by mobility, then tiebreaker, both descending.
//! 3. **DETECTION**: one sweep over all units in session order.
//! 4. **ACTIONS**: each unit in initiative order selects a target and either
//!    attacks or moves. The turn stops early once the battle is decided.
//!
//! # Determinism
//!
//! All randomness comes from one `ChaCha8Rng` seeded at construction, drawn
//! in a fixed order. Same seed and inputs produce an identical log.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use sortie_core::entity::{Combatant, Side, Weapon};
//! use sortie_core::session::BattleSession;
//! use sortie_core::tables::{Environment, SkillLevels, SpecialEffects};
//!
//! let player = Combatant::new("rx", "Gundam", 1500)
//!     .with_side(Side::Player)
//!     .with_weapon(Weapon::new("br", "Beam Rifle", 300, 600.0, 85.0));
//! let zaku = Combatant::new("zaku", "Zaku II", 800)
//!     .at_position(Vec3::new(400.0, 0.0, 0.0))
//!     .with_weapon(Weapon::new("mg", "Zaku Machine Gun", 120, 400.0, 70.0));
//!
//! let mut session = BattleSession::new(
//!     player,
//!     vec![zaku],
//!     SkillLevels::new(),
//!     Environment::Space,
//!     SpecialEffects::empty(),
//!     7,
//! )
//! .unwrap();
//!
//! while !session.is_finished() && session.turn() < 50 {
//!     session.process_turn();
//! }
//! assert!(!session.log().is_empty());
//! ```

use std::collections::BTreeSet;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Span};

use crate::chatter::{self, ChatterCategory};
use crate::combat::{resolve_attack, Engagement};
use crate::config::BattleConfig;
use crate::detection::DetectionMap;
use crate::entity::{Combatant, Side, TeamId, UnitId, Weapon};
use crate::error::{ConfigError, Result};
use crate::geometry::distance;
use crate::log::{ActionKind, BattleLog, LogEntry};
use crate::movement::{plan_search, plan_tactical, MoveKind, MovePlan, Terrain};
use crate::resources::UnitResources;
use crate::tables::{Environment, SkillLevels, SkillModifiers, SpecialEffects};
use crate::targeting::{nearest_opponent, select_target};

// =============================================================================
// Setup
// =============================================================================

/// Everything needed to start a battle, in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSetup {
    /// The player's unit.
    pub player: Combatant,
    /// Every other participant.
    pub enemies: Vec<Combatant>,
    /// Player pilot skills.
    #[serde(default)]
    pub skills: SkillLevels,
    /// Mission environment.
    #[serde(default)]
    pub environment: Environment,
    /// Mission special effects.
    #[serde(default)]
    pub effects: SpecialEffects,
    /// Seed for the session generator.
    #[serde(default)]
    pub seed: u64,
    /// Balance constants.
    #[serde(default)]
    pub config: BattleConfig,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Constructed, no turn processed yet.
    #[default]
    Idle,
    /// At least one turn processed, battle undecided.
    Running,
    /// At most one team has survivors.
    Finished,
}

// =============================================================================
// Session
// =============================================================================

/// One battle in progress.
#[derive(Debug, Clone)]
pub struct BattleSession {
    units: Vec<Combatant>,
    resources: Vec<UnitResources>,
    skills: SkillModifiers,
    environment: Environment,
    effects: SpecialEffects,
    config: BattleConfig,
    detection: DetectionMap,
    log: BattleLog,
    rng: ChaCha8Rng,
    seed: u64,
    turn: u32,
    phase: BattlePhase,
    span: Span,
}

impl BattleSession {
    /// Creates a session with default balance constants.
    ///
    /// The player is unit 0; enemies follow in the given order. That order is
    /// the session order used by detection and initiative draws.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any combatant or weapon is invalid, ids
    /// collide, a skill level is over the cap, or every unit shares one team.
    pub fn new(
        player: Combatant,
        enemies: Vec<Combatant>,
        skills: SkillLevels,
        environment: Environment,
        effects: SpecialEffects,
        seed: u64,
    ) -> Result<Self> {
        Self::from_setup(BattleSetup {
            player,
            enemies,
            skills,
            environment,
            effects,
            seed,
            config: BattleConfig::default(),
        })
    }

    /// Creates a session from a full setup.
    ///
    /// # Errors
    ///
    /// See [`BattleSession::new`].
    pub fn from_setup(setup: BattleSetup) -> Result<Self> {
        let BattleSetup {
            player,
            enemies,
            skills,
            environment,
            effects,
            seed,
            config,
        } = setup;

        skills.validate()?;
        let mut units = Vec::with_capacity(enemies.len() + 1);
        units.push(player);
        units.extend(enemies);
        validate_roster(&units)?;

        let resources = units.iter().map(UnitResources::for_combatant).collect();
        let span = info_span!("battle", units = units.len(), environment = %environment, seed);
        let mut session = Self {
            units,
            resources,
            skills: skills.modifiers(),
            environment,
            effects,
            config,
            detection: DetectionMap::new(),
            log: BattleLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            turn: 0,
            phase: BattlePhase::Idle,
            span,
        };
        if session.surviving_teams().len() <= 1 {
            session.phase = BattlePhase::Finished;
        }
        Ok(session)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// All units, player first.
    #[must_use]
    pub fn units(&self) -> &[Combatant] {
        &self.units
    }

    /// The player's unit.
    #[must_use]
    pub fn player(&self) -> &Combatant {
        &self.units[0]
    }

    /// Every unit except the player.
    #[must_use]
    pub fn enemies(&self) -> &[Combatant] {
        &self.units[1..]
    }

    /// Looks up a unit by id.
    #[must_use]
    pub fn unit(&self, id: &UnitId) -> Option<&Combatant> {
        self.units.iter().find(|u| &u.id == id)
    }

    /// Runtime resources of a unit.
    #[must_use]
    pub fn resources(&self, id: &UnitId) -> Option<&UnitResources> {
        let index = self.units.iter().position(|u| &u.id == id)?;
        self.resources.get(index)
    }

    /// Team detection state.
    #[must_use]
    pub const fn detection(&self) -> &DetectionMap {
        &self.detection
    }

    /// Battle log so far.
    #[must_use]
    pub const fn log(&self) -> &BattleLog {
        &self.log
    }

    /// Consumes the session, returning its log.
    #[must_use]
    pub fn into_log(self) -> BattleLog {
        self.log
    }

    /// Turns processed so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Whether the battle is decided.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    /// Seed the generator was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Mission environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Active special effects.
    #[must_use]
    pub const fn effects(&self) -> SpecialEffects {
        self.effects
    }

    /// Balance constants in use.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Teams that still have at least one living unit.
    #[must_use]
    pub fn surviving_teams(&self) -> BTreeSet<TeamId> {
        self.units.iter().filter(|u| u.is_alive()).map(Combatant::team).collect()
    }

    /// The winning team, once finished. `None` while running or on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_finished() {
            return None;
        }
        let mut teams = self.surviving_teams().into_iter();
        match (teams.next(), teams.next()) {
            (Some(team), None) => Some(team),
            _ => None,
        }
    }

    /// Skill modifiers that apply to a unit: the pilot's for the player side,
    /// neutral otherwise.
    #[must_use]
    pub fn skills_for(&self, unit: &Combatant) -> SkillModifiers {
        match unit.side {
            Side::Player => self.skills,
            Side::Enemy => SkillModifiers::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Turn processing
    // -------------------------------------------------------------------------

    /// Runs one turn. Does nothing once the battle is finished.
    pub fn process_turn(&mut self) {
        if self.is_finished() {
            return;
        }
        let span = self.span.clone();
        let _entered = span.enter();

        // PHASE 1: REFRESH
        self.phase = BattlePhase::Running;
        self.turn += 1;
        for (unit, resources) in self.units.iter().zip(self.resources.iter_mut()) {
            if unit.is_alive() {
                resources.refresh();
            }
        }

        // PHASE 2: INITIATIVE
        let order = self.initiative();
        debug!(
            turn = self.turn,
            order = ?order.iter().map(|&i| self.units[i].id.as_str()).collect::<Vec<_>>(),
            "turn start"
        );

        // PHASE 3: DETECTION
        self.detect();

        // PHASE 4: ACTIONS
        for index in order {
            if self.is_finished() {
                break;
            }
            if self.units[index].is_alive() {
                self.act(index);
            }
        }

        if self.is_finished() {
            info!(turn = self.turn, winner = ?self.winner(), "battle finished");
        }
    }

    fn initiative(&mut self) -> Vec<usize> {
        let mut order: Vec<(usize, f32, f32)> = Vec::with_capacity(self.units.len());
        for (index, unit) in self.units.iter().enumerate() {
            if unit.is_alive() {
                let tiebreak: f32 = self.rng.gen();
                order.push((index, unit.mobility, tiebreak));
            }
        }
        order.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.2.total_cmp(&a.2)));
        order.into_iter().map(|(index, _, _)| index).collect()
    }

    fn detect(&mut self) {
        let sightings = self
            .detection
            .sweep(&self.units, self.effects, self.config.minovsky_sensor_factor);
        let interference = if self.effects.contains(SpecialEffects::MINOVSKY) {
            " under Minovsky interference"
        } else {
            ""
        };
        for sighting in sightings {
            let (Some(observer), Some(target)) = (self.unit(&sighting.observer), self.unit(&sighting.target)) else {
                continue;
            };
            let entry = LogEntry::new(
                self.turn,
                &observer.id,
                ActionKind::Detection,
                format!(
                    "{} detected {} at {:.1} (team {}){interference}",
                    observer.name, target.name, sighting.distance, sighting.team
                ),
                observer.position,
            )
            .with_target(&target.id);
            self.log.push(entry);
        }
    }

    fn act(&mut self, actor: usize) {
        let Some(selection) = select_target(&self.units, actor, &self.detection, &self.config, &mut self.rng) else {
            self.search(actor);
            return;
        };
        let target = selection.index;
        let entry = LogEntry::new(
            self.turn,
            &self.units[actor].id,
            ActionKind::TargetSelection,
            format!(
                "{} targets {} [{}: {}]",
                self.units[actor].name,
                self.units[target].name,
                selection.priority.as_str(),
                selection.reason
            ),
            self.units[actor].position,
        )
        .with_target(&self.units[target].id);
        self.log.push(entry);

        let dist = distance(self.units[actor].position, self.units[target].position);
        let weapon = self.units[actor].active_weapon().cloned();
        match weapon {
            Some(weapon) if dist <= weapon.range => match self.resources[actor].check(&weapon) {
                Ok(()) => self.attack(actor, target, &weapon, dist),
                Err(blocked) => {
                    self.units[actor].velocity = Vec3::ZERO;
                    let entry = LogEntry::new(
                        self.turn,
                        &self.units[actor].id,
                        ActionKind::Wait,
                        format!("{} cannot fire {}: {blocked}", self.units[actor].name, weapon.name),
                        self.units[actor].position,
                    )
                    .with_target(&self.units[target].id);
                    self.log.push(entry);
                }
            },
            weapon => {
                let terrain = self.terrain();
                let plan = plan_tactical(
                    &self.units[actor],
                    self.units[target].position,
                    weapon.map(|w| w.range),
                    &terrain,
                );
                self.apply_move(actor, target, plan);
            }
        }
    }

    fn search(&mut self, actor: usize) {
        let Some(nearest) = nearest_opponent(&self.units, actor) else {
            self.units[actor].velocity = Vec3::ZERO;
            let entry = LogEntry::new(
                self.turn,
                &self.units[actor].id,
                ActionKind::Wait,
                format!("{} finds no opponents", self.units[actor].name),
                self.units[actor].position,
            );
            self.log.push(entry);
            return;
        };
        let terrain = self.terrain();
        let plan = plan_search(&self.units[actor], self.units[nearest].position, &terrain);
        self.apply_move(actor, nearest, plan);
    }

    fn terrain(&self) -> Terrain<'_> {
        Terrain {
            environment: self.environment,
            effects: self.effects,
            config: &self.config,
        }
    }

    fn apply_move(&mut self, actor: usize, target: usize, plan: MovePlan) {
        let target_id = self.units[target].id.clone();
        let target_name = self.units[target].name.clone();
        let unit = &mut self.units[actor];
        let (kind, message) = match plan {
            MovePlan::Move { kind, to } => {
                unit.velocity = to - unit.position;
                unit.position = to;
                let verb = match kind {
                    MoveKind::Close => "closes on",
                    MoveKind::Retreat => "falls back from",
                    MoveKind::Flee => "flees from",
                    MoveKind::Search => "searches toward",
                };
                (ActionKind::Move, format!("{} {verb} {target_name}", unit.name))
            }
            MovePlan::Hold => {
                unit.velocity = Vec3::ZERO;
                (ActionKind::Wait, format!("{} holds position against {target_name}", unit.name))
            }
            MovePlan::NoRoom => {
                unit.velocity = Vec3::ZERO;
                (ActionKind::Wait, format!("{} has no room to manoeuvre", unit.name))
            }
        };
        let entry = LogEntry::new(self.turn, &unit.id, kind, message, unit.position).with_target(&target_id);
        self.log.push(entry);
    }

    fn attack(&mut self, actor: usize, target: usize, weapon: &Weapon, dist: f32) {
        self.resources[actor].consume(weapon);
        self.units[actor].velocity = Vec3::ZERO;

        let attacker_skills = self.skills_for(&self.units[actor]);
        let target_skills = self.skills_for(&self.units[target]);
        let env = Engagement {
            distance: dist,
            effects: self.effects,
            attacker_skills: &attacker_skills,
            target_skills: &target_skills,
            config: &self.config,
        };
        let report = resolve_attack(&mut self.rng, &self.units[actor], weapon, &self.units[target], &env);

        let chance = self.config.chatter_chance;
        let attacker_id = self.units[actor].id.clone();
        let target_id = self.units[target].id.clone();

        let flavor = chatter::roll(&mut self.rng, self.units[actor].personality, ChatterCategory::Attack, chance);
        let entry = LogEntry::new(
            self.turn,
            &attacker_id,
            ActionKind::Attack,
            format!(
                "{} fires {} at {} (hit {:.0}%)",
                self.units[actor].name, weapon.name, self.units[target].name, report.hit_chance
            ),
            self.units[actor].position,
        )
        .with_target(&target_id)
        .with_flavor(flavor);
        self.log.push(entry);

        let Some(damage) = report.damage else {
            let flavor = chatter::roll(&mut self.rng, self.units[actor].personality, ChatterCategory::Miss, chance);
            let entry = LogEntry::new(
                self.turn,
                &attacker_id,
                ActionKind::Miss,
                format!("{}'s {} misses {}", self.units[actor].name, weapon.name, self.units[target].name),
                self.units[actor].position,
            )
            .with_target(&target_id)
            .with_flavor(flavor);
            self.log.push(entry);
            return;
        };

        let destroyed = self.units[target].apply_damage(damage.amount);
        let flavor = chatter::roll(&mut self.rng, self.units[target].personality, ChatterCategory::Hit, chance);
        let entry = LogEntry::new(
            self.turn,
            &target_id,
            ActionKind::Damage,
            format!(
                "{} takes {} damage from {}{} (HP {}/{})",
                self.units[target].name,
                damage.amount,
                weapon.name,
                if damage.critical { ", critical hit" } else { "" },
                self.units[target].current_health,
                self.units[target].max_health
            ),
            self.units[target].position,
        )
        .with_target(&attacker_id)
        .with_damage(damage.amount)
        .with_flavor(flavor);
        self.log.push(entry);

        if destroyed {
            self.destroyed(target, actor);
        }
    }

    fn destroyed(&mut self, victim: usize, killer: usize) {
        let chance = self.config.chatter_chance;
        let flavor = chatter::roll(&mut self.rng, self.units[victim].personality, ChatterCategory::Destroyed, chance);
        let unit = &self.units[victim];
        let marker = unit
            .ace
            .as_ref()
            .map(|ace| format!(" [ACE DOWN: {}]", ace.pilot_name))
            .unwrap_or_default();
        let entry = LogEntry::new(
            self.turn,
            &unit.id,
            ActionKind::Destroyed,
            format!("{} destroyed by {}{marker}", unit.name, self.units[killer].name),
            unit.position,
        )
        .with_target(&self.units[killer].id)
        .with_flavor(flavor);
        debug!(turn = self.turn, unit = %unit.id, killer = %self.units[killer].id, "destroyed");
        self.log.push(entry);

        if self.surviving_teams().len() <= 1 {
            self.phase = BattlePhase::Finished;
        }
    }
}

fn validate_roster(units: &[Combatant]) -> Result<()> {
    let mut ids = BTreeSet::new();
    for unit in units {
        unit.validate()?;
        if !ids.insert(&unit.id) {
            return Err(ConfigError::DuplicateUnit(unit.id.clone()));
        }
    }
    let teams: BTreeSet<TeamId> = units.iter().map(Combatant::team).collect();
    if teams.len() < 2 {
        return Err(ConfigError::NoOpponents);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{RangeBehavior, Tactics, TargetPriority};
    use crate::tables::Skill;

    fn duel(seed: u64) -> BattleSession {
        let player = Combatant::new("p", "Player", 1000)
            .with_side(Side::Player)
            .with_weapon(Weapon::new("br", "Beam Rifle", 300, 600.0, 90.0));
        let enemy = Combatant::new("e", "Enemy", 600)
            .at_position(Vec3::new(300.0, 0.0, 0.0))
            .with_weapon(Weapon::new("mg", "Machine Gun", 100, 400.0, 70.0));
        BattleSession::new(player, vec![enemy], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), seed)
            .unwrap()
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn starts_idle_with_full_resources() {
            let session = duel(1);
            assert_eq!(session.phase(), BattlePhase::Idle);
            assert_eq!(session.turn(), 0);
            assert!(session.log().is_empty());
            assert_eq!(session.player().id, UnitId::new("p"));
            assert_eq!(session.enemies().len(), 1);
            assert_eq!(session.resources(&UnitId::new("p")).unwrap().energy, 1000);
        }

        #[test]
        fn rejects_duplicate_ids() {
            let a = Combatant::new("x", "A", 100);
            let b = Combatant::new("x", "B", 100).with_team("red");
            let err = BattleSession::new(a, vec![b], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), 0)
                .unwrap_err();
            assert!(matches!(err, ConfigError::DuplicateUnit(_)));
        }

        #[test]
        fn rejects_single_team() {
            let a = Combatant::new("a", "A", 100).with_team("blue");
            let b = Combatant::new("b", "B", 100).with_team("blue");
            let err = BattleSession::new(a, vec![b], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), 0)
                .unwrap_err();
            assert!(matches!(err, ConfigError::NoOpponents));
        }

        #[test]
        fn rejects_overtrained_skill() {
            let skills = SkillLevels::new().with(Skill::DamageUp, 11);
            let err = BattleSession::new(
                Combatant::new("a", "A", 100),
                vec![Combatant::new("b", "B", 100)],
                skills,
                Environment::Space,
                SpecialEffects::empty(),
                0,
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::SkillLevelTooHigh { .. }));
        }

        #[test]
        fn already_decided_roster_starts_finished() {
            let mut dead = Combatant::new("b", "B", 100);
            dead.current_health = 0;
            let session = BattleSession::new(
                Combatant::new("a", "A", 100),
                vec![dead],
                SkillLevels::new(),
                Environment::Space,
                SpecialEffects::empty(),
                0,
            )
            .unwrap();
            assert!(session.is_finished());
            assert_eq!(session.winner(), Some(TeamId::new("a")));
        }
    }

    mod turn_tests {
        use super::*;

        #[test]
        fn first_turn_moves_to_running() {
            let mut session = duel(3);
            session.process_turn();
            assert_eq!(session.turn(), 1);
            assert_ne!(session.phase(), BattlePhase::Idle);
            assert!(session.log().entries().iter().all(|e| e.turn == 1));
        }

        #[test]
        fn first_turn_detects_both_ways() {
            let mut session = duel(3);
            session.process_turn();
            assert_eq!(session.log().of_kind(ActionKind::Detection).count(), 2);
            assert_eq!(session.log().entries()[0].actor_id, UnitId::new("p"));
        }

        #[test]
        fn damage_entry_names_the_damaged_unit() {
            let attacker = Combatant::new("a", "A", 1000)
                .with_side(Side::Player)
                .with_weapon(Weapon::new("gun", "Gun", 300, 600.0, 100.0));
            let target = Combatant::new("t", "T", 5000)
                .at_position(Vec3::new(300.0, 0.0, 0.0))
                .with_frame(0, 0.0);
            let mut session =
                BattleSession::new(attacker, vec![target], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), 7)
                    .unwrap();
            session.process_turn();

            let hit = session.log().of_kind(ActionKind::Damage).next().expect("guaranteed hit");
            assert_eq!(hit.actor_id, UnitId::new("t"));
            assert_eq!(hit.target_id, Some(UnitId::new("a")));
            assert_eq!(hit.position_snapshot, Vec3::new(300.0, 0.0, 0.0));

            // Replaying `health -= damage` on the actor reproduces engine state.
            let target = session.unit(&UnitId::new("t")).unwrap();
            assert_eq!(target.current_health, 5000 - hit.damage.unwrap());
            assert_eq!(session.unit(&UnitId::new("a")).unwrap().current_health, 1000);
        }

        #[test]
        fn detection_notes_minovsky_interference() {
            let build = |effects| {
                let mut session = BattleSession::new(
                    Combatant::new("a", "A", 100).with_sensor_range(600.0),
                    vec![Combatant::new("b", "B", 100).at_position(Vec3::new(200.0, 0.0, 0.0))],
                    SkillLevels::new(),
                    Environment::Space,
                    effects,
                    0,
                )
                .unwrap();
                session.process_turn();
                session
                    .log()
                    .of_kind(ActionKind::Detection)
                    .map(|e| e.message.clone())
                    .collect::<Vec<_>>()
            };

            let jammed = build(SpecialEffects::MINOVSKY);
            assert!(!jammed.is_empty());
            assert!(jammed.iter().all(|m| m.contains("Minovsky interference")), "{jammed:?}");

            let clear = build(SpecialEffects::empty());
            assert!(!clear.is_empty());
            assert!(clear.iter().all(|m| !m.contains("Minovsky")), "{clear:?}");
        }

        #[test]
        fn short_reach_melee_gets_into_range() {
            let brawler = Combatant::new("a", "A", 1000)
                .with_side(Side::Player)
                .with_tactics(Tactics::new(TargetPriority::Closest, RangeBehavior::Melee))
                .with_weapon(Weapon::new("saber", "Saber", 200, 30.0, 100.0).melee());
            let parked = Combatant::new("t", "T", 5000)
                .at_position(Vec3::new(100.0, 0.0, 0.0))
                .with_frame(0, 0.0);
            let mut session =
                BattleSession::new(brawler, vec![parked], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), 1)
                    .unwrap();
            session.process_turn();
            session.process_turn();

            let gap = distance(session.player().position, session.enemies()[0].position);
            assert!(gap <= 30.0, "{gap}");
            assert_eq!(session.log().of_kind(ActionKind::Attack).count(), 1);
            // A unit that cannot move waits instead of logging empty moves.
            assert!(session.log().of_kind(ActionKind::Move).all(|e| e.actor_id.as_str() == "a"));
            assert!(session
                .log()
                .of_kind(ActionKind::Wait)
                .any(|e| e.actor_id.as_str() == "t" && e.message.contains("holds position")));
        }

        #[test]
        fn ranged_unit_fires_from_inside_its_band() {
            let sniper = Combatant::new("a", "A", 1000)
                .with_side(Side::Player)
                .with_tactics(Tactics::new(TargetPriority::Closest, RangeBehavior::Ranged))
                .with_weapon(Weapon::new("rifle", "Rifle", 100, 600.0, 90.0));
            let close = Combatant::new("t", "T", 5000).at_position(Vec3::new(100.0, 0.0, 0.0));
            let mut session =
                BattleSession::new(sniper, vec![close], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), 2)
                    .unwrap();
            session.process_turn();

            let mine: Vec<_> = session.log().entries().iter().filter(|e| e.actor_id.as_str() == "a").collect();
            assert!(mine.iter().any(|e| e.kind == ActionKind::Attack));
            assert!(mine.iter().all(|e| e.kind != ActionKind::Move && e.kind != ActionKind::Wait));
        }

        #[test]
        fn finished_session_is_frozen() {
            let mut session = duel(5);
            while !session.is_finished() && session.turn() < 100 {
                session.process_turn();
            }
            assert!(session.is_finished());
            let turn = session.turn();
            let len = session.log().len();
            let units = session.units().to_vec();
            session.process_turn();
            assert_eq!(session.turn(), turn);
            assert_eq!(session.log().len(), len);
            assert_eq!(session.units(), units.as_slice());
        }

        #[test]
        fn pilot_skills_skip_enemy_attacks() {
            let gun = || Weapon::new("gun", "Gun", 300, 600.0, 100.0);
            let setup = BattleSetup {
                player: Combatant::new("p", "P", 5000)
                    .with_side(Side::Player)
                    .with_frame(0, 0.0)
                    .with_weapon(gun()),
                enemies: vec![Combatant::new("e", "E", 5000)
                    .at_position(Vec3::new(300.0, 0.0, 0.0))
                    .with_frame(0, 0.0)
                    .with_weapon(gun())],
                skills: SkillLevels::new().with(Skill::DamageUp, 10).with(Skill::EvasionUp, 5),
                environment: Environment::Space,
                effects: SpecialEffects::empty(),
                seed: 13,
                config: BattleConfig {
                    crit_chance: 0.0,
                    damage_variance: 0.0,
                    ..BattleConfig::default()
                },
            };
            let mut session = BattleSession::from_setup(setup).unwrap();
            session.process_turn();

            let attacks: Vec<_> = session.log().of_kind(ActionKind::Attack).collect();
            let by = |id: &str| attacks.iter().find(|e| e.actor_id.as_str() == id).unwrap();
            assert!(by("p").message.ends_with("(hit 100%)"), "{}", by("p").message);
            assert!(by("e").message.ends_with("(hit 90%)"), "{}", by("e").message);

            for hit in session.log().of_kind(ActionKind::Damage) {
                match hit.actor_id.as_str() {
                    "e" => assert_eq!(hit.damage, Some(390)),
                    "p" => assert_eq!(hit.damage, Some(300)),
                    other => panic!("unexpected damage to {other}"),
                }
            }
            assert!(session.log().of_kind(ActionKind::Damage).any(|e| e.actor_id.as_str() == "e"));
        }

        #[test]
        fn skills_only_reach_player_side() {
            let skills = SkillLevels::new().with(Skill::AccuracyUp, 10);
            let session = BattleSession::new(
                Combatant::new("a", "A", 100).with_side(Side::Player),
                vec![Combatant::new("b", "B", 100)],
                skills,
                Environment::Space,
                SpecialEffects::empty(),
                0,
            )
            .unwrap();
            assert_eq!(session.skills_for(session.player()).accuracy_bonus, 20.0);
            assert_eq!(session.skills_for(&session.enemies()[0]).accuracy_bonus, 0.0);
        }
    }
}
