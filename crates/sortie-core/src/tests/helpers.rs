//! Factories for units and battle setups.

use glam::Vec3;

use crate::batch::run_to_completion;
use crate::config::BattleConfig;
use crate::entity::{Combatant, Side, Weapon};
use crate::log::{ActionKind, LogEntry};
use crate::session::{BattleSession, BattleSetup};
use crate::tables::{Environment, SkillLevels, SpecialEffects};

// =============================================================================
// Units
// =============================================================================

/// Beam rifle with no resource costs.
pub fn rifle() -> Weapon {
    Weapon::new("rifle", "Rifle", 300, 600.0, 85.0)
}

/// Unit with one weapon at `(x, 0, 0)`.
pub fn armed(id: &str, x: f32, weapon: Weapon) -> Combatant {
    Combatant::new(id, id, 1000)
        .at_position(Vec3::new(x, 0.0, 0.0))
        .with_weapon(weapon)
}

/// Unarmed target with no evasion, so every shot at it lands.
pub fn sitting_duck(id: &str, x: f32, max_health: i32) -> Combatant {
    Combatant::new(id, id, max_health)
        .at_position(Vec3::new(x, 0.0, 0.0))
        .with_frame(0, 0.0)
}

// =============================================================================
// Setups
// =============================================================================

/// Setup from a player and enemies with default everything else.
pub fn setup(player: Combatant, enemies: Vec<Combatant>, seed: u64) -> BattleSetup {
    BattleSetup {
        player: player.with_side(Side::Player),
        enemies,
        skills: SkillLevels::new(),
        environment: Environment::Space,
        effects: SpecialEffects::empty(),
        seed,
        config: BattleConfig::default(),
    }
}

/// Standard one-on-one: player rifle vs an armed grunt 300 units away.
pub fn duel_setup(seed: u64) -> BattleSetup {
    setup(
        armed("player", 0.0, rifle()),
        vec![armed("grunt", 300.0, Weapon::new("mg", "Machine Gun", 120, 400.0, 70.0))],
        seed,
    )
}

/// Free-for-all of `n` unteamed units around a circle of radius 250.
pub fn royale_setup(n: usize, seed: u64) -> BattleSetup {
    let mut units: Vec<Combatant> = (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = std::f32::consts::TAU * i as f32 / n as f32;
            Combatant::new(&format!("u{i}"), &format!("Unit {i}"), 1000)
                .at_position(Vec3::new(angle.cos() * 250.0, angle.sin() * 250.0, 0.0))
                .with_weapon(Weapon::new("cannon", "Cannon", 500, 600.0, 100.0))
        })
        .collect();
    let player = units.remove(0);
    setup(player, units, seed)
}

// =============================================================================
// Running
// =============================================================================

/// Builds a session, panicking on invalid setups.
pub fn session(setup: BattleSetup) -> BattleSession {
    BattleSession::from_setup(setup).expect("valid setup")
}

/// Builds and runs a session up to `cap` turns.
pub fn run(setup: BattleSetup, cap: u32) -> BattleSession {
    let mut s = session(setup);
    run_to_completion(&mut s, cap);
    s
}

/// Log entries of one kind emitted by `actor`.
pub fn entries_by<'a>(session: &'a BattleSession, actor: &str, kind: ActionKind) -> Vec<&'a LogEntry> {
    session
        .log()
        .of_kind(kind)
        .filter(|e| e.actor_id.as_str() == actor)
        .collect()
}
