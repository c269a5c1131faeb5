//! # Sortie Core
//!
//! Turn-based mobile suit battle resolution.
//!
//! This crate is a pure computation library: it takes combatant templates,
//! pilot skills, and mission parameters, and resolves a battle turn by turn
//! into an ordered, replayable log.
//!
//! ## Architecture
//!
//! - **Leaves**: [`geometry`], [`entity`], [`tables`], [`chatter`], [`config`]
//! - **Subsystems**: [`detection`], [`targeting`], [`resources`], [`combat`],
//!   [`movement`]
//! - **Scheduler**: [`session`] drives the subsystems once per turn and
//!   appends to the [`log`]
//! - **Boundary**: [`catalog`] normalizes JSON templates, [`outcome`] derives
//!   results, [`batch`] runs sessions to a turn cap
//!
//! ## Usage
//!
//! ```
//! use glam::Vec3;
//! use sortie_core::{run_to_completion, BattleOutcome, BattleSession, Combatant, Side, Weapon};
//! use sortie_core::tables::{Environment, SkillLevels, SpecialEffects};
//!
//! let player = Combatant::new("gm", "GM", 900)
//!     .with_side(Side::Player)
//!     .with_weapon(Weapon::new("bsg", "Beam Spray Gun", 200, 450.0, 80.0));
//! let enemy = Combatant::new("zaku", "Zaku II", 800)
//!     .at_position(Vec3::new(600.0, 0.0, 0.0))
//!     .with_weapon(Weapon::new("mg", "Zaku Machine Gun", 120, 400.0, 70.0));
//!
//! let mut session =
//!     BattleSession::new(player, vec![enemy], SkillLevels::new(), Environment::Space, SpecialEffects::empty(), 42)?;
//! run_to_completion(&mut session, 100);
//!
//! let outcome = BattleOutcome::from_session(&session);
//! assert_eq!(outcome.turns, session.turn());
//! # Ok::<(), sortie_core::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;
pub mod catalog;
pub mod chatter;
pub mod combat;
pub mod config;
pub mod detection;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod log;
pub mod movement;
pub mod outcome;
pub mod resources;
pub mod session;
pub mod tables;
pub mod targeting;

pub use batch::{resolve_batch, run_to_completion};
pub use config::BattleConfig;
pub use entity::{Combatant, Side, TeamId, UnitId, Weapon};
pub use error::{ConfigError, Result};
pub use log::{ActionKind, BattleLog, LogEntry};
pub use outcome::BattleOutcome;
pub use session::{BattleSession, BattleSetup};

#[cfg(test)]
mod tests;
