//! Driving sessions to completion.
//!
//! The turn cap is caller policy, not engine state: a session that hits the
//! cap is simply left unfinished and reported as a draw.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::Result;
use crate::outcome::BattleOutcome;
use crate::session::{BattleSession, BattleSetup};

/// Runs turns until the battle is decided or `cap` turns have elapsed.
/// Returns the number of turns processed by this call.
pub fn run_to_completion(session: &mut BattleSession, cap: u32) -> u32 {
    let start = session.turn();
    while !session.is_finished() && session.turn() < cap {
        session.process_turn();
    }
    session.turn() - start
}

/// A resolved battle: the final session and its outcome.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Session after the last processed turn.
    pub session: BattleSession,
    /// Outcome read from the session.
    pub outcome: BattleOutcome,
}

/// Builds and resolves one setup.
///
/// # Errors
///
/// Returns the setup's validation error; no turn is run.
pub fn resolve(setup: BattleSetup, cap: u32) -> Result<Resolved> {
    let mut session = BattleSession::from_setup(setup)?;
    run_to_completion(&mut session, cap);
    let outcome = BattleOutcome::from_session(&session);
    debug!(turns = outcome.turns, winner = ?outcome.winner, "resolved");
    Ok(Resolved { session, outcome })
}

/// Resolves independent setups in parallel.
///
/// Results come back in input order. Each setup succeeds or fails on its
/// own; one invalid setup does not affect the rest.
#[must_use]
pub fn resolve_batch(setups: Vec<BattleSetup>, cap: u32) -> Vec<Result<Resolved>> {
    setups
        .into_par_iter()
        .map(|setup| {
            let seed = setup.seed;
            resolve(setup, cap).inspect_err(|err| warn!(seed, %err, "setup rejected"))
        })
        .collect()
}
