//! Cross-module battle tests.
//!
//! - `determinism.rs`: same seed and inputs give identical logs and state
//! - `scenarios.rs`: hand-built battles with known outcomes
//! - `properties.rs`: invariants over generated rosters
//! - `helpers.rs`: unit factories and setup builders

mod helpers;

pub use helpers::*;
