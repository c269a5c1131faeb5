//! Tunable battle constants.
//!
//! Every number the turn pipeline multiplies by lives here so balance passes
//! do not touch engine code. Missing fields in a JSON override fall back to
//! [`BattleConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Balance constants consumed by movement, detection, and combat.
///
/// # Example
///
/// ```
/// use sortie_core::config::BattleConfig;
///
/// let config = BattleConfig::from_json(r#"{ "crit_chance": 10.0 }"#).unwrap();
/// assert_eq!(config.crit_chance, 10.0);
/// assert_eq!(config.closing_speed, 150.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Base speed for MELEE/BALANCED closing and search movement.
    pub closing_speed: f32,
    /// Base speed for RANGED retreat and close-in.
    pub ranged_speed: f32,
    /// Base speed for FLEE.
    pub flee_speed: f32,
    /// Distance kept from the target when a closing move would overshoot.
    pub approach_buffer: f32,
    /// RANGED units retreat inside this fraction of their weapon range.
    pub ranged_hold_fraction: f32,
    /// Hit-chance penalty per point of target mobility.
    pub evasion_per_mobility: f32,
    /// Hit-chance penalty while OBSTACLE is active.
    pub obstacle_penalty: f32,
    /// Sensor range multiplier while MINOVSKY is active.
    pub minovsky_sensor_factor: f32,
    /// Mobility multiplier while GRAVITY_WELL is active.
    pub gravity_well_factor: f32,
    /// Base critical chance in percent.
    pub crit_chance: f32,
    /// Damage multiplier applied to raw power on a critical hit.
    pub crit_multiplier: f32,
    /// Half-width of the uniform damage variance band (0.1 = ±10%).
    pub damage_variance: f32,
    /// Percent chance a personality-tagged speaker gets a flavor line.
    pub chatter_chance: f32,
    /// Numerator of the THREAT nearness weighting.
    pub threat_scale: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            closing_speed: 150.0,
            ranged_speed: 100.0,
            flee_speed: 150.0,
            approach_buffer: 50.0,
            ranged_hold_fraction: 0.8,
            evasion_per_mobility: 10.0,
            obstacle_penalty: 10.0,
            minovsky_sensor_factor: 0.5,
            gravity_well_factor: 0.6,
            crit_chance: 5.0,
            crit_multiplier: 1.2,
            damage_variance: 0.1,
            chatter_chance: 30.0,
            threat_scale: 1000.0,
        }
    }
}

impl BattleConfig {
    /// Parses a (possibly partial) JSON override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`](crate::error::ConfigError::Json) when the
    /// document is not valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_is_default() {
        let config = BattleConfig::from_json("{}").unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let config = BattleConfig::from_json(r#"{"approach_buffer": 25.0}"#).unwrap();
        assert_eq!(config.approach_buffer, 25.0);
        assert_eq!(config.ranged_speed, 100.0);
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(BattleConfig::from_json(r#"{"crit_chance": "high"}"#).is_err());
    }
}
