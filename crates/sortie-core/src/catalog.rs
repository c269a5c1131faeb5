//! JSON template loading.
//!
//! Catalog collaborators hand over loosely shaped JSON: a unit's weapons may
//! be a single object or a list, and `current_hp` is often omitted for fresh
//! units. Everything is normalized here into canonical [`Combatant`] and
//! [`Weapon`] values and validated, so the engine never branches on
//! representation. Unknown enum tags are rejected rather than defaulted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{Combatant, Weapon};
use crate::error::Result;
use crate::tables::{Environment, SpecialEffects};

/// Parses one weapon object or a list of them.
///
/// # Errors
///
/// Returns [`ConfigError::Json`](crate::error::ConfigError::Json) for
/// malformed input and any validation error of the weapons themselves.
pub fn weapons_from_value(value: Value) -> Result<Vec<Weapon>> {
    let weapons: Vec<Weapon> = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        Value::Null => Vec::new(),
        other => vec![serde_json::from_value(other)?],
    };
    for weapon in &weapons {
        weapon.validate()?;
    }
    Ok(weapons)
}

/// Normalizes and validates one combatant template.
///
/// # Errors
///
/// Returns a [`ConfigError`](crate::error::ConfigError) for malformed JSON,
/// unknown tags, or invalid stats.
pub fn combatant_from_value(mut value: Value) -> Result<Combatant> {
    if let Value::Object(map) = &mut value {
        if let Some(weapons) = map.get_mut("weapons") {
            let normalized = weapons_from_value(weapons.take())?;
            *weapons = serde_json::to_value(normalized)?;
        }
        if !map.contains_key("current_hp") {
            if let Some(max) = map.get("max_hp").cloned() {
                map.insert("current_hp".to_string(), max);
            }
        }
    }
    let combatant: Combatant = serde_json::from_value(value)?;
    combatant.validate()?;
    Ok(combatant)
}

/// Parses a single combatant template.
///
/// # Errors
///
/// See [`combatant_from_value`].
pub fn combatant_from_json(json: &str) -> Result<Combatant> {
    combatant_from_value(serde_json::from_str(json)?)
}

/// Parses a list of combatant templates.
///
/// # Errors
///
/// Fails on the first template that does not normalize.
pub fn roster_from_json(json: &str) -> Result<Vec<Combatant>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values.into_iter().map(combatant_from_value).collect()
}

/// Mission parameters consumed by a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Battlefield environment.
    pub environment: Environment,
    /// Special effects active for the whole battle.
    pub effects: SpecialEffects,
}

#[derive(Deserialize)]
struct MissionRecord {
    #[serde(default)]
    environment: Option<String>,
    #[serde(default)]
    special_effects: Vec<String>,
}

impl Mission {
    /// Parses a mission record with upper-case environment and effect tags.
    ///
    /// A missing environment means SPACE.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTag`](crate::error::ConfigError::UnknownTag)
    /// for unrecognized tags.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: MissionRecord = serde_json::from_str(json)?;
        let environment = match record.environment.as_deref() {
            Some(tag) => Environment::parse(tag)?,
            None => Environment::default(),
        };
        let effects = SpecialEffects::parse_tags(record.special_effects.iter().map(String::as_str))?;
        Ok(Self { environment, effects })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DamageType, Personality};
    use crate::error::ConfigError;
    use serde_json::json;

    mod weapon_tests {
        use super::*;

        #[test]
        fn single_object_becomes_list() {
            let weapons = weapons_from_value(json!({
                "id": "br", "name": "Beam Rifle", "power": 300, "range": 600.0, "accuracy": 80.0,
                "type": "BEAM"
            }))
            .unwrap();
            assert_eq!(weapons.len(), 1);
            assert_eq!(weapons[0].damage_type, DamageType::Beam);
            assert_eq!(weapons[0].optimal_range, 300.0);
        }

        #[test]
        fn list_is_kept_in_order() {
            let weapons = weapons_from_value(json!([
                {"id": "a", "name": "A", "power": 1, "range": 1.0, "accuracy": 1.0},
                {"id": "b", "name": "B", "power": 2, "range": 2.0, "accuracy": 2.0}
            ]))
            .unwrap();
            assert_eq!(weapons[1].id.as_str(), "b");
        }

        #[test]
        fn unknown_damage_type_is_rejected() {
            let err = weapons_from_value(json!({
                "id": "x", "name": "X", "power": 1, "range": 1.0, "accuracy": 1.0, "type": "PLASMA"
            }))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Json(_)));
        }

        #[test]
        fn zero_range_is_rejected() {
            let err = weapons_from_value(json!({
                "id": "x", "name": "X", "power": 1, "range": 0.0, "accuracy": 1.0
            }))
            .unwrap_err();
            assert!(matches!(err, ConfigError::NonPositiveRange { .. }));
        }
    }

    mod combatant_tests {
        use super::*;

        #[test]
        fn fills_current_hp_and_wraps_weapon() {
            let unit = combatant_from_json(
                r#"{
                    "id": "zaku", "name": "Zaku II", "max_hp": 800,
                    "weapons": {"id": "mg", "name": "Zaku Machine Gun", "power": 120, "range": 400.0, "accuracy": 70.0},
                    "personality": "CAUTIOUS"
                }"#,
            )
            .unwrap();
            assert_eq!(unit.current_health, 800);
            assert_eq!(unit.weapons.len(), 1);
            assert_eq!(unit.personality, Some(Personality::Cautious));
        }

        #[test]
        fn unknown_personality_is_an_error() {
            let err = combatant_from_json(r#"{"id": "x", "name": "X", "max_hp": 100, "personality": "COWARD"}"#)
                .unwrap_err();
            assert!(matches!(err, ConfigError::Json(_)));
        }

        #[test]
        fn invalid_stats_fail_validation() {
            let err = combatant_from_json(r#"{"id": "x", "name": "X", "max_hp": 0}"#).unwrap_err();
            assert!(matches!(err, ConfigError::NonPositiveMaxHealth { .. }));
        }

        #[test]
        fn roster_parses_every_entry() {
            let roster = roster_from_json(
                r#"[
                    {"id": "a", "name": "A", "max_hp": 100},
                    {"id": "b", "name": "B", "max_hp": 200, "current_hp": 50}
                ]"#,
            )
            .unwrap();
            assert_eq!(roster.len(), 2);
            assert_eq!(roster[1].current_health, 50);
        }
    }

    mod mission_tests {
        use super::*;

        #[test]
        fn parses_tags() {
            let mission = Mission::from_json(r#"{"environment": "COLONY", "special_effects": ["MINOVSKY", "OBSTACLE"]}"#)
                .unwrap();
            assert_eq!(mission.environment, Environment::Colony);
            assert!(mission.effects.contains(SpecialEffects::MINOVSKY | SpecialEffects::OBSTACLE));
            assert!(!mission.effects.contains(SpecialEffects::GRAVITY_WELL));
        }

        #[test]
        fn defaults_to_space_without_effects() {
            let mission = Mission::from_json("{}").unwrap();
            assert_eq!(mission, Mission::default());
        }

        #[test]
        fn unknown_effect_is_rejected() {
            let err = Mission::from_json(r#"{"special_effects": ["SOLAR_FLARE"]}"#).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownTag { kind: "special effect", .. }));
        }
    }
}
