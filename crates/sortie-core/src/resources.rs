//! Ammo, energy, and cooldown bookkeeping.
//!
//! The ledger is created from a combatant's maxima at battle start and is the
//! only thing that mutates these counters. A failed eligibility check is not
//! an error; it becomes a WAIT entry in the battle log.
//!
//! # Turn lifecycle
//!
//! 1. [`UnitResources::refresh`] at the start of every turn: energy recovers
//!    (capped) and every cooldown ticks down by one.
//! 2. [`UnitResources::check`] before an attack: ammo, then energy, then
//!    cooldown.
//! 3. [`UnitResources::consume`] after a successful check.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{Combatant, Weapon, WeaponId};

/// Runtime state of one weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponState {
    /// Rounds left; `None` is unlimited.
    pub ammo: Option<u32>,
    /// Turns until the weapon can fire again.
    pub cooldown: u32,
}

/// Why an attack could not be made this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackBlocked {
    /// Finite magazine is empty.
    AmmoDepleted,
    /// Not enough energy for the shot.
    EnergyShortage {
        /// Energy required.
        required: i32,
        /// Energy available.
        available: i32,
    },
    /// Weapon still cooling down.
    OnCooldown {
        /// Turns remaining.
        turns: u32,
    },
}

impl fmt::Display for AttackBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmmoDepleted => write!(f, "ammo depleted"),
            Self::EnergyShortage { required, available } => {
                write!(f, "energy shortage ({available}/{required})")
            }
            Self::OnCooldown { turns } => write!(f, "on cooldown ({turns} turns)"),
        }
    }
}

/// Per-combatant runtime resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitResources {
    /// Current energy.
    pub energy: i32,
    /// Energy cap.
    pub max_energy: i32,
    /// Energy regained per turn.
    pub recovery: i32,
    /// Current propellant.
    pub propellant: i32,
    /// Weapon state keyed by weapon id.
    pub weapons: BTreeMap<WeaponId, WeaponState>,
}

impl UnitResources {
    /// Fills every counter from the combatant's maxima.
    #[must_use]
    pub fn for_combatant(unit: &Combatant) -> Self {
        let weapons = unit
            .weapons
            .iter()
            .map(|w| {
                (
                    w.id.clone(),
                    WeaponState {
                        ammo: w.ammo_limit(),
                        cooldown: 0,
                    },
                )
            })
            .collect();
        Self {
            energy: unit.energy.max_en,
            max_energy: unit.energy.max_en,
            recovery: unit.energy.en_recovery,
            propellant: unit.energy.max_propellant,
            weapons,
        }
    }

    /// Start-of-turn recovery.
    pub fn refresh(&mut self) {
        self.energy = self.energy.saturating_add(self.recovery).min(self.max_energy);
        for state in self.weapons.values_mut() {
            state.cooldown = state.cooldown.saturating_sub(1);
        }
    }

    /// State of a weapon, if the unit carries it.
    #[must_use]
    pub fn weapon(&self, id: &WeaponId) -> Option<&WeaponState> {
        self.weapons.get(id)
    }

    /// Checks whether `weapon` can fire now.
    ///
    /// # Errors
    ///
    /// Returns the first failing condition in order: ammo, energy, cooldown.
    pub fn check(&self, weapon: &Weapon) -> Result<(), AttackBlocked> {
        let state = self.weapons.get(&weapon.id).copied().unwrap_or(WeaponState {
            ammo: weapon.ammo_limit(),
            cooldown: 0,
        });
        if weapon.ammo_limit().is_some() && state.ammo.unwrap_or(0) == 0 {
            return Err(AttackBlocked::AmmoDepleted);
        }
        if weapon.en_cost > 0 && self.energy < weapon.en_cost {
            return Err(AttackBlocked::EnergyShortage {
                required: weapon.en_cost,
                available: self.energy,
            });
        }
        if state.cooldown > 0 {
            return Err(AttackBlocked::OnCooldown {
                turns: state.cooldown,
            });
        }
        Ok(())
    }

    /// Spends ammo and energy and starts the cooldown for a shot.
    pub fn consume(&mut self, weapon: &Weapon) {
        if weapon.en_cost > 0 {
            self.energy = (self.energy - weapon.en_cost).max(0);
        }
        let state = self.weapons.entry(weapon.id.clone()).or_insert(WeaponState {
            ammo: weapon.ammo_limit(),
            cooldown: 0,
        });
        if let Some(ammo) = state.ammo.as_mut() {
            *ammo = ammo.saturating_sub(1);
        }
        state.cooldown = weapon.cooldown_turns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EnergyProfile;

    fn unit_with(weapon: Weapon, max_en: i32, recovery: i32) -> Combatant {
        Combatant::new("u", "Unit", 100)
            .with_weapon(weapon)
            .with_energy(EnergyProfile {
                max_en,
                en_recovery: recovery,
                max_propellant: 500,
            })
    }

    mod init_tests {
        use super::*;

        #[test]
        fn starts_full() {
            let w = Weapon::new("mg", "MG", 100, 400.0, 70.0).with_ammo(30);
            let res = UnitResources::for_combatant(&unit_with(w.clone(), 800, 50));
            assert_eq!(res.energy, 800);
            assert_eq!(res.propellant, 500);
            assert_eq!(res.weapon(&w.id).unwrap().ammo, Some(30));
            assert_eq!(res.weapon(&w.id).unwrap().cooldown, 0);
        }

        #[test]
        fn unlimited_weapon_has_no_ammo_counter() {
            let w = Weapon::new("br", "BR", 300, 600.0, 80.0);
            let res = UnitResources::for_combatant(&unit_with(w.clone(), 800, 50));
            assert_eq!(res.weapon(&w.id).unwrap().ammo, None);
        }
    }

    mod check_tests {
        use super::*;

        #[test]
        fn single_shot_then_depleted() {
            let w = Weapon::new("bz", "Bazooka", 400, 500.0, 60.0).with_ammo(1);
            let mut res = UnitResources::for_combatant(&unit_with(w.clone(), 800, 50));
            assert!(res.check(&w).is_ok());
            res.consume(&w);
            res.refresh();
            assert_eq!(res.check(&w), Err(AttackBlocked::AmmoDepleted));
            assert_eq!(res.weapon(&w.id).unwrap().ammo, Some(0));
        }

        #[test]
        fn energy_shortage_reports_amounts() {
            let w = Weapon::new("br", "BR", 300, 600.0, 80.0).with_energy_cost(300);
            let mut res = UnitResources::for_combatant(&unit_with(w.clone(), 500, 0));
            res.consume(&w);
            assert_eq!(
                res.check(&w),
                Err(AttackBlocked::EnergyShortage {
                    required: 300,
                    available: 200
                })
            );
        }

        #[test]
        fn ammo_checked_before_energy() {
            let w = Weapon::new("x", "X", 100, 300.0, 70.0)
                .with_ammo(1)
                .with_energy_cost(1000);
            let mut res = UnitResources::for_combatant(&unit_with(w.clone(), 1000, 0));
            res.consume(&w);
            assert_eq!(res.check(&w), Err(AttackBlocked::AmmoDepleted));
        }

        #[test]
        fn cooldown_blocks_until_it_ticks_out() {
            let w = Weapon::new("mc", "Mega Cannon", 800, 900.0, 60.0).with_cooldown(2);
            let mut res = UnitResources::for_combatant(&unit_with(w.clone(), 1000, 0));
            res.consume(&w);
            res.refresh();
            assert_eq!(res.check(&w), Err(AttackBlocked::OnCooldown { turns: 1 }));
            res.refresh();
            assert!(res.check(&w).is_ok());
        }

        #[test]
        fn block_reasons_read_naturally() {
            assert_eq!(AttackBlocked::AmmoDepleted.to_string(), "ammo depleted");
            assert!(AttackBlocked::EnergyShortage {
                required: 100,
                available: 20
            }
            .to_string()
            .starts_with("energy shortage"));
            assert!(AttackBlocked::OnCooldown { turns: 2 }
                .to_string()
                .starts_with("on cooldown"));
        }
    }

    mod refresh_tests {
        use super::*;

        #[test]
        fn recovery_is_capped() {
            let w = Weapon::new("br", "BR", 300, 600.0, 80.0).with_energy_cost(50);
            let mut res = UnitResources::for_combatant(&unit_with(w.clone(), 500, 200));
            res.consume(&w);
            res.refresh();
            assert_eq!(res.energy, 500);
        }

        #[test]
        fn cooldown_never_negative() {
            let w = Weapon::new("mg", "MG", 100, 400.0, 70.0);
            let mut res = UnitResources::for_combatant(&unit_with(w.clone(), 500, 0));
            for _ in 0..5 {
                res.refresh();
            }
            assert_eq!(res.weapon(&w.id).unwrap().cooldown, 0);
        }
    }
}
