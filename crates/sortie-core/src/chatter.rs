//! Personality-keyed battle chatter.
//!
//! Lines are looked up by `(Personality, ChatterCategory)`. Both keys are
//! closed enums, so every combination has a non-empty line set and a lookup
//! can never miss.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::Personality;

/// Moment in an exchange a chatter line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatterCategory {
    /// Speaker opens fire.
    Attack,
    /// Speaker takes a hit.
    Hit,
    /// Speaker's shot misses.
    Miss,
    /// Speaker is destroyed.
    Destroyed,
}

/// Line set for a personality and category.
#[must_use]
pub const fn lines(personality: Personality, category: ChatterCategory) -> &'static [&'static str] {
    use ChatterCategory::{Attack, Destroyed, Hit, Miss};
    use Personality::{Aggressive, Cautious, Sniper};

    match (personality, category) {
        (Aggressive, Attack) => &[
            "Go down!",
            "Hit, damn you!",
            "You're not getting away!",
            "There!",
            "Eat this!",
            "Let's go!",
        ],
        (Aggressive, Hit) => &[
            "Damn it...!",
            "Tch...!",
            "That stings!",
            "Is that all you've got?",
            "I'm not done yet!",
        ],
        (Aggressive, Destroyed) => &[
            "I can still... fight...",
            "Impossible...!",
            "Not here... not like this...",
            "I won't accept this...!",
        ],
        (Aggressive, Miss) => &["Tch, missed!", "Blast it!", "Damn!"],
        (Cautious, Attack) => &[
            "Targeting!",
            "Steady now...",
            "This ends it!",
            "Making it count!",
        ],
        (Cautious, Hit) => &[
            "That was close...!",
            "Should I fall back...?",
            "Too dangerous...",
            "Need to open the distance!",
        ],
        (Cautious, Destroyed) => &[
            "I knew it was too much...",
            "So this is it...",
            "I misjudged it...",
        ],
        (Cautious, Miss) => &["Careful now...", "Don't rush it...", "Next one..."],
        (Sniper, Attack) => &["Taking the shot!", "Got you...", "In range!", "Sights aligned!"],
        (Sniper, Hit) => &[
            "They closed in!",
            "Opening range!",
            "Too close!",
        ],
        (Sniper, Destroyed) => &["Not enough range...", "I let them get close..."],
        (Sniper, Miss) => &["Misread the drift...", "Re-aiming...", "Re-ranging..."],
    }
}

/// Rolls for a chatter line.
///
/// Returns `None` without touching the generator when the speaker has no
/// personality. Otherwise rolls `chance` percent and picks a line uniformly.
pub fn roll<R: Rng + ?Sized>(
    rng: &mut R,
    personality: Option<Personality>,
    category: ChatterCategory,
    chance: f32,
) -> Option<&'static str> {
    let personality = personality?;
    if rng.gen_range(0.0..100.0_f32) >= chance {
        return None;
    }
    let set = lines(personality, category);
    Some(set[rng.gen_range(0..set.len())])
}
