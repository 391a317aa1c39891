//! Combat resolution: hit rolls, critical tiers, damage composition.
//!
//! The resolver is pure with respect to the world: it reads attacker and
//! defender stats, draws from the RNG, and returns an outcome. Energy
//! accounting stays with the caller.

pub mod melee;
pub mod ranged;

pub use melee::py_attack;
pub use ranged::{fire, throw, throw_range, Aim, ThrowItem};

use strum::Display;

use ab_rng::GameRng;

use crate::consts::STUN_HEAVY;
use crate::player::{TimedKind, TimedEffects};

/// Narrative tier of a successful hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum HitTier {
    #[strum(serialize = "hit")]
    Normal,
    #[strum(serialize = "good hit")]
    Good,
    #[strum(serialize = "great hit")]
    Great,
    #[strum(serialize = "superb hit")]
    Superb,
    #[strum(serialize = "*GREAT* hit")]
    HiGreat,
    #[strum(serialize = "*SUPERB* hit")]
    HiSuperb,
}

/// Base chance to land a blow, in percent, before situational penalties.
///
/// Always within [40, 95]: even a hopeless attacker connects sometimes and
/// even a master misses.
pub fn get_hit_chance(to_finesse: i32, evasion: i32) -> i32 {
    (75 - evasion + to_finesse / 25).clamp(40, 95)
}

/// Roll one attack against a pre-computed chance.
///
/// Heavy stun and an unseen target degrade the roll after the clamp, so the
/// floor does not protect a stunned attacker swinging at shadows.
pub fn test_hit(rng: &mut GameRng, chance: i32, attacker_timed: &TimedEffects, visible: bool) -> bool {
    let mut chance = chance;
    if attacker_timed.get(TimedKind::Stunned) > STUN_HEAVY {
        chance -= 10;
    }
    if !visible {
        chance /= 2;
    }
    (rng.uniform(100) as i32) < chance
}

/// Melee critical roll.
///
/// Each success on a `uniform(100) <= chance` roll raises the power tier,
/// up to four extra tiers. Returns the boosted damage and the tier tag.
pub fn critical_melee(
    rng: &mut GameRng,
    finesse: i32,
    prowess: i32,
    dam: i32,
) -> (i32, HitTier) {
    let chance = (finesse * finesse + prowess * prowess) / 2500 + 1;

    let mut power = 0;
    while power < 5 && (rng.uniform(100) as i32) <= chance {
        power += 1;
    }

    match power {
        0 => (dam, HitTier::Normal),
        1 => (3 * dam / 2 + 10, HitTier::Good),
        2 => (2 * dam + 10, HitTier::Great),
        3 => (3 * dam + 15, HitTier::Superb),
        4 => (7 * dam / 2 + 20, HitTier::HiGreat),
        _ => (4 * dam + 20, HitTier::HiSuperb),
    }
}

/// Ranged critical roll for fired ammunition.
///
/// Heavier ammunition crits more often and harder. `plus` is the combined
/// finesse bonus of attacker and ammo.
pub fn critical_shot(
    rng: &mut GameRng,
    weight: i32,
    plus: i32,
    level: i32,
    dam: i32,
) -> (i32, HitTier) {
    let chance = weight + plus * 4 + level * 2;

    if (rng.uniform1(5000) as i32) > chance {
        return (dam, HitTier::Normal);
    }

    let power = weight + rng.uniform1(500) as i32;
    if power < 500 {
        (2 * dam + 5, HitTier::Good)
    } else if power < 1000 {
        (2 * dam + 10, HitTier::Great)
    } else {
        (3 * dam + 15, HitTier::Superb)
    }
}
