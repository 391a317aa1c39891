//! Core game constants.
//!
//! Tuning values for the energy clock, regeneration, food and the world
//! maintenance cadence. The tables are the classic non-linear lookups the
//! whole speed system hangs off.

/// Energy a full action costs. An actor may act once it has at least this much.
pub const TURN_ENERGY: i32 = 100;

/// A blow loop budgets energy in hundredths of a turn.
pub const BLOW_ENERGY_SCALE: i32 = 10_000;

/// Game turns between world maintenance passes.
pub const WORLD_TICK: u64 = 10;

/// Game turns between monster regeneration passes.
pub const MONSTER_REGEN_TICK: u64 = 100;

/// Length of a town day, in player turns.
pub const TOWN_DAWN: u64 = 10_000;

/// Player turns between store restocks (scaled by 10 game turns).
pub const STORE_TURNS: u64 = 1_000;

/// 1-in-this chance per restock of shuffling a shopkeeper.
pub const STORE_SHUFFLE: u32 = 25;

/// 1-in-this chance per maintenance pass of a new monster appearing.
pub const MAX_M_ALLOC_CHANCE: u32 = 160;

/// Maximum sight radius; new monsters appear beyond it.
pub const MAX_SIGHT: i32 = 20;

/// Regeneration rates (per ten thousand, applied through fixed-point math).
pub const PY_REGEN_NORMAL: i32 = 197;
pub const PY_REGEN_WEAK: i32 = 98;
pub const PY_REGEN_FAINT: i32 = 33;

/// Fixed-point base constants: minimum regeneration per pass.
pub const PY_REGEN_HPBASE: i32 = 1442;
pub const PY_REGEN_MNBASE: i32 = 524;

/// Food thresholds.
pub const PY_FOOD_MAX: i32 = 15_000;
pub const PY_FOOD_FULL: i32 = 10_000;
pub const PY_FOOD_ALERT: i32 = 2_000;
pub const PY_FOOD_WEAK: i32 = 1_000;
pub const PY_FOOD_FAINT: i32 = 500;
pub const PY_FOOD_STARVE: i32 = 100;

/// A cut this deep is a mortal wound and will not close on its own.
pub const CUT_MORTAL_WOUND: i32 = 1_000;

/// Stun at or past this level knocks an actor out entirely.
pub const STUN_KNOCKOUT: i32 = 100;

/// Stun past this level penalizes hit rolls.
pub const STUN_HEAVY: i32 = 50;

/// Arena slack before compaction kicks in.
pub const COMPACT_SLACK: usize = 32;

/// Maximum player level.
pub const MAX_PLAYER_LEVEL: i32 = 50;

/// Energy gained per game turn, indexed by `speed + 110`.
///
/// Non-linear by design: fast actors gain disproportionately more, which
/// approximates multiplicative speed without ever granting free double
/// moves. 0 speed (index 110) is the normal 10 energy per turn.
const EXTRACT_ENERGY: [u8; 200] = [
    // Slowest
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    // S-50
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    // S-40
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    // S-30
    2, 2, 2, 2, 2, 2, 2, 3, 3, 3,
    // S-20
    3, 3, 3, 3, 3, 4, 4, 4, 4, 4,
    // S-10
    5, 5, 5, 5, 6, 6, 7, 7, 8, 9,
    // Normal
    10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
    // F+10
    20, 21, 22, 23, 24, 25, 26, 27, 28, 29,
    // F+20
    30, 31, 32, 33, 34, 35, 36, 36, 37, 37,
    // F+30
    38, 38, 39, 39, 40, 40, 40, 41, 41, 41,
    // F+40
    42, 42, 42, 43, 43, 43, 44, 44, 44, 44,
    // F+50
    45, 45, 45, 45, 45, 46, 46, 46, 46, 46,
    // F+60
    47, 47, 47, 47, 47, 48, 48, 48, 48, 48,
    // F+70
    49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
    // Fastest
    49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
];

/// Energy gained per game turn for a signed speed (0 = normal).
pub fn energy_gain(speed: i16) -> i32 {
    let idx = (speed as i32 + 110).clamp(0, EXTRACT_ENERGY.len() as i32 - 1);
    EXTRACT_ENERGY[idx as usize] as i32
}

/// Recovery bonus from constitution, indexed by stat index (0 = CON 3).
///
/// Poison, stun and ordinary cuts close `adj_con_fix[con] + 1` points per
/// maintenance pass.
pub const ADJ_CON_FIX: [u8; 38] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // 3..12
    0, 0, 1, 1, 1, // 13..17
    1, 1, 2, 2, 2, // 18/00..18/49
    3, 3, 3, 3, 3, // 18/50..18/99
    4, 4, 5, 6, 6, // 18/100..18/149
    6, 7, 7, 8, 8, // 18/150..18/199
    8, 9, 9, // 18/200..18/220+
];

/// Timer decrement multiplier for a constitution stat index.
pub fn con_recovery(con_ind: usize) -> i32 {
    let idx = con_ind.min(ADJ_CON_FIX.len() - 1);
    ADJ_CON_FIX[idx] as i32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normal_speed_gains_ten() {
        assert_eq!(energy_gain(0), 10);
    }

    #[test]
    fn extremes_are_clamped() {
        assert_eq!(energy_gain(-500), 1);
        assert_eq!(energy_gain(500), 49);
        assert_eq!(energy_gain(90), 49);
    }

    #[test]
    fn fast_gains_disproportionately() {
        // +10 speed exactly doubles a normal actor; +20 triples it.
        assert_eq!(energy_gain(10), 20);
        assert_eq!(energy_gain(20), 30);
        // The curve flattens out at the top.
        assert!(energy_gain(70) - energy_gain(60) < energy_gain(20) - energy_gain(10));
    }

    #[test]
    fn con_recovery_floor_is_one() {
        assert_eq!(con_recovery(0), 1);
        assert_eq!(con_recovery(500), 10);
    }

    proptest! {
        #[test]
        fn energy_gain_is_monotonic(s in -200i16..200) {
            prop_assert!(energy_gain(s) <= energy_gain(s + 1));
        }

        #[test]
        fn energy_gain_is_positive(s in i16::MIN..i16::MAX) {
            prop_assert!(energy_gain(s) >= 1);
        }
    }
}
