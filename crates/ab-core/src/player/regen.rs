//! Fixed-point hit-point and mana accumulation.
//!
//! Recovery rates are tiny fractions of a point per pass, so a resource
//! keeps a 16-bit fractional remainder alongside its whole value. The
//! regeneration step adds `max * rate + base` in 1/65536ths of a point:
//! the high 16 bits land in the whole value, the low 16 bits accumulate in
//! the remainder and carry on overflow.

use serde::{Deserialize, Serialize};

/// A regenerating pool: whole points plus a fractional remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Current whole points. May go negative when damage kills.
    pub cur: i16,
    /// Fractional remainder in 1/65536ths of a point.
    pub frac: u16,
    /// Maximum whole points.
    pub max: i16,
}

impl Resource {
    pub fn new(max: i16) -> Self {
        Self {
            cur: max,
            frac: 0,
            max,
        }
    }

    pub fn is_full(&self) -> bool {
        self.cur >= self.max
    }

    /// One regeneration step at `rate` with the given base constant.
    ///
    /// Overflow of the whole value clamps to `i16::MAX` rather than
    /// wrapping negative; reaching the maximum zeroes the remainder.
    pub fn regenerate(&mut self, rate: i32, base: i32) {
        let delta = self.max as i32 * rate + base;

        let mut cur = self.cur as i32 + (delta >> 16);
        if cur > i16::MAX as i32 {
            cur = i16::MAX as i32;
        }

        let frac = (delta & 0xFFFF) as u32 + self.frac as u32;
        if frac >= 0x10000 {
            self.frac = (frac - 0x10000) as u16;
            cur += 1;
        } else {
            self.frac = frac as u16;
        }

        // Must zero the remainder even when already exactly at max.
        if cur >= self.max as i32 {
            self.cur = self.max;
            self.frac = 0;
        } else {
            self.cur = cur as i16;
        }
    }

    /// Lose whole points. The value may go negative; the caller decides
    /// what negative means (usually death).
    pub fn damage(&mut self, amount: i32) {
        self.cur = (self.cur as i32 - amount).clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }

    /// Gain whole points, clamped to the maximum.
    pub fn heal(&mut self, amount: i32) {
        let cur = (self.cur as i32 + amount).min(self.max as i32);
        self.cur = cur as i16;
        if self.is_full() {
            self.frac = 0;
        }
    }

    /// Restore to full.
    pub fn fill(&mut self) {
        self.cur = self.max;
        self.frac = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_fixed_point_step() {
        // max 100 at rate 197 with base 1442: delta = 21142, all fractional.
        let mut hp = Resource {
            cur: 50,
            frac: 0,
            max: 100,
        };
        hp.regenerate(197, 1442);
        assert_eq!(hp.cur, 50);
        assert_eq!(hp.frac, 21142);
    }

    #[test]
    fn fraction_carries_into_whole() {
        let mut hp = Resource {
            cur: 50,
            frac: 60000,
            max: 100,
        };
        // delta = 100 * 197 + 1442 = 21142; 60000 + 21142 = 81142 >= 65536.
        hp.regenerate(197, 1442);
        assert_eq!(hp.cur, 51);
        assert_eq!(u32::from(hp.frac), 81142 - 65536);
    }

    #[test]
    fn large_delta_adds_whole_points() {
        // max 1000 at rate 100%: delta = 1000 * 10000 + 524 = 10_000_524,
        // which is 152 whole points and 39052/65536ths.
        let mut sp = Resource {
            cur: 0,
            frac: 0,
            max: 1000,
        };
        sp.regenerate(10_000, 524);
        assert_eq!(sp.cur, 152);
        assert_eq!(sp.frac, (10_000_524 & 0xFFFF) as u16);
    }

    #[test]
    fn clamps_at_max_and_zeroes_fraction() {
        let mut hp = Resource {
            cur: 99,
            frac: 65_000,
            max: 100,
        };
        hp.regenerate(10_000, 1442);
        assert_eq!(hp.cur, 100);
        assert_eq!(hp.frac, 0);
    }

    #[test]
    fn at_max_fraction_is_reset_even_without_gain() {
        let mut hp = Resource {
            cur: 100,
            frac: 12,
            max: 100,
        };
        hp.regenerate(0, 0);
        assert_eq!(hp.cur, 100);
        assert_eq!(hp.frac, 0);
    }

    #[test]
    fn heal_never_exceeds_max() {
        let mut hp = Resource::new(40);
        hp.damage(10);
        hp.heal(500);
        assert_eq!(hp.cur, 40);
        assert_eq!(hp.frac, 0);
    }

    proptest! {
        #[test]
        fn regenerate_keeps_invariants(
            cur in 0i16..=500,
            frac in 0u16..=u16::MAX,
            max in 1i16..=500,
            rate in 0i32..=20_000,
        ) {
            let cur = cur.min(max);
            let mut r = Resource { cur, frac, max };
            r.regenerate(rate, 1442);
            prop_assert!(r.cur >= cur);
            prop_assert!(r.cur <= max);
            if r.cur == max {
                prop_assert_eq!(r.frac, 0);
            }
        }
    }
}
