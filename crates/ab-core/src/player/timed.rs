//! Timed status effects and their decay schedule.
//!
//! Every effect is a kind with a remaining duration in turns; zero means
//! inactive. Decay runs once per world maintenance pass with a per-kind
//! rate: poison and stun close at a constitution-derived rate, cuts too
//! unless they are mortal wounds, everything else by exactly one.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use crate::consts::CUT_MORTAL_WOUND;

/// A timed status condition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumCount, EnumIter,
)]
pub enum TimedKind {
    #[strum(serialize = "poisoned")]
    Poisoned,
    #[strum(serialize = "bleeding")]
    Cut,
    #[strum(serialize = "stunned")]
    Stunned,
    #[strum(serialize = "confused")]
    Confused,
    #[strum(serialize = "afraid")]
    Afraid,
    #[strum(serialize = "paralyzed")]
    Paralyzed,
    #[strum(serialize = "blind")]
    Blind,
    #[strum(serialize = "hallucinating")]
    Image,
    #[strum(serialize = "slowed")]
    Slow,
    /// Monsters only; the player gets paralysis instead.
    #[strum(serialize = "asleep")]
    Sleep,
}

impl TimedKind {
    /// How many points this effect loses per maintenance pass.
    ///
    /// `recovery` is the constitution multiplier, always at least 1.
    /// Mortal wounds do not close on their own.
    pub fn decay_rate(self, duration: i32, recovery: i32) -> i32 {
        match self {
            TimedKind::Cut => {
                if duration > CUT_MORTAL_WOUND {
                    0
                } else {
                    recovery
                }
            }
            TimedKind::Poisoned | TimedKind::Stunned => recovery,
            _ => 1,
        }
    }
}

/// Per-actor map of active timed effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedEffects {
    active: HashMap<TimedKind, i32>,
}

impl TimedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining duration, 0 when inactive.
    pub fn get(&self, kind: TimedKind) -> i32 {
        self.active.get(&kind).copied().unwrap_or(0)
    }

    pub fn has(&self, kind: TimedKind) -> bool {
        self.get(kind) > 0
    }

    /// Set a duration outright; non-positive clears the effect.
    pub fn set(&mut self, kind: TimedKind, duration: i32) {
        if duration > 0 {
            self.active.insert(kind, duration);
        } else {
            self.active.remove(&kind);
        }
    }

    /// Extend an effect. Returns the new duration.
    pub fn inc(&mut self, kind: TimedKind, amount: i32) -> i32 {
        let v = self.get(kind).saturating_add(amount).max(0);
        self.set(kind, v);
        v
    }

    /// Shorten an effect. Returns true if it just wore off.
    pub fn dec(&mut self, kind: TimedKind, amount: i32) -> bool {
        let old = self.get(kind);
        if old == 0 {
            return false;
        }
        let v = (old - amount).max(0);
        self.set(kind, v);
        v == 0
    }

    pub fn clear(&mut self, kind: TimedKind) {
        self.active.remove(&kind);
    }

    /// Iterate the active effects.
    pub fn iter(&self) -> impl Iterator<Item = (TimedKind, i32)> + '_ {
        self.active.iter().map(|(k, v)| (*k, *v))
    }

    pub fn any_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Run one maintenance pass of decay over every active effect.
    ///
    /// Returns the kinds that wore off this pass so the caller can notify
    /// the display layer.
    pub fn decay_all(&mut self, recovery: i32) -> Vec<TimedKind> {
        let mut expired = Vec::new();
        let kinds: Vec<TimedKind> = self.active.keys().copied().collect();
        for kind in kinds {
            let duration = self.get(kind);
            let decr = kind.decay_rate(duration, recovery);
            if decr > 0 && self.dec(kind, decr) {
                expired.push(kind);
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn zero_means_inactive() {
        let mut t = TimedEffects::new();
        assert!(!t.has(TimedKind::Poisoned));
        t.set(TimedKind::Poisoned, 5);
        assert!(t.has(TimedKind::Poisoned));
        t.set(TimedKind::Poisoned, 0);
        assert!(!t.has(TimedKind::Poisoned));
        assert!(!t.any_active());
    }

    #[test]
    fn mortal_wounds_do_not_close() {
        let mut t = TimedEffects::new();
        t.set(TimedKind::Cut, 1500);
        let expired = t.decay_all(4);
        assert!(expired.is_empty());
        assert_eq!(t.get(TimedKind::Cut), 1500);
    }

    #[test]
    fn ordinary_cuts_close_at_con_rate() {
        let mut t = TimedEffects::new();
        t.set(TimedKind::Cut, 150);
        t.decay_all(4);
        assert_eq!(t.get(TimedKind::Cut), 146);
    }

    #[test]
    fn poison_and_stun_use_recovery_rate() {
        let mut t = TimedEffects::new();
        t.set(TimedKind::Poisoned, 10);
        t.set(TimedKind::Stunned, 10);
        t.set(TimedKind::Confused, 10);
        t.decay_all(3);
        assert_eq!(t.get(TimedKind::Poisoned), 7);
        assert_eq!(t.get(TimedKind::Stunned), 7);
        assert_eq!(t.get(TimedKind::Confused), 9);
    }

    #[test]
    fn expiry_is_reported_once() {
        let mut t = TimedEffects::new();
        t.set(TimedKind::Blind, 1);
        let expired = t.decay_all(1);
        assert_eq!(expired, vec![TimedKind::Blind]);
        let expired = t.decay_all(1);
        assert!(expired.is_empty());
    }

    #[test]
    fn durations_never_go_negative() {
        let mut t = TimedEffects::new();
        for kind in TimedKind::iter() {
            t.set(kind, 2);
        }
        for _ in 0..10 {
            t.decay_all(9);
        }
        for kind in TimedKind::iter() {
            assert!(t.get(kind) >= 0);
        }
    }
}
