//! Monsters: race data, per-instance state, and damage intake.

pub mod ai;

use serde::{Deserialize, Serialize};

use ab_rng::GameRng;

use crate::player::{TimedEffects, TimedKind};

bitflags::bitflags! {
    /// Race category and vulnerability flags.
    ///
    /// Slays and brands match against these; capability checks are O(1)
    /// set membership.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MonsterFlags: u32 {
        const ANIMAL = 1 << 0;
        const EVIL = 1 << 1;
        const UNDEAD = 1 << 2;
        const DEMON = 1 << 3;
        const ORC = 1 << 4;
        const TROLL = 1 << 5;
        const GIANT = 1 << 6;
        const DRAGON = 1 << 7;
        /// Heals back at double the usual rate.
        const REGENERATE = 1 << 8;
        const UNIQUE = 1 << 9;
        /// Never panics, no matter how hurt.
        const FEARLESS = 1 << 10;
        const HURT_FIRE = 1 << 16;
        const HURT_COLD = 1 << 17;
        const HURT_ELEC = 1 << 18;
        const HURT_LIGHT = 1 << 19;
    }
}

/// One natural melee blow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blow {
    pub dd: u32,
    pub ds: u32,
}

/// Static race data shared by every monster of a kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRace {
    pub name: String,
    /// Signed speed, 0 = normal.
    pub speed: i16,
    /// How hard the race is to hit.
    pub evasion: i32,
    /// Damage soaked from each incoming hit.
    pub armour: i32,
    /// Offensive skill; feeds its to-hit the way finesse feeds the player's.
    pub power: i32,
    pub blows: Vec<Blow>,
    pub flags: MonsterFlags,
}

impl MonsterRace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            speed: 0,
            evasion: 0,
            armour: 0,
            power: 0,
            blows: vec![Blow { dd: 1, ds: 4 }],
            flags: MonsterFlags::empty(),
        }
    }

    /// Uniques and the like get a different death message.
    pub fn is_unusual(&self) -> bool {
        self.flags.intersects(MonsterFlags::UNDEAD | MonsterFlags::DEMON)
    }
}

/// What a hit did to a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterHit {
    pub died: bool,
    /// The survivor panicked and is now fleeing.
    pub fear: bool,
}

/// A live monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub race: MonsterRace,
    /// Position as (y, x).
    pub pos: (i32, i32),
    pub hp: i32,
    pub maxhp: i32,
    pub energy: i32,
    pub timed: TimedEffects,
    /// Whether the player can currently see it.
    pub visible: bool,
}

impl Monster {
    pub fn new(race: MonsterRace, maxhp: i32, y: i32, x: i32) -> Self {
        Self {
            race,
            pos: (y, x),
            hp: maxhp,
            maxhp,
            energy: 0,
            timed: TimedEffects::new(),
            visible: true,
        }
    }

    pub fn is_asleep(&self) -> bool {
        self.timed.has(TimedKind::Sleep)
    }

    /// Wake up, e.g. when attacked or disturbed.
    pub fn wake(&mut self) {
        self.timed.clear(TimedKind::Sleep);
    }

    /// Natural healing, once per hundred game turns.
    ///
    /// A hundredth of max per pass with a floor of one point, doubled for
    /// regenerating races, never past max.
    pub fn regenerate(&mut self) {
        if self.hp >= self.maxhp {
            return;
        }
        let mut frac = self.maxhp / 100;
        if frac < 1 {
            frac = 1;
        }
        if self.race.flags.contains(MonsterFlags::REGENERATE) {
            frac *= 2;
        }
        self.hp = (self.hp + frac).min(self.maxhp);
    }

    /// Take damage; wakes the monster and checks for death and panic.
    pub fn take_hit(&mut self, dmg: i32, rng: &mut GameRng) -> MonsterHit {
        self.wake();
        self.hp -= dmg;
        if self.hp < 0 {
            return MonsterHit {
                died: true,
                fear: false,
            };
        }

        // Badly hurt survivors may panic.
        let mut fear = false;
        if !self.race.flags.contains(MonsterFlags::FEARLESS)
            && !self.timed.has(TimedKind::Afraid)
            && dmg > 0
            && self.hp <= self.maxhp / 10
            && !rng.one_in(3)
        {
            fear = true;
            self.timed.inc(TimedKind::Afraid, 10 + rng.uniform1(10) as i32);
        }
        MonsterHit { died: false, fear }
    }
}
