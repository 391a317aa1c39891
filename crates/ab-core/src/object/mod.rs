//! Objects: weapons, launchers, ammunition, lights and rods.
//!
//! Only the properties the combat and world-maintenance code consumes live
//! here; identification, flavors and the store economy are external.

use serde::{Deserialize, Serialize};

use crate::monster::MonsterFlags;

bitflags::bitflags! {
    /// Object property flags noticed through use.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ObjectFlags: u32 {
        /// Light source that burns no fuel.
        const NO_FUEL = 1 << 0;
        /// Heavy hits shake the dungeon.
        const IMPACT = 1 << 1;
        /// Slowly drains experience while equipped.
        const DRAIN_EXP = 1 << 2;
        /// Randomly teleports the wearer.
        const TELEPORT = 1 << 3;
        /// Doubles hit-point recovery.
        const REGEN = 1 << 4;
        /// Halves food consumption.
        const SLOW_DIGEST = 1 << 5;
    }
}

/// Broad object classification, the equivalent of a tval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    Weapon,
    Launcher,
    Shot,
    Arrow,
    Bolt,
    Light,
    Rod,
    Armour,
    Other,
}

/// A slay or brand: a damage multiplier against a category of monsters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slay {
    /// Monster categories this applies to.
    pub matches: MonsterFlags,
    /// Extra-vulnerable category; worth another +100 on top.
    pub vuln: MonsterFlags,
    /// Damage multiplier in percent (200 = double damage).
    pub mult: i32,
    /// Verb for melee messages ("smite").
    pub melee_verb: String,
    /// Verb for ranged messages ("deeply pierces").
    pub range_verb: String,
}

impl Slay {
    /// Effective multiplier against a monster with the given flags, or None
    /// if the slay does not apply at all.
    pub fn multiplier_against(&self, flags: MonsterFlags) -> Option<i32> {
        if !flags.intersects(self.matches) {
            return None;
        }
        let mut mult = self.mult;
        if !self.vuln.is_empty() && flags.intersects(self.vuln) {
            mult += 100;
        }
        Some(mult)
    }
}

/// An item instance. Stacks share one record with a count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub class: ObjectClass,
    /// Damage dice.
    pub dd: u32,
    /// Damage sides.
    pub ds: u32,
    /// Weight in tenths of a pound.
    pub weight: i32,
    pub to_finesse: i32,
    pub to_prowess: i32,
    pub slays: Vec<Slay>,
    pub flags: ObjectFlags,
    pub artifact: bool,
    /// Stack count.
    pub number: i32,
    /// Remaining fuel for lights, remaining recharge time otherwise.
    pub timeout: i32,
    /// Full recharge time for one rod in a stack.
    pub time_base: i32,
    /// Percent chance to break when it hits something.
    pub break_perc: i32,
}

impl Object {
    pub fn new(name: impl Into<String>, class: ObjectClass) -> Self {
        Self {
            name: name.into(),
            class,
            dd: 0,
            ds: 0,
            weight: 10,
            to_finesse: 0,
            to_prowess: 0,
            slays: Vec::new(),
            flags: ObjectFlags::empty(),
            artifact: false,
            number: 1,
            timeout: 0,
            time_base: 0,
            break_perc: 0,
        }
    }

    /// Is this usable as ammunition at all?
    pub fn is_ammo(&self) -> bool {
        matches!(
            self.class,
            ObjectClass::Shot | ObjectClass::Arrow | ObjectClass::Bolt
        )
    }

    /// Percent chance of breaking after being fired or thrown.
    ///
    /// Artifacts never break. A miss squares the normal breakage
    /// probability, so 50% on a hit is 25% on a miss and 10% is 1%.
    pub fn breakage_chance(&self, hit_target: bool) -> i32 {
        if self.artifact {
            return 0;
        }
        if !hit_target {
            return (self.break_perc * self.break_perc) / 100;
        }
        self.break_perc
    }
}

/// Scan a set of items for the single best slay against a monster.
///
/// Best means the highest effective multiplier; ties keep the first found.
pub fn best_slay<'a, I>(items: I, defender: MonsterFlags) -> Option<(&'a Slay, i32)>
where
    I: IntoIterator<Item = &'a Object>,
{
    let mut best: Option<(&'a Slay, i32)> = None;
    for obj in items {
        for slay in &obj.slays {
            if let Some(mult) = slay.multiplier_against(defender) {
                if best.map_or(true, |(_, m)| mult > m) {
                    best = Some((slay, mult));
                }
            }
        }
    }
    best
}
