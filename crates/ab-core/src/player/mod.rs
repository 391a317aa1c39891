//! The player character.
//!
//! `Player` holds the mutable per-character state: position, energy, the
//! two regenerating pools, food, timed effects and equipment. `PlayerState`
//! is the derived combat sheet recomputed by the (external) bonus pass
//! whenever equipment changes; the core only reads it.

mod regen;
mod timed;

pub use regen::Resource;
pub use timed::{TimedEffects, TimedKind};

use serde::{Deserialize, Serialize};

use crate::consts::{PY_FOOD_MAX, STUN_KNOCKOUT};
use crate::object::{Object, ObjectClass};

bitflags::bitflags! {
    /// Capabilities granted by equipment and intrinsics.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StateFlags: u32 {
        /// Doubled hit-point recovery, at a food cost.
        const REGENERATE = 1 << 0;
        /// Reduced food consumption.
        const SLOW_DIGEST = 1 << 1;
        /// Halved hit-point recovery.
        const IMPAIR_HP = 1 << 2;
        /// Halved mana recovery.
        const IMPAIR_MANA = 1 << 3;
        /// Experience slowly drains away.
        const EXP_DRAIN = 1 << 4;
        /// Randomly teleports around the level.
        const TELEPORT = 1 << 5;
        /// Heavy blows shake the dungeon.
        const IMPACT = 1 << 6;
    }
}

/// Derived combat values, recomputed outside the core on equipment change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Signed speed, 0 = normal.
    pub speed: i16,
    /// Blows per round, scaled by 100 (100 = one blow).
    pub num_blows: i32,
    /// Shots per round with the wielded launcher.
    pub num_shots: i32,
    /// Prowess damage multiplier in percent, at least 100.
    pub dam_multiplier: i32,
    /// Finesse to-hit score.
    pub to_finesse: i32,
    /// Throwing skill, reused as both finesse and prowess when throwing.
    pub skill_to_hit_throw: i32,
    /// Ammunition class the wielded launcher takes.
    pub ammo_tval: Option<ObjectClass>,
    /// Launcher damage multiplier (2 = longbow, 3 = crossbow...).
    pub ammo_mult: i32,
    /// Strength-derived throwing power.
    pub str_blow: i32,
    /// How hard the player is to hit.
    pub evasion: i32,
    /// Damage soaked from each incoming blow.
    pub armour: i32,
    pub flags: StateFlags,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            speed: 0,
            num_blows: 100,
            num_shots: 1,
            dam_multiplier: 100,
            to_finesse: 0,
            skill_to_hit_throw: 0,
            ammo_tval: None,
            ammo_mult: 0,
            str_blow: 20,
            evasion: 0,
            armour: 0,
            flags: StateFlags::empty(),
        }
    }
}

/// Equipped items, in the slots the combat code cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Object>,
    pub launcher: Option<Object>,
    pub light: Option<Object>,
    /// Rings, amulets, armour; anything else worn.
    pub worn: Vec<Object>,
}

impl Equipment {
    /// Everything equipped except the launcher, the set a melee slay scan
    /// covers.
    pub fn non_launcher(&self) -> impl Iterator<Item = &Object> {
        self.weapon
            .iter()
            .chain(self.light.iter())
            .chain(self.worn.iter())
    }

    /// Every equipped item.
    pub fn all(&self) -> impl Iterator<Item = &Object> {
        self.non_launcher().chain(self.launcher.iter())
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.weapon
            .iter_mut()
            .chain(self.light.iter_mut())
            .chain(self.worn.iter_mut())
            .chain(self.launcher.iter_mut())
    }
}

/// Resting mode, matching the classic negative-count encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rest {
    None,
    /// Rest a fixed number of turns.
    Count(i32),
    /// Rest until both hit points and mana are full.
    HpSp,
    /// Rest until fully recovered, ailments included.
    Done,
    /// Rest until either pool is full.
    HpOrSp,
}

impl Rest {
    pub fn is_resting(self) -> bool {
        !matches!(self, Rest::None)
    }
}

impl Default for Rest {
    fn default() -> Self {
        Rest::None
    }
}

/// The player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Position as (y, x).
    pub pos: (i32, i32),
    pub hp: Resource,
    pub sp: Resource,
    pub food: i32,
    pub exp: i64,
    pub max_exp: i64,
    pub level: i32,
    /// Constitution stat index, for recovery rates.
    pub con_ind: usize,
    /// Accumulated energy; actions subtract from it.
    pub energy: i32,
    /// Energy the action in progress will cost.
    pub energy_use: i32,
    pub timed: TimedEffects,
    pub state: PlayerState,
    pub equipment: Equipment,
    pub quiver: Vec<Object>,
    pub inventory: Vec<Object>,
    pub resting: Rest,
    pub running: bool,
    /// Repeat count for the current repeated command.
    pub command_rep: i32,
    pub searching: bool,
    /// Next melee hit confuses (glowing hands).
    pub confusing: bool,
    /// Turns until word of recall fires; 0 = inactive.
    pub word_recall: i32,
    pub is_dead: bool,
    pub died_from: Option<String>,
}

impl Player {
    pub fn new(max_hp: i16, max_sp: i16) -> Self {
        Self {
            pos: (0, 0),
            hp: Resource::new(max_hp),
            sp: Resource::new(max_sp),
            food: PY_FOOD_MAX / 2,
            exp: 0,
            max_exp: 0,
            level: 1,
            con_ind: 10,
            energy: 0,
            energy_use: 0,
            timed: TimedEffects::new(),
            state: PlayerState::default(),
            equipment: Equipment::default(),
            quiver: Vec::new(),
            inventory: Vec::new(),
            resting: Rest::None,
            running: false,
            command_rep: 0,
            searching: false,
            confusing: false,
            word_recall: 0,
            is_dead: false,
            died_from: None,
        }
    }

    /// Paralyzed or stunned senseless: the turn is forfeit but still costs
    /// full energy.
    pub fn is_incapacitated(&self) -> bool {
        self.timed.has(TimedKind::Paralyzed) || self.timed.get(TimedKind::Stunned) >= STUN_KNOCKOUT
    }

    /// Effective speed after the slow condition.
    pub fn effective_speed(&self) -> i16 {
        let mut speed = self.state.speed;
        if self.timed.has(TimedKind::Slow) {
            speed -= 10;
        }
        speed
    }

    /// Adjust food within [0, max]. Returns the clamped value.
    pub fn set_food(&mut self, food: i32) -> i32 {
        self.food = food.clamp(0, PY_FOOD_MAX);
        self.food
    }

    /// Cancel resting, running and repeated commands.
    pub fn disturb(&mut self) {
        self.resting = Rest::None;
        self.running = false;
        self.command_rep = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knockout_threshold() {
        let mut p = Player::new(20, 10);
        assert!(!p.is_incapacitated());
        p.timed.set(TimedKind::Stunned, 99);
        assert!(!p.is_incapacitated());
        p.timed.set(TimedKind::Stunned, 100);
        assert!(p.is_incapacitated());
        p.timed.clear(TimedKind::Stunned);
        p.timed.set(TimedKind::Paralyzed, 1);
        assert!(p.is_incapacitated());
    }

    #[test]
    fn slow_reduces_effective_speed() {
        let mut p = Player::new(20, 10);
        p.state.speed = 5;
        assert_eq!(p.effective_speed(), 5);
        p.timed.set(TimedKind::Slow, 3);
        assert_eq!(p.effective_speed(), -5);
    }

    #[test]
    fn food_is_clamped() {
        let mut p = Player::new(20, 10);
        assert_eq!(p.set_food(-50), 0);
        assert_eq!(p.set_food(PY_FOOD_MAX + 1), PY_FOOD_MAX);
    }

    #[test]
    fn disturb_cancels_multi_turn_state() {
        let mut p = Player::new(20, 10);
        p.resting = Rest::HpSp;
        p.running = true;
        p.command_rep = 10;
        p.disturb();
        assert_eq!(p.resting, Rest::None);
        assert!(!p.running);
        assert_eq!(p.command_rep, 0);
    }

    #[test]
    fn non_launcher_excludes_the_launcher() {
        let mut p = Player::new(20, 10);
        p.equipment.weapon = Some(crate::object::Object::new(
            "sword",
            crate::object::ObjectClass::Weapon,
        ));
        p.equipment.launcher = Some(crate::object::Object::new(
            "bow",
            crate::object::ObjectClass::Launcher,
        ));
        let names: Vec<_> = p.equipment.non_launcher().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["sword"]);
        assert_eq!(p.equipment.all().count(), 2);
    }
}
