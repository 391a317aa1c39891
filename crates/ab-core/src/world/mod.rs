//! The world context: every piece of mutable game state in one place.
//!
//! The scheduler and the combat resolver receive `&mut World` instead of
//! touching globals. Narrative output and collaborator work (stores, level
//! generation, item knowledge) leave the core as queued messages and
//! events; the host drains both.

pub mod arena;
pub mod clock;
pub mod errors;
pub mod level;

pub use arena::{Arena, Handle};
pub use errors::ActionError;
pub use level::{distance, projectile_path, Level};

use serde::{Deserialize, Serialize};
use strum::Display;

use ab_rng::GameRng;

use crate::monster::Monster;
use crate::object::Object;
use crate::player::Player;

/// Importance tag on a queued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MessageKind {
    #[strum(serialize = "info")]
    Info,
    #[strum(serialize = "combat")]
    Combat,
    #[strum(serialize = "warning")]
    Warning,
    #[strum(serialize = "danger")]
    Danger,
}

/// A line of narrative output, fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// Why `run_level` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelExit {
    Dead,
    Descend,
    Ascend,
    Recall,
    Quit,
}

/// Work delegated to collaborators outside the core.
///
/// The core decides *when*; the host decides *how*. Store maintenance,
/// monster placement and item knowledge all live behind these.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Daybreak in town; the host relights the surface.
    SunRise,
    /// Nightfall in town.
    SunSet,
    /// Pick an ambient sound for the current depth band.
    AmbientSound { depth: i32 },
    /// One store should restock its inventory.
    RestockStore,
    /// A shopkeeper retires and is replaced.
    ShuffleStore,
    /// The level generator should place a new wandering monster out of
    /// sight of the player.
    SpawnMonster,
    /// A heavy impact shook the dungeon around this point.
    Earthquake { pos: (i32, i32) },
    /// A projectile or thrown object came to rest here.
    DropObject { object: Object, pos: (i32, i32) },
    /// An equipped item's property revealed itself in combat.
    SlayObserved { verb: String, mult: i32 },
    /// The wearer of a cursed teleporter jumps somewhere random.
    TeleportPlayer { range: i32 },
}

/// All mutable game state for one level of play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Game-turn counter; ten game turns per normal-speed player action.
    turn: u64,
    /// Current dungeon depth, 0 for the town.
    pub depth: i32,
    pub max_depth: i32,
    pub level: Level,
    pub monsters: Arena<Monster>,
    pub player: Player,
    pub rng: GameRng,
    /// Set when the player is leaving the level; stops the scheduler.
    pub leaving: bool,
    pub exit: Option<LevelExit>,
    #[serde(skip)]
    pub messages: Vec<Message>,
    #[serde(skip)]
    pub events: Vec<WorldEvent>,
}

impl World {
    pub fn new(player: Player, level: Level, seed: u64) -> Self {
        Self {
            turn: 0,
            depth: 0,
            max_depth: 0,
            level,
            monsters: Arena::new(),
            player,
            rng: GameRng::new(seed),
            leaving: false,
            exit: None,
            messages: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The game-turn counter.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Advance the game-turn counter by one.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }

    /// Queue a narrative message for the host to display.
    pub fn notify(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.messages.push(Message {
            text: text.into(),
            kind,
        });
    }

    /// Queue collaborator work.
    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Take the queued messages, leaving the queue empty.
    pub fn drain_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// Take the queued events, leaving the queue empty.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn add_monster(&mut self, monster: Monster) -> Handle {
        self.monsters.insert(monster)
    }

    /// The live monster standing on a cell, if any.
    pub fn monster_at(&self, y: i32, x: i32) -> Option<Handle> {
        self.monsters
            .iter()
            .find(|(_, m)| m.pos == (y, x))
            .map(|(h, _)| h)
    }

    /// Can something walk into this cell right now?
    pub fn passable(&self, y: i32, x: i32) -> bool {
        self.level.is_floor(y, x) && self.player.pos != (y, x) && self.monster_at(y, x).is_none()
    }

    /// Cancel the player's rest, run and repeat state.
    pub fn disturb(&mut self) {
        self.player.disturb();
    }

    /// Damage the player, recording the cause if it kills.
    ///
    /// Death is a state transition, not an error: `leaving` flips and the
    /// scheduler returns `LevelExit::Dead`.
    pub fn take_hit(&mut self, dmg: i32, cause: &str) {
        if dmg <= 0 || self.player.is_dead {
            return;
        }
        self.disturb();
        self.player.hp.damage(dmg);
        if self.player.hp.cur < 0 {
            self.player.is_dead = true;
            self.player.died_from = Some(cause.to_string());
            self.leaving = true;
            self.exit = Some(LevelExit::Dead);
            self.notify("You die.", MessageKind::Danger);
        } else if self.player.hp.cur < self.player.hp.max / 4 {
            self.notify("*** LOW HITPOINT WARNING! ***", MessageKind::Danger);
        }
    }

    /// Remove a dead monster and credit the kill.
    pub fn kill_monster(&mut self, handle: Handle) {
        if let Some(monster) = self.monsters.remove(handle) {
            let text = if monster.race.is_unusual() {
                format!("You have destroyed {}.", monster.race.name)
            } else {
                format!("You have slain {}.", monster.race.name)
            };
            self.notify(text, MessageKind::Combat);
            self.player.exp += monster.maxhp as i64 / 10 + 1;
            self.player.max_exp = self.player.max_exp.max(self.player.exp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::MonsterRace;

    fn world() -> World {
        World::new(Player::new(30, 10), Level::open(20, 20), 42)
    }

    #[test]
    fn monster_lookup_by_cell() {
        let mut w = world();
        let h = w.add_monster(Monster::new(MonsterRace::new("rat"), 5, 3, 4));
        assert_eq!(w.monster_at(3, 4), Some(h));
        assert_eq!(w.monster_at(4, 3), None);
        assert!(!w.passable(3, 4));
        assert!(w.passable(3, 5));
    }

    #[test]
    fn lethal_hit_flips_the_exit() {
        let mut w = world();
        w.take_hit(31, "a grue");
        assert!(w.player.is_dead);
        assert!(w.leaving);
        assert_eq!(w.exit, Some(LevelExit::Dead));
        assert_eq!(w.player.died_from.as_deref(), Some("a grue"));
    }

    #[test]
    fn surviving_a_hit_disturbs() {
        let mut w = world();
        w.player.resting = crate::player::Rest::HpSp;
        w.take_hit(5, "a rat");
        assert!(!w.player.is_dead);
        assert_eq!(w.player.resting, crate::player::Rest::None);
    }

    #[test]
    fn kill_awards_experience() {
        let mut w = world();
        let h = w.add_monster(Monster::new(MonsterRace::new("orc"), 50, 2, 2));
        w.kill_monster(h);
        assert!(w.monsters.is_empty());
        assert_eq!(w.player.exp, 6);
    }

    #[test]
    fn save_round_trip_skips_queues() {
        let mut w = world();
        w.notify("hello", MessageKind::Info);
        w.emit(WorldEvent::SpawnMonster);
        let json = serde_json::to_string(&w).unwrap();
        let restored: World = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.turn(), w.turn());
        assert!(restored.messages.is_empty());
        assert!(restored.events.is_empty());
    }
}
