//! Periodic world maintenance.
//!
//! Runs every ten game turns: hazards, hunger, regeneration, timed-effect
//! decay, light fuel, recharging and the recall countdown. Monster healing
//! runs on a coarser hundred-turn cadence, day/night and store upkeep on
//! coarser multiples still. Everything here is best-effort and clamped;
//! nothing returns an error.

use crate::consts::{
    energy_gain, con_recovery, MAX_M_ALLOC_CHANCE, MONSTER_REGEN_TICK,
    PY_FOOD_FAINT, PY_FOOD_MAX, PY_FOOD_STARVE, PY_FOOD_WEAK, PY_REGEN_FAINT, PY_REGEN_HPBASE,
    PY_REGEN_MNBASE, PY_REGEN_NORMAL, PY_REGEN_WEAK, STORE_SHUFFLE, STORE_TURNS, TOWN_DAWN,
    WORLD_TICK,
};
use crate::object::{ObjectClass, ObjectFlags};
use crate::player::{StateFlags, TimedKind};
use crate::world::{MessageKind, World, WorldEvent};

/// True during the daylight half of the town day.
fn is_daytime(turn: u64) -> bool {
    turn % (10 * TOWN_DAWN) < 10 * TOWN_DAWN / 2
}

/// One world maintenance pass. A no-op except every tenth game turn.
pub fn process_world(world: &mut World) {
    if world.turn() % WORLD_TICK != 0 {
        return;
    }

    world.emit(WorldEvent::AmbientSound { depth: world.depth });

    day_and_stores(world);

    // A wandering monster, once in a while.
    if world.rng.one_in(MAX_M_ALLOC_CHANCE) {
        world.emit(WorldEvent::SpawnMonster);
    }

    if world.turn() % MONSTER_REGEN_TICK == 0 {
        for (_, monster) in world.monsters.iter_mut() {
            monster.regenerate();
        }
    }

    damage_over_time(world);
    digest_food(world);
    regenerate_player(world);
    decay_timed(world);
    burn_light_fuel(world);
    drain_and_teleport(world);
    recharge(world);
    count_down_recall(world);
}

/// Town sunrise/sunset and the dungeon-side store cadence.
fn day_and_stores(world: &mut World) {
    if world.depth == 0 {
        let cycle = 10 * TOWN_DAWN;
        let phase = world.turn() % cycle;
        if phase == 0 {
            world.notify("The sun has risen.", MessageKind::Info);
            world.emit(WorldEvent::SunRise);
        } else if phase == cycle / 2 {
            world.notify("The sun has fallen.", MessageKind::Info);
            world.emit(WorldEvent::SunSet);
        }
    } else if world.turn() % (10 * STORE_TURNS) == 0 {
        // Stores change stock while the player is away underground.
        if world.rng.one_in(STORE_SHUFFLE) {
            world.emit(WorldEvent::ShuffleStore);
        } else {
            world.emit(WorldEvent::RestockStore);
        }
    }
}

/// Poison and bleeding tick the player down.
fn damage_over_time(world: &mut World) {
    if world.player.timed.has(TimedKind::Poisoned) {
        world.take_hit(1, "poison");
    }

    let cut = world.player.timed.get(TimedKind::Cut);
    if cut > 0 {
        let dmg = if cut > 200 {
            3
        } else if cut > 100 {
            2
        } else {
            1
        };
        world.take_hit(dmg, "a fatal wound");
    }
}

/// Burn food; faint and starve when it runs out.
fn digest_food(world: &mut World) {
    let food = world.player.food;
    if food >= PY_FOOD_MAX {
        // Gorged: burn it off fast.
        world.player.set_food(food - 100);
    } else if world.turn() % 100 == 0 {
        let mut burn = energy_gain(world.player.effective_speed()) * 2;
        if world.player.state.flags.contains(StateFlags::REGENERATE) {
            burn += 30;
        }
        if world.player.state.flags.contains(StateFlags::SLOW_DIGEST) {
            burn -= 10;
        }
        world.player.set_food(food - burn.max(1));
    }

    let food = world.player.food;
    if food < PY_FOOD_FAINT
        && !world.player.timed.has(TimedKind::Paralyzed)
        && world.rng.one_in(10)
    {
        world.notify("You faint from the lack of food!", MessageKind::Danger);
        world.disturb();
        let dur = 1 + world.rng.uniform(5) as i32;
        world.player.timed.inc(TimedKind::Paralyzed, dur);
    }
    if food < PY_FOOD_STARVE {
        world.take_hit((PY_FOOD_STARVE - food) / 10, "starvation");
    }
}

/// Fixed-point hit-point and mana recovery.
fn regenerate_player(world: &mut World) {
    let player = &mut world.player;
    let resting = player.resting.is_resting() || player.searching;

    // Mana ignores hunger; only impairment slows it.
    let mut sp_rate = PY_REGEN_NORMAL;
    if resting {
        sp_rate *= 2;
    }
    if player.state.flags.contains(StateFlags::REGENERATE) {
        sp_rate *= 2;
    }
    if player.state.flags.contains(StateFlags::IMPAIR_MANA) {
        sp_rate /= 2;
    }
    player.sp.regenerate(sp_rate, PY_REGEN_MNBASE);

    let mut hp_rate = if player.food < PY_FOOD_STARVE {
        0
    } else if player.food < PY_FOOD_FAINT {
        PY_REGEN_FAINT
    } else if player.food < PY_FOOD_WEAK {
        PY_REGEN_WEAK
    } else {
        PY_REGEN_NORMAL
    };
    if resting {
        hp_rate *= 2;
    }
    if player.state.flags.contains(StateFlags::REGENERATE) {
        hp_rate *= 2;
    }
    if player.state.flags.contains(StateFlags::IMPAIR_HP) {
        hp_rate /= 2;
    }

    // Wounds and afflictions stop hit points entirely, not mana.
    let blocked = player.timed.has(TimedKind::Paralyzed)
        || player.timed.has(TimedKind::Poisoned)
        || player.timed.has(TimedKind::Stunned)
        || player.timed.has(TimedKind::Cut);
    if !blocked {
        player.hp.regenerate(hp_rate, PY_REGEN_HPBASE);
    }
}

/// Decay every active timed effect and announce the ones that wore off.
fn decay_timed(world: &mut World) {
    let recovery = con_recovery(world.player.con_ind);
    let expired = world.player.timed.decay_all(recovery);
    for kind in expired {
        world.notify(format!("You are no longer {kind}."), MessageKind::Info);
    }
    for (_, monster) in world.monsters.iter_mut() {
        monster.timed.decay_all(1);
    }
}

/// Burn a unit of light fuel, with low-fuel warnings.
fn burn_light_fuel(world: &mut World) {
    // No burn in town daylight; the sun is free.
    if world.depth == 0 && is_daytime(world.turn()) {
        return;
    }

    let blind = world.player.timed.has(TimedKind::Blind);
    let mut went_out = false;
    let mut growing_faint = false;
    if let Some(light) = &mut world.player.equipment.light {
        if !light.flags.contains(ObjectFlags::NO_FUEL) && !light.artifact && light.timeout > 0 {
            light.timeout -= 1;
            if light.timeout == 0 {
                if blind {
                    // The flame cannot die while its bearer cannot see it.
                    light.timeout = 1;
                } else {
                    went_out = true;
                }
            } else if light.timeout < 100 && light.timeout % 10 == 0 && !blind {
                growing_faint = true;
            }
        }
    }

    if went_out {
        world.disturb();
        world.notify("Your light has gone out!", MessageKind::Warning);
    } else if growing_faint {
        world.disturb();
        world.notify("Your light is growing faint!", MessageKind::Warning);
    }
}

/// Cursed-equipment side effects: experience drain and random teleport.
fn drain_and_teleport(world: &mut World) {
    if world.player.state.flags.contains(StateFlags::EXP_DRAIN)
        && world.rng.one_in(10)
        && world.player.exp > 0
    {
        world.player.exp -= 1;
        world.player.max_exp -= 1;
    }

    if world.player.state.flags.contains(StateFlags::TELEPORT) && world.rng.one_in(100) {
        world.disturb();
        world.notify("Your position suddenly seems very uncertain...", MessageKind::Warning);
        world.emit(WorldEvent::TeleportPlayer { range: 40 });
    }
}

/// Count down equipment timeouts and recharge carried rod stacks.
fn recharge(world: &mut World) {
    let mut equip_done = false;
    for item in world.player.equipment.all_mut() {
        if item.class == ObjectClass::Light {
            continue;
        }
        if item.timeout > 0 {
            item.timeout -= 1;
            if item.timeout == 0 {
                equip_done = true;
            }
        }
    }

    // A stack of rods recharges in parallel, one unit per charging rod.
    let mut rods_done = false;
    for item in world.player.inventory.iter_mut() {
        if item.class == ObjectClass::Rod && item.timeout > 0 && item.time_base > 0 {
            let charging = (item.timeout + item.time_base - 1) / item.time_base;
            item.timeout = (item.timeout - charging.min(item.number)).max(0);
            if item.timeout == 0 {
                rods_done = true;
            }
        }
    }

    if equip_done {
        world.notify("One of your items has recharged.", MessageKind::Info);
    }
    if rods_done {
        world.notify("Your rods have finished recharging.", MessageKind::Info);
    }
}

/// Word of recall pulls the player off the level when it hits zero.
fn count_down_recall(world: &mut World) {
    if world.player.word_recall == 0 {
        return;
    }
    world.player.word_recall -= 1;
    if world.player.word_recall == 0 {
        world.disturb();
        if world.depth > 0 {
            world.notify("You feel yourself yanked upwards!", MessageKind::Warning);
        } else {
            world.notify("You feel yourself yanked downwards!", MessageKind::Warning);
        }
        world.leaving = true;
        world.exit = Some(crate::world::LevelExit::Recall);
    }
}
