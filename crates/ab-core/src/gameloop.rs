//! The energy scheduler: who acts next and what a turn costs.
//!
//! Actors accumulate energy each game turn according to their speed; an
//! action needs 100. Monsters with strictly more energy than the player act
//! first, fastest first, and a fast monster can act several times per
//! player turn. Once nobody can act, the world clock ticks and everyone is
//! granted fresh energy.

use serde::{Deserialize, Serialize};

use crate::combat::{fire, py_attack, throw, Aim, ThrowItem};
use crate::consts::{energy_gain, COMPACT_SLACK, TURN_ENERGY};
use crate::monster::ai;
use crate::player::Rest;
use crate::world::{clock, Handle, LevelExit, MessageKind, World};

/// A decoded player action, handed in by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Step in a direction; stepping into a monster attacks it.
    Walk { dy: i32, dx: i32 },
    Fire { ammo: usize, aim: Aim },
    Throw { item: ThrowItem, aim: Aim },
    Rest(Rest),
    /// Toggle search mode.
    Search,
    /// Stand still for a turn.
    Hold,
    Descend,
    Ascend,
    Quit,
}

/// Supplies the next player command.
///
/// The only suspension point in the engine: `run_level` blocks here and
/// nowhere else.
pub trait CommandSource {
    fn next_command(&mut self, world: &World) -> Command;
}

/// Drive the level until the player leaves it.
pub fn run_level(world: &mut World, commands: &mut dyn CommandSource) -> LevelExit {
    world.leaving = false;
    world.exit = None;

    loop {
        compact_if_slack(world);

        while world.player.energy >= TURN_ENERGY && !world.leaving {
            // Monsters that out-ran the player go first.
            process_monsters(world, world.player.energy + 1);
            if world.leaving {
                break;
            }
            process_player(world, commands);
        }
        if world.leaving {
            break;
        }

        process_monsters(world, TURN_ENERGY);

        world.advance_turn();
        clock::process_world(world);
        if world.leaving {
            break;
        }

        grant_energy(world);
    }

    world.exit.unwrap_or(LevelExit::Quit)
}

/// Reclaim arena slots once enough of them sit empty.
fn compact_if_slack(world: &mut World) {
    if world.monsters.capacity() - world.monsters.len() > COMPACT_SLACK {
        world.monsters.compact();
    }
}

/// Let every monster at or above the energy floor take one activation.
///
/// Descending energy order, table order on ties; the sort is stable so
/// equal-energy monsters keep their arena order.
fn process_monsters(world: &mut World, min_energy: i32) {
    let mut ready: Vec<(Handle, i32)> = world
        .monsters
        .iter()
        .filter(|(_, m)| m.energy >= min_energy)
        .map(|(h, m)| (h, m.energy))
        .collect();
    ready.sort_by_key(|&(_, energy)| std::cmp::Reverse(energy));

    for (handle, _) in ready {
        if !world.monsters.contains(handle) {
            continue;
        }
        ai::process_monster(world, handle);
        if let Some(monster) = world.monsters.get_mut(handle) {
            monster.energy -= TURN_ENERGY;
        }
        if world.leaving {
            return;
        }
    }
}

/// One player activation: forfeit, rest, or dispatch commands until one
/// actually costs energy.
fn process_player(world: &mut World, commands: &mut dyn CommandSource) {
    world.player.energy_use = 0;

    if world.player.is_incapacitated() {
        // Knocked out or held: the turn passes at full cost.
        world.player.energy_use = TURN_ENERGY;
    } else {
        stop_resting_if_done(world);
        if world.player.resting.is_resting() {
            if let Rest::Count(n) = world.player.resting {
                world.player.resting = if n <= 1 { Rest::None } else { Rest::Count(n - 1) };
            }
            world.player.energy_use = TURN_ENERGY;
        } else {
            while world.player.energy_use == 0 && !world.leaving {
                let command = commands.next_command(world);
                dispatch(world, command);
            }
        }
    }

    world.player.energy -= world.player.energy_use;
}

/// Rest modes that finish on their own.
fn stop_resting_if_done(world: &mut World) {
    let player = &world.player;
    let done = match player.resting {
        Rest::None | Rest::Count(_) => false,
        Rest::HpSp => player.hp.is_full() && player.sp.is_full(),
        Rest::HpOrSp => player.hp.is_full() || player.sp.is_full(),
        Rest::Done => player.hp.is_full() && player.sp.is_full() && !player.timed.any_active(),
    };
    if done {
        world.player.resting = Rest::None;
    }
}

/// Execute one command. Zero `energy_use` afterwards means the action never
/// started and the scheduler will ask for another command.
fn dispatch(world: &mut World, command: Command) {
    match command {
        Command::Walk { dy, dx } => {
            let (py, px) = world.player.pos;
            let (ny, nx) = (py + dy, px + dx);
            if let Some(target) = world.monster_at(ny, nx) {
                py_attack(world, target);
            } else if world.level.is_floor(ny, nx) {
                world.player.pos = (ny, nx);
                world.player.energy_use = TURN_ENERGY;
            } else {
                world.notify("There is a wall in the way!", MessageKind::Info);
            }
        }
        Command::Fire { ammo, aim } => {
            if let Err(err) = fire(world, ammo, aim) {
                world.notify(err.to_string(), MessageKind::Warning);
            }
        }
        Command::Throw { item, aim } => {
            if let Err(err) = throw(world, item, aim) {
                world.notify(err.to_string(), MessageKind::Warning);
            }
        }
        Command::Rest(mode) => {
            world.player.resting = mode;
            world.player.energy_use = TURN_ENERGY;
        }
        Command::Search => {
            world.player.searching = !world.player.searching;
            world.player.energy_use = TURN_ENERGY;
        }
        Command::Hold => {
            world.player.energy_use = TURN_ENERGY;
        }
        Command::Descend => {
            world.leaving = true;
            world.exit = Some(LevelExit::Descend);
            world.player.energy_use = TURN_ENERGY;
        }
        Command::Ascend => {
            world.leaving = true;
            world.exit = Some(LevelExit::Ascend);
            world.player.energy_use = TURN_ENERGY;
        }
        Command::Quit => {
            world.leaving = true;
            world.exit = Some(LevelExit::Quit);
        }
    }
}

/// Speed-scaled energy for everyone still standing.
fn grant_energy(world: &mut World) {
    world.player.energy += energy_gain(world.player.effective_speed());
    for (_, monster) in world.monsters.iter_mut() {
        monster.energy += energy_gain(monster.race.speed);
    }
}
