//! Minimal monster turn processing.
//!
//! A monster asleep does nothing, panicked it flees, confused it staggers
//! at random; otherwise it closes on the player and strikes with its race
//! blows once adjacent. Anything smarter (pathing, spells, pack tactics)
//! belongs to a collaborator layered on top.

use crate::combat::{get_hit_chance, test_hit};
use crate::monster::Blow;
use crate::player::TimedKind;
use crate::world::{Handle, MessageKind, World};

/// Run one activation for the monster behind `handle`.
///
/// Energy accounting stays with the scheduler; a stale handle is a no-op.
pub fn process_monster(world: &mut World, handle: Handle) {
    let Some(monster) = world.monsters.get(handle) else {
        return;
    };
    if monster.is_asleep() {
        return;
    }

    let (my, mx) = monster.pos;
    let (py, px) = world.player.pos;
    let dy = py - my;
    let dx = px - mx;
    let adjacent = dy.abs() <= 1 && dx.abs() <= 1 && (dy, dx) != (0, 0);

    if monster.timed.has(TimedKind::Afraid) {
        let (sy, sx) = (-dy.signum(), -dx.signum());
        try_step(world, handle, sy, sx);
        return;
    }

    if monster.timed.has(TimedKind::Confused) {
        let sy = world.rng.uniform(3) as i32 - 1;
        let sx = world.rng.uniform(3) as i32 - 1;
        try_step(world, handle, sy, sx);
        return;
    }

    if adjacent {
        attack_player(world, handle);
    } else {
        try_step(world, handle, dy.signum(), dx.signum());
    }
}

/// Step by a direction if the destination cell is free.
fn try_step(world: &mut World, handle: Handle, dy: i32, dx: i32) {
    if (dy, dx) == (0, 0) {
        return;
    }
    let Some(monster) = world.monsters.get(handle) else {
        return;
    };
    let (ny, nx) = (monster.pos.0 + dy, monster.pos.1 + dx);
    if world.passable(ny, nx) {
        if let Some(monster) = world.monsters.get_mut(handle) {
            monster.pos = (ny, nx);
        }
    }
}

/// Swing every race blow at the adjacent player.
fn attack_player(world: &mut World, handle: Handle) {
    let Some(monster) = world.monsters.get(handle) else {
        return;
    };
    let name = monster.race.name.clone();
    let power = monster.race.power;
    let blows: Vec<Blow> = monster.race.blows.clone();
    let timed = monster.timed.clone();

    let chance = get_hit_chance(power, world.player.state.evasion);
    for blow in blows {
        if world.player.is_dead {
            break;
        }
        if !test_hit(&mut world.rng, chance, &timed, true) {
            world.notify(format!("The {name} misses you."), MessageKind::Combat);
            continue;
        }
        let raw = world.rng.damroll(blow.dd, blow.ds) as i32;
        let dmg = (raw - world.player.state.armour).max(0);
        world.notify(format!("The {name} hits you."), MessageKind::Combat);
        world.take_hit(dmg, &format!("a {name}"));
    }
}
