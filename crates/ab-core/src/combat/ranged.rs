//! Missile combat: firing from a launcher and throwing by hand.
//!
//! Both trace a projectile path cell by cell, attack whatever occupies the
//! final cell, then roll breakage and drop the remainder where it landed.

use serde::{Deserialize, Serialize};

use crate::combat::{critical_melee, critical_shot, get_hit_chance, test_hit, HitTier};
use crate::consts::TURN_ENERGY;
use crate::object::{best_slay, Object};
use crate::world::{
    distance, projectile_path, ActionError, Handle, MessageKind, World, WorldEvent,
};

/// Where a missile is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aim {
    /// Fire in a direction; the path extends well past anything targetable.
    Dir { dy: i32, dx: i32 },
    /// Fire at a specific cell.
    Target { y: i32, x: i32 },
}

/// What the player is trying to throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowItem {
    Inventory(usize),
    /// The wielded weapon; always refused.
    Wielded,
}

/// Maximum distance a thrown object of the given weight can travel.
pub fn throw_range(str_blow: i32, weight: i32) -> i32 {
    ((str_blow + 20) * 10 / weight.max(10)).min(10)
}

/// Fire one round of ammunition from the wielded launcher.
///
/// Costs `100 / shots` energy; a precondition failure costs nothing.
pub fn fire(world: &mut World, ammo: usize, aim: Aim) -> Result<(), ActionError> {
    let Some(launcher) = world.player.equipment.launcher.clone() else {
        return Err(ActionError::NothingToFireWith);
    };
    let Some(missile) = world.player.quiver.get(ammo).cloned() else {
        return Err(ActionError::NoSuchItem);
    };
    if !missile.is_ammo() || world.player.state.ammo_tval != Some(missile.class) {
        return Err(ActionError::AmmoMismatch);
    }

    let range = 6 + 2 * world.player.state.ammo_mult;
    let (cell, victim) = trace(world, aim, range)?;

    let mut hit_target = false;
    if let Some(victim) = victim {
        let (py, px) = world.player.pos;
        let dist = distance(py, px, cell.0, cell.1);
        let attack = MissileAttack {
            // The hit roll is the melee one, degraded by distance.
            chance: get_hit_chance(world.player.state.to_finesse, evasion_of(world, victim))
                - dist,
            dice: (missile.dd, missile.ds),
            prowess_bonus: launcher.to_prowess + missile.to_prowess,
            launcher_mult: world.player.state.ammo_mult.max(1),
            crit: Crit::Shot {
                weight: missile.weight,
                plus: world.player.state.to_finesse + missile.to_finesse,
            },
            slay_items: vec![missile.clone(), launcher.clone()],
            verb: "hits".to_string(),
            name: missile.name.clone(),
        };
        hit_target = attack_with_missile(world, victim, &attack);
    }

    consume_missile(world, &missile, cell, hit_target);
    remove_from_quiver(world, ammo);
    world.player.energy_use = TURN_ENERGY / world.player.state.num_shots.max(1);
    Ok(())
}

/// Throw an object from the pack.
///
/// A full-turn action. Thrown objects use the throwing skill for both
/// critical inputs and take only half the distance penalty.
pub fn throw(world: &mut World, item: ThrowItem, aim: Aim) -> Result<(), ActionError> {
    let index = match item {
        ThrowItem::Wielded => return Err(ActionError::ThrowWielded),
        ThrowItem::Inventory(index) => index,
    };
    let Some(missile) = world.player.inventory.get(index).cloned() else {
        return Err(ActionError::NoSuchItem);
    };

    let range = throw_range(world.player.state.str_blow, missile.weight);
    let (cell, victim) = trace(world, aim, range)?;

    let skill = world.player.state.skill_to_hit_throw;
    let mut hit_target = false;
    if let Some(victim) = victim {
        let (py, px) = world.player.pos;
        let dist = distance(py, px, cell.0, cell.1);
        let attack = MissileAttack {
            // Half the distance penalty of a fired shot.
            chance: get_hit_chance(world.player.state.to_finesse, evasion_of(world, victim))
                - dist / 2,
            dice: (missile.dd, missile.ds),
            prowess_bonus: missile.to_prowess,
            launcher_mult: 1,
            crit: Crit::Melee {
                finesse: skill,
                prowess: skill,
            },
            slay_items: vec![missile.clone()],
            verb: "hits".to_string(),
            name: missile.name.clone(),
        };
        hit_target = attack_with_missile(world, victim, &attack);
    }

    consume_missile(world, &missile, cell, hit_target);
    remove_from_inventory(world, index);
    world.player.energy_use = TURN_ENERGY;
    Ok(())
}

/// Which critical formula a missile uses.
enum Crit {
    Shot { weight: i32, plus: i32 },
    Melee { finesse: i32, prowess: i32 },
}

struct MissileAttack {
    chance: i32,
    dice: (u32, u32),
    prowess_bonus: i32,
    launcher_mult: i32,
    crit: Crit,
    slay_items: Vec<Object>,
    verb: String,
    name: String,
}

fn evasion_of(world: &World, victim: Handle) -> i32 {
    world.monsters.get(victim).map_or(0, |m| m.race.evasion)
}

/// Walk the projectile path and find the cell the missile ends up in.
///
/// The path stops before walls on its own; the first occupied cell along
/// the way also stops it, and that occupant becomes the target.
fn trace(world: &World, aim: Aim, range: i32) -> Result<((i32, i32), Option<Handle>), ActionError> {
    let (py, px) = world.player.pos;
    let to = match aim {
        // 99 cells out models "fire that way".
        Aim::Dir { dy, dx } => (py + dy.signum() * 99, px + dx.signum() * 99),
        Aim::Target { y, x } => (y, x),
    };
    let path = projectile_path(&world.level, (py, px), to, range);

    let mut last = None;
    for &(y, x) in &path {
        last = Some((y, x));
        if let Some(victim) = world.monster_at(y, x) {
            return Ok(((y, x), Some(victim)));
        }
    }
    last.map(|cell| (cell, None)).ok_or(ActionError::OutOfReach)
}

/// Resolve the missile against the occupant of its final cell.
///
/// Returns true when the missile connected, which feeds the breakage roll.
fn attack_with_missile(world: &mut World, victim: Handle, attack: &MissileAttack) -> bool {
    let Some(monster) = world.monsters.get(victim) else {
        return false;
    };
    let name = monster.race.name.clone();
    let defender_flags = monster.race.flags;
    let visible = monster.visible;

    if !test_hit(&mut world.rng, attack.chance, &world.player.timed, visible) {
        world.notify(
            format!("The {} misses the {name}.", attack.name),
            MessageKind::Combat,
        );
        return false;
    }

    let mut dmg = world.rng.damroll(attack.dice.0, attack.dice.1) as i32 + attack.prowess_bonus;

    let mut verb = attack.verb.clone();
    if let Some((slay, mult)) = best_slay(attack.slay_items.iter(), defender_flags) {
        verb = slay.range_verb.clone();
        let observed = WorldEvent::SlayObserved {
            verb: verb.clone(),
            mult,
        };
        dmg = dmg * mult / 100;
        world.emit(observed);
    }
    dmg *= attack.launcher_mult;

    let (dmg, tier) = match attack.crit {
        Crit::Shot { weight, plus } => {
            critical_shot(&mut world.rng, weight, plus, world.player.level, dmg)
        }
        Crit::Melee { finesse, prowess } => critical_melee(&mut world.rng, finesse, prowess, dmg),
    };
    let dmg = dmg.max(0);

    if tier == HitTier::Normal {
        world.notify(
            format!("The {} {verb} the {name}.", attack.name),
            MessageKind::Combat,
        );
    } else {
        world.notify(
            format!("It was a {tier}! The {} {verb} the {name}.", attack.name),
            MessageKind::Combat,
        );
    }

    let hit = match world.monsters.get_mut(victim) {
        Some(monster) => monster.take_hit(dmg, &mut world.rng),
        None => return true,
    };
    if hit.died {
        world.kill_monster(victim);
    } else if hit.fear {
        world.notify(format!("The {name} flees in terror!"), MessageKind::Combat);
    }
    true
}

/// Roll breakage and drop a single survivor at the final cell.
fn consume_missile(world: &mut World, missile: &Object, cell: (i32, i32), hit_target: bool) {
    let breakage = missile.breakage_chance(hit_target);
    if world.rng.percent(breakage.clamp(0, 100) as u32) {
        return;
    }
    let mut dropped = missile.clone();
    dropped.number = 1;
    world.emit(WorldEvent::DropObject {
        object: dropped,
        pos: cell,
    });
}

fn remove_from_quiver(world: &mut World, index: usize) {
    if let Some(stack) = world.player.quiver.get_mut(index) {
        stack.number -= 1;
        if stack.number <= 0 {
            world.player.quiver.remove(index);
        }
    }
}

fn remove_from_inventory(world: &mut World, index: usize) {
    if let Some(stack) = world.player.inventory.get_mut(index) {
        stack.number -= 1;
        if stack.number <= 0 {
            world.player.inventory.remove(index);
        }
    }
}
