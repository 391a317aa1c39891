//! ab-core: the dungeon-crawl simulation engine.
//!
//! Pure game logic with no I/O: an energy-based turn scheduler over a
//! `World` of independently-speeded actors, a stochastic combat resolver
//! (melee, ranged, thrown), fixed-point regeneration, timed status effects
//! and the periodic world clock. Rendering, level generation, stores and
//! persistence are hosts and collaborators; the engine talks to them
//! through queued messages and events.

pub mod combat;
pub mod consts;
pub mod gameloop;
pub mod monster;
pub mod object;
pub mod player;
pub mod world;

pub use gameloop::{run_level, Command, CommandSource};
pub use world::{ActionError, LevelExit, World};
