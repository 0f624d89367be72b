//! Sprint: a top-down racing game on bitmap tracks.
//!
//! Cars are driven by the keyboard or by waypoint-pursuing AI, collide with
//! the track and with each other through pixel masks, take damage that
//! degrades their handling, and race for a configurable number of laps.
//!
//! Everything that decides the outcome of a race (physics, AI, collision,
//! damage, lap timing) is plain Rust over [`race::Car`] values and runs
//! without a window; the Bevy plugins in [`menu`] and [`simulation`] wire it
//! into the game loop.

pub mod ai;
pub mod collision;
pub mod config;
pub mod constants;
pub mod damage;
pub mod error;
pub mod graphics;
pub mod lap;
pub mod mask;
pub mod menu;
pub mod race;
pub mod rendering;
pub mod simulation;
pub mod track;
pub mod vehicle;
