//! Swarm choreography and collision engine for a Galaga-style shooter.
//!
//! The library holds the whole simulation: aliens flying scripted paths,
//! the player ship, torpedo pools, effects and the fixed-tick game clock.
//! Terminal I/O lives in the binary.

pub mod alien;
pub mod arena;
pub mod audio;
pub mod clock;
pub mod config;
pub mod constants;
pub mod effects;
pub mod entities;
pub mod error;
pub mod game;
pub mod highscores;
pub mod level;
pub mod paths;
pub mod player;
pub mod swarm;
pub mod torpedoes;
