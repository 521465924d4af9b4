//! Petridish is a small real-time colony simulation.
//!
//! ## Bacteria
//! Five teams of coloured bacteria swim around a rectangular dish in straight lines,
//! bouncing off the edges. Every 10 to 15 seconds a bacterium divides into two
//! children of the next generation, as long as its team has not hit the population
//! limit. Every generation is one unit bigger than the last.
//!
//! ## Fights
//! When two bacteria touch, what happens depends on their teams.
//! Allies push each other apart, the faster one gives way less.
//! Enemies fight: the higher generation wins, equal generations kill each other.
//!
//! ## Mutations
//! On division there is a small chance that both children pick up a mutation.
//! Fast reproduction halves the time between divisions, explosive death takes the
//! winner of a lost fight along, fertile death leaves three fresh bacteria behind.
//! Mutations are inherited and never lost.
//!
//! # Hacking
//! [`app::Simulation`] holds the dish and exposes everything a frontend needs:
//! `tick` once per frame, the spawn/kill/drag commands in between, and a
//! [`snapshot::Snapshot`] to draw. Frontends hand their control values over
//! through the [`config::ControlPanel`] trait. Tunables live in [`config`].

pub mod app;
pub mod bacterium;
pub mod collision;
pub mod config;
pub mod error;
pub mod genome;
pub mod pointer;
pub mod report;
pub mod snapshot;
pub mod spawner;
pub mod stablevec;
pub mod vecmath;

pub use app::Simulation;
pub use error::ConfigError;
