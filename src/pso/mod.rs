//! Discrete particle swarm optimization (NDPSO) over facility sets.
//!
//! There are no velocities: each particle perturbs copies of its position,
//! its personal best and the swarm best by single-facility exchanges, then
//! moves to the best of the three. Every move is accepted.

mod config;
mod particle;
mod runner;

pub use config::NdpsoConfig;
pub use particle::{exchange, Coefficients, Particle, Swarm};
pub use runner::NdpsoRunner;
