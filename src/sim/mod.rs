//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep, clamped to an upper bound
//! - Seeded RNG only (owned by the world state)
//! - No rendering or platform dependencies; the presentation layer is
//!   reached solely through the [`Host`] trait

pub mod camera;
pub mod effects;
pub mod host;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use camera::{start_shake, update_camera};
pub use effects::{merge_staged, update_effects};
pub use host::{Host, NullHost};
pub use obstacles::{SpawnKind, break_box, spawn_chunk, spawn_obstacle, update_obstacles};
pub use physics::update_physics;
pub use state::{
    GamePhase, InputState, Obstacle, ObstacleKind, Particle, Player, PlayerStats, RingEffect,
    Spark, SpinOut, SpinOutPhase, TrailMark, WorldState,
};
pub use tick::{TickInput, apply_damage, reset, tick};
