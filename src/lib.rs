//! Powder Run - an arcade downhill snowboard runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, effects, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tunables;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate the balance constants are calibrated at.
    ///
    /// Horizontal `speed` is stored in units per reference frame and
    /// integrated with `dt * REF_FPS`; vertical velocity is units/second.
    pub const REF_FPS: f32 = 60.0;
    /// Maximum simulation step to prevent runaway integration after a stall
    pub const DT_MAX: f32 = 1.0 / 30.0;

    /// Lateral slots per spawned obstacle chunk
    pub const CHUNK_SLOTS: usize = 5;
    /// Extra reach added to every obstacle's collision radius
    pub const HIT_MARGIN: f32 = 0.3;
    /// Fixed damage for riding into a tree or rock
    pub const OBSTACLE_DAMAGE: f32 = 20.0;

    /// Camera shake starting intensity on impacts
    pub const SHAKE_INTENSITY: f32 = 0.5;
}

/// Forward unit vector (x, z plane) for a steering angle.
///
/// Downhill is -z; a zero angle points straight down the slope.
#[inline]
pub fn forward_dir(angle: f32) -> Vec3 {
    Vec3::new(-angle.sin(), 0.0, -angle.cos())
}
