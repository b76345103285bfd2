//! Data-driven game balance
//!
//! Every tunable has a hard-coded default; a JSON overlay may override any
//! subset of fields and the rest fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Movement, steering, jump and spin-out tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Base acceleration, units per reference frame squared
    pub acceleration: f32,
    /// Speed cap for unboosted riding, units per reference frame
    pub max_speed: f32,
    /// Boost-pad target speed
    pub boost_speed: f32,

    // === Acceleration table (fractions of `acceleration`) ===
    /// Steering + forward
    pub carve_accel_scale: f32,
    /// Forward only
    pub accel_up_only_scale: f32,
    /// Back only (tuck)
    pub accel_down_only_scale: f32,
    /// Anything else, including steering alone
    pub accel_no_up_scale: f32,

    // === Friction regimes (per-reference-frame decay factors) ===
    pub carve_friction: f32,
    /// Speed cap while carving, fraction of `max_speed`
    pub carve_max_speed_frac: f32,
    pub steer_down_friction: f32,
    /// Absolute floor while steering + braking
    pub steer_down_min_speed: f32,
    pub steer_no_up_friction: f32,
    /// Speed cap while steering alone, fraction of `max_speed`
    pub steer_only_max_speed_frac: f32,
    pub straight_line_friction: f32,
    /// Floor while steering alone, fraction of `max_speed`
    pub steer_no_up_min_speed: f32,

    // === Steering ===
    /// Turn-angle scale when steering without forward input
    pub steer_no_up_turn_scale: f32,
    /// Extra turn angle (radians) when steering while braking
    pub steer_down_extra_turn_rad: f32,
    /// Angle interpolation per reference frame while carving
    pub carve_turn_interpolation: f32,
    /// Angle interpolation per reference frame otherwise
    pub steer_turn_interpolation: f32,
    /// Lean-back target while braking without steering
    pub steer_down_lean_back: f32,

    // === Spin-out ===
    /// Seconds of steer-only input before a spin-out triggers
    pub spin_out_threshold: f32,
    /// Timer value set on spin-out entry, seconds
    pub spin_out_duration: f32,
    /// Fall phase duration, seconds
    pub spin_out_fall_duration: f32,
    /// Spin rate, radians per reference frame
    pub spin_out_spin_speed: f32,
    /// Speed easing toward zero per reference frame while spun out
    pub spin_out_decel: f32,

    // === Jumping ===
    /// Launch force at zero charge
    pub jump_force_short: f32,
    /// Launch force at full charge
    pub jump_force_max: f32,
    /// Hold duration for a full charge (consumed upstream), milliseconds
    pub jump_charge_duration_ms: f32,
    /// Seconds after a ramp launch during which an assist jump is allowed
    pub ramp_assist_window: f32,
    /// Extra upward force from an assist jump
    pub ramp_assist_boost: f32,
    /// Upward launch force from a ramp
    pub ramp_force: f32,
    /// Units per reference frame squared
    pub gravity: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.02,
            max_speed: 1.1,
            boost_speed: 1.5,

            carve_accel_scale: 0.25,
            accel_up_only_scale: 0.78,
            accel_down_only_scale: 1.0,
            accel_no_up_scale: 0.55,

            carve_friction: 0.985,
            carve_max_speed_frac: 0.6,
            steer_down_friction: 0.98,
            steer_down_min_speed: 0.01,
            steer_no_up_friction: 0.997,
            steer_only_max_speed_frac: 0.75,
            straight_line_friction: 0.997,
            steer_no_up_min_speed: 0.3,

            steer_no_up_turn_scale: 0.5,
            steer_down_extra_turn_rad: std::f32::consts::FRAC_PI_4,
            carve_turn_interpolation: 0.25,
            steer_turn_interpolation: 0.15,
            steer_down_lean_back: 0.55,

            spin_out_threshold: 1.5,
            spin_out_duration: 1.0,
            spin_out_fall_duration: 0.8,
            spin_out_spin_speed: std::f32::consts::TAU / 45.0,
            spin_out_decel: 0.3,

            jump_force_short: 0.32,
            jump_force_max: 0.58,
            jump_charge_duration_ms: 400.0,
            ramp_assist_window: 50.0 / 60.0,
            ramp_assist_boost: 0.32,
            ramp_force: 0.55,
            gravity: 0.012,
        }
    }
}

/// Course layout tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Full lateral width of the play area
    pub play_area_width: f32,
    /// Edge band (from the boundary inward) where lateral drag applies
    pub obstacle_zone_margin: f32,
    /// Spawn a new chunk once the furthest obstacle is nearer than this
    pub look_ahead_distance: f32,
    /// Obstacles this far behind the player are retired
    pub despawn_distance: f32,
    /// Base forward gap between chunks
    pub chunk_spacing: f32,
    /// Random extra gap added per chunk
    pub chunk_spacing_jitter: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            play_area_width: 60.0,
            obstacle_zone_margin: 8.0,
            look_ahead_distance: 90.0,
            despawn_distance: 10.0,
            chunk_spacing: 18.0,
            chunk_spacing_jitter: 8.0,
        }
    }
}

/// Run rules and pickup timers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub max_hp: f32,
    pub max_lives: u32,
    /// Seconds a boost lasts
    pub boost_duration: f32,
    /// Seconds a standard shield lasts
    pub invincible_time: f32,
    /// Seconds until a carried dynamite detonates
    pub dynamite_time: f32,
    pub dynamite_damage: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            max_lives: 5,
            boost_duration: 3.0,
            invincible_time: 6.0,
            dynamite_time: 5.0,
            dynamite_damage: 85.0,
        }
    }
}

/// Complete configuration surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub physics: PhysicsTuning,
    pub world: WorldTuning,
    pub game: GameTuning,
}

impl Tunables {
    /// Parse a JSON overlay. Missing fields keep their defaults; a malformed
    /// document falls back to the defaults entirely.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Bad tuning overlay ({e}), using defaults");
                Self::default()
            }
        }
    }
}
