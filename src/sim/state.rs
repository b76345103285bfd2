//! Game state and core simulation types
//!
//! The single authoritative record of everything the simulation mutates.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tunables;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title/menu, nothing simulated
    Menu,
    /// Active run
    Playing,
    /// Run frozen, tick is a no-op
    Paused,
    /// Run ended
    GameOver,
}

/// The player entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Gameplay steering angle (radians, 0 = straight downhill)
    pub angle: f32,
    /// Display-only spin during a spin-out; never feeds movement heading
    pub visual_spin_angle: f32,
    /// Braking posture, eased toward a target each tick
    pub lean_back: f32,
}

/// Run-scoped player stats and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub hp: f32,
    pub lives: u32,
    pub is_jumping: bool,
    /// Set on a manual jump, cleared on landing. Gates elevated-box breaks:
    /// falling past one without having jumped never scores it.
    pub did_jump_this_airtime: bool,
    /// Seconds since the last ramp launch, while airborne from a ramp
    pub ramp_launch_age: Option<f32>,
    pub can_ramp_assist_jump: bool,
    pub invincible_timer: f32,
    pub has_dynamite: bool,
    pub dynamite_timer: f32,
    /// Straight landings since pickup; two defuse the stick
    pub dynamite_jump_count: u32,
    pub boost_timer: f32,
    pub boost_target_speed: f32,
    /// Last whole second announced by the dynamite countdown
    pub last_dynamite_sec_shown: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hp: 100.0,
            lives: 3,
            is_jumping: false,
            did_jump_this_airtime: false,
            ramp_launch_age: None,
            can_ramp_assist_jump: false,
            invincible_timer: 0.0,
            has_dynamite: false,
            dynamite_timer: 0.0,
            dynamite_jump_count: 0,
            boost_timer: 0.0,
            boost_target_speed: 0.0,
            last_dynamite_sec_shown: 0,
        }
    }
}

/// Spin-out recovery phases, strictly ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinOutPhase {
    #[default]
    Idle,
    Spinning,
    Falling,
    Recovered,
}

/// The spin-out state machine record. Exactly one lives in [`WorldState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinOut {
    pub phase: SpinOutPhase,
    /// Accumulated spin angle, 0..=2π for one full rotation
    pub angle_accum: f32,
    /// +1 or -1
    pub direction: f32,
    /// Fall-duration countdown, seconds
    pub timer: f32,
}

impl Default for SpinOut {
    fn default() -> Self {
        Self {
            phase: SpinOutPhase::Idle,
            angle_accum: 0.0,
            direction: 1.0,
            timer: 0.0,
        }
    }
}

impl SpinOut {
    pub fn active(&self) -> bool {
        self.phase != SpinOutPhase::Idle
    }

    /// Return to the inactive state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
    Boost,
    Box,
    Ramp,
}

/// Boost-pad arrow animation, rendering only
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ArrowAnim {
    pub phase: f32,
    pub offset: f32,
}

/// A course obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub rotation: Vec3,
    /// Collision radius in the horizontal plane
    pub radius: f32,
    pub height: f32,
    /// Player height required to break an elevated box
    #[serde(default)]
    pub break_height: Option<f32>,
    /// Elevated boxes pair with a ramp and need an airborne, already-jumped hit
    #[serde(default)]
    pub elevated: bool,
    /// Idle rotation drift, radians per reference frame
    #[serde(default)]
    pub rotation_vel: Option<Vec3>,
    #[serde(default)]
    pub arrow: Option<ArrowAnim>,
    /// Guards the one-time "missed" message on elevated boxes
    #[serde(default)]
    pub missed_notification_shown: bool,
}

/// A short-lived spray/burst particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// 0-1, decreases over time
    pub life: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
}

/// An expanding reward ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingEffect {
    pub id: u32,
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
    pub inner: f32,
    pub outer: f32,
    pub color: u32,
}

/// A boost trail mark left on the snow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailMark {
    pub id: u32,
    pub position: Vec3,
    pub angle: f32,
    pub life: f32,
}

/// A spark shed by a carried dynamite stick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub life: f32,
}

/// Follow camera state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    pub target_x: f32,
    pub target_z: f32,
    pub look_at: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, 12.0),
            target_x: 0.0,
            target_z: 8.0,
            look_at: Vec3::new(0.0, 0.0, -5.0),
        }
    }
}

/// Decaying shake impulse; jitter is derived per frame, only the
/// intensity persists
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CameraShake {
    pub intensity: f32,
}

/// Shield/invincibility presentation values driven by the physics step
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Visuals {
    pub shield_pulse_time: f32,
    pub shield_flicker_phase: f32,
    pub shield_opacity: f32,
}

/// Ground-scroll anchor consumed by the renderer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GroundRefs {
    pub x: f32,
    pub z: f32,
}

/// Latched directional/jump input, written by the orchestrator each tick
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// One-shot jump request, cleared by the physics step when consumed
    pub jump: bool,
    /// 0 = minimum force, 1 = maximum force
    pub jump_charge: f32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// All random draws (spawns, rewards, jitter) go through this
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub tuning: Tunables,

    pub phase: GamePhase,
    pub score: f64,
    /// Horizontal speed, units per reference frame; never negative
    pub speed: f32,

    pub player: Player,
    pub stats: PlayerStats,
    /// Older snapshots without the record deserialize to the inactive default
    #[serde(default)]
    pub spin_out: SpinOut,

    /// Seconds of continuous steering
    pub turn_duration: f32,
    /// Seconds of steering with no throttle/brake while grounded
    pub steer_only_duration: f32,
    /// -1 right, +1 left, 0 none; reversals reset the turn accumulators
    pub last_steer_dir: i8,

    pub input: InputState,

    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    pub effects: Vec<RingEffect>,
    pub boost_trail: Vec<TrailMark>,
    pub dynamite_sparks: Vec<Spark>,
    /// Staging lists: entries created mid-tick, promoted (and given real ids)
    /// at the next tick boundary so nothing mutates a collection mid-iteration
    pub particles_to_add: Vec<Particle>,
    pub effects_to_add: Vec<RingEffect>,
    pub boost_trail_to_add: Vec<TrailMark>,
    pub dynamite_sparks_to_add: Vec<Spark>,

    pub boost_trail_spawn_accum: f32,

    pub visuals: Visuals,
    pub ground: GroundRefs,
    pub camera: CameraRig,
    pub camera_shake: CameraShake,

    next_obstacle_id: u32,
    next_particle_id: u32,
    next_effect_id: u32,
}

impl WorldState {
    /// Create a fresh world with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tunables::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tunables) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Menu,
            score: 0.0,
            speed: 0.0,
            player: Player::default(),
            stats: PlayerStats::default(),
            spin_out: SpinOut::default(),
            turn_duration: 0.0,
            steer_only_duration: 0.0,
            last_steer_dir: 0,
            input: InputState::default(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            effects: Vec::new(),
            boost_trail: Vec::new(),
            dynamite_sparks: Vec::new(),
            particles_to_add: Vec::new(),
            effects_to_add: Vec::new(),
            boost_trail_to_add: Vec::new(),
            dynamite_sparks_to_add: Vec::new(),
            boost_trail_spawn_accum: 0.0,
            visuals: Visuals::default(),
            ground: GroundRefs::default(),
            camera: CameraRig::default(),
            camera_shake: CameraShake::default(),
            next_obstacle_id: 1,
            next_particle_id: 1,
            next_effect_id: 1,
        }
    }

    /// Allocate an obstacle id (monotonic, never reused)
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        id
    }

    /// Allocate a particle/trail/spark id
    pub fn next_particle_id(&mut self) -> u32 {
        let id = self.next_particle_id;
        self.next_particle_id += 1;
        id
    }

    /// Allocate a ring-effect id
    pub fn next_effect_id(&mut self) -> u32 {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        id
    }

    /// Clamp hp into [0, max_hp]
    pub fn clamp_hp(&mut self) {
        self.stats.hp = self.stats.hp.clamp(0.0, self.tuning.game.max_hp);
    }
}
