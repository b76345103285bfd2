//! Loop orchestration
//!
//! Sequences the subsystems each tick, gates execution by game phase, and
//! owns the reset and damage entry points.

use super::camera;
use super::effects;
use super::host::Host;
use super::obstacles;
use super::physics;
use super::state::{CameraRig, GamePhase, SpinOut, Visuals, WorldState};
use crate::consts::DT_MAX;

/// Input for a single tick, translated upstream from raw device events
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// One-shot jump request; latches until the physics step consumes it
    pub jump: bool,
    /// 0 = minimum force, 1 = maximum force
    pub jump_charge: f32,
}

/// Advance the world by one frame.
///
/// No-op while paused, and outside a run unless a spin-out is still
/// playing out. Subsystem order is fixed: staged-effect merge, physics,
/// obstacles, effect aging, camera.
pub fn tick(dt: f32, input: &TickInput, state: &mut WorldState, host: &mut dyn Host) {
    if state.phase == GamePhase::Paused {
        return;
    }
    if state.phase != GamePhase::Playing && !state.spin_out.active() {
        return;
    }

    let dt = dt.min(DT_MAX);
    latch_input(input, state);

    effects::merge_staged(state);
    physics::update_physics(dt, state, host);
    obstacles::update_obstacles(dt, state, host);
    effects::update_effects(dt, state);
    camera::update_camera(dt, state);
}

fn latch_input(input: &TickInput, state: &mut WorldState) {
    state.input.left = input.left;
    state.input.right = input.right;
    state.input.up = input.up;
    state.input.down = input.down;
    if input.jump {
        state.input.jump = true;
        state.input.jump_charge = input.jump_charge.clamp(0.0, 1.0);
    }
}

/// Reset the run. A full reset also restores hp and lives; a soft reset
/// keeps them (resume without penalty). Either way every live and staged
/// collection is cleared in the same call - no partial reset leaves
/// orphaned visuals.
pub fn reset(state: &mut WorldState, full_reset: bool, host: &mut dyn Host) {
    log::info!("Run reset (full: {full_reset})");

    state.score = 0.0;
    state.speed = 0.0;
    state.player.angle = 0.0;
    state.player.visual_spin_angle = 0.0;
    state.player.velocity = glam::Vec3::ZERO;
    state.player.position = glam::Vec3::ZERO;
    state.player.lean_back = 0.0;
    state.spin_out = SpinOut::default();
    state.turn_duration = 0.0;
    state.steer_only_duration = 0.0;
    state.last_steer_dir = 0;

    if full_reset {
        state.stats.hp = state.tuning.game.max_hp;
        state.stats.lives = 3;
    }
    state.input.jump = false;
    state.input.jump_charge = 0.0;
    state.stats.is_jumping = false;
    state.stats.has_dynamite = false;
    state.stats.did_jump_this_airtime = false;
    state.stats.ramp_launch_age = None;
    state.stats.can_ramp_assist_jump = false;
    state.stats.boost_timer = 0.0;
    state.stats.boost_target_speed = 0.0;
    state.stats.invincible_timer = 0.0;
    state.stats.dynamite_timer = 0.0;
    state.stats.dynamite_jump_count = 0;
    state.stats.last_dynamite_sec_shown = 0;

    state.obstacles.clear();
    state.particles.clear();
    state.effects.clear();
    state.boost_trail.clear();
    state.dynamite_sparks.clear();
    state.particles_to_add.clear();
    state.effects_to_add.clear();
    state.boost_trail_to_add.clear();
    state.dynamite_sparks_to_add.clear();
    state.boost_trail_spawn_accum = 0.0;

    state.visuals = Visuals::default();
    state.camera = CameraRig::default();
    state.camera_shake.intensity = 0.0;
    state.ground = Default::default();

    // Seed the opening stretch of the course.
    for i in 1..25 {
        obstacles::spawn_chunk(-(i as f32) * 10.0, state);
    }

    host.update_ui(state);
}

/// Apply damage to the player. Public entry point; the physics and obstacle
/// passes call it directly (synchronously, so same-tick consequences like
/// life-loss invincibility protect against later hits in the same pass).
pub fn apply_damage(amount: f32, state: &mut WorldState, host: &mut dyn Host) {
    if state.stats.invincible_timer > 0.0 {
        return;
    }
    state.stats.hp -= amount;
    state.clamp_hp();
    state.speed *= 0.5;
    camera::start_shake(state);
    host.shake_camera();
    state.player.position.y += 0.2;
    host.trigger_notification("OUCH!", Some("#e74c3c"));

    if state.stats.hp <= 0.0 {
        state.stats.lives = state.stats.lives.saturating_sub(1);
        if state.stats.lives == 0 {
            state.phase = GamePhase::GameOver;
            log::info!("Game over at {:.0} m", state.score);
            host.game_over(state);
        } else {
            state.stats.hp = state.tuning.game.max_hp;
            state.stats.invincible_timer = 2.0;
            state.visuals.shield_pulse_time = 0.25;
            state.visuals.shield_flicker_phase = 0.0;
            host.trigger_notification("LIFE LOST!", Some("#ff0000"));
        }
    }
    host.update_ui(state);
}
