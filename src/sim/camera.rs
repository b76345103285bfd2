//! Follow camera
//!
//! Eases toward a target behind the player and layers a decaying random
//! shake on top. The core owns shake intensity and its decay; hosts only
//! get the fire-and-forget cue.

use glam::Vec3;
use rand::Rng;

use super::state::WorldState;
use crate::consts::{REF_FPS, SHAKE_INTENSITY};

/// Kick the shake to its fixed starting intensity.
pub fn start_shake(state: &mut WorldState) {
    state.camera_shake.intensity = SHAKE_INTENSITY;
}

/// Advance the follow camera by one tick.
pub fn update_camera(dt: f32, state: &mut WorldState) {
    let dt60 = dt * REF_FPS;
    let pos = state.player.position;
    state.camera.target_x = pos.x;
    state.camera.target_z = pos.z + 8.0;

    let mut shake_x = 0.0;
    let mut shake_y = 0.0;
    if state.camera_shake.intensity > 0.0 {
        shake_x = (state.rng.random::<f32>() - 0.5) * state.camera_shake.intensity;
        shake_y = (state.rng.random::<f32>() - 0.5) * state.camera_shake.intensity;
        state.camera_shake.intensity *= 0.9f32.powf(dt60);
        if state.camera_shake.intensity < 0.01 {
            state.camera_shake.intensity = 0.0;
        }
    }

    state.camera.position.x +=
        (state.camera.target_x - state.camera.position.x) * 0.1 * dt60 + shake_x;
    // No easing on the forward axis
    state.camera.position.z = state.camera.target_z;
    state.camera.position.y = pos.y + 5.0 + shake_y;
    state.camera.look_at = Vec3::new(pos.x, pos.y, pos.z - 5.0);
}
