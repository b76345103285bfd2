//! Course generation and collision resolution
//!
//! Streams obstacle chunks in ahead of the player, retires them once passed,
//! and resolves per-type collision outcomes including box-break rewards.
//! Removal happens inside a single reverse-index pass so the set stays
//! consistent mid-iteration.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::FRAC_PI_8;

use super::camera;
use super::host::Host;
use super::state::{ArrowAnim, Obstacle, ObstacleKind, Particle, RingEffect, WorldState};
use super::tick::apply_damage;
use crate::consts::{CHUNK_SLOTS, HIT_MARGIN, OBSTACLE_DAMAGE, REF_FPS};

/// What to place at a spawn point. A ramp combo expands to two linked
/// obstacles: the ramp itself plus an elevated box behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Tree,
    Rock,
    Boost,
    Box,
    RampCombo,
}

/// Spawn one obstacle (or ramp combo) at the given forward position.
///
/// `x_pos`/`kind` default to random placement when omitted.
pub fn spawn_obstacle(
    z_pos: f32,
    x_pos: Option<f32>,
    kind: Option<SpawnKind>,
    state: &mut WorldState,
) {
    let width = state.tuning.world.play_area_width;
    let kind = kind.unwrap_or_else(|| {
        let r: f32 = state.rng.random();
        if r > 0.95 {
            SpawnKind::RampCombo
        } else if r > 0.78 {
            SpawnKind::Box
        } else if r > 0.72 {
            SpawnKind::Boost
        } else if r > 0.42 {
            SpawnKind::Rock
        } else {
            SpawnKind::Tree
        }
    });
    let x_pos = x_pos.unwrap_or_else(|| (state.rng.random::<f32>() - 0.5) * width);

    if kind == SpawnKind::RampCombo {
        let ramp_id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id: ramp_id,
            kind: ObstacleKind::Ramp,
            position: Vec3::new(x_pos, 0.5, z_pos),
            rotation: Vec3::new(FRAC_PI_8, 0.0, 0.0),
            radius: 1.5,
            height: 0.5,
            break_height: None,
            elevated: false,
            rotation_vel: None,
            arrow: None,
            missed_notification_shown: false,
        });
        // The payoff box hangs above and past the ramp; clearing the ramp
        // is the only way up to it.
        let box_id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id: box_id,
            kind: ObstacleKind::Box,
            position: Vec3::new(x_pos, 6.5, z_pos - 24.0),
            rotation: Vec3::ZERO,
            radius: 2.0,
            height: 7.25,
            break_height: Some(6.0),
            elevated: true,
            rotation_vel: Some(Vec3::new(0.02, 0.03, 0.0)),
            arrow: None,
            missed_notification_shown: false,
        });
        return;
    }

    let id = state.next_obstacle_id();
    let ob = match kind {
        SpawnKind::Tree => Obstacle {
            id,
            kind: ObstacleKind::Tree,
            position: Vec3::new(x_pos, 0.0, z_pos),
            rotation: Vec3::ZERO,
            radius: 0.8,
            height: 3.0,
            break_height: None,
            elevated: false,
            rotation_vel: None,
            arrow: None,
            missed_notification_shown: false,
        },
        SpawnKind::Rock => Obstacle {
            id,
            kind: ObstacleKind::Rock,
            position: Vec3::new(x_pos, 0.4, z_pos),
            rotation: Vec3::ZERO,
            radius: 0.6,
            height: 1.0,
            break_height: None,
            elevated: false,
            rotation_vel: None,
            arrow: None,
            missed_notification_shown: false,
        },
        SpawnKind::Boost => Obstacle {
            id,
            kind: ObstacleKind::Boost,
            position: Vec3::new(x_pos, 0.0, z_pos),
            rotation: Vec3::ZERO,
            radius: 1.5,
            height: 0.1,
            break_height: None,
            elevated: false,
            rotation_vel: None,
            arrow: Some(ArrowAnim {
                phase: state.rng.random::<f32>() * std::f32::consts::TAU,
                offset: 0.0,
            }),
            missed_notification_shown: false,
        },
        SpawnKind::Box => Obstacle {
            id,
            kind: ObstacleKind::Box,
            position: Vec3::new(x_pos, 2.0, z_pos),
            rotation: Vec3::ZERO,
            radius: 1.2,
            height: 2.5,
            break_height: None,
            elevated: false,
            rotation_vel: Some(Vec3::new(0.02, 0.03, 0.0)),
            arrow: None,
            missed_notification_shown: false,
        },
        SpawnKind::RampCombo => unreachable!(),
    };
    state.obstacles.push(ob);
}

/// Spawn one chunk: the play width split into jittered lateral slots with
/// exactly one box, at most one ramp combo and at most one boost pad, and
/// trees/rocks filling the rest.
pub fn spawn_chunk(z_base: f32, state: &mut WorldState) {
    log::debug!("chunk at z {z_base:.1}");
    let width = state.tuning.world.play_area_width;
    let half = width / 2.0;
    let step = width / (CHUNK_SLOTS as f32 + 1.0);

    let mut x_slots = [0.0f32; CHUNK_SLOTS];
    for (i, slot) in x_slots.iter_mut().enumerate() {
        *slot = -half + step * (i as f32 + 1.0) + (state.rng.random::<f32>() - 0.5) * 8.0;
    }

    let box_slot = state.rng.random_range(0..CHUNK_SLOTS);
    let ramp_slot = if state.rng.random::<f32>() > 0.7 {
        Some(state.rng.random_range(0..CHUNK_SLOTS))
    } else {
        None
    };
    let boost_slot = if state.rng.random::<f32>() < 0.25 {
        Some(state.rng.random_range(0..CHUNK_SLOTS))
    } else {
        None
    };

    for (i, &x) in x_slots.iter().enumerate() {
        let mut kind = if state.rng.random::<f32>() > 0.5 {
            SpawnKind::Tree
        } else {
            SpawnKind::Rock
        };
        if i == box_slot {
            kind = SpawnKind::Box;
        } else if ramp_slot == Some(i) {
            kind = SpawnKind::RampCombo;
        } else if boost_slot == Some(i) {
            kind = SpawnKind::Boost;
        }
        let z_offset = (state.rng.random::<f32>() - 0.5) * 6.0;
        spawn_obstacle(z_base + z_offset, Some(x), Some(kind), state);
    }
}

/// Per-tick obstacle pass: spawn ahead, animate, retire, resolve collisions.
pub fn update_obstacles(dt: f32, state: &mut WorldState, host: &mut dyn Host) {
    let player_z = state.player.position.z;
    let last_z = state
        .obstacles
        .last()
        .map_or(player_z, |ob| ob.position.z);
    if last_z > player_z - state.tuning.world.look_ahead_distance {
        let gap = state.tuning.world.chunk_spacing
            + state.rng.random::<f32>() * state.tuning.world.chunk_spacing_jitter;
        spawn_chunk(last_z - gap, state);
    }

    let dt60 = dt * REF_FPS;
    let despawn = state.tuning.world.despawn_distance;

    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;

        {
            let ob = &mut state.obstacles[i];
            if let Some(rv) = ob.rotation_vel {
                ob.rotation.x += rv.x * dt60;
                ob.rotation.y += rv.y * dt60;
            }
            if let Some(arrow) = &mut ob.arrow {
                arrow.phase += 0.04 * dt60;
                arrow.offset -= 0.04 * dt60;
                if arrow.offset < -3.0 {
                    arrow.offset += 6.0;
                }
            }
        }

        if state.obstacles[i].position.z > state.player.position.z + despawn {
            state.obstacles.remove(i);
            continue;
        }

        let (kind, dist, hit_radius) = {
            let ob = &state.obstacles[i];
            let dx = ob.position.x - state.player.position.x;
            let dz = ob.position.z - state.player.position.z;
            (
                ob.kind,
                (dx * dx + dz * dz).sqrt(),
                ob.radius + HIT_MARGIN,
            )
        };
        if dist >= hit_radius {
            continue;
        }

        match kind {
            ObstacleKind::Boost => {
                // Pads are reusable; never removed on contact.
                state.stats.boost_timer = state.tuning.game.boost_duration;
                state.stats.boost_target_speed = state.tuning.physics.boost_speed;
                host.trigger_notification("BOOST!", None);
            }
            ObstacleKind::Ramp => {
                state.stats.is_jumping = true;
                state.stats.did_jump_this_airtime = false;
                state.stats.ramp_launch_age = Some(0.0);
                state.stats.can_ramp_assist_jump = true;
                state.player.velocity.y = state.tuning.physics.ramp_force * REF_FPS;
                host.trigger_notification("Sweet! That's an AIR TIME!", None);
            }
            ObstacleKind::Box => {
                let elevated = state.obstacles[i].elevated;
                let hit_height = if elevated {
                    state.obstacles[i].break_height.unwrap_or(6.0)
                } else {
                    0.5
                };
                if state.player.position.y > hit_height {
                    if elevated && !state.stats.did_jump_this_airtime {
                        // Merely falling past the box doesn't score it.
                        show_missed_once(i, state, host);
                    } else {
                        let id = state.obstacles[i].id;
                        break_box(id, state, host);
                        state.player.velocity.y = 0.3 * REF_FPS;
                    }
                } else if elevated {
                    // Passing underneath: the box stays put.
                    show_missed_once(i, state, host);
                } else {
                    state.obstacles.remove(i);
                }
            }
            ObstacleKind::Tree | ObstacleKind::Rock => {
                if state.player.position.y > state.obstacles[i].height {
                    // Jumped over; the despawn rule retires it later.
                } else {
                    state.obstacles.remove(i);
                    if state.stats.invincible_timer > 0.0 {
                        state.speed *= 0.5;
                        camera::start_shake(state);
                        host.shake_camera();
                        state.player.position.y += 0.2;
                        state.visuals.shield_pulse_time = 15.0 / REF_FPS;
                        host.trigger_notification("SHIELD!", Some("#00ffff"));
                    } else {
                        apply_damage(OBSTACLE_DAMAGE, state, host);
                    }
                }
            }
        }
    }
}

fn show_missed_once(index: usize, state: &mut WorldState, host: &mut dyn Host) {
    let ob = &mut state.obstacles[index];
    if !ob.missed_notification_shown {
        ob.missed_notification_shown = true;
        host.trigger_notification("Not this time...", Some("#95a5a6"));
    }
}

/// Break a box: burst visuals plus one reward drawn from a cumulative table
/// that skews richer for elevated boxes.
pub fn break_box(id: u32, state: &mut WorldState, host: &mut dyn Host) {
    let Some(ob) = state.obstacles.iter().find(|o| o.id == id) else {
        return;
    };
    let box_pos = ob.position;
    let elevated = ob.elevated;
    state.obstacles.retain(|o| o.id != id);

    let color: u32 = if elevated { 0xffd700 } else { 0xffff00 };
    state.effects_to_add.push(RingEffect {
        id: 0,
        position: box_pos,
        scale: 1.0,
        opacity: 0.8,
        inner: if elevated { 1.2 } else { 1.0 },
        outer: if elevated { 1.8 } else { 1.5 },
        color,
    });
    if elevated {
        state.effects_to_add.push(RingEffect {
            id: 0,
            position: box_pos,
            scale: 1.0,
            opacity: 0.8,
            inner: 0.6,
            outer: 1.0,
            color: 0xffd700,
        });
    }
    let particle_count = if elevated { 18 } else { 10 };
    for _ in 0..particle_count {
        let velocity = Vec3::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() * if elevated { 1.2 } else { 1.0 },
            state.rng.random::<f32>() - 0.5,
        );
        state.particles_to_add.push(Particle {
            id: 0,
            position: box_pos,
            velocity,
            life: 1.0,
            color,
        });
    }

    let roll: f32 = state.rng.random();
    let game = state.tuning.game.clone();

    if elevated {
        if roll < 0.1 {
            if !state.stats.has_dynamite {
                state.stats.has_dynamite = true;
                state.stats.dynamite_timer = game.dynamite_time;
                state.stats.dynamite_jump_count = 0;
                host.trigger_notification("TRAP! JUMP x2!", Some("#e74c3c"));
                host.trigger_dynamite_flash();
            }
        } else if roll < 0.3 {
            state.stats.boost_timer = game.boost_duration;
            state.stats.boost_target_speed = state.tuning.physics.boost_speed * 1.15;
            host.trigger_notification("MEGA BOOST!", None);
        } else if roll < 0.7 {
            grant_extra_life(state, host);
        } else {
            state.stats.invincible_timer = game.invincible_time * 1.5;
            state.visuals.shield_pulse_time = 0.0;
            state.visuals.shield_flicker_phase = 0.0;
            host.trigger_notification("SUPER SHIELD!", Some("#00ffff"));
        }
    } else if roll < 0.2 {
        if !state.stats.has_dynamite {
            state.stats.has_dynamite = true;
            state.stats.dynamite_timer = game.dynamite_time;
            state.stats.dynamite_jump_count = 0;
            host.trigger_notification("DYNAMITE! Jump x2 Straight to Remove!", Some("#e74c3c"));
            host.trigger_dynamite_flash();
        }
    } else if roll < 0.4 {
        state.stats.boost_timer = game.boost_duration;
        state.stats.boost_target_speed = state.tuning.physics.boost_speed;
        host.trigger_notification("SPEED BOOST!", None);
    } else if roll < 0.6 {
        state.stats.hp = (state.stats.hp + 30.0).min(game.max_hp);
        host.update_ui(state);
        host.trigger_notification("+30 HP", Some("#2ecc71"));
    } else if roll < 0.8 {
        grant_extra_life(state, host);
    } else {
        state.stats.invincible_timer = game.invincible_time;
        state.visuals.shield_pulse_time = 0.0;
        state.visuals.shield_flicker_phase = 0.0;
        host.trigger_notification("SHIELD ACTIVE!", Some("#00ffff"));
    }
}

/// Extra life, or a full heal when already at the life cap.
fn grant_extra_life(state: &mut WorldState, host: &mut dyn Host) {
    if state.stats.lives < state.tuning.game.max_lives {
        state.stats.lives += 1;
        host.update_ui(state);
        host.trigger_notification("EXTRA LIFE!", Some("#e67e22"));
    } else {
        state.stats.hp = state.tuning.game.max_hp;
        host.update_ui(state);
        host.trigger_notification("FULL HEAL!", Some("#2ecc71"));
    }
}
