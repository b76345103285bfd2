//! Transient visual bookkeeping
//!
//! Two-phase queue discipline: entities created mid-tick go to staging lists
//! and are promoted into the live collections (with fresh ids) only at the
//! next tick boundary, so no subsystem ever mutates a collection another is
//! iterating. Aging and culling run at the end of each tick.

use super::state::WorldState;
use crate::consts::REF_FPS;

/// Promote everything staged during the previous tick into the live
/// collections, assigning each entity a fresh monotonic id.
pub fn merge_staged(state: &mut WorldState) {
    let staged = std::mem::take(&mut state.particles_to_add);
    for mut p in staged {
        p.id = state.next_particle_id();
        state.particles.push(p);
    }
    let staged = std::mem::take(&mut state.effects_to_add);
    for mut e in staged {
        e.id = state.next_effect_id();
        state.effects.push(e);
    }
    let staged = std::mem::take(&mut state.boost_trail_to_add);
    for mut mark in staged {
        mark.id = state.next_particle_id();
        state.boost_trail.push(mark);
    }
    let staged = std::mem::take(&mut state.dynamite_sparks_to_add);
    for mut spark in staged {
        spark.id = state.next_particle_id();
        state.dynamite_sparks.push(spark);
    }
}

/// Age every live transient by its own decay rule and drop the dead ones.
pub fn update_effects(dt: f32, state: &mut WorldState) {
    let dt60 = dt * REF_FPS;

    for p in &mut state.particles {
        p.life -= 0.05 * dt60;
        p.position += p.velocity * dt;
    }
    state.particles.retain(|p| p.life > 0.0);

    for e in &mut state.effects {
        e.scale += 0.2 * dt60;
        e.opacity -= 0.05 * dt60;
    }
    state.effects.retain(|e| e.opacity > 0.0);

    for mark in &mut state.boost_trail {
        mark.life -= 0.02 * dt60;
    }
    state.boost_trail.retain(|mark| mark.life > 0.0);

    for s in &mut state.dynamite_sparks {
        s.life -= 0.08 * dt60;
        s.position += s.velocity * dt;
    }
    state.dynamite_sparks.retain(|s| s.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Particle, RingEffect, Spark, TrailMark};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn stage_particle(state: &mut WorldState, life: f32) {
        state.particles_to_add.push(Particle {
            id: 0,
            position: Vec3::ZERO,
            velocity: Vec3::new(1.0, 0.0, 0.0),
            life,
            color: 0xffffff,
        });
    }

    #[test]
    fn test_staged_entities_become_live_only_on_merge() {
        let mut state = WorldState::new(1);
        stage_particle(&mut state, 1.0);

        // Aging alone never sees staged entries
        update_effects(DT, &mut state);
        assert!(state.particles.is_empty());
        assert_eq!(state.particles_to_add.len(), 1);

        merge_staged(&mut state);
        assert_eq!(state.particles.len(), 1);
        assert!(state.particles_to_add.is_empty());
        assert!(state.particles[0].id > 0);
    }

    #[test]
    fn test_promoted_ids_are_fresh_and_increasing() {
        let mut state = WorldState::new(2);
        stage_particle(&mut state, 1.0);
        stage_particle(&mut state, 1.0);
        state.dynamite_sparks_to_add.push(Spark {
            id: 0,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: 1.0,
        });

        merge_staged(&mut state);

        let a = state.particles[0].id;
        let b = state.particles[1].id;
        let c = state.dynamite_sparks[0].id;
        assert!(a < b && b < c);
    }

    #[test]
    fn test_particles_age_and_die() {
        let mut state = WorldState::new(3);
        stage_particle(&mut state, 0.04);
        merge_staged(&mut state);

        update_effects(DT, &mut state);
        assert!(state.particles.is_empty(), "life 0.04 dies after one frame");
    }

    #[test]
    fn test_particle_positions_integrate_velocity() {
        let mut state = WorldState::new(4);
        stage_particle(&mut state, 1.0);
        merge_staged(&mut state);

        update_effects(DT, &mut state);
        assert!((state.particles[0].position.x - DT).abs() < 1e-6);
    }

    #[test]
    fn test_rings_grow_and_fade() {
        let mut state = WorldState::new(5);
        state.effects_to_add.push(RingEffect {
            id: 0,
            position: Vec3::ZERO,
            scale: 1.0,
            opacity: 0.8,
            inner: 1.0,
            outer: 1.5,
            color: 0xffff00,
        });
        merge_staged(&mut state);

        update_effects(DT, &mut state);
        let ring = &state.effects[0];
        assert!(ring.scale > 1.0);
        assert!(ring.opacity < 0.8);

        // Runs out of opacity after 16 frames
        for _ in 0..20 {
            update_effects(DT, &mut state);
        }
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_trail_marks_only_lose_life() {
        let mut state = WorldState::new(6);
        state.boost_trail_to_add.push(TrailMark {
            id: 0,
            position: Vec3::new(2.0, 0.01, -3.0),
            angle: 0.4,
            life: 1.0,
        });
        merge_staged(&mut state);

        update_effects(DT, &mut state);
        let mark = &state.boost_trail[0];
        assert!(mark.life < 1.0);
        assert_eq!(mark.position, Vec3::new(2.0, 0.01, -3.0));
    }
}
