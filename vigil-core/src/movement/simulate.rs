//! The per-input movement simulation step.
//!
//! Replays the client's own movement code against the world shadow: input
//! impulses, jumping, climbables, sneak edge back-off, collision, gravity
//! and friction, in the exact order the client applies them. The result is
//! the position and velocity the server expects the client to report next.

use glam::{IVec3, Vec3};
use vigil_utils::math::{float_equal_threshold, mc_cos, mc_sin};

use super::collide;
use super::{
    MovementState, BASE_GROUND_FRICTION, CLIMB_CLAMP, FLOAT_EQUAL_THRESHOLD, FLYING_SPEED,
    GRAVITY_MULTIPLIER, JUMP_COOLDOWN_TICKS, MOVEMENT_DEADZONE, SPRINT_FLYING_BONUS, STEP_CLIP_MULTIPLIER,
    STEP_HEIGHT,
};
use crate::world::WorldShadow;

/// Runs one simulation step, or snaps to the client's reported state when
/// the player is in a scenario the simulation cannot follow (`eligible`
/// false, flying, no-clip, in the void).
///
/// Returns whether the step produced a prediction that may be validated
/// against the client; an exempt step (including the first step after an
/// exemption ends) must not trigger corrections.
pub fn update(state: &mut MovementState, world: &WorldShadow, eligible: bool) -> bool {
    let exempt;
    if !eligible || state.in_void || state.flying || state.no_clip {
        snap_exempt(state);
        exempt = true;
    } else {
        state.in_unsupported_rewind_scenario = false;
        // The first simulated step after an exemption starts from adopted
        // client state, which is not a prediction worth validating.
        exempt = state.can_exempt;
        ai_step(state, world);
        state.can_exempt = false;
    }

    state.update_tick_status();
    !exempt
}

/// Adopts the client state wholesale; used whenever simulation is exempt.
pub fn snap_exempt(state: &mut MovementState) {
    state.on_ground = true;
    state.vertically_collided = true;
    state.server_position = state.client_position;
    state.prev_server_movement = state.client_movement;
    state.server_movement = state.client_predicted_movement;
    state.can_exempt = true;
}

fn ai_step(state: &mut MovementState, world: &WorldShadow) {
    let feet = state.server_position.floor().as_ivec3();
    let in_loaded_chunk = world.chunk_loaded(WorldShadow::chunk_pos_of(feet));
    if state.immobile || !in_loaded_chunk {
        state.forward_impulse = 0.0;
        state.strafe_impulse = 0.0;
        state.jumping = false;
        state.server_movement = Vec3::ZERO;
    }

    for axis in 0..3 {
        if state.server_movement[axis].abs() < MOVEMENT_DEADZONE {
            state.server_movement[axis] = 0.0;
        }
    }

    state.flying_speed = FLYING_SPEED;
    if state.sprinting {
        state.flying_speed += SPRINT_FLYING_BONUS;
    }

    // A motion impulse sent this tick replaces the predicted velocity.
    if state.motion_ticks == 0 {
        state.server_movement = state.server_sent_movement;
    }

    if !state.jump_bind_pressed {
        state.jump_cooldown_ticks = 0;
    }
    if state.jump_bind_pressed && state.on_ground && state.jump_cooldown_ticks <= 0 {
        jump(state);
        state.jump_cooldown_ticks = JUMP_COOLDOWN_TICKS;
    }

    travel(state, world);
    check_unsupported_scenarios(state, world);
}

fn travel(state: &mut MovementState, world: &WorldShadow) {
    if state.step_clip_offset > 0.0 {
        state.step_clip_offset *= STEP_CLIP_MULTIPLIER;
    }

    let feet = state.server_position.floor().as_ivec3();
    let block_friction = if state.on_ground {
        BASE_GROUND_FRICTION * world.block_info_at(feet - IVec3::new(0, 1, 0)).friction_factor
    } else {
        1.0
    };

    let speed = state.friction_influenced_speed(block_friction);
    add_movement_force(state, speed);

    let near_climbable = world.block_info_at(feet).climbable;
    if near_climbable {
        state.server_movement.x = state.server_movement.x.clamp(-CLIMB_CLAMP, CLIMB_CLAMP);
        state.server_movement.z = state.server_movement.z.clamp(-CLIMB_CLAMP, CLIMB_CLAMP);
        if state.server_movement.y < -CLIMB_CLAMP {
            state.server_movement.y = -CLIMB_CLAMP;
        }
        if state.sneaking && state.server_movement.y < 0.0 {
            state.server_movement.y = 0.0;
        }
    }

    back_off_from_edge(state, world);
    let old_movement = state.server_movement;

    collide::collide(state, world);
    state.server_position += state.server_movement;
    check_collisions(state, old_movement);

    check_unsupported_scenarios(state, world);
    state.prev_server_movement = state.server_movement;

    if !state.in_unsupported_rewind_scenario {
        state.server_movement.y = (state.server_movement.y - state.gravity) * GRAVITY_MULTIPLIER;
        state.server_movement.x *= block_friction;
        state.server_movement.z *= block_friction;
    }

    if near_climbable && (state.horizontally_collided || state.jump_bind_pressed) {
        state.server_movement.y = 0.2;
    }
}

/// Converts the (forward, strafe) impulse pair into planar velocity along
/// the camera yaw, scaled by `f`.
fn add_movement_force(state: &mut MovementState, f: f32) {
    let sq = state.forward_impulse * state.forward_impulse
        + state.strafe_impulse * state.strafe_impulse;
    if sq < 1e-4 {
        return;
    }

    let scale = f / sq.sqrt().max(1.0);
    let mf = state.forward_impulse * scale;
    let ms = state.strafe_impulse * scale;
    let yaw = state.yaw.to_radians();
    let (sin, cos) = (mc_sin(yaw), mc_cos(yaw));
    state.server_movement.x += ms * cos - mf * sin;
    state.server_movement.z += ms * sin + mf * cos;
}

fn jump(state: &mut MovementState) {
    state.server_movement.y = state.jump_velocity;
    if !state.sprinting {
        return;
    }

    // Sprint jumps carry an extra push along the view direction.
    let yaw = state.yaw.to_radians();
    state.server_movement.x -= mc_sin(yaw) * 0.2;
    state.server_movement.z += mc_cos(yaw) * 0.2;
}

/// While sneaking on the ground, horizontal motion shrinks in 0.05 steps
/// until the box lowered by the step height would still stand on something.
/// This is what stops a sneaking client at a block edge.
fn back_off_from_edge(state: &mut MovementState, world: &WorldShadow) {
    if !state.sneaking || !state.on_ground || state.server_movement.y > 0.0 {
        return;
    }

    let bb = state.aabb();
    let mut d0 = state.server_movement.x;
    let mut d1 = state.server_movement.z;
    let inc = 0.05f32;

    while d0 != 0.0
        && world
            .nearby_block_boxes(&bb.translate(Vec3::new(d0, -STEP_HEIGHT, 0.0)))
            .is_empty()
    {
        d0 = shrink_towards_zero(d0, inc);
    }
    while d1 != 0.0
        && world
            .nearby_block_boxes(&bb.translate(Vec3::new(0.0, -STEP_HEIGHT, d1)))
            .is_empty()
    {
        d1 = shrink_towards_zero(d1, inc);
    }
    while d0 != 0.0
        && d1 != 0.0
        && world
            .nearby_block_boxes(&bb.translate(Vec3::new(d0, -STEP_HEIGHT, d1)))
            .is_empty()
    {
        d0 = shrink_towards_zero(d0, inc);
        d1 = shrink_towards_zero(d1, inc);
    }

    state.server_movement.x = d0;
    state.server_movement.z = d1;
}

fn shrink_towards_zero(v: f32, step: f32) -> f32 {
    if v < step && v >= -step {
        0.0
    } else if v > 0.0 {
        v - step
    } else {
        v + step
    }
}

/// Derives the collision flags by comparing pre- and post-collision
/// velocities, then zeroes each collided component.
fn check_collisions(state: &mut MovementState, old: Vec3) {
    state.x_collision =
        !float_equal_threshold(old.x, state.server_movement.x, FLOAT_EQUAL_THRESHOLD);
    state.z_collision =
        !float_equal_threshold(old.z, state.server_movement.z, FLOAT_EQUAL_THRESHOLD);
    state.horizontally_collided = state.x_collision || state.z_collision;
    state.vertically_collided = old.y != state.server_movement.y;
    state.on_ground = state.vertically_collided && old.y < 0.0;

    if state.vertically_collided {
        state.server_movement.y = 0.0;
    }
    if state.x_collision {
        state.server_movement.x = 0.0;
    }
    if state.z_collision {
        state.server_movement.z = 0.0;
    }
}

/// Liquids break the client's rewind-based correction; inside them the
/// prediction is abandoned and the client state adopted instead.
fn check_unsupported_scenarios(state: &mut MovementState, world: &WorldShadow) {
    if world.touches_liquid(&state.aabb()) {
        state.in_unsupported_rewind_scenario = true;
    }
    if state.in_unsupported_rewind_scenario {
        state.snap_to_client();
    }
}
