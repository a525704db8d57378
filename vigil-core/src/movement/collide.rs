//! Swept AABB collision against block bounding boxes.
//!
//! Axis resolution order matches the client: Y first, then whichever
//! horizontal axis carries the *larger* absolute velocity, then the other.
//! Resolving the smaller axis last reproduces the client's corner-collision
//! behavior exactly, which the divergence check depends on.

use glam::Vec3;
use vigil_utils::Aabb;

use super::{MovementState, STEP_HEIGHT};
use crate::world::WorldShadow;

/// A collision axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Clips motion of `bb` along `axis` by `v` against every box in `list`,
/// returning the translated box and the clipped velocity. A candidate only
/// restricts motion when it overlaps the box on both other axes.
#[must_use]
pub fn do_box_collision(axis: Axis, mut bb: Aabb, list: &[Aabb], mut v: f32) -> (Aabb, f32) {
    if v != 0.0 {
        let a = axis.index();
        let (o1, o2) = ((a + 1) % 3, (a + 2) % 3);
        for candidate in list {
            if candidate.min[o1] >= bb.max[o1]
                || candidate.max[o1] <= bb.min[o1]
                || candidate.min[o2] >= bb.max[o2]
                || candidate.max[o2] <= bb.min[o2]
            {
                continue;
            }
            if v > 0.0 && candidate.min[a] >= bb.max[a] {
                v = v.min(candidate.min[a] - bb.max[a]);
            } else if v < 0.0 && candidate.max[a] <= bb.min[a] {
                v = v.max(candidate.max[a] - bb.min[a]);
            }
        }
    }
    let mut delta = Vec3::ZERO;
    delta[axis.index()] = v;
    bb = bb.translate(delta);
    (bb, v)
}

/// Resolves `vel` against `list` in client axis order: Y, then the larger
/// horizontal axis, then the smaller.
#[must_use]
pub fn collide_with_blocks(vel: Vec3, mut bb: Aabb, list: &[Aabb]) -> Vec3 {
    if list.is_empty() {
        return vel;
    }

    let (mut x_mov, mut y_mov, mut z_mov) = (vel.x, vel.y, vel.z);
    if y_mov != 0.0 {
        (bb, y_mov) = do_box_collision(Axis::Y, bb, list, y_mov);
    }

    let x_smaller = x_mov.abs() < z_mov.abs();
    if x_smaller && z_mov != 0.0 {
        (bb, z_mov) = do_box_collision(Axis::Z, bb, list, z_mov);
    }
    if x_mov != 0.0 {
        (bb, x_mov) = do_box_collision(Axis::X, bb, list, x_mov);
    }
    if !x_smaller && z_mov != 0.0 {
        (_, z_mov) = do_box_collision(Axis::Z, bb, list, z_mov);
    }

    Vec3::new(x_mov, y_mov, z_mov)
}

fn horizontal_dist_sq(v: Vec3) -> f32 {
    v.x * v.x + v.z * v.z
}

/// Resolves the pending movement against nearby blocks, attempting a
/// step-up when horizontal motion was blocked while grounded. Updates
/// `server_movement` and accumulates any stepped height into
/// `step_clip_offset`.
pub fn collide(state: &mut MovementState, world: &WorldShadow) {
    let cur = state.server_movement;
    let bb = state.aabb();
    let list = world.nearby_block_boxes(&bb.extend(cur));

    let mut new_vel = cur;
    if cur.length_squared() > 0.0 {
        new_vel = collide_with_blocks(cur, bb, &list);
    }

    let x_collided = cur.x != new_vel.x;
    let y_collided = cur.y != new_vel.y;
    let z_collided = cur.z != new_vel.z;
    let grounded = state.on_ground || (y_collided && cur.y < 0.0);

    if grounded && (x_collided || z_collided) {
        // Retry with the full horizontal motion lifted by the step height,
        // then settle back down; keep whichever attempt travelled further.
        let mut step_vel = Vec3::new(cur.x, STEP_HEIGHT, cur.z);
        let list = world.nearby_block_boxes(&bb.extend(step_vel));

        let step_bb = bb;
        let (step_bb, dy) = do_box_collision(Axis::Y, step_bb, &list, step_vel.y);
        step_vel.y = dy;
        let (step_bb, dx) = do_box_collision(Axis::X, step_bb, &list, step_vel.x);
        step_vel.x = dx;
        let (step_bb, dz) = do_box_collision(Axis::Z, step_bb, &list, step_vel.z);
        step_vel.z = dz;
        let (_, settle) = do_box_collision(Axis::Y, step_bb, &list, -step_vel.y);
        step_vel.y += settle;

        if horizontal_dist_sq(new_vel) < horizontal_dist_sq(step_vel) {
            state.step_clip_offset += step_vel.y;
            new_vel = step_vel;
        }
    }

    state.server_movement = new_vel;
}
