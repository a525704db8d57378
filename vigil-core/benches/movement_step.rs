//! Benchmarks the hot path: one movement simulation step against a flat
//! world.

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use vigil_core::block::{BlockInfo, BlockTable, ChunkColumn, AIR_RUNTIME_ID};
use vigil_core::movement::{simulate, MovementState};
use vigil_core::world::WorldShadow;
use vigil_protocol::packets::ChunkPos;

struct FlatColumn;

impl ChunkColumn for FlatColumn {
    fn block(&self, _x: u8, y: i32, _z: u8) -> u32 {
        if y <= 64 {
            1
        } else {
            AIR_RUNTIME_ID
        }
    }
}

fn setup_world() -> WorldShadow {
    let mut table = BlockTable::new();
    table.insert(1, BlockInfo::solid("minecraft:stone"));
    let _ = BlockTable::init(table);

    let mut world = WorldShadow::new();
    for cx in -1..=1 {
        for cz in -1..=1 {
            world.add_chunk(ChunkPos::new(cx, cz), Box::new(FlatColumn));
        }
    }
    world
}

fn bench_step(c: &mut Criterion) {
    let world = setup_world();

    c.bench_function("walk_step_on_flat_ground", |b| {
        let mut state = MovementState::new();
        state.server_position = Vec3::new(0.5, 65.0, 0.5);
        state.client_position = state.server_position;
        state.forward_impulse = 0.98;
        state.can_exempt = false;
        b.iter(|| {
            simulate::update(&mut state, &world, true);
            std::hint::black_box(state.server_position);
        });
    });

    c.bench_function("jump_step_on_flat_ground", |b| {
        let mut state = MovementState::new();
        state.server_position = Vec3::new(0.5, 65.0, 0.5);
        state.client_position = state.server_position;
        state.jump_bind_pressed = true;
        state.can_exempt = false;
        b.iter(|| {
            simulate::update(&mut state, &world, true);
            std::hint::black_box(state.server_position.y);
        });
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
