//! Shared setup helpers for contraption benchmarks.
//!
//! ## Running
//!
//! Wall clock (criterion):
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//!
//! iai-callgrind (instruction counts, requires valgrind):
//!   cargo install iai-callgrind-runner
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics_iai
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use contraption::{Bodies, Body, BodyOptions, Engine, EngineConfig};
use glam::DVec2;

pub const DELTA: f64 = 1000.0 / 60.0;

fn dynamic() -> BodyOptions {
    BodyOptions::default()
}

fn fixed() -> BodyOptions {
    BodyOptions {
        is_static: true,
        ..Default::default()
    }
}

fn grid(i: usize, cols: usize, spacing: f64) -> DVec2 {
    DVec2::new((i % cols) as f64 * spacing, (i / cols) as f64 * spacing)
}

fn columns(n: usize) -> usize {
    (n as f64).sqrt().ceil() as usize
}

// ---------------------------------------------------------------------------
// Body sets
// ---------------------------------------------------------------------------

/// `n` 40x40 boxes in a grid with 30 unit spacing, so neighbours overlap.
pub fn setup_box_bodies(n: usize) -> Vec<Body> {
    let cols = columns(n);
    (0..n)
        .map(|i| {
            let p = grid(i, cols, 30.0);
            Bodies::rectangle(p.x, p.y, 40.0, 40.0, dynamic()).expect("valid box")
        })
        .collect()
}

/// Half dynamic circles, half static boxes.
#[allow(clippy::manual_is_multiple_of)]
pub fn setup_mixed_bodies(n: usize) -> Vec<Body> {
    let cols = columns(n);
    (0..n)
        .map(|i| {
            let p = grid(i, cols, 30.0);
            if i % 2 == 0 {
                Bodies::circle(p.x, p.y, 20.0, dynamic(), None).expect("valid circle")
            } else {
                Bodies::rectangle(p.x, p.y, 30.0, 30.0, fixed()).expect("valid box")
            }
        })
        .collect()
}

/// Bodies spread far apart (no overlaps).
pub fn setup_sparse_bodies(n: usize) -> Vec<Body> {
    let cols = columns(n);
    (0..n)
        .map(|i| {
            let p = grid(i, cols, 200.0);
            Bodies::rectangle(p.x, p.y, 20.0, 20.0, dynamic()).expect("valid box")
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Engine scenes
// ---------------------------------------------------------------------------

/// Ground plus `n` dynamic bodies (mixed boxes and circles) dropped above it.
pub fn setup_scene(n: usize) -> Engine {
    setup_scene_with(n, EngineConfig::default())
}

#[allow(clippy::manual_is_multiple_of)]
pub fn setup_scene_with(n: usize, config: EngineConfig) -> Engine {
    let mut engine = Engine::new(config);
    let cols = columns(n);
    let width = cols as f64 * 50.0 + 200.0;
    engine.world.add_body(
        Bodies::rectangle(width / 2.0 - 100.0, 1000.0, width, 50.0, fixed()).expect("valid ground"),
    );

    for i in 0..n {
        let x = (i % cols) as f64 * 50.0;
        let y = 900.0 - (i / cols) as f64 * 50.0 - (i % 5) as f64 * 5.0;
        let body = if i % 2 == 0 {
            Bodies::circle(x, y, 18.0, dynamic(), None)
        } else {
            Bodies::rectangle(x, y, 36.0, 36.0, dynamic())
        };
        engine.world.add_body(body.expect("valid body"));
    }
    engine
}

/// A single column of `n` boxes resting on the ground, already in contact.
pub fn setup_stack(n: usize, config: EngineConfig) -> Engine {
    let mut engine = Engine::new(config);
    engine
        .world
        .add_body(Bodies::rectangle(0.0, 25.0, 400.0, 50.0, fixed()).expect("valid ground"));
    for i in 0..n {
        let y = -20.0 - i as f64 * 40.0 + 0.1;
        engine
            .world
            .add_body(Bodies::rectangle(0.0, y, 40.0, 40.0, dynamic()).expect("valid box"));
    }
    engine
}

// ---------------------------------------------------------------------------
// Mass physics scenario (continuous spawning into a bin)
// ---------------------------------------------------------------------------

const BIN_WIDTH: f64 = 800.0;
const SPAWN_HEIGHT: f64 = -200.0;

/// Spawn a single body at a deterministic position above the bin.
#[allow(clippy::manual_is_multiple_of)]
fn spawn_object(engine: &mut Engine, index: usize) {
    let x = 60.0 + ((index * 137) % 680) as f64;
    let y = SPAWN_HEIGHT - (index % 5) as f64 * 30.0;
    let body = match index % 3 {
        0 => Bodies::circle(x, y, 12.0, dynamic(), None),
        1 => Bodies::rectangle(x, y, 24.0, 24.0, dynamic()),
        _ => Bodies::polygon(x, y, 5, 14.0, dynamic()),
    };
    engine.world.add_body(body.expect("valid body"));
}

/// A walled bin with `initial` bodies already inside.
pub fn setup_mass_scene(initial: usize) -> Engine {
    let mut engine = Engine::new(EngineConfig {
        enable_sleeping: true,
        ..Default::default()
    });
    for wall in [
        Bodies::rectangle(BIN_WIDTH / 2.0, 625.0, BIN_WIDTH, 50.0, fixed()),
        Bodies::rectangle(-25.0, 0.0, 50.0, 1300.0, fixed()),
        Bodies::rectangle(BIN_WIDTH + 25.0, 0.0, 50.0, 1300.0, fixed()),
    ] {
        engine.world.add_body(wall.expect("valid wall"));
    }
    for i in 0..initial {
        spawn_object(&mut engine, i);
    }
    engine
}

/// Step `frames` times, spawning `spawn_per_frame` bodies before each step.
pub fn run_mass_physics(
    engine: &mut Engine,
    frames: usize,
    spawn_per_frame: usize,
    first_index: usize,
) {
    let mut index = first_index;
    for _ in 0..frames {
        for _ in 0..spawn_per_frame {
            spawn_object(engine, index);
            index += 1;
        }
        engine.update(DELTA, 1.0);
    }
}
