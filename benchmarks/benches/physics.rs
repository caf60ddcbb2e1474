//! Physics engine benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use contraption::physics::broadphase::Detector;
use contraption::{Bodies, BodyOptions, Collision, EngineConfig};
use contraption_bench::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("broadphase/overlapping_boxes");
        for &n in &[100, 500, 1000, 2000] {
            let bodies = setup_box_bodies(n);
            let mut detector = Detector::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| detector.collisions(&bodies).len());
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/mixed_shapes");
        for &n in &[100, 500, 1000, 2000] {
            let bodies = setup_mixed_bodies(n);
            let mut detector = Detector::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| detector.collisions(&bodies).len());
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("broadphase/sparse");
        for &n in &[100, 500, 1000, 2000] {
            let bodies = setup_sparse_bodies(n);
            let mut detector = Detector::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| detector.collisions(&bodies).len());
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("narrowphase/box_box");
        let a = Bodies::rectangle(0.0, 0.0, 40.0, 40.0, BodyOptions::default()).unwrap();

        let hit = Bodies::rectangle(30.0, 0.0, 40.0, 40.0, BodyOptions::default()).unwrap();
        group.bench_function("intersecting", |b| {
            b.iter(|| Collision::between(&a, &hit));
        });

        let miss = Bodies::rectangle(100.0, 0.0, 40.0, 40.0, BodyOptions::default()).unwrap();
        group.bench_function("separated", |b| {
            b.iter(|| Collision::between(&a, &miss));
        });

        let rotated = Bodies::rectangle(
            30.0,
            0.0,
            40.0,
            40.0,
            BodyOptions {
                angle: 0.785,
                ..Default::default()
            },
        )
        .unwrap();
        group.bench_function("rotated", |b| {
            b.iter(|| Collision::between(&a, &rotated));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/circle_circle");
        for &radius in &[10.0, 25.0, 100.0] {
            let a = Bodies::circle(0.0, 0.0, radius, BodyOptions::default(), Some(64)).unwrap();
            let b_body =
                Bodies::circle(radius * 1.5, 0.0, radius, BodyOptions::default(), Some(64))
                    .unwrap();
            group.bench_with_input(
                BenchmarkId::from_parameter(a.vertices().len()),
                &radius,
                |b, _| {
                    b.iter(|| Collision::between(&a, &b_body));
                },
            );
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/batch");
        for &n in &[100, 500, 1000] {
            let pairs: Vec<_> = (0..n)
                .map(|i| {
                    let x = i as f64 * 100.0;
                    let a = Bodies::rectangle(x, 0.0, 40.0, 40.0, BodyOptions::default());
                    let b = Bodies::circle(x + 35.0, 0.0, 20.0, BodyOptions::default(), None);
                    (a.unwrap(), b.unwrap())
                })
                .collect();

            group.bench_with_input(BenchmarkId::from_parameter(n), &pairs, |b, pairs| {
                b.iter(|| {
                    for (a, other) in pairs {
                        Collision::between(a, other);
                    }
                });
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

fn bench_solver(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("solver/stack_height");
        for &n in &[5, 10, 20, 40] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_stack(n, EngineConfig::default()),
                    |mut engine| engine.update(DELTA, 1.0),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("solver/iterations");
        for &iters in &[1, 4, 8, 16, 32] {
            let config = EngineConfig {
                position_iterations: iters,
                velocity_iterations: iters,
                ..Default::default()
            };
            group.bench_with_input(BenchmarkId::from_parameter(iters), &iters, |b, _| {
                b.iter_batched(
                    || setup_stack(20, config.clone()),
                    |mut engine| engine.update(DELTA, 1.0),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/step");
        group.sample_size(30);
        for &n in &[50, 100, 500, 1000] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |mut engine| engine.update(DELTA, 1.0),
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/sustained_10steps");
        group.sample_size(20);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |mut engine| {
                        for _ in 0..10 {
                            engine.update(DELTA, 1.0);
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Mass physics (continuous spawn + step)
// ---------------------------------------------------------------------------

fn bench_mass_physics(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("mass_physics/spawn_rate");
        group.sample_size(10);
        for &spawn_per_frame in &[1, 3, 10] {
            group.bench_with_input(
                BenchmarkId::from_parameter(spawn_per_frame),
                &spawn_per_frame,
                |b, &spf| {
                    b.iter_batched(
                        || setup_mass_scene(0),
                        |mut engine| run_mass_physics(&mut engine, 60, spf, 0),
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("mass_physics/initial_bodies");
        group.sample_size(10);
        for &initial in &[0, 100, 500] {
            group.bench_with_input(
                BenchmarkId::from_parameter(initial),
                &initial,
                |b, &init| {
                    b.iter_batched(
                        || setup_mass_scene(init),
                        |mut engine| run_mass_physics(&mut engine, 60, 3, init),
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Sleeping
// ---------------------------------------------------------------------------

fn bench_sleeping(c: &mut Criterion) {
    let mut group = c.benchmark_group("sleeping/settled_scene");
    group.sample_size(10);
    for &enable_sleeping in &[false, true] {
        let config = EngineConfig {
            enable_sleeping,
            ..Default::default()
        };
        let mut engine = setup_scene_with(200, config);
        for _ in 0..300 {
            engine.update(DELTA, 1.0);
        }
        group.bench_function(BenchmarkId::from_parameter(enable_sleeping), |b| {
            b.iter(|| engine.update(DELTA, 1.0));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_solver,
    bench_pipeline,
    bench_mass_physics,
    bench_sleeping
);
criterion_main!(benches);
