//! Benchmarks for quadtree insertion and flock ticks.
//!
//! Run with: `cargo bench -p vehicle-core`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use vehicle_core::{Flock, FlockConfig, Point, QuadTree, Rectangle};

const WIDTH: f32 = 1024.0;
const HEIGHT: f32 = 768.0;

fn random_points(count: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..count)
        .map(|_| Point::new(rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT)))
        .collect()
}

fn bench_quadtree_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_insert");
    let boundary = Rectangle::new(WIDTH / 2.0, HEIGHT / 2.0, WIDTH / 2.0, HEIGHT / 2.0)
        .expect("valid boundary");

    for count in [100, 1_000, 10_000] {
        let points = random_points(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| {
                let mut tree = QuadTree::new(boundary);
                for point in points {
                    tree.insert(*point);
                }
                black_box(tree.node_count())
            })
        });
    }

    group.finish();
}

fn bench_quadtree_query(c: &mut Criterion) {
    let boundary = Rectangle::new(WIDTH / 2.0, HEIGHT / 2.0, WIDTH / 2.0, HEIGHT / 2.0)
        .expect("valid boundary");
    let mut tree = QuadTree::new(boundary);
    for point in random_points(10_000) {
        tree.insert(point);
    }
    let range = Rectangle::new(300.0, 300.0, 40.0, 40.0).expect("valid range");

    c.bench_function("quadtree_query", |b| b.iter(|| black_box(tree.query(&range).len())));
}

fn bench_flock_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_tick");

    for count in [50, 200, 500] {
        let mut rng = StdRng::seed_from_u64(2);
        let flock = Flock::random(FlockConfig::default(), count, WIDTH, HEIGHT, 3.0, 0.05, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(count), &flock, |b, flock| {
            b.iter_batched(
                || flock.clone(),
                |mut flock| {
                    flock.tick();
                    flock
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quadtree_insert, bench_quadtree_query, bench_flock_tick);
criterion_main!(benches);
