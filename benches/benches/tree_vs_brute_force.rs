use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use galaxy_3d_spatial::galaxy3d::query::{AabbQuery, DeltaFrustumQuery, RayQuery};
use galaxy_3d_spatial::galaxy3d::{AABB, Frustum, Ray, Tree};
use glam::{Mat4, Vec3};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
}

/// `count` random boxes of edge up to `max_size` inside a cube of `extent`
fn gen_random_boxes(count: usize, extent: f32, max_size: f32) -> Vec<(u32, AABB)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let min = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * extent;
        let size = Vec3::new(rng.next_f32(), rng.next_f32(), rng.next_f32()) * max_size;
        out.push((i as u32, AABB::new(min, min + size)));
    }
    out
}

/// Floor plan of `n` x `n` rooms, each with four walls, `levels` storeys high
fn gen_building(n: usize, levels: usize) -> Vec<(u32, AABB)> {
    let mut out = Vec::with_capacity(n * n * levels * 4);
    let room = 5.0;
    let wall = 0.2;
    let height = 3.0;
    for level in 0..levels {
        let z = level as f32 * height;
        for y in 0..n {
            for x in 0..n {
                let o = Vec3::new(x as f32 * room, y as f32 * room, z);
                let walls = [
                    AABB::new(o, o + Vec3::new(room, wall, height)),
                    AABB::new(o, o + Vec3::new(wall, room, height)),
                    AABB::new(o + Vec3::new(0.0, room - wall, 0.0), o + Vec3::new(room, room, height)),
                    AABB::new(o + Vec3::new(room - wall, 0.0, 0.0), o + Vec3::new(room, room, height)),
                ];
                for aabb in walls {
                    out.push((out.len() as u32, aabb));
                }
            }
        }
    }
    out
}

fn build_tree(items: &[(u32, AABB)]) -> Tree<u32> {
    let mut tree = Tree::default();
    let _ = tree.build(items.iter().copied());
    tree
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &count in &[1_000usize, 10_000, 100_000] {
        let items = gen_random_boxes(count, 1000.0, 10.0);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("random_n{}", count), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = Tree::default();
                    let _ = tree.build(items);
                    black_box(tree.node_count());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_aabb_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("aabb_query");
    for &count in &[10_000usize, 100_000] {
        let items = gen_random_boxes(count, 1000.0, 10.0);
        let tree = build_tree(&items);
        let shape = AABB::new(Vec3::splat(400.0), Vec3::splat(500.0));

        group.bench_function(format!("tree_n{}", count), |b| {
            let mut query = AabbQuery::new(shape);
            b.iter(|| {
                let hits = query.execute(&tree).map(|r| r.len()).unwrap_or(0);
                black_box(hits);
            })
        });
        group.bench_function(format!("brute_force_n{}", count), |b| {
            b.iter(|| {
                let hits = items.iter().filter(|(_, aabb)| shape.intersects(aabb)).count();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_ray_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("ray_query");
    let items = gen_building(40, 10);
    let tree = build_tree(&items);
    let ray = Ray::new(Vec3::new(-10.0, 101.3, 14.5), Vec3::new(1.0, 0.05, 0.0)).normalized();

    group.bench_function("tree_building", |b| {
        let mut query = RayQuery::new(ray);
        b.iter(|| {
            let hits = query.execute(&tree).map(|r| r.len()).unwrap_or(0);
            black_box(hits);
        })
    });
    group.bench_function("brute_force_building", |b| {
        b.iter(|| {
            let hits = items.iter().filter(|(_, aabb)| ray.intersects_aabb(aabb)).count();
            black_box(hits);
        })
    });
    group.finish();
}

fn bench_delta_frustum(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta_frustum");
    let items = gen_building(40, 10);
    let tree = build_tree(&items);
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 500.0);

    // Camera panning slowly across the building
    let frusta: Vec<Frustum> = (0..64)
        .map(|i| {
            let eye = Vec3::new(i as f32 * 0.5, -30.0, 20.0);
            let view = Mat4::look_at_rh(eye, eye + Vec3::new(0.0, 1.0, -0.3), Vec3::Z);
            Frustum::from_view_projection(&(projection * view))
        })
        .collect();

    group.bench_function("pan_64_frames", |b| {
        b.iter_batched(
            || DeltaFrustumQuery::new(frusta[0]),
            |mut query| {
                let mut changes = 0;
                for frustum in &frusta {
                    query.set_shape(*frustum);
                    changes += query.execute(&tree).map(|r| r.len()).unwrap_or(0);
                }
                black_box(changes);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_aabb_query, bench_ray_query, bench_delta_frustum);
criterion_main!(benches);
