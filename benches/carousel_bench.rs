//! Tween stepping and ray-cast picking throughput.

#![allow(missing_docs)]

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use ring_carousel::animation::tween::Repeat;
use ring_carousel::animation::{
    EasingFunction, Tween, TweenScheduler, TweenValue,
};
use ring_carousel::camera::Camera;
use ring_carousel::layout::RingLayout;
use ring_carousel::options::LayoutOptions;
use ring_carousel::picking::{PickMap, PickingService};
use ring_carousel::scene::{Geometry, Material, Node, SceneGraph};
use uuid::Uuid;

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::ElasticIn;
    let _ = c.bench_function("elastic_in_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))))
    });
}

/// A ring of `count` card planes, each tagged with its own card id.
fn ring_scene(count: usize) -> (SceneGraph, PickMap) {
    let options = LayoutOptions::default();
    let ring = RingLayout::compute(count, &options);
    let mut scene = SceneGraph::new();
    let mut pick_map = PickMap::new();
    for i in 0..count {
        let Some(transform) = ring.transform(i) else {
            continue;
        };
        let plane = Node::mesh(
            format!("card-{i}"),
            Geometry::Plane {
                width: options.card_width,
                height: options.card_height,
            },
            Material::default(),
        )
        .with_transform(transform);
        let node = scene.insert_child(scene.root(), plane);
        pick_map.tag_card(node, None, Uuid::from_u128(i as u128), i);
    }
    (scene, pick_map)
}

fn tween_advance_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tween_advance");
    for count in [8, 64, 512] {
        let (mut scene, _) = ring_scene(count);
        let mut scheduler = TweenScheduler::new();
        for node in scene.mesh_descendants(scene.root()) {
            let _ = scheduler.start(
                Tween::new(node, TweenValue::Opacity(0.0), Duration::from_secs(1))
                    .yoyo(true)
                    .repeat(Repeat::Infinite),
                &scene,
            );
        }
        let _ = group.bench_function(format!("{count}_cards"), |b| {
            b.iter(|| {
                black_box(scheduler.advance(Duration::from_millis(16), &mut scene))
            })
        });
    }
    group.finish();
}

fn pick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick");
    let camera = Camera {
        eye: Vec3::new(0.0, 4.5, -60.0),
        ..Camera::default()
    };
    for count in [8, 64, 512] {
        let (scene, pick_map) = ring_scene(count);
        let service = PickingService::new(&scene, &pick_map);
        let _ = group.bench_function(format!("{count}_cards"), |b| {
            b.iter(|| black_box(service.pick(&camera, black_box(Vec2::ZERO))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    easing_benchmark,
    tween_advance_benchmark,
    pick_benchmark
);
criterion_main!(benches);
