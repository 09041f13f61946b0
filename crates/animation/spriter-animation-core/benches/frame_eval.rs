//! Frame evaluation benchmarks over the shared fixture documents.
//!
//! Run with: `cargo bench --bench frame_eval`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spriter_animation_core::{Config, Document, Evaluator, Frame};

fn load(name: &str) -> Document {
    spriter_test_fixtures::documents::load(name).unwrap()
}

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_single");
    for (fixture, entity) in [("squares", 0), ("nested", 0)] {
        let doc = load(fixture);
        let ev = Evaluator::new(&doc, Config::default());
        let anim = doc.animation(entity, 0).unwrap();
        let mut frame = Frame::with_capacity(ev.config());
        group.bench_with_input(BenchmarkId::from_parameter(fixture), &anim.length, |b, len| {
            let mut t = 0.0f32;
            b.iter(|| {
                t = (t + 16.0) % len;
                ev.evaluate_single_into(anim, black_box(t), &mut frame).unwrap();
                black_box(frame.sprites.len());
            });
        });
    }
    group.finish();
}

fn bench_blend(c: &mut Criterion) {
    let doc = load("squares");
    let ev = Evaluator::new(&doc, Config::default());
    let spin = doc.animation(0, 0).unwrap();
    let walk = doc.animation(0, 1).unwrap();
    let mut frame = Frame::with_capacity(ev.config());
    c.bench_function("evaluate_blend/squares", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 16.0) % spin.length;
            ev.evaluate_blend_into(spin, walk, black_box(t), 0.5, &mut frame)
                .unwrap();
            black_box(frame.sprites.len());
        });
    });
}

criterion_group!(benches, bench_single, bench_blend);
criterion_main!(benches);
