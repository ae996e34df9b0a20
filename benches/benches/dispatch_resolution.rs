// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use understory_dispatch::dpad::{Directions, DirectionalPad};
use understory_dispatch::fixed::FixedArity;
use understory_dispatch::methods::{Methods, Responder};
use understory_dispatch::named::NamedEvent;
use understory_dispatch::touch::{TouchAction, TouchDispatch, TouchSample};
use understory_dispatch::types::{TypeKey, Typed};

struct Base;
impl Typed for Base {}

struct Leaf;
impl Typed for Leaf {
    fn superclass() -> Option<TypeKey> {
        Some(TypeKey::of::<Base>())
    }
}

#[derive(Default)]
struct Widget {
    hits: u64,
}

impl Responder for Widget {
    fn declare(methods: &mut Methods<Self>) {
        let i = TypeKey::of::<i32>();
        let f = TypeKey::of::<f32>();
        // A handful of decoys so the scan has something to reject.
        for name in ["press", "release", "hover", "scroll", "focus"] {
            methods.method(name, &[i], |w: &mut Self, _| w.hits += 1);
        }
        methods
            .method("press", &[TypeKey::of::<Base>(), i], |w: &mut Self, _| {
                w.hits += 1;
                true
            })
            .method("press", &[TypeKey::of::<Leaf>(), i], |w: &mut Self, _| {
                w.hits += 2;
                true
            })
            .method("touch_move", &[f, f], |w: &mut Self, _| {
                w.hits += 1;
                true
            })
            .method("north", &[], |w: &mut Self, _| w.hits += 1)
            .method("east", &[], |w: &mut Self, _| w.hits += 1);
    }
}

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
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_samples(count: usize) -> Vec<TouchSample> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let local = Point::new(rng.next_f64() * 400.0, rng.next_f64() * 300.0);
            TouchSample {
                action: TouchAction::Move,
                local,
                screen: local + Vec2::new(20.0, 80.0),
            }
        })
        .collect()
}

fn bench_fixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed");
    group.bench_function("cold_resolve", |b| {
        b.iter_batched(
            || (FixedArity::new("press", 2), Widget::default()),
            |(d, mut w)| black_box(d.invoke(&mut w, &[&3_i32, &Leaf]).ok()),
            BatchSize::SmallInput,
        )
    });
    let d = FixedArity::new("press", 2);
    let mut w = Widget::default();
    group.bench_function("cached_reversed", |b| {
        b.iter(|| black_box(d.invoke(&mut w, &[&3_i32, &Leaf]).ok()))
    });
    group.finish();
}

fn bench_named(c: &mut Criterion) {
    let mut group = c.benchmark_group("named");
    let exact = NamedEvent::new("press");
    let optional = NamedEvent::optional("press", 0);
    let mut w = Widget::default();
    group.bench_function("cached_exact", |b| {
        b.iter(|| black_box(exact.dispatch(&mut w, &[&Leaf, &1_i32]).ok()))
    });
    group.bench_function("cached_optional_miss", |b| {
        b.iter(|| black_box(optional.dispatch(&mut w, &[&Base, &1.0_f32]).ok()))
    });
    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    let samples = gen_samples(1024);
    let touch = TouchDispatch::new();
    let mut w = Widget::default();
    group.throughput(Throughput::Elements(samples.len() as u64));
    group.bench_function("touch_move_projected", |b| {
        b.iter(|| {
            for s in &samples {
                black_box(touch.dispatch(&mut w, s).ok());
            }
        })
    });
    let pad = DirectionalPad::new();
    group.bench_function("dpad_split_diagonal", |b| {
        b.iter(|| {
            black_box(
                pad.dispatch_directions(&mut w, Directions::NORTH | Directions::EAST)
                    .ok(),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, bench_fixed, bench_named, bench_tables);
criterion_main!(benches);
