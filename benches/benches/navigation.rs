// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;
use waymark_history::Window;
use waymark_location::{GoToOptions, Location, NavigateOptions, RoutingOptions};
use waymark_state::{Hash, HashMode};

fn attach(options: RoutingOptions) -> (Window, Location) {
    let window = Window::in_memory("https://app.test/").unwrap();
    let location = Location::new(&window, options).unwrap();
    (window, location)
}

fn bench_navigate(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigate");
    let count = 256usize;
    group.throughput(Throughput::Elements(count as u64));
    for (name, options) in [
        ("lite", RoutingOptions::default()),
        ("full", RoutingOptions::default().full()),
    ] {
        group.bench_function(format!("push_{name}_x{count}"), |b| {
            b.iter_batched(
                || attach(options.clone()),
                |(window, location)| {
                    for i in 0..count {
                        let _ = location.navigate(
                            &format!("/item/{i}"),
                            NavigateOptions::push(json!({ "hash": {} })),
                        );
                    }
                    black_box(window.location());
                },
                BatchSize::SmallInput,
            );
        });
    }
    let (_, location) = attach(RoutingOptions::default().full());
    for i in 0..8 {
        let _ = location
            .on_before_navigate(move |e| {
                if e.url.ends_with(&format!("/blocked/{i}")) {
                    e.cancel("blocked");
                }
            })
            .unwrap();
    }
    group.bench_function("push_full_8_handlers", |b| {
        b.iter(|| {
            black_box(
                location
                    .navigate("/ok", NavigateOptions::replace(json!({ "hash": {} })))
                    .unwrap(),
            )
        });
    });
    group.finish();
}

fn bench_go_to_multi(c: &mut Criterion) {
    let mut group = c.benchmark_group("go_to_multi");
    let options = RoutingOptions::default()
        .with_hash_mode(HashMode::Multi)
        .with_default_hash("u0");
    let (_window, location) = attach(options);
    for i in 0..16 {
        let _ = location.go_to(
            &format!("/start/{i}"),
            GoToOptions {
                hash: Some(Hash::from(format!("u{i}"))),
                ..GoToOptions::default()
            },
        );
    }
    group.bench_function("rewrite_universe_of_16", |b| {
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            let _ = location.go_to(
                &format!("/page/{n}"),
                GoToOptions {
                    hash: Some(Hash::from("u7")),
                    replace: true,
                    state: json!(n),
                    ..GoToOptions::default()
                },
            );
            black_box(location.hash_paths().len())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_navigate, bench_go_to_multi);
criterion_main!(benches);
