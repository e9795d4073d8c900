// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;
use url::Url;
use waymark_state::{
    Hash, HashMode, HashPaths, PreserveQuery, State, calculate_state, merge_query_params,
    preserve_query_in_url,
};

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
}

fn gen_fragment(universes: usize) -> String {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut paths = HashPaths::new();
    for i in 0..universes {
        let depth = rng.next_u64() % 4 + 1;
        let mut path = String::new();
        for d in 0..depth {
            path.push_str(&format!("/seg{}-{}", d, rng.next_u64() % 1000));
        }
        paths.insert(format!("u{i}"), path);
    }
    paths.to_fragment()
}

fn gen_state(universes: usize) -> State {
    let mut state = State::new();
    for i in 0..universes {
        state
            .hash
            .insert(format!("u{i}"), json!({ "scroll": i, "open": [i, i + 1] }));
    }
    state
}

fn bench_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragment");
    for &n in &[1usize, 8, 64] {
        let fragment = gen_fragment(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("parse_multi_n{n}"), |b| {
            b.iter(|| black_box(HashPaths::parse(black_box(&fragment), HashMode::Multi)));
        });
        let paths = HashPaths::parse(&fragment, HashMode::Multi);
        group.bench_function(format!("rewrite_one_n{n}"), |b| {
            b.iter_batched(
                || paths.clone(),
                |mut paths| {
                    paths.insert("u0", "/moved");
                    black_box(paths.to_fragment())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_calculate_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_state");
    for &n in &[1usize, 8, 64] {
        let state = gen_state(n);
        group.bench_function(format!("universe_n{n}"), |b| {
            let hash = Hash::from("u0");
            b.iter(|| black_box(calculate_state(&state, &hash, json!("next"))));
        });
        group.bench_function(format!("single_n{n}"), |b| {
            b.iter(|| black_box(calculate_state(&state, &Hash::Single, json!("next"))));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("preserve_query");
    let mut query = String::new();
    for i in 0..32 {
        if i > 0 {
            query.push('&');
        }
        query.push_str(&format!("k{}=v{}", i % 8, i));
    }
    let current = Url::parse(&format!("https://app.test/base?{query}")).unwrap();
    let policies = [
        ("all", PreserveQuery::All),
        ("key", PreserveQuery::from("k3")),
        ("keys", PreserveQuery::from(["k1", "k5", "missing"])),
    ];
    for (name, policy) in &policies {
        group.bench_function(format!("url_{name}"), |b| {
            b.iter(|| black_box(preserve_query_in_url("/next?x=1", policy, &current)));
        });
        group.bench_function(format!("params_{name}"), |b| {
            b.iter(|| black_box(merge_query_params(None, policy, &current)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fragment, bench_calculate_state, bench_query);
criterion_main!(benches);
