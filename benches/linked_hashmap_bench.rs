use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use linked_hashmap::{LinkedHashMap, Position};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> LinkedHashMap<String, u64> {
    let mut m = LinkedHashMap::with_capacity(n);
    for (i, x) in lcg(seed).take(n).enumerate() {
        m.insert(key(x), i as u64);
    }
    m
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("linked::insert_fresh_100k", |b| {
        b.iter_batched(
            LinkedHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_after_clear_100k(c: &mut Criterion) {
    c.bench_function("linked::insert_after_clear_100k", |b| {
        b.iter_batched(
            || {
                let mut m = filled(2, 110_000);
                m.clear();
                m
            },
            |mut m| {
                for (i, x) in lcg(3).take(100_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_erase_random_10k(c: &mut Criterion) {
    c.bench_function("linked::erase_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let m = filled(5, 110_000);
                let positions: Vec<Position> = m.keys().map(|k| m.find(k)).collect();
                // Precompute 10k unique positions via LCG
                let n = positions.len();
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                while sel.len() < 10_000 {
                    s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((s as usize) % n);
                }
                let to_erase: Vec<Position> = sel.into_iter().map(|i| positions[i]).collect();
                (m, to_erase)
            },
            |(mut m, to_erase)| {
                for p in to_erase {
                    let _ = m.erase(p);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_10k(c: &mut Criterion) {
    c.bench_function("linked::find_hit_10k_on_100k", |b| {
        let m = filled(7, 100_000);
        let keys: Vec<String> = m.keys().cloned().collect();
        // Precompute 10k random query keys using LCG
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.find(k.as_str()));
            }
        })
    });
}

fn bench_find_miss_10k(c: &mut Criterion) {
    c.bench_function("linked::find_miss_10k_on_100k", |b| {
        let m = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(m.at(k.as_str()).is_err());
            }
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    c.bench_function("linked::iter_all_100k", |b| {
        let m = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("linked::position_walk_back_100k", |b| {
        let m = filled(1000, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            let mut pos = m.end();
            while let Ok(p) = pos.prev(&m) {
                sum = sum.wrapping_add(*p.value(&m).unwrap());
                pos = p;
            }
            black_box(sum)
        })
    });

    c.bench_function("linked::iter_mut_increment_all_100k", |b| {
        b.iter_batched(
            || filled(1001, 100_000),
            |mut m| {
                for (_k, v) in m.iter_mut() {
                    *v = v.wrapping_add(1);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_clone_100k(c: &mut Criterion) {
    c.bench_function("linked::clone_100k", |b| {
        let m = filled(4242, 100_000);
        b.iter(|| black_box(m.clone()))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_after_clear_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_erase_random_10k,
              bench_find_hit_10k,
              bench_find_miss_10k,
              bench_walk,
              bench_clone_100k
}
criterion_main!(benches_insert, benches_ops);
