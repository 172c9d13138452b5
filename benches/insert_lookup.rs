use core::hint::black_box;

use chained_map::HashMap as ChainedMap;
use chained_map::StringMap;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const SIZES: &[usize] = &[(1 << 10), (1 << 12), (1 << 14), (1 << 16), (1 << 18)];

trait BenchKey: Clone + core::hash::Hash + Eq {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{key:016X}"))
    }
}

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn shuffled<K: Clone>(keys: &[K]) -> Vec<K> {
    let mut keys = keys.to_vec();
    keys.shuffle(&mut SmallRng::from_os_rng());
    keys
}

fn bench_insert<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chained_map/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = ChainedMap::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        map.set(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = HashbrownMap::new();
                    for (i, key) in keys.into_iter().enumerate() {
                        map.insert(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        let misses = random_keys::<K>(size);
        let mut probes = keys.clone();
        probes.extend(misses);
        probes.shuffle(&mut SmallRng::from_os_rng());

        let chained: ChainedMap<K, usize> = keys.iter().cloned().zip(0..).collect();
        let hashbrown: HashbrownMap<K, usize> = keys.iter().cloned().zip(0..).collect();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("chained_map/{size}"), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for probe in &probes {
                    if chained.try_get(probe).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for probe in &probes {
                    if hashbrown.get(probe).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }

    group.finish();
}

fn bench_churn<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        let replacements = random_keys::<K>(size);

        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_function(format!("chained_map/{size}"), |b| {
            b.iter_batched(
                || keys.iter().cloned().zip(0..).collect::<ChainedMap<K, usize>>(),
                |mut map| {
                    for (old, new) in keys.iter().zip(&replacements) {
                        map.remove(old);
                        map.set(new.clone(), 0);
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.iter().cloned().zip(0..).collect::<HashbrownMap<K, usize>>(),
                |mut map| {
                    for (old, new) in keys.iter().zip(&replacements) {
                        map.remove(old);
                        map.insert(new.clone(), 0);
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_text_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_text_comparer");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<String>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("string_map/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = StringMap::default();
                    for (i, key) in keys.into_iter().enumerate() {
                        map.set(key, i);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert::<u64>,
    bench_insert::<String>,
    bench_find_hit_miss::<u64>,
    bench_find_hit_miss::<String>,
    bench_churn::<u64>,
    bench_churn::<String>,
    bench_text_keys,
);

criterion_main!(benches);
