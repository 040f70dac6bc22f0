use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rycode::ui::registry::{CycleDirection, ThemeRegistry};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

fn bench_theme_switch(c: &mut Criterion) {
    let registry = ThemeRegistry::builtin();
    let ids: Vec<String> = registry.provider_ids().to_vec();

    let mut group = c.benchmark_group("theme_switch");
    group.throughput(Throughput::Elements(1));

    group.bench_function("current", |b| b.iter(|| black_box(registry.current())));
    group.bench_function("primary_accessor", |b| {
        b.iter(|| black_box(registry.primary()))
    });

    let mut i = 0usize;
    group.bench_function("switch_to", |b| {
        b.iter(|| {
            i = (i + 1) % ids.len();
            black_box(registry.switch_to(&ids[i]))
        })
    });
    group.bench_function("switch_to_same", |b| {
        b.iter(|| black_box(registry.switch_to(&ids[0])))
    });
    group.bench_function("cycle", |b| {
        b.iter(|| black_box(registry.cycle(CycleDirection::Forward)))
    });
    group.finish();

    // Reads while another thread keeps switching.
    let mut group = c.benchmark_group("theme_switch_contended");
    for &readers in &[1usize, 4usize] {
        let registry = Arc::new(ThemeRegistry::builtin());
        group.bench_function(BenchmarkId::new("current", readers), |b| {
            b.iter_custom(|iters| {
                let switcher = {
                    let registry = Arc::clone(&registry);
                    let ids = ids.clone();
                    thread::spawn(move || {
                        for n in 0..iters as usize {
                            registry.switch_to(&ids[n % ids.len()]);
                        }
                    })
                };
                let start = std::time::Instant::now();
                let handles: Vec<_> = (0..readers)
                    .map(|_| {
                        let registry = Arc::clone(&registry);
                        thread::spawn(move || {
                            for _ in 0..iters {
                                black_box(registry.current());
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().expect("reader thread");
                }
                let elapsed = start.elapsed();
                switcher.join().expect("switcher thread");
                elapsed
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_theme_switch);
criterion_main!(benches);
