//! Benchmark suite for parola-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parola_algo::{CardStore, Proficiency, Scheduler, SeededRandom, VocabCard, VocabEntry};

fn entries(n: usize) -> Vec<VocabEntry> {
    (0..n)
        .map(|i| VocabEntry::new(format!("parola{i}"), format!("word{i}")))
        .collect()
}

fn bench_select_next(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let mut group = c.benchmark_group("select_next");

    for size in sizes {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = SeededRandom::new(42);
            let store = CardStore::initialize(entries(size), &mut rng);
            let mut scheduler = Scheduler::new(store, rng);
            b.iter(|| black_box(scheduler.select_next()))
        });
    }

    group.finish();
}

fn bench_frequency_mode(c: &mut Criterion) {
    // six weak cards keeps the scheduler below the overflow threshold
    c.bench_function("select_next_frequency_1000", |b| {
        let cards = entries(1_000)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut card = VocabCard::from_entry(i as u32, entry);
                if i >= 6 {
                    card.proficiency = Proficiency::Mastered;
                }
                card
            })
            .collect();
        let store = CardStore::restore(cards).expect("unique ids");
        let mut scheduler = Scheduler::new(store, SeededRandom::new(42));
        b.iter(|| black_box(scheduler.select_next()))
    });
}

criterion_group!(benches, bench_select_next, bench_frequency_mode);
criterion_main!(benches);
