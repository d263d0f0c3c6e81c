use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lottery_cascade::{DuplicateWinPolicy, Simulator};

fn make_simulator(stage_count: usize) -> Simulator {
    let mut sim = Simulator::new(
        1_200_000,
        40,
        [("tokyo", 4), ("osaka", 2), ("fukuoka", 1)],
        400_000,
        Some(DuplicateWinPolicy::seat_reduction(0.1)),
    )
    .unwrap();
    for i in 0..stage_count {
        // Ratios and weights cycle so stages differ from each other.
        let ratio = 0.2 + 0.1 * (i % 8) as f64;
        let weight = 1.0 + (i % 5) as f64;
        sim.add_stage(format!("stage-{i}"), ratio, 1_000 * i as i64, weight)
            .unwrap();
    }
    sim
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("cascade/calculate");
    for stage_count in [4usize, 32, 256] {
        group.throughput(Throughput::Elements(stage_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(stage_count),
            &stage_count,
            |b, &n| {
                let mut sim = make_simulator(n);
                b.iter(|| {
                    let result = sim.calculate().unwrap();
                    black_box(result.probabilities.total());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_calculate);
criterion_main!(benches);
