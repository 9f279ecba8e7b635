use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sb_core::{Histogram, UncertaintySeries};
use sb_syst::{BandContribution, combine_band, combine_in_quadrature};
use std::hint::black_box;

fn make_series(n_series: usize, n_bins: usize) -> Vec<UncertaintySeries> {
    // Deterministic, mixed-sign deviations.
    (0..n_series)
        .map(|s| {
            let x = (0..n_bins).map(|i| i as f64 + 0.5).collect();
            let y = (0..n_bins)
                .map(|i| (((s * 31 + i * 17) % 200) as f64 - 100.0) * 1e-3)
                .collect();
            UncertaintySeries::from_points(format!("Gr_{s}"), x, y).unwrap()
        })
        .collect()
}

fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("syst_quadrature");

    for n_series in [8usize, 64, 256] {
        let series = make_series(n_series, 50);
        group.bench_with_input(BenchmarkId::new("combine", n_series), &series, |b, s| {
            b.iter(|| black_box(combine_in_quadrature(s, "tot").unwrap()))
        });
    }

    group.finish();
}

fn bench_band(c: &mut Criterion) {
    let mut group = c.benchmark_group("syst_band");

    for n_samples in [4usize, 16, 64] {
        let rel = make_series(n_samples, 50);
        let yields: Vec<Histogram> = (0..n_samples)
            .map(|s| {
                let edges = (0..=50).map(|i| i as f64).collect();
                let content = (0..50).map(|i| ((s + i) % 13) as f64 * 10.0).collect();
                Histogram::from_counts(format!("h_{s}"), edges, content).unwrap()
            })
            .collect();
        let contributions: Vec<BandContribution<'_>> = rel
            .iter()
            .zip(&yields)
            .map(|(relative, yields)| BandContribution { sample: "s", relative, yields })
            .collect();
        group.bench_with_input(
            BenchmarkId::new("combine_band", n_samples),
            &contributions,
            |b, c| b.iter(|| black_box(combine_band(c, "band"))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_quadrature, bench_band);
criterion_main!(benches);
