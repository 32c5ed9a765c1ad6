//! Performance benchmarks for band-power extraction

use bandpower_core::Recording;
use bandpower_processing::{
    extract_features, zscore, BandPassFilter, ExtractionConfig, FirBandPass, SubBand,
};
use bandpower_simulation::{RecordingSimulator, SimulationConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn simulated(duration: f64, channel_count: usize) -> Recording {
    RecordingSimulator::new(SimulationConfig {
        duration,
        channel_count,
        seed: Some(1),
        ..SimulationConfig::default()
    })
    .and_then(|mut simulator| simulator.generate("bench"))
    .expect("simulation config is valid")
}

/// Benchmark the FIR band-pass across filter orders
fn bench_fir_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fir_bandpass");
    let recording = simulated(30.0, 19);
    let band = SubBand::new(8.0, 13.0);

    for &order in &[100usize, 250, 500] {
        group.bench_with_input(BenchmarkId::new("order", order), &order, |b, &order| {
            b.iter(|| {
                FirBandPass::new()
                    .filter(
                        black_box(&recording.data),
                        recording.sampling_rate,
                        band,
                        order,
                    )
                    .expect("filter succeeds")
            });
        });
    }

    group.finish();
}

fn bench_zscore(c: &mut Criterion) {
    let recording = simulated(30.0, 19);
    c.bench_function("zscore_19ch_30s", |b| b.iter(|| zscore(black_box(&recording.data))));
}

/// Benchmark full extraction against recording length
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    group.sample_size(20);
    let config = ExtractionConfig::canonical_bands();

    for &duration in &[10.0, 60.0] {
        let recording = simulated(duration, 19);
        group.bench_with_input(
            BenchmarkId::new("canonical_bands", format!("{}s", duration)),
            &recording,
            |b, recording| {
                b.iter(|| extract_features(black_box(recording), &config).expect("extraction succeeds"));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_fir_filter, bench_zscore, bench_extraction);
criterion_main!(benches);
