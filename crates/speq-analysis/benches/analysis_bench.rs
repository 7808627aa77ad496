//! Criterion benchmarks for speq-analysis components
//!
//! Run with: cargo bench -p speq-analysis
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rustfft::FftPlanner;
use speq_analysis::fft::{self, Fft};
use speq_analysis::{AnalyzerConfig, Complex64, SpectrumAnalyzer};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 48000.0;
const FFT_SIZES: &[usize] = &[256, 1024, 4096, 8192];

/// Generate a test sine wave
fn generate_sine(size: usize, frequency: f64) -> Vec<f64> {
    (0..size)
        .map(|i| (2.0 * PI * frequency * i as f64 / SAMPLE_RATE).sin())
        .collect()
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT");

    for &size in FFT_SIZES {
        let signal = generate_sine(size, 1000.0);
        let input: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();

        group.bench_with_input(BenchmarkId::new("transform", size), &size, |b, _| {
            b.iter(|| black_box(fft::transform(black_box(&signal))));
        });

        group.bench_with_input(BenchmarkId::new("planned", size), &size, |b, &size| {
            let plan = Fft::new(size).unwrap();
            let mut buffer = input.clone();
            b.iter(|| {
                buffer.copy_from_slice(&input);
                plan.forward(black_box(&mut buffer)).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("rustfft", size), &size, |b, &size| {
            let plan = FftPlanner::new().plan_fft_forward(size);
            let mut buffer = input.clone();
            b.iter(|| {
                buffer.copy_from_slice(&input);
                plan.process(black_box(&mut buffer));
            });
        });
    }

    group.finish();
}

fn bench_compute_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpectrumAnalyzer");

    for &size in &[1024usize, 4096] {
        let config = AnalyzerConfig { fft_size: size, ..AnalyzerConfig::default() };
        let block: Vec<f32> = generate_sine(512, 440.0).iter().map(|&x| x as f32).collect();

        group.bench_with_input(BenchmarkId::new("compute_spectrum", size), &size, |b, _| {
            let mut analyzer = SpectrumAnalyzer::new(SAMPLE_RATE, config.clone()).unwrap();
            analyzer.ingest(&block, block.len(), 1);
            b.iter(|| black_box(analyzer.compute_spectrum()));
        });

        group.bench_with_input(BenchmarkId::new("ingest_512", size), &size, |b, _| {
            let mut analyzer = SpectrumAnalyzer::new(SAMPLE_RATE, config.clone()).unwrap();
            b.iter(|| analyzer.ingest(black_box(&block), block.len(), 1));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fft, bench_compute_spectrum);
criterion_main!(benches);
