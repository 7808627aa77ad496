//! Criterion benchmarks for the speq equalizer
//!
//! Run with: cargo bench -p speq-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use speq_effects::Equalizer;

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_stereo_signal(frames: usize) -> Vec<f32> {
    (0..frames)
        .flat_map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let s = ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5) as f32;
            [s, s]
        })
        .collect()
}

fn shaped_eq() -> Equalizer {
    let mut eq = Equalizer::new(SAMPLE_RATE);
    for (band, gain) in [3.0, -2.0, 4.0, -6.0, 2.0].into_iter().enumerate() {
        eq.set_band_gain(band, gain);
    }
    eq
}

fn bench_equalizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("Equalizer");

    for &frames in BLOCK_SIZES {
        let input = generate_stereo_signal(frames);

        group.bench_with_input(BenchmarkId::new("all_bands", frames), &frames, |b, &frames| {
            let mut eq = shaped_eq();
            let mut buffer = input.clone();
            b.iter(|| {
                buffer.copy_from_slice(&input);
                eq.process_block(black_box(&mut buffer), frames, 2);
            });
        });

        group.bench_with_input(BenchmarkId::new("flat", frames), &frames, |b, &frames| {
            let mut eq = Equalizer::new(SAMPLE_RATE);
            let mut buffer = input.clone();
            b.iter(|| {
                buffer.copy_from_slice(&input);
                eq.process_block(black_box(&mut buffer), frames, 2);
            });
        });
    }

    group.finish();
}

fn bench_response(c: &mut Criterion) {
    let eq = shaped_eq();
    c.bench_function("response_curve_512", |b| {
        b.iter(|| {
            for i in 0..512 {
                let f = 20.0 * 1000.0f64.powf(i as f64 / 511.0);
                black_box(eq.response_at(black_box(f)));
            }
        });
    });
}

fn bench_state(c: &mut Criterion) {
    let mut eq = shaped_eq();
    let bytes = eq.save_state();
    c.bench_function("save_state", |b| b.iter(|| black_box(eq.save_state())));
    c.bench_function("load_state", |b| {
        b.iter(|| eq.load_state(black_box(&bytes)))
    });
}

criterion_group!(benches, bench_equalizer, bench_response, bench_state);
criterion_main!(benches);
