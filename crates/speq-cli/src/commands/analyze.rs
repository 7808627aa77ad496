//! Offline run of the real-time engine on synthetic input.
//!
//! Tones and noise are generated block by block, filtered by the
//! [`AudioProcessor`](speq_engine::AudioProcessor) and analyzed by the
//! [`SpectrumReader`](speq_engine::SpectrumReader) once per block, as a UI
//! tick would.

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use speq_engine::Engine;

use super::common::{Noise, format_db, load_settings};

/// Analyze synthesized tones through the engine.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Settings file (TOML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Tone frequency in Hz (repeatable; defaults to 1000)
    #[arg(long = "tone", value_name = "HZ")]
    tones: Vec<f64>,

    /// White noise amplitude
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// Signal length in seconds
    #[arg(long, default_value = "1.0")]
    seconds: f64,

    /// Frames per processing block
    #[arg(long, default_value = "512")]
    block: usize,

    /// Number of loudest bands to list
    #[arg(long, default_value = "8")]
    top: usize,
}

/// Run the analyze command.
pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let sample_rate = settings.sample_rate_hz();
    let config = settings.analyzer_config()?;
    anyhow::ensure!(args.block > 0, "block size must be positive");
    anyhow::ensure!(args.seconds > 0.0, "duration must be positive");

    let (shared, mut processor, mut reader) = Engine::new(sample_rate, config)
        .context("building engine")?
        .into_parts();
    for (band, config) in settings.band_configs().into_iter().enumerate() {
        shared.set_band(band, config);
    }
    shared.set_bypass(settings.equalizer.bypass);

    let tones = if args.tones.is_empty() {
        vec![1000.0]
    } else {
        args.tones
    };
    let amplitude = 0.5 / tones.len() as f64;
    let total_frames = (args.seconds * sample_rate) as usize;
    let mut noise = Noise::new(0x5EED);
    let mut buffer = vec![0.0f32; args.block * 2];
    let mut frame = 0;
    let mut snapshot = (*reader.latest()).clone();

    while frame < total_frames {
        let frames = args.block.min(total_frames - frame);
        for (i, out) in buffer.chunks_exact_mut(2).take(frames).enumerate() {
            let t = (frame + i) as f64 / sample_rate;
            let tonal: f64 = tones.iter().map(|f| amplitude * (2.0 * PI * f * t).sin()).sum();
            let sample = (tonal + args.noise * noise.next_sample()) as f32;
            out[0] = sample;
            out[1] = sample;
        }
        processor.process_callback(&mut buffer, frames, 2, sample_rate);
        snapshot = reader.compute();
        frame += frames;
    }

    println!(
        "Analyzed {:.2}s at {} Hz ({} blocks dropped from analysis)",
        total_frames as f64 / sample_rate,
        settings.sample_rate,
        shared.dropped_blocks()
    );
    println!("  Peak frequency: {:.1} Hz", snapshot.peak_frequency);
    println!("  RMS level:      {}", format_db(snapshot.rms_level));
    println!("  Peak level:     {}", format_db(snapshot.peak_level));

    let mut ranked: Vec<usize> = (0..snapshot.magnitudes.len()).collect();
    ranked.sort_by(|&a, &b| snapshot.magnitudes[b].total_cmp(&snapshot.magnitudes[a]));
    println!();
    println!("{:>12}  {:>10}", "Band (Hz)", "Level");
    for &band in ranked.iter().take(args.top) {
        println!(
            "{:>12.1}  {:>10}",
            snapshot.frequencies[band],
            format_db(snapshot.magnitudes[band])
        );
    }
    Ok(())
}
