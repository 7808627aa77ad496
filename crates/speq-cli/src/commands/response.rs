//! EQ magnitude response printout.

use std::path::PathBuf;

use clap::Args;
use speq_effects::{Equalizer, MAX_FREQUENCY, MIN_FREQUENCY};

use super::common::{load_settings, log_spaced};

/// Print the combined EQ curve.
#[derive(Args)]
pub struct ResponseArgs {
    /// Settings file (TOML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of log-spaced frequencies
    #[arg(long, default_value = "31")]
    points: usize,
}

/// Run the response command.
pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let mut eq = Equalizer::default();
    settings.apply_to(&mut eq);

    println!(
        "EQ response at {} Hz{}",
        settings.sample_rate,
        if eq.is_bypassed() { " (bypassed)" } else { "" }
    );
    println!("{:>10}  {:>9}", "Freq (Hz)", "Gain (dB)");
    for freq in log_spaced(MIN_FREQUENCY, MAX_FREQUENCY, args.points) {
        println!("{freq:>10.1}  {:>+9.2}", eq.response_at(freq));
    }
    Ok(())
}
