//! Binary state record tools.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use speq_effects::{EqState, Equalizer, STATE_VERSION};

use super::common::load_settings;

/// Write or decode the persisted EQ state.
#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    command: StateCommand,
}

#[derive(Subcommand)]
enum StateCommand {
    /// Encode settings into a state file
    Save {
        /// Output file
        file: PathBuf,

        /// Settings file (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Decode and print a state file
    Show {
        /// State file
        file: PathBuf,
    },
}

/// Run the state command.
pub fn run(args: StateArgs) -> anyhow::Result<()> {
    match args.command {
        StateCommand::Save { file, settings } => {
            let settings = load_settings(settings.as_deref())?;
            let mut eq = Equalizer::default();
            settings.apply_to(&mut eq);
            let bytes = eq.save_state();
            std::fs::write(&file, &bytes)
                .with_context(|| format!("writing {}", file.display()))?;
            println!("Wrote {} bytes to {}", bytes.len(), file.display());
        }
        StateCommand::Show { file } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let state = EqState::from_bytes(&bytes)
                .with_context(|| format!("decoding {}", file.display()))?;

            println!("Version: {STATE_VERSION}");
            println!("Bypass:  {}", if state.bypass { "on" } else { "off" });
            println!("{:>4}  {:>10}  {:>9}  {:>6}", "Band", "Freq (Hz)", "Gain (dB)", "Q");
            for (i, band) in state.bands.iter().enumerate() {
                println!(
                    "{:>4}  {:>10.1}  {:>+9.2}  {:>6.3}",
                    i + 1,
                    band.frequency,
                    band.gain_db,
                    band.q
                );
            }
        }
    }
    Ok(())
}
