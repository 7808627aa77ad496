//! Host parameter table.

use clap::Args;
use speq_core::{ParamDescriptor, ParamUnit};
use speq_effects::{PARAM_COUNT, param_descriptor};

/// List the automatable parameters a host sees.
#[derive(Args)]
pub struct ParamsArgs {}

/// Run the params command.
pub fn run(_args: ParamsArgs) -> anyhow::Result<()> {
    println!(
        "{:>3}  {:<10}  {:<18}  {:>22}  {:>10}",
        "ID", "Key", "Name", "Range", "Default"
    );
    for desc in (0..PARAM_COUNT).filter_map(param_descriptor) {
        println!(
            "{:>3}  {:<10}  {:<18}  {:>22}  {:>10}",
            desc.id.0,
            desc.string_id,
            desc.name,
            format!(
                "{} .. {}",
                format_value(&desc, desc.min),
                format_value(&desc, desc.max)
            ),
            format_value(&desc, desc.default)
        );
    }
    Ok(())
}

/// Plain value with its unit suffix; switches read as on/off.
pub fn format_value(desc: &ParamDescriptor, value: f64) -> String {
    let suffix = desc.unit.suffix();
    match desc.unit {
        ParamUnit::Boolean => (if value >= 0.5 { "on" } else { "off" }).to_string(),
        ParamUnit::Hertz => format!("{value:.0}{suffix}"),
        ParamUnit::Decibels => format!("{value:+.1}{suffix}"),
        ParamUnit::Ratio => format!("{value:.3}{suffix}"),
    }
}
