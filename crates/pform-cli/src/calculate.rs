//! # Calculate Subcommand

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use rust_decimal::Decimal;

use pform_core::{calculate, Amount, OccurrenceCount, ValidationError};

/// Arguments for the `pform calculate` subcommand.
#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Base fine of the breach.
    #[arg(long, allow_hyphen_values = true)]
    pub base_amount: Decimal,

    /// Occurrences of the breach in the last twelve months.
    #[arg(long, allow_hyphen_values = true)]
    pub occurrences: i64,
}

/// Execute the calculate subcommand.
///
/// Prints `<amount> (<escalation>)`. Returns 1 for a negative amount or a
/// count below 1.
pub fn run_calculate(args: &CalculateArgs, out: &mut dyn Write) -> Result<u8> {
    let (base, occurrences) = match inputs(args) {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::error!(field = e.field(), "{e}");
            return Ok(1);
        }
    };

    let amount = calculate(base, occurrences);
    writeln!(out, "{amount} ({})", occurrences.tier().label()).context("failed to write result")?;
    Ok(0)
}

fn inputs(args: &CalculateArgs) -> Result<(Amount, OccurrenceCount), ValidationError> {
    Ok((
        Amount::new(args.base_amount, "baseAmount")?,
        OccurrenceCount::new(args.occurrences)?,
    ))
}
