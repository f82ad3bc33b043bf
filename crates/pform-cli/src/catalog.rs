//! # Catalog Subcommand
//!
//! Prints one listing of a profile's reference data as pretty JSON, in the
//! same shape the HTTP service returns.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use pform_core::{Catalog, CatalogProfile};

/// Listing to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    /// Breach list of the profile.
    Breaches,
    /// Selectable occurrence counts (escalation profile).
    Occurrences,
    /// Penalty tiers (tier profile).
    Penalties,
}

/// Arguments for the `pform catalog` subcommand.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Catalog profile: escalation or tier.
    #[arg(long, default_value_t = CatalogProfile::Escalation)]
    pub profile: CatalogProfile,

    /// Listing to print.
    #[arg(long, value_enum, default_value_t = CatalogKind::Breaches)]
    pub kind: CatalogKind,
}

/// Execute the catalog subcommand.
///
/// Returns 1 when the profile does not carry the requested listing.
pub fn run_catalog(args: &CatalogArgs, out: &mut dyn Write) -> Result<u8> {
    let catalog = Catalog::new(args.profile);

    let json = match args.kind {
        CatalogKind::Breaches => match args.profile {
            CatalogProfile::Escalation => serde_json::to_string_pretty(catalog.breaches()),
            CatalogProfile::Tier => serde_json::to_string_pretty(catalog.tier_breaches()),
        },
        CatalogKind::Occurrences => match catalog.occurrences() {
            Some(counts) => serde_json::to_string_pretty(counts),
            None => return unavailable("occurrence counts", args.profile),
        },
        CatalogKind::Penalties => match catalog.penalties() {
            Some(tiers) => serde_json::to_string_pretty(tiers),
            None => return unavailable("penalty tiers", args.profile),
        },
    }
    .context("failed to serialize catalog listing")?;

    writeln!(out, "{json}").context("failed to write listing")?;
    Ok(0)
}

fn unavailable(what: &str, profile: CatalogProfile) -> Result<u8> {
    tracing::error!("{what} are not offered by the {profile} profile");
    Ok(1)
}
