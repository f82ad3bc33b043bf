//! # Render Subcommand
//!
//! Reads a penalty form from a JSON or YAML file, completes it against the
//! chosen profile's catalog, and writes the PDF notice. The file uses the
//! same field names as the HTTP request body.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pform_core::{Catalog, CatalogProfile, PenaltyForm};
use pform_document::{DocumentGenerator, PdfGenerator, RenderContext};

/// Arguments for the `pform render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Form file (`.json`, `.yaml` or `.yml`).
    #[arg(long, short, value_name = "FORM")]
    pub input: PathBuf,

    /// Destination of the PDF notice.
    #[arg(long, short, value_name = "PDF")]
    pub output: PathBuf,

    /// Catalog profile: escalation or tier.
    #[arg(long, default_value_t = CatalogProfile::Escalation)]
    pub profile: CatalogProfile,
}

/// Execute the render subcommand.
///
/// Returns 1 when the form fails validation; nothing is written then.
pub fn run_render(args: &RenderArgs, out: &mut dyn Write) -> Result<u8> {
    let form = read_form(&args.input)?;

    let submission = match form.complete(&Catalog::new(args.profile)) {
        Ok(submission) => submission,
        Err(e) => {
            tracing::error!(field = e.field(), "form rejected: {e}");
            return Ok(1);
        }
    };

    let context = RenderContext::now();
    let generator = PdfGenerator::new().context("failed to load notice template")?;
    let document = generator
        .generate(&submission, &context)
        .context("failed to generate penalty notice")?;

    std::fs::write(&args.output, &document)
        .with_context(|| format!("failed to write notice: {}", args.output.display()))?;

    tracing::info!(
        reference = %context.reference,
        breach = submission.breach_code(),
        amount = %submission.penalty_amount(),
        "penalty notice written"
    );
    writeln!(
        out,
        "{} ({} bytes, reference {})",
        args.output.display(),
        document.len(),
        context.reference
    )
    .context("failed to write summary")?;
    Ok(0)
}

/// Parse a form file, choosing YAML or JSON by extension.
pub fn read_form(path: &Path) -> Result<PenaltyForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file: {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse form YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse form JSON: {}", path.display()))
    }
}
