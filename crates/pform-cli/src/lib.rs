//! # pform-cli: Penalty Form Command Line
//!
//! Offline access to the same catalog, calculator and notice generator the
//! HTTP service uses.
//!
//! ## Subcommands
//!
//! - `pform catalog`: Print a catalog listing as JSON.
//! - `pform calculate`: Apply the escalation rule to a base fine.
//! - `pform render`: Complete a form file and write its PDF notice.
//!
//! ```bash
//! pform catalog --profile tier --kind penalties
//! pform calculate --base-amount 500 --occurrences 3
//! pform render --input form.yaml --output notice.pdf
//! ```
//!
//! Every `run_*` function returns the process exit code: 0 on success,
//! 1 when the input is rejected.

pub mod calculate;
pub mod catalog;
pub mod render;

use std::io::Write;

use anyhow::{Context, Result};

/// Flush `out` after a subcommand ran.
///
/// A flush failure replaces a successful exit code with an error; an
/// earlier subcommand error is kept as is.
pub fn finish(result: Result<u8>, out: &mut dyn Write) -> Result<u8> {
    let code = result?;
    out.flush().context("failed to flush output")?;
    Ok(code)
}
