//! Implementation of the `sitepub build` command.
//!
//! Runs the subproject's build and, only if it succeeds, swaps the fresh
//! output into the publish tree.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use sitepub_lib::layout::SiteLayout;
use sitepub_lib::publish::publish;

use crate::output::{OutputFormat, format_bytes, format_duration, print_json, print_stat, print_success, short_digest};

pub fn cmd_build(output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let layout = SiteLayout::from_env().context("Failed to resolve site layout")?;
  debug!(?layout, "resolved layout");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(publish(&layout))
    .with_context(|| format!("Failed to publish {}", layout.subproject.name))?;

  if output.is_json() {
    print_json(&report)?;
    return Ok(());
  }

  println!();
  print_success(&format!("Published {}", report.subproject));
  print_stat("Output", &report.output_dir.display().to_string());
  print_stat("Slot", &report.target_slot.display().to_string());
  print_stat("Files", &report.summary.files.to_string());
  print_stat("Size", &format_bytes(report.summary.bytes));
  print_stat("Digest", short_digest(&report.summary.digest.0));
  print_stat("Replaced", if report.replaced { "yes" } else { "no (new slot)" });
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
