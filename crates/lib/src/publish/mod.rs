//! Publish pipeline: build a subproject and swap its output into the site.
//!
//! # Steps
//!
//! 1. Run the subproject's build command ([`build::run_build`]). A failing
//!    build stops the pipeline before anything on disk is touched.
//! 2. Check that the build left its output directory behind. If it did not,
//!    the build broke its contract and [`PublishError::OutputMissing`] is
//!    returned.
//! 3. Stage a copy of the output next to the target slot and move it into
//!    place ([`swap::replace_slot`]).
//!
//! # Submodules
//!
//! - [`build`] - Running the external build command
//! - [`stage`] - Copying a build output into a staging directory
//! - [`swap`] - Moving a staged tree over the target slot

pub mod build;
pub mod stage;
pub mod swap;
mod types;

pub use types::*;

use tracing::info;

use crate::layout::SiteLayout;

/// Build the subproject described by `layout` and publish its output.
pub async fn publish(layout: &SiteLayout) -> Result<PublishReport, PublishError> {
  build::run_build(&layout.subproject).await?;
  install_output(layout)
}

/// Publish whatever the subproject's output directory currently holds,
/// without running its build.
pub fn install_output(layout: &SiteLayout) -> Result<PublishReport, PublishError> {
  let output_dir = layout.output_dir();
  if !output_dir.is_dir() {
    return Err(PublishError::OutputMissing { path: output_dir });
  }

  let target_slot = layout.target_slot();
  let outcome = swap::replace_slot(&output_dir, &layout.publish_tree, &layout.subproject.name)?;
  let summary = outcome.summary;

  info!(
    subproject = %layout.subproject.name,
    files = summary.files,
    digest = %summary.digest,
    "published"
  );

  Ok(PublishReport {
    subproject: layout.subproject.name.clone(),
    output_dir,
    target_slot,
    replaced: outcome.replaced,
    summary,
  })
}
