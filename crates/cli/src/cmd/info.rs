use anyhow::{Context, Result};
use serde::Serialize;

use sitepub_lib::layout::SiteLayout;

use crate::output::{OutputFormat, presence, print_json, print_stat, print_warning};

#[derive(Serialize)]
struct LayoutInfo<'a> {
  #[serde(flatten)]
  layout: &'a SiteLayout,
  output_dir: String,
  target_slot: String,
  output_exists: bool,
  publish_tree_exists: bool,
  slot_exists: bool,
}

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let layout = SiteLayout::from_env().context("Failed to resolve site layout")?;
  let output_dir = layout.output_dir();
  let target_slot = layout.target_slot();

  let info = LayoutInfo {
    layout: &layout,
    output_dir: output_dir.display().to_string(),
    target_slot: target_slot.display().to_string(),
    output_exists: output_dir.is_dir(),
    publish_tree_exists: layout.publish_tree.is_dir(),
    slot_exists: target_slot.is_dir(),
  };

  if output.is_json() {
    return print_json(&info);
  }

  println!("sitepub v{}", env!("CARGO_PKG_VERSION"));
  print_stat("Root", &layout.root.display().to_string());
  print_stat("Subproject", &layout.subproject.name);
  print_stat("Build command", &layout.subproject.build_cmd);
  print_stat("Output", &format!("{} {}", info.output_dir, presence(info.output_exists)));
  print_stat(
    "Publish tree",
    &format!("{} {}", layout.publish_tree.display(), presence(info.publish_tree_exists)),
  );
  print_stat("Target slot", &format!("{} {}", info.target_slot, presence(info.slot_exists)));

  if !info.publish_tree_exists {
    print_warning("Publish tree does not exist; build and serve will fail until it is created");
  }

  Ok(())
}
