//! Implementation of the `sitepub serve` command.

use anyhow::{Context, Result};

use sitepub_lib::layout::SiteLayout;
use sitepub_lib::serve::{PreviewServer, ServerConfig};

use crate::output::print_info;

/// Serve the publish tree until interrupted.
///
/// Fails without binding anything if the publish tree does not exist.
pub fn cmd_serve(host: String, port: u16) -> Result<()> {
  let layout = SiteLayout::from_env().context("Failed to resolve site layout")?;
  let config = ServerConfig {
    root: layout.publish_tree,
    host,
    port,
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let server = PreviewServer::bind(&config)
      .await
      .context("Failed to start preview server")?;

    print_info(&format!(
      "Serving {} at http://{}/ (Ctrl-C to stop)",
      config.root.display(),
      server.local_addr()
    ));

    server.run().await.context("Preview server failed")
  })
}
