//! Local preview server for the publish tree.
//!
//! - [`router`] - Static file routing over the publish tree
//! - [`server`] - Listener lifecycle and shutdown

pub mod router;
pub mod server;

pub use router::build_router;
pub use server::{PreviewServer, ServeError, ServerConfig, serve};
