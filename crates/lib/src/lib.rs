//! sitepub-lib: publishing a static-site subproject into a served tree.
//!
//! - [`layout`]: where the subproject, its output and the publish tree live
//! - [`publish`]: build the subproject and atomically replace its target slot
//! - [`serve`]: preview the publish tree over HTTP

pub mod consts;
pub mod layout;
pub mod publish;
pub mod serve;
pub mod util;
