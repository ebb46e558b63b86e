mod build;
mod info;
mod serve;

pub use build::cmd_build;
pub use info::cmd_info;
pub use serve::cmd_serve;
