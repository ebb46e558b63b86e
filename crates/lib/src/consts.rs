//! Fixed names and defaults for the site layout.

pub const APP_NAME: &str = "sitepub";

/// Subproject published by `sitepub build` unless `SITEPUB_SUBPROJECT` is set.
pub const DEFAULT_SUBPROJECT: &str = "shabdakosh";

/// Command that builds the subproject, run from inside the subproject directory.
pub const DEFAULT_BUILD_CMD: &str = "uv run generator.py";

/// Directory, relative to the subproject, that its build writes.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Publish tree, relative to the repository root.
pub const DEFAULT_PUBLISH_DIR: &str = "site";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

pub const ROOT_ENV: &str = "SITEPUB_ROOT";
pub const SUBPROJECT_ENV: &str = "SITEPUB_SUBPROJECT";
pub const PUBLISH_DIR_ENV: &str = "SITEPUB_PUBLISH_DIR";
pub const BUILD_CMD_ENV: &str = "SITEPUB_BUILD_CMD";

/// Infix of the hidden sibling a new slot is staged into.
pub const STAGE_INFIX: &str = "stage";

/// Infix of the hidden sibling the displaced slot is parked in.
pub const OLD_INFIX: &str = "old";
