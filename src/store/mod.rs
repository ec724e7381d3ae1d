pub mod reader;
pub mod writer;

pub use reader::{load_matrix, load_matrix_or_default};
pub use writer::save_matrix_atomic;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Platform default location of the active matrix document, under the
/// user's configuration directory.
pub fn default_matrix_path() -> Result<PathBuf> {
    let Some(config) = dirs::config_dir() else {
        bail!("No platform configuration directory available");
    };
    Ok(config.join("SpliceMate").join("materials.yaml"))
}
