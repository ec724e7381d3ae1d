use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::materials::{MaterialMatrix, SpliceDefaults};

/// Read a matrix document from a YAML file on disk.
pub fn load_matrix(path: &Path) -> Result<MaterialMatrix> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read material matrix from {:?}", path))?;
    let matrix: MaterialMatrix = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid material matrix document in {:?}", path))?;

    debug!("Read matrix with {} profiles from {:?}", matrix.len(), path);
    Ok(matrix)
}

/// Read the matrix, or fall back to the factory default when the file does
/// not exist yet (first run). An existing file that fails to read or parse
/// is an error, never silently replaced with defaults.
pub fn load_matrix_or_default(path: &Path, defaults: &SpliceDefaults) -> Result<MaterialMatrix> {
    if path.exists() {
        load_matrix(path)
    } else {
        info!(
            "No matrix document at {:?}, starting from factory defaults",
            path
        );
        Ok(MaterialMatrix::factory_default(defaults))
    }
}
