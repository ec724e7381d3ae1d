use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::materials::MaterialMatrix;

/// Write the matrix document to disk atomically.
///
/// Uses a temporary file in the same directory as `target_path`, writes
/// the YAML content, then atomically renames the temp file to the target.
/// This guarantees that an interrupted write never leaves a partial file.
pub fn save_matrix_atomic(matrix: &MaterialMatrix, target_path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(matrix)?;

    let parent = target_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Target path has no parent directory: {:?}", target_path))?;

    // Ensure the parent directory exists
    std::fs::create_dir_all(parent)?;

    // Create temp file in the same directory (same filesystem for atomic rename)
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(yaml.as_bytes())?;
    temp.flush()?;

    // Atomic rename
    temp.persist(target_path)?;

    info!("Wrote material matrix to {:?}", target_path);
    Ok(())
}
