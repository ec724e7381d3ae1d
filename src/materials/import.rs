//! Sharing profiles between installations: subset export and merge import.
//!
//! An export is just a smaller matrix written through the same document
//! shape, so the import side reuses normal document loading and merges the
//! result in here.

use serde::Serialize;
use tracing::info;

use super::matrix::MaterialMatrix;
use super::types::MaterialProfile;
use crate::error::MatrixError;

/// Outcome of importing one profile: the name it arrived with and the name
/// it ended up with after collision suffixing.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedProfile {
    pub original_name: String,
    pub final_name: String,
}

impl ImportedProfile {
    pub fn was_renamed(&self) -> bool {
        self.original_name != self.final_name
    }
}

impl MaterialMatrix {
    /// Merge every profile from `incoming` into this matrix.
    ///
    /// Imported profiles keep their types. A name that collides with an
    /// existing profile gets a numeric suffix (" 2", " 3", ...) rather than
    /// overwriting. Pairs among the imported profiles are carried over;
    /// pairs between imported and pre-existing profiles start unconfigured,
    /// since the sending installation knew nothing about the local profiles.
    pub fn merge_import(&mut self, incoming: &MaterialMatrix) -> Vec<ImportedProfile> {
        let mut placements: Vec<usize> = Vec::with_capacity(incoming.len());
        let mut records = Vec::with_capacity(incoming.len());

        for profile in incoming.profiles() {
            let final_name = self.unique_name(&profile.name);
            self.push_profile(MaterialProfile::new(
                final_name.clone(),
                profile.material_type.clone(),
            ));
            placements.push(self.len() - 1);
            records.push(ImportedProfile {
                original_name: profile.name.clone(),
                final_name,
            });
        }

        for (from_row, &to_row) in placements.iter().enumerate() {
            for (from_col, &to_col) in placements.iter().enumerate() {
                self.set_pair_at(to_row, to_col, incoming.pair_at(from_row, from_col));
            }
        }

        let renamed = records.iter().filter(|r| r.was_renamed()).count();
        info!(
            "Imported {} profiles, {} renamed to avoid collisions",
            records.len(),
            renamed
        );
        debug_assert!(self.is_complete());
        records
    }

    /// Build a standalone matrix holding just the named profiles and the
    /// pairs among them, ready to be written as an export document.
    pub fn export_subset(&self, names: &[&str]) -> Result<MaterialMatrix, MatrixError> {
        let mut subset = MaterialMatrix::empty();
        let mut sources = Vec::with_capacity(names.len());

        for name in names {
            let idx = self
                .index_of(name)
                .ok_or_else(|| MatrixError::UnknownProfile {
                    name: name.to_string(),
                })?;
            let profile = self.profile_at(idx);
            if subset.profile_name_taken(&profile.name) {
                return Err(MatrixError::NameCollision {
                    name: profile.name.clone(),
                });
            }
            subset.push_profile(profile.clone());
            sources.push(idx);
        }

        for (row, &source_row) in sources.iter().enumerate() {
            for (col, &source_col) in sources.iter().enumerate() {
                subset.set_pair_at(row, col, self.pair_at(source_row, source_col));
            }
        }

        Ok(subset)
    }

    /// First free name in the sequence `desired`, `desired 2`, `desired 3`.
    fn unique_name(&self, desired: &str) -> String {
        if !self.profile_name_taken(desired) {
            return desired.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{desired} {n}");
            if !self.profile_name_taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
