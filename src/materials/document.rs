//! Persisted document shape for the material matrix.
//!
//! On disk the matrix is a YAML map from profile name to a type plus a
//! `combinations` map, profile name to splice settings or null:
//!
//! ```yaml
//! materials:
//!   Default PLA:
//!     type: PLA
//!     combinations:
//!       Default PLA: { heatFactor: 0, compressionFactor: 0, reverse: false }
//!       Default ABS: null
//! ```
//!
//! The combinations under a profile are the pairs where that profile is the
//! outgoing material. Null means the pair cannot be spliced. Loading is
//! lenient about structure (missing combination keys become unconfigured,
//! combinations naming unknown profiles are dropped with a warning) but
//! strict about values: factors beyond firmware range between concretely
//! typed profiles reject the document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::matrix::MaterialMatrix;
use super::types::{MaterialProfile, MaterialType, SpliceSettings, FACTOR_MAX};
use crate::error::MatrixError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixDocument {
    pub materials: BTreeMap<String, MaterialEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialEntry {
    #[serde(rename = "type", default)]
    pub material_type: Option<MaterialType>,
    #[serde(default)]
    pub combinations: BTreeMap<String, Option<SpliceSettings>>,
}

impl MaterialMatrix {
    /// Build the document form. Every profile lists a combination entry for
    /// every profile, so the document is as complete as the matrix.
    pub fn to_document(&self) -> MatrixDocument {
        let mut materials = BTreeMap::new();
        for (o, profile) in self.profiles().enumerate() {
            let combinations = self
                .profiles()
                .enumerate()
                .map(|(i, other)| (other.name.clone(), self.pair_at(o, i)))
                .collect();
            materials.insert(
                profile.name.clone(),
                MaterialEntry {
                    material_type: profile.material_type.clone(),
                    combinations,
                },
            );
        }
        MatrixDocument { materials }
    }

    /// Rebuild a matrix from its document form.
    ///
    /// This is the raw conversion shared by the active-matrix store and the
    /// import path, so it does not reseed factory profiles; callers that
    /// load the user's working matrix do that separately.
    pub fn from_document(doc: MatrixDocument) -> Result<MaterialMatrix, MatrixError> {
        let mut matrix = MaterialMatrix::empty();

        for (name, entry) in &doc.materials {
            if name.trim().is_empty() {
                return Err(MatrixError::BlankProfileName);
            }
            if matrix.profile_name_taken(name) {
                return Err(MatrixError::NameCollision { name: name.clone() });
            }
            matrix.push_profile(MaterialProfile::new(
                name.clone(),
                entry.material_type.clone(),
            ));
        }

        for (name, entry) in &doc.materials {
            // names were inserted above, the lookup cannot miss
            let Some(outgoing) = matrix.index_of(name) else {
                continue;
            };
            for (other, value) in &entry.combinations {
                let Some(ingoing) = matrix.index_of(other) else {
                    warn!(
                        "Dropping combination {:?} -> {:?}: no such profile in the document",
                        name, other
                    );
                    continue;
                };
                if let Some(settings) = value {
                    let concrete_endpoints = matrix.profile_at(outgoing).concrete_type().is_some()
                        && matrix.profile_at(ingoing).concrete_type().is_some();
                    if concrete_endpoints && !settings.in_range() {
                        let (field, value) = if settings.heat_factor > FACTOR_MAX {
                            ("heatFactor", settings.heat_factor)
                        } else {
                            ("compressionFactor", settings.compression_factor)
                        };
                        return Err(MatrixError::PairOutOfRange {
                            outgoing: name.clone(),
                            ingoing: other.clone(),
                            field,
                            value,
                        });
                    }
                }
                matrix.set_pair_at(outgoing, ingoing, *value);
            }
        }

        debug_assert!(matrix.is_complete());
        Ok(matrix)
    }
}

impl From<MaterialMatrix> for MatrixDocument {
    fn from(matrix: MaterialMatrix) -> Self {
        matrix.to_document()
    }
}

impl TryFrom<MatrixDocument> for MaterialMatrix {
    type Error = MatrixError;

    fn try_from(doc: MatrixDocument) -> Result<Self, Self::Error> {
        MaterialMatrix::from_document(doc)
    }
}
