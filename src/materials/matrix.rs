//! The material matrix: every profile the user knows about plus the splice
//! parameters for every ordered pair of profiles.
//!
//! Pair storage is a dense index-aligned table, `pairs[outgoing][ingoing]`,
//! over the same indices as the profile list. Profile CRUD grows and shrinks
//! rows and columns in lockstep, so the matrix is complete by construction:
//! an entry exists for every ordered pair, holding `None` until the pair is
//! configured. `None` means "cannot be spliced", never "not yet allocated".
//!
//! A rename only touches the profile list. Pair entries are reached through
//! indices, not names, so settings survive renames mechanically.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::defaults::{self, SpliceDefaults};
use super::document::MatrixDocument;
use super::types::{names_equal, MaterialProfile, MaterialType, SpliceSettings, FACTOR_MAX};
use crate::error::MatrixError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MatrixDocument", into = "MatrixDocument")]
pub struct MaterialMatrix {
    profiles: Vec<MaterialProfile>,
    pairs: Vec<Vec<Option<SpliceSettings>>>,
}

impl MaterialMatrix {
    /// A matrix with no profiles at all. Mostly useful as a base for
    /// document loading and subset exports; interactive use starts from
    /// `factory_default`.
    pub fn empty() -> Self {
        MaterialMatrix {
            profiles: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// The out-of-box matrix: one factory profile per catalogue type, pairs
    /// seeded from the Default Splice Table where it has entries.
    pub fn factory_default(defaults: &SpliceDefaults) -> Self {
        let mut matrix = MaterialMatrix::empty();
        for factory in defaults.factory_profiles() {
            matrix.push_profile(MaterialProfile::new(
                factory.name.clone(),
                Some(factory.material_type.clone()),
            ));
        }
        for idx in 0..matrix.profiles.len() {
            matrix.seed_defaults_for(idx, defaults);
        }
        debug!(
            "Seeded factory matrix with {} profiles",
            matrix.profiles.len()
        );
        matrix
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles in display order (insertion order, stable across renames).
    pub fn profiles(&self) -> impl Iterator<Item = &MaterialProfile> {
        self.profiles.iter()
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn profile(&self, name: &str) -> Option<&MaterialProfile> {
        self.index_of(name).map(|i| &self.profiles[i])
    }

    /// Case-insensitive name lookup.
    pub fn profile_name_taken(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// True when the profile is part of the factory catalogue and therefore
    /// protected from rename, delete, and type change.
    pub fn is_factory(&self, name: &str) -> bool {
        defaults::is_factory_profile(name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.profiles.iter().position(|p| names_equal(&p.name, name))
    }

    pub(crate) fn profile_at(&self, idx: usize) -> &MaterialProfile {
        &self.profiles[idx]
    }

    pub(crate) fn pair_at(&self, outgoing: usize, ingoing: usize) -> Option<SpliceSettings> {
        self.pairs[outgoing][ingoing]
    }

    pub(crate) fn set_pair_at(
        &mut self,
        outgoing: usize,
        ingoing: usize,
        value: Option<SpliceSettings>,
    ) {
        self.pairs[outgoing][ingoing] = value;
    }

    /// Append a profile and grow the pair table in lockstep. Callers are
    /// responsible for name uniqueness.
    pub(crate) fn push_profile(&mut self, profile: MaterialProfile) {
        for row in &mut self.pairs {
            row.push(None);
        }
        self.pairs.push(vec![None; self.profiles.len() + 1]);
        self.profiles.push(profile);
        debug_assert!(self.is_complete());
    }

    /// Create a profile with no type chosen yet. Every pair involving it
    /// starts unconfigured in both directions; nothing is seeded until the
    /// user picks a type.
    ///
    /// Factory catalogue names are reserved, whether or not the matrix
    /// currently contains the factory profiles; protection is keyed on the
    /// name alone.
    pub fn add_empty_profile(&mut self, name: &str) -> Result<(), MatrixError> {
        if name.trim().is_empty() {
            return Err(MatrixError::BlankProfileName);
        }
        if self.profile_name_taken(name) {
            return Err(MatrixError::NameCollision {
                name: name.to_string(),
            });
        }
        if defaults::is_factory_profile(name) {
            return Err(MatrixError::ProtectedProfile {
                name: name.to_string(),
            });
        }
        self.push_profile(MaterialProfile::new(name, None));
        debug!("Added profile {:?} with all pairs unconfigured", name);
        Ok(())
    }

    /// Assign a type and seed pair defaults in both directions against every
    /// profile, this one included.
    ///
    /// Seeding never overwrites: only entries that are currently
    /// unconfigured, and only where both endpoint types are concrete and the
    /// Default Splice Table has the ordered key. Values the user has already
    /// dialed in stay untouched even when the type changes.
    pub fn change_profile_type(
        &mut self,
        name: &str,
        new_type: MaterialType,
        defaults: &SpliceDefaults,
    ) -> Result<(), MatrixError> {
        let idx = self.index_of(name).ok_or_else(|| MatrixError::UnknownProfile {
            name: name.to_string(),
        })?;
        if self.is_factory(&self.profiles[idx].name) {
            return Err(MatrixError::ProtectedProfile {
                name: self.profiles[idx].name.clone(),
            });
        }

        let type_label = new_type.as_str().to_string();
        self.profiles[idx].material_type = Some(new_type);
        let seeded = self.seed_defaults_for(idx, defaults);
        debug!(
            "Set type of {:?} to {}, seeded {} pair defaults",
            self.profiles[idx].name, type_label, seeded
        );
        debug_assert!(self.is_complete());
        Ok(())
    }

    /// Relabel a profile. Settings survive untouched because pair entries
    /// are index-addressed. Changing only the casing of an existing name is
    /// allowed; colliding with a different profile is not, and factory
    /// catalogue names are reserved targets even when the matrix does not
    /// contain them.
    pub fn rename_profile(&mut self, old: &str, new: &str) -> Result<(), MatrixError> {
        let idx = self.index_of(old).ok_or_else(|| MatrixError::UnknownProfile {
            name: old.to_string(),
        })?;
        if new.trim().is_empty() {
            return Err(MatrixError::BlankProfileName);
        }
        if self.is_factory(&self.profiles[idx].name) {
            return Err(MatrixError::ProtectedProfile {
                name: self.profiles[idx].name.clone(),
            });
        }
        if let Some(existing) = self.index_of(new) {
            if existing != idx {
                return Err(MatrixError::NameCollision {
                    name: new.to_string(),
                });
            }
        } else if defaults::is_factory_profile(new) {
            return Err(MatrixError::ProtectedProfile {
                name: new.to_string(),
            });
        }

        let old_name = std::mem::replace(&mut self.profiles[idx].name, new.to_string());
        info!("Renamed profile {:?} to {:?}", old_name, new);
        Ok(())
    }

    /// Remove a profile together with its pair row and column.
    pub fn delete_profile(&mut self, name: &str) -> Result<(), MatrixError> {
        let idx = self.index_of(name).ok_or_else(|| MatrixError::UnknownProfile {
            name: name.to_string(),
        })?;
        if self.is_factory(&self.profiles[idx].name) {
            return Err(MatrixError::ProtectedProfile {
                name: self.profiles[idx].name.clone(),
            });
        }

        let removed = self.profiles.remove(idx);
        self.pairs.remove(idx);
        for row in &mut self.pairs {
            row.remove(idx);
        }
        info!("Deleted profile {:?} and purged its pair entries", removed.name);
        debug_assert!(self.is_complete());
        Ok(())
    }

    /// Settings for the ordered pair, outgoing material first. `Ok(None)`
    /// means the pair is known and cannot be spliced.
    pub fn pair(
        &self,
        outgoing: &str,
        ingoing: &str,
    ) -> Result<Option<SpliceSettings>, MatrixError> {
        let (o, i) = self.pair_indices(outgoing, ingoing)?;
        Ok(self.pairs[o][i])
    }

    /// Set or clear the settings for one ordered pair. The opposite
    /// direction is a separate entry and is not touched.
    pub fn set_pair(
        &mut self,
        outgoing: &str,
        ingoing: &str,
        value: Option<SpliceSettings>,
    ) -> Result<(), MatrixError> {
        let (o, i) = self.pair_indices(outgoing, ingoing)?;
        self.pairs[o][i] = value;
        Ok(())
    }

    /// True when the pair currently holds exactly the Default Splice Table
    /// value for its endpoint types. Lets a UI mark overridden pairs and
    /// offer a reset.
    pub fn is_default_pair(
        &self,
        outgoing: &str,
        ingoing: &str,
        defaults: &SpliceDefaults,
    ) -> Result<bool, MatrixError> {
        let (o, i) = self.pair_indices(outgoing, ingoing)?;
        Ok(self.pairs[o][i] == self.table_default(o, i, defaults))
    }

    /// Put the pair back to its Default Splice Table value, or to
    /// unconfigured when the table has no entry for the endpoint types.
    pub fn reset_pair_to_default(
        &mut self,
        outgoing: &str,
        ingoing: &str,
        defaults: &SpliceDefaults,
    ) -> Result<(), MatrixError> {
        let (o, i) = self.pair_indices(outgoing, ingoing)?;
        self.pairs[o][i] = self.table_default(o, i, defaults);
        Ok(())
    }

    /// Restore factory profiles that are missing and repair the type of any
    /// whose type drifted (hand-edited documents). Returns the catalogue
    /// names that needed fixing.
    pub fn ensure_factory_profiles(&mut self, defaults: &SpliceDefaults) -> Vec<String> {
        let mut restored = Vec::new();
        for factory in defaults.factory_profiles() {
            match self.index_of(&factory.name) {
                None => {
                    self.push_profile(MaterialProfile::new(
                        factory.name.clone(),
                        Some(factory.material_type.clone()),
                    ));
                    let idx = self.profiles.len() - 1;
                    self.seed_defaults_for(idx, defaults);
                    restored.push(factory.name.clone());
                }
                Some(idx) => {
                    if self.profiles[idx].material_type.as_ref() != Some(&factory.material_type) {
                        self.profiles[idx].material_type = Some(factory.material_type.clone());
                        self.seed_defaults_for(idx, defaults);
                        restored.push(factory.name.clone());
                    }
                }
            }
        }
        debug_assert!(self.is_complete());
        restored
    }

    /// Reject any configured pair whose factors exceed firmware range.
    /// Pairs with an `Other`-typed or untyped endpoint are exempt, matching
    /// the load-time rule.
    pub fn validate_for_save(&self) -> Result<(), MatrixError> {
        for (o, row) in self.pairs.iter().enumerate() {
            for (i, entry) in row.iter().enumerate() {
                let Some(settings) = entry else { continue };
                if settings.in_range() {
                    continue;
                }
                if self.profiles[o].concrete_type().is_none()
                    || self.profiles[i].concrete_type().is_none()
                {
                    continue;
                }
                let (field, value) = if settings.heat_factor > FACTOR_MAX {
                    ("heatFactor", settings.heat_factor)
                } else {
                    ("compressionFactor", settings.compression_factor)
                };
                return Err(MatrixError::PairOutOfRange {
                    outgoing: self.profiles[o].name.clone(),
                    ingoing: self.profiles[i].name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Structural invariant: one row per profile, one entry per profile in
    /// every row.
    pub fn is_complete(&self) -> bool {
        self.pairs.len() == self.profiles.len()
            && self.pairs.iter().all(|row| row.len() == self.profiles.len())
    }

    fn pair_indices(&self, outgoing: &str, ingoing: &str) -> Result<(usize, usize), MatrixError> {
        let o = self
            .index_of(outgoing)
            .ok_or_else(|| MatrixError::UnknownProfile {
                name: outgoing.to_string(),
            })?;
        let i = self
            .index_of(ingoing)
            .ok_or_else(|| MatrixError::UnknownProfile {
                name: ingoing.to_string(),
            })?;
        Ok((o, i))
    }

    fn table_default(
        &self,
        outgoing: usize,
        ingoing: usize,
        defaults: &SpliceDefaults,
    ) -> Option<SpliceSettings> {
        let out_type = self.profiles[outgoing].concrete_type()?;
        let in_type = self.profiles[ingoing].concrete_type()?;
        defaults.lookup(out_type, in_type)
    }

    /// Fill unconfigured pairs involving `idx` from the Default Splice
    /// Table, both directions, self pair included. Returns how many entries
    /// were written.
    fn seed_defaults_for(&mut self, idx: usize, defaults: &SpliceDefaults) -> usize {
        let Some(own_type) = self.profiles[idx].concrete_type().cloned() else {
            return 0;
        };
        let mut seeded = 0;
        for other in 0..self.profiles.len() {
            let Some(other_type) = self.profiles[other].concrete_type().cloned() else {
                continue;
            };
            if self.pairs[idx][other].is_none() {
                if let Some(settings) = defaults.lookup(&own_type, &other_type) {
                    self.pairs[idx][other] = Some(settings);
                    seeded += 1;
                }
            }
            if self.pairs[other][idx].is_none() {
                if let Some(settings) = defaults.lookup(&other_type, &own_type) {
                    self.pairs[other][idx] = Some(settings);
                    seeded += 1;
                }
            }
        }
        seeded
    }
}

/// Deep structural equality, used for dirty checks on edit sessions.
///
/// Profile order does not matter: the same set of profiles with the same
/// pair settings compares equal however the rows happen to be arranged.
/// Names must match exactly once paired up, so a case-only rename still
/// counts as a difference.
impl PartialEq for MaterialMatrix {
    fn eq(&self, other: &Self) -> bool {
        if self.profiles.len() != other.profiles.len() {
            return false;
        }
        for (i, p) in self.profiles.iter().enumerate() {
            let Some(j) = other.index_of(&p.name) else {
                return false;
            };
            let q = &other.profiles[j];
            if p.name != q.name || p.material_type != q.material_type {
                return false;
            }
            for (k, r) in self.profiles.iter().enumerate() {
                let Some(l) = other.index_of(&r.name) else {
                    return false;
                };
                if self.pairs[i][k] != other.pairs[j][l] {
                    return false;
                }
            }
        }
        true
    }
}
