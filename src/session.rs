//! Edit lifecycle for the user's working matrix.
//!
//! `ActiveMatrix` owns the committed state and its on-disk document. Edits
//! happen on a working copy inside an `EditSession`; committing validates,
//! persists, then swaps the copy in, while dropping a session discards it.
//! The committed matrix is never observable in a half-edited state. A failed
//! commit leaves it untouched, on disk and in memory, and hands the session
//! back inside the error with the edits intact.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::error::MatrixError;
use crate::materials::{MaterialMatrix, SpliceDefaults};
use crate::store;

/// The committed matrix together with the document it persists to.
pub struct ActiveMatrix {
    matrix: MaterialMatrix,
    path: PathBuf,
}

impl ActiveMatrix {
    /// Load the matrix from `path`, seeding the factory default on first
    /// run and restoring any factory profiles a hand-edited document lost.
    /// Repairs (and first runs) are persisted immediately.
    pub fn open(path: impl Into<PathBuf>, defaults: &SpliceDefaults) -> Result<Self> {
        let path = path.into();
        let existed = path.exists();
        let mut matrix = store::load_matrix_or_default(&path, defaults)?;

        let restored = matrix.ensure_factory_profiles(defaults);
        if !restored.is_empty() {
            warn!(
                "Repaired factory profiles in {:?}: {:?}",
                path, restored
            );
        }
        if !existed || !restored.is_empty() {
            store::save_matrix_atomic(&matrix, &path)?;
        }

        Ok(ActiveMatrix { matrix, path })
    }

    pub fn matrix(&self) -> &MaterialMatrix {
        &self.matrix
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start an edit session on a copy of the committed matrix.
    pub fn begin_edit(&self) -> EditSession {
        EditSession::new(&self.matrix)
    }

    /// Validate and persist a session's working matrix, then make it the
    /// committed one. On any failure the committed matrix and the document
    /// on disk keep their previous state, and the session comes back inside
    /// the error with every edit intact, ready to be corrected and
    /// committed again.
    pub fn commit(&mut self, session: EditSession) -> Result<(), CommitError> {
        if let Err(err) = session.working.validate_for_save() {
            return Err(CommitError {
                error: err.into(),
                session,
            });
        }
        if let Err(err) = store::save_matrix_atomic(&session.working, &self.path) {
            return Err(CommitError {
                error: err,
                session,
            });
        }
        self.matrix = session.working;
        info!("Committed matrix edits to {:?}", self.path);
        Ok(())
    }

    /// Apply a single mutation, validate, and persist, as one step. Used
    /// for the immediate operations (add, rename, delete, import) that do
    /// not go through an open form.
    pub fn update<T>(
        &mut self,
        f: impl FnOnce(&mut MaterialMatrix) -> Result<T, MatrixError>,
    ) -> Result<T> {
        let mut working = self.matrix.clone();
        let out = f(&mut working)?;
        working.validate_for_save()?;
        store::save_matrix_atomic(&working, &self.path)?;
        self.matrix = working;
        Ok(out)
    }
}

/// A working copy of the matrix plus the pristine baseline it was forked
/// from. Dropping the session discards the edits.
#[derive(Debug)]
pub struct EditSession {
    working: MaterialMatrix,
    baseline: MaterialMatrix,
}

impl EditSession {
    fn new(committed: &MaterialMatrix) -> Self {
        EditSession {
            working: committed.clone(),
            baseline: committed.clone(),
        }
    }

    pub fn matrix(&self) -> &MaterialMatrix {
        &self.working
    }

    pub fn matrix_mut(&mut self) -> &mut MaterialMatrix {
        &mut self.working
    }

    /// True when the working copy differs from the matrix the session was
    /// started from. Drives the discard-changes prompt.
    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }
}

/// A commit that failed validation or could not be persisted. Carries the
/// rejected session back to the caller, edits intact, for correction and
/// retry.
#[derive(Debug)]
pub struct CommitError {
    pub error: anyhow::Error,
    pub session: EditSession,
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to commit edit session: {:#}", self.error)
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}
