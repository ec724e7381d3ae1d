//! Input and output types for the splice compatibility checker.
//!
//! Transition data and drive assignments are read-only inputs produced by
//! the print pipeline; the checker never edits them. The report types go
//! straight to the UI.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;
use crate::materials::defaults::SpliceDefaults;
use crate::materials::types::names_equal;
use crate::materials::MaterialType;

/// Number of input drives on the splicing unit.
pub const DRIVE_COUNT: usize = 4;

// === Checker input ===

/// One material change: the drive being spliced away from and the drive
/// being spliced to. A transition with `from == to` is legal and goes
/// through the same pair lookup as any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// All material changes of a print, grouped by layer.
///
/// Keys are layer identifiers (stringified Z heights as produced by the
/// print pipeline); each layer carries its transitions in print order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionInfo {
    pub layers: BTreeMap<String, Vec<Transition>>,
}

impl TransitionInfo {
    pub fn add(&mut self, layer: &str, from: usize, to: usize) {
        self.layers
            .entry(layer.to_string())
            .or_default()
            .push(Transition { from, to });
    }

    pub fn transition_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }
}

/// Which material profile is loaded into each drive. `None` means the drive
/// has not been assigned yet; transitions touching it are skipped rather
/// than flagged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveAssignment {
    pub materials: [Option<String>; DRIVE_COUNT],
}

impl DriveAssignment {
    pub fn assign(&mut self, drive: usize, profile: &str) -> Result<(), MatrixError> {
        if drive >= DRIVE_COUNT {
            return Err(MatrixError::DriveOutOfRange { index: drive });
        }
        self.materials[drive] = Some(profile.to_string());
        Ok(())
    }

    pub fn material(&self, drive: usize) -> Result<Option<&str>, MatrixError> {
        if drive >= DRIVE_COUNT {
            return Err(MatrixError::DriveOutOfRange { index: drive });
        }
        Ok(self.materials[drive].as_deref())
    }

    /// Drives the print actually pulls from that have no profile assigned.
    /// The UI blocks output generation until this is empty.
    pub fn unassigned_used_drives(&self, drives_used: &[bool; DRIVE_COUNT]) -> Vec<usize> {
        (0..DRIVE_COUNT)
            .filter(|&d| drives_used[d] && self.materials[d].is_none())
            .collect()
    }
}

// === Warning policy ===

/// Which empty-algorithm (zero factor) pairs are expected and should not
/// warn.
///
/// Zero factors fall back to the splice-core firmware algorithm, which is
/// only tuned for specific factory pairings, so zeros warn by default. The
/// exemption list names the ordered pairs where zeros are legitimate;
/// same-profile pairs can additionally be exempted wholesale.
#[derive(Debug, Clone, Default)]
pub struct WarningPolicy {
    exempt_pairs: HashSet<(String, String)>,
    same_profile: bool,
}

impl WarningPolicy {
    /// Warn on every zero-factor pair, no exceptions.
    pub fn strict() -> Self {
        WarningPolicy::default()
    }

    /// Exempt the pairs whose Default Splice Table entries legitimately
    /// carry zeros: currently the factory PLA profile spliced to itself.
    pub fn recommended(defaults: &SpliceDefaults) -> Self {
        let mut policy = WarningPolicy::strict();
        if let Some(pla) = defaults.factory_name_for(&MaterialType::PLA) {
            policy = policy.exempt_pair(pla, pla);
        }
        policy
    }

    /// Add one ordered pair to the exemption list.
    pub fn exempt_pair(mut self, outgoing: &str, ingoing: &str) -> Self {
        self.exempt_pairs
            .insert((outgoing.to_lowercase(), ingoing.to_lowercase()));
        self
    }

    /// Exempt every pair of a profile with itself.
    pub fn exempt_same_profile(mut self, exempt: bool) -> Self {
        self.same_profile = exempt;
        self
    }

    pub fn is_exempt(&self, outgoing: &str, ingoing: &str) -> bool {
        if self.same_profile && names_equal(outgoing, ingoing) {
            return true;
        }
        self.exempt_pairs
            .contains(&(outgoing.to_lowercase(), ingoing.to_lowercase()))
    }
}

// === Checker output ===

/// An unspliceable ordered pair was required by a transition. Direction does
/// not matter for reporting: A-then-B and B-then-A describe the same broken
/// material combination and are reported once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialConflict {
    pub first: String,
    pub second: String,
    pub message: String,
}

/// A required pair is configured but has a zero factor, so the splice will
/// silently use the firmware fallback algorithm. Direction matters here and
/// each direction warns separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptySpliceWarning {
    pub outgoing: String,
    pub ingoing: String,
    pub message: String,
}

/// Everything the checker found for one print. Conflicts block output
/// generation, warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompatibilityReport {
    pub conflicts: Vec<MaterialConflict>,
    pub empty_algorithms: Vec<EmptySpliceWarning>,
}

impl CompatibilityReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.empty_algorithms.is_empty()
    }

    pub fn blocks_output(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
