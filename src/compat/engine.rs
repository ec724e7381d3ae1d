//! Transition validation against the material matrix.
//!
//! The `CompatibilityChecker` walks every transition of a print, resolves
//! the two drives to material profiles, and looks the ordered pair up in
//! the matrix. Unspliceable pairs become conflicts (which block output
//! generation), zero-factor pairs become empty-algorithm warnings (which
//! do not).

use std::collections::HashSet;

use tracing::debug;

use super::types::{
    CompatibilityReport, DriveAssignment, EmptySpliceWarning, MaterialConflict, TransitionInfo,
    WarningPolicy,
};
use crate::error::MatrixError;
use crate::materials::defaults::SpliceDefaults;
use crate::materials::MaterialMatrix;

/// The compatibility checker.
///
/// Holds the warning policy; matrix and transition data are per-call inputs
/// so one checker can serve any number of prints.
pub struct CompatibilityChecker {
    policy: WarningPolicy,
}

impl CompatibilityChecker {
    pub fn new(policy: WarningPolicy) -> Self {
        Self { policy }
    }

    /// Check every transition of a print against the matrix.
    ///
    /// Reported problems deduplicate on profile pairs: a missing pair is one
    /// conflict no matter how many transitions hit it or which direction
    /// they run in, while empty-algorithm warnings are per direction. Both
    /// lists keep first-encounter order.
    ///
    /// Transitions with an unassigned endpoint drive are skipped here;
    /// `DriveAssignment::unassigned_used_drives` reports those separately.
    /// A drive index outside the unit, or an assigned name missing from the
    /// matrix, is a fault in the caller's input and comes back as an error
    /// rather than a report entry.
    pub fn validate(
        &self,
        transitions: &TransitionInfo,
        assignment: &DriveAssignment,
        matrix: &MaterialMatrix,
    ) -> Result<CompatibilityReport, MatrixError> {
        let mut report = CompatibilityReport::default();
        let mut seen_conflicts: HashSet<(String, String)> = HashSet::new();
        let mut seen_warnings: HashSet<(String, String)> = HashSet::new();

        for layer_transitions in transitions.layers.values() {
            for t in layer_transitions {
                let Some(outgoing_name) = assignment.material(t.from)? else {
                    continue;
                };
                let Some(ingoing_name) = assignment.material(t.to)? else {
                    continue;
                };

                let o = resolve(matrix, t.from, outgoing_name)?;
                let i = resolve(matrix, t.to, ingoing_name)?;
                let outgoing = &matrix.profile_at(o).name;
                let ingoing = &matrix.profile_at(i).name;

                match matrix.pair_at(o, i) {
                    None => {
                        if seen_conflicts.insert(conflict_key(outgoing, ingoing)) {
                            report.conflicts.push(MaterialConflict {
                                first: outgoing.clone(),
                                second: ingoing.clone(),
                                message: format!(
                                    "{outgoing} cannot be spliced with {ingoing}"
                                ),
                            });
                        }
                    }
                    Some(settings) => {
                        if settings.has_empty_algorithm()
                            && !self.policy.is_exempt(outgoing, ingoing)
                        {
                            let key = (outgoing.to_lowercase(), ingoing.to_lowercase());
                            if seen_warnings.insert(key) {
                                report.empty_algorithms.push(EmptySpliceWarning {
                                    outgoing: outgoing.clone(),
                                    ingoing: ingoing.clone(),
                                    message: format!(
                                        "Splices from {outgoing} to {ingoing} have a zero factor and will use the firmware fallback algorithm"
                                    ),
                                });
                            }
                        }
                    }
                }
            }
        }

        debug!(
            "Checked {} transitions: {} conflicts, {} empty-algorithm warnings",
            transitions.transition_count(),
            report.conflicts.len(),
            report.empty_algorithms.len()
        );
        Ok(report)
    }
}

impl Default for CompatibilityChecker {
    fn default() -> Self {
        Self::new(WarningPolicy::recommended(SpliceDefaults::builtin()))
    }
}

fn resolve(matrix: &MaterialMatrix, drive: usize, name: &str) -> Result<usize, MatrixError> {
    matrix
        .index_of(name)
        .ok_or_else(|| MatrixError::UnknownMaterial {
            drive,
            name: name.to_string(),
        })
}

/// Unordered, case-folded pair key for conflict deduplication. Never a
/// string concatenation, so names containing separators cannot alias.
fn conflict_key(a: &str, b: &str) -> (String, String) {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
