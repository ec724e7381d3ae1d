//! Anonymized matrix summaries for opt-in usage reporting.
//!
//! Profile names are user data and never leave the machine. A summary
//! refers to profiles by position only and reduces types to their coarse
//! category, so an `Other`-typed profile reports the literal "Other"
//! instead of whatever label the user entered.

use serde::Serialize;

use crate::materials::MaterialMatrix;

#[derive(Debug, Clone, Serialize)]
pub struct MatrixSummary {
    pub profile_count: usize,
    pub configured_pairs: usize,
    pub incompatible_pairs: usize,
    pub profiles: Vec<ProfileSummary>,
    pub pairs: Vec<PairSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub index: usize,
    /// Coarse type category, or null for an untyped profile.
    pub material_type: Option<&'static str>,
}

/// One configured pair. Unconfigured pairs are counted, not listed.
#[derive(Debug, Clone, Serialize)]
pub struct PairSummary {
    pub outgoing: usize,
    pub ingoing: usize,
    pub heat_factor: u8,
    pub compression_factor: u8,
    pub reverse: bool,
}

impl MatrixSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Reduce a matrix to its shareable shape: sizes, type categories, and
/// splice parameters, with every name stripped.
pub fn anonymized_summary(matrix: &MaterialMatrix) -> MatrixSummary {
    let profiles: Vec<ProfileSummary> = matrix
        .profiles()
        .enumerate()
        .map(|(index, profile)| ProfileSummary {
            index,
            material_type: profile.material_type.as_ref().map(|t| t.category_name()),
        })
        .collect();

    let mut pairs = Vec::new();
    let count = matrix.len();
    for outgoing in 0..count {
        for ingoing in 0..count {
            if let Some(settings) = matrix.pair_at(outgoing, ingoing) {
                pairs.push(PairSummary {
                    outgoing,
                    ingoing,
                    heat_factor: settings.heat_factor,
                    compression_factor: settings.compression_factor,
                    reverse: settings.reverse,
                });
            }
        }
    }

    MatrixSummary {
        profile_count: count,
        configured_pairs: pairs.len(),
        incompatible_pairs: count * count - pairs.len(),
        profiles,
        pairs,
    }
}
