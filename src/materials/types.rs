use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Highest value the splice-core firmware accepts for a heat or compression
/// factor.
pub const FACTOR_MAX: u8 = 15;

/// Recognized material types for splice parameter lookups.
///
/// `Other` carries the user's raw label for materials outside the catalogue
/// (wood fills, carbon blends, anything exotic). Profiles typed `Other`
/// never participate in default-table seeding and are exempt from factor
/// range checks on load.
///
/// Documents store every type as its display string and reclassify it
/// through `from_str` on load. An `Other` label containing a catalogue
/// token ("PLA", "PA", ...) reloads as that catalogue type; only labels
/// `from_str` itself classifies as `Other` round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialType {
    PLA,
    ABS,
    PETG,
    TPU,
    Nylon,
    Other(String),
}

impl MaterialType {
    /// Parse a material string into a MaterialType using case-insensitive
    /// substring matching. Priority order prevents false positives
    /// (e.g., "PLA" is checked before "PA" so "PLA" doesn't match as Nylon).
    pub fn from_str(input: &str) -> MaterialType {
        let upper = input.to_uppercase();

        // Order matters: check more specific substrings before generic ones.
        if upper.contains("PLA") {
            MaterialType::PLA
        } else if upper.contains("PETG") {
            MaterialType::PETG
        } else if upper.contains("ABS") {
            MaterialType::ABS
        } else if upper.contains("TPU") || upper.contains("TPE") {
            MaterialType::TPU
        } else if upper.contains("PA") || upper.contains("NYLON") {
            MaterialType::Nylon
        } else {
            MaterialType::Other(input.to_string())
        }
    }

    /// Display string. Catalogue types use their canonical name, `Other`
    /// yields the raw label it carries.
    pub fn as_str(&self) -> &str {
        match self {
            MaterialType::PLA => "PLA",
            MaterialType::ABS => "ABS",
            MaterialType::PETG => "PETG",
            MaterialType::TPU => "TPU",
            MaterialType::Nylon => "Nylon",
            MaterialType::Other(label) => label,
        }
    }

    /// Coarse category name that never exposes a user-entered label.
    /// All `Other` variants collapse to the literal string "Other".
    pub fn category_name(&self) -> &'static str {
        match self {
            MaterialType::PLA => "PLA",
            MaterialType::ABS => "ABS",
            MaterialType::PETG => "PETG",
            MaterialType::TPU => "TPU",
            MaterialType::Nylon => "Nylon",
            MaterialType::Other(_) => "Other",
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, MaterialType::Other(_))
    }
}

impl From<String> for MaterialType {
    fn from(s: String) -> Self {
        MaterialType::from_str(&s)
    }
}

impl From<MaterialType> for String {
    fn from(t: MaterialType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splice parameters for one ordered material pair.
///
/// Heat and compression factors are firmware units in `0..=FACTOR_MAX`.
/// A factor of zero selects the firmware's built-in algorithm for that part
/// of the splice, which only works for a handful of factory pairings.
/// `reverse` flips the splice direction for soft ingoing filaments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceSettings {
    #[serde(rename = "heatFactor")]
    pub heat_factor: u8,
    #[serde(rename = "compressionFactor")]
    pub compression_factor: u8,
    #[serde(default)]
    pub reverse: bool,
}

impl SpliceSettings {
    pub fn new(heat_factor: u8, compression_factor: u8, reverse: bool) -> Self {
        SpliceSettings {
            heat_factor,
            compression_factor,
            reverse,
        }
    }

    /// Checked constructor for untrusted form input. Signed arguments so a
    /// negative value reports as out of range instead of wrapping.
    pub fn from_factors(
        heat_factor: i64,
        compression_factor: i64,
        reverse: bool,
    ) -> Result<Self, MatrixError> {
        if heat_factor < 0 || heat_factor > i64::from(FACTOR_MAX) {
            return Err(MatrixError::FactorOutOfRange {
                field: "heatFactor",
                value: heat_factor,
            });
        }
        if compression_factor < 0 || compression_factor > i64::from(FACTOR_MAX) {
            return Err(MatrixError::FactorOutOfRange {
                field: "compressionFactor",
                value: compression_factor,
            });
        }
        Ok(SpliceSettings {
            heat_factor: heat_factor as u8,
            compression_factor: compression_factor as u8,
            reverse,
        })
    }

    /// True when either factor is zero. Zero falls back to the firmware's
    /// built-in algorithm, which is only tuned for specific factory
    /// pairings, so the compatibility checker flags these unless a policy
    /// exemption applies.
    pub fn has_empty_algorithm(&self) -> bool {
        self.heat_factor == 0 || self.compression_factor == 0
    }

    /// True when both factors are within firmware range. Struct fields are
    /// public, so a hand-built value can exceed `FACTOR_MAX`; save
    /// validation uses this to reject such a matrix.
    pub fn in_range(&self) -> bool {
        self.heat_factor <= FACTOR_MAX && self.compression_factor <= FACTOR_MAX
    }
}

/// One material profile: a user-facing name plus an optional type.
///
/// `material_type` is `None` for a freshly created profile whose type has
/// not been chosen yet. Such a profile takes part in no default seeding and
/// every pair involving it starts unconfigured.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProfile {
    pub name: String,
    pub material_type: Option<MaterialType>,
}

impl MaterialProfile {
    pub fn new(name: impl Into<String>, material_type: Option<MaterialType>) -> Self {
        MaterialProfile {
            name: name.into(),
            material_type,
        }
    }

    /// The concrete catalogue type, if any. `None` for both the placeholder
    /// state and `Other`, the two cases the default table cannot seed.
    pub fn concrete_type(&self) -> Option<&MaterialType> {
        match &self.material_type {
            Some(t) if !t.is_other() => Some(t),
            _ => None,
        }
    }
}

/// Case-insensitive profile name comparison. Profile names are unique per
/// matrix under this comparison, not under `==`.
pub(crate) fn names_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
