use thiserror::Error;

/// Errors produced by matrix mutations, save validation, and the
/// compatibility checker.
///
/// Rule violations a well-behaved caller can trigger (duplicate names,
/// protected profiles, out-of-range factors) carry enough context to be
/// shown to the user verbatim. The drive and material variants at the bottom
/// are contract faults in the caller's input and are never expected during
/// normal operation.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("A profile named \"{name}\" already exists")]
    NameCollision { name: String },

    #[error("\"{name}\" is a factory profile and cannot be modified")]
    ProtectedProfile { name: String },

    #[error("No profile named \"{name}\" in the matrix")]
    UnknownProfile { name: String },

    #[error("Profile names cannot be empty")]
    BlankProfileName,

    #[error("{field} must be between 0 and 15, got {value}")]
    FactorOutOfRange { field: &'static str, value: i64 },

    #[error("Splice settings for {outgoing} to {ingoing}: {field} must be between 0 and 15, got {value}")]
    PairOutOfRange {
        outgoing: String,
        ingoing: String,
        field: &'static str,
        value: u8,
    },

    #[error("Drive index {index} is out of range (drives are numbered 0-3)")]
    DriveOutOfRange { index: usize },

    #[error("Drive {drive} is assigned \"{name}\", which is not in the matrix")]
    UnknownMaterial { drive: usize, name: String },
}

impl From<MatrixError> for String {
    fn from(err: MatrixError) -> Self {
        err.to_string()
    }
}
