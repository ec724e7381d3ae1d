pub mod engine;
pub mod types;

pub use engine::CompatibilityChecker;
pub use types::{
    CompatibilityReport, DriveAssignment, EmptySpliceWarning, MaterialConflict, Transition,
    TransitionInfo, WarningPolicy, DRIVE_COUNT,
};
