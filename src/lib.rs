//! Material matrix and splice compatibility core for SpliceMate.
//!
//! Multi-material printing on a single-nozzle printer splices filament
//! segments end to end before they enter the extruder. Every ordered pair
//! of materials needs its own heat and compression parameters (or a
//! verdict that it cannot be spliced at all), and the matrix of those
//! pairs is what this crate manages.
//!
//! # Architecture
//!
//! - **materials**: profiles, the pair matrix, factory defaults, document
//!   persistence shape, export/import
//! - **compat**: validating a print's drive-to-drive transitions against
//!   the matrix
//! - **store**: reading and atomically writing the matrix document
//! - **session**: committed state plus working-copy edit sessions
//! - **telemetry**: anonymized summaries for opt-in reporting
//!
//! # Example
//!
//! ```ignore
//! use splicemate_core::{
//!     CompatibilityChecker, DriveAssignment, MaterialMatrix, SpliceDefaults,
//!     TransitionInfo,
//! };
//!
//! let defaults = SpliceDefaults::builtin();
//! let matrix = MaterialMatrix::factory_default(defaults);
//!
//! let mut drives = DriveAssignment::default();
//! drives.assign(0, "Default PLA")?;
//! drives.assign(1, "Default PETG")?;
//!
//! let mut transitions = TransitionInfo::default();
//! transitions.add("0.2", 0, 1);
//!
//! let report = CompatibilityChecker::default().validate(&transitions, &drives, &matrix)?;
//! if report.blocks_output() {
//!     for conflict in &report.conflicts {
//!         eprintln!("{}", conflict.message);
//!     }
//! }
//! ```

pub mod compat;
pub mod error;
pub mod materials;
pub mod session;
pub mod store;
pub mod telemetry;

pub use compat::{
    CompatibilityChecker, CompatibilityReport, DriveAssignment, EmptySpliceWarning,
    MaterialConflict, Transition, TransitionInfo, WarningPolicy, DRIVE_COUNT,
};
pub use error::MatrixError;
pub use materials::{
    ImportedProfile, MaterialMatrix, MaterialProfile, MaterialType, MatrixDocument,
    SpliceDefaults, SpliceSettings, FACTOR_MAX,
};
pub use session::{ActiveMatrix, CommitError, EditSession};
pub use telemetry::{anonymized_summary, MatrixSummary};
