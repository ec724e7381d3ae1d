pub mod defaults;
pub mod document;
pub mod import;
pub mod matrix;
pub mod types;

pub use defaults::{load_defaults, FactoryProfile, SpliceDefaults};
pub use document::{MaterialEntry, MatrixDocument};
pub use import::ImportedProfile;
pub use matrix::MaterialMatrix;
pub use types::{MaterialProfile, MaterialType, SpliceSettings, FACTOR_MAX};
