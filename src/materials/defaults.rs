//! Factory profile catalogue and the Default Splice Table.
//!
//! Provides two loading methods:
//! - `SpliceDefaults::builtin()` - the table embedded into the binary
//! - `load_defaults(path)` - a user-supplied override table from a file
//!
//! The table maps *ordered* type pairs to splice parameters: heating PETG
//! that follows PLA is not the same operation as heating PLA that follows
//! PETG, so (outgoing, ingoing) and (ingoing, outgoing) are distinct keys.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::types::{names_equal, MaterialType, SpliceSettings, FACTOR_MAX};

/// Default catalogue embedded in the binary at compile time.
/// Loaded from `config/default_materials.toml`.
const DEFAULT_MATERIALS: &str = include_str!("../../config/default_materials.toml");

#[derive(Debug, Deserialize)]
struct DefaultsFile {
    #[serde(default)]
    factory: Vec<FactoryEntry>,
    #[serde(default)]
    splice: Vec<SpliceEntry>,
}

#[derive(Debug, Deserialize)]
struct FactoryEntry {
    name: String,
    #[serde(rename = "type")]
    material_type: String,
}

#[derive(Debug, Deserialize)]
struct SpliceEntry {
    outgoing: String,
    ingoing: String,
    heat: u8,
    compression: u8,
    #[serde(default)]
    reverse: bool,
}

/// A factory profile from the catalogue. Factory profiles are seeded on
/// first run, restored when missing, and can never be renamed, deleted, or
/// re-typed.
#[derive(Debug, Clone)]
pub struct FactoryProfile {
    pub name: String,
    pub material_type: MaterialType,
}

/// Parsed factory catalogue plus the directed (outgoing, ingoing) splice
/// table.
#[derive(Debug, Clone)]
pub struct SpliceDefaults {
    factory: Vec<FactoryProfile>,
    table: HashMap<(MaterialType, MaterialType), SpliceSettings>,
}

impl SpliceDefaults {
    /// The catalogue embedded in the binary.
    ///
    /// # Panics
    /// Panics if the embedded TOML is invalid (this would be a build bug).
    pub fn builtin() -> &'static SpliceDefaults {
        static BUILTIN: OnceLock<SpliceDefaults> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            SpliceDefaults::parse(DEFAULT_MATERIALS)
                .expect("embedded default_materials.toml must be valid")
        })
    }

    /// Parse and validate a catalogue from TOML text.
    pub fn parse(content: &str) -> Result<SpliceDefaults> {
        let file: DefaultsFile = toml::from_str(content)?;

        let mut factory = Vec::with_capacity(file.factory.len());
        for entry in &file.factory {
            let material_type = MaterialType::from_str(&entry.material_type);
            if material_type.is_other() {
                bail!(
                    "factory profile {:?} has unrecognized type {:?}",
                    entry.name,
                    entry.material_type
                );
            }
            if factory
                .iter()
                .any(|f: &FactoryProfile| names_equal(&f.name, &entry.name))
            {
                bail!("duplicate factory profile name {:?}", entry.name);
            }
            factory.push(FactoryProfile {
                name: entry.name.clone(),
                material_type,
            });
        }

        let mut table = HashMap::with_capacity(file.splice.len());
        for entry in &file.splice {
            let outgoing = MaterialType::from_str(&entry.outgoing);
            let ingoing = MaterialType::from_str(&entry.ingoing);
            if outgoing.is_other() || ingoing.is_other() {
                bail!(
                    "splice entry {:?} -> {:?} must use catalogue types",
                    entry.outgoing,
                    entry.ingoing
                );
            }
            if entry.heat > FACTOR_MAX || entry.compression > FACTOR_MAX {
                bail!(
                    "splice entry {:?} -> {:?} has factors outside 0-{}",
                    entry.outgoing,
                    entry.ingoing,
                    FACTOR_MAX
                );
            }
            let settings = SpliceSettings::new(entry.heat, entry.compression, entry.reverse);
            if table.insert((outgoing, ingoing), settings).is_some() {
                bail!(
                    "duplicate splice entry {:?} -> {:?}",
                    entry.outgoing,
                    entry.ingoing
                );
            }
        }

        Ok(SpliceDefaults { factory, table })
    }

    /// Known-good parameters for an ordered type pair, if the table has any.
    pub fn lookup(
        &self,
        outgoing: &MaterialType,
        ingoing: &MaterialType,
    ) -> Option<SpliceSettings> {
        self.table
            .get(&(outgoing.clone(), ingoing.clone()))
            .copied()
    }

    pub fn factory_profiles(&self) -> &[FactoryProfile] {
        &self.factory
    }

    /// Case-insensitive catalogue membership test for a profile name.
    pub fn is_factory_name(&self, name: &str) -> bool {
        self.factory.iter().any(|f| names_equal(&f.name, name))
    }

    /// Name of the factory profile carrying the given type, if one exists.
    pub fn factory_name_for(&self, material_type: &MaterialType) -> Option<&str> {
        self.factory
            .iter()
            .find(|f| f.material_type == *material_type)
            .map(|f| f.name.as_str())
    }
}

/// True when `name` belongs to the built-in factory catalogue. Protection
/// checks always consult the embedded catalogue, never a loaded override
/// table.
pub fn is_factory_profile(name: &str) -> bool {
    SpliceDefaults::builtin().is_factory_name(name)
}

/// Load a catalogue override from a TOML file at the given path.
pub fn load_defaults(path: &Path) -> Result<SpliceDefaults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read splice defaults from {:?}", path))?;
    SpliceDefaults::parse(&content)
        .with_context(|| format!("Invalid splice defaults in {:?}", path))
}
