//! Data Manifest
//!
//! Boundary with the data loader. The loader unpacks the game-data archives
//! (out of scope here) and hands over a manifest of named objects. This
//! module applies the per-category path pre-transformation, hashes paths
//! into stable ids and feeds a [`DatabaseBuilder`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::hash::hash_path;
use super::database::DatabaseBuilder;
use super::ids::{AssetTypeId, BlueprintId, CurveId, PrototypeId, StringId};
use super::DataError;

/// How a source path is prepared before hashing.
///
/// The two prototype families hash differently so the same path can never
/// produce the same id in both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    /// Schema-derived data: `.` becomes `?`, then `/` becomes `.`
    Structured,
    /// Resource-derived data: prefixed with `&`
    Resource,
}

impl PathKind {
    /// Apply the pre-transformation.
    pub fn prepare(self, path: &str) -> String {
        match self {
            PathKind::Structured => path.replace('.', "?").replace('/', "."),
            PathKind::Resource => format!("&{}", path),
        }
    }

    /// Pre-transform and hash a path.
    #[inline]
    pub fn hash(self, path: &str) -> u64 {
        hash_path(&self.prepare(path))
    }
}

/// Display string with a loader-assigned id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEntry {
    /// Loader-assigned id.
    pub id: u64,
    /// Text key.
    pub name: String,
}

/// Blueprint path with its runtime binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintEntry {
    /// Blueprint path.
    pub path: String,
    /// Runtime class name.
    pub runtime_binding: String,
}

/// Structured prototype path with the path of its blueprint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrototypeEntry {
    /// Prototype path.
    pub path: String,
    /// Blueprint path.
    pub blueprint: String,
}

/// Everything the data loader supplies at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataManifest {
    /// Display strings.
    pub strings: Vec<StringEntry>,
    /// Asset type paths.
    pub asset_types: Vec<String>,
    /// Curve paths.
    pub curves: Vec<String>,
    /// Blueprints.
    pub blueprints: Vec<BlueprintEntry>,
    /// Schema-derived prototypes.
    pub prototypes: Vec<PrototypeEntry>,
    /// Resource-derived prototype paths.
    pub resource_prototypes: Vec<String>,
}

impl DataManifest {
    /// Load a manifest from a JSON file.
    ///
    /// A missing file is [`DataError::MissingDataSource`].
    pub fn load(path: &Path) -> Result<Self, DataError> {
        if !path.is_file() {
            return Err(DataError::MissingDataSource { path: path.to_path_buf() });
        }

        let text = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Hash every path and register the results.
    ///
    /// Blueprints and structured prototypes use [`PathKind::Structured`],
    /// resource prototypes use [`PathKind::Resource`]. Asset types and
    /// curves are structured data too.
    pub fn register_into(&self, builder: &mut DatabaseBuilder) -> Result<(), DataError> {
        for entry in &self.strings {
            builder.add_string(StringId(entry.id), &entry.name)?;
        }
        for path in &self.asset_types {
            builder.add_asset_type(AssetTypeId(PathKind::Structured.hash(path)), path)?;
        }
        for path in &self.curves {
            builder.add_curve(CurveId(PathKind::Structured.hash(path)), path)?;
        }
        for entry in &self.blueprints {
            let id = BlueprintId(PathKind::Structured.hash(&entry.path));
            builder.add_blueprint(id, &entry.path, &entry.runtime_binding)?;
        }
        for entry in &self.prototypes {
            let id = PrototypeId(PathKind::Structured.hash(&entry.path));
            let blueprint = BlueprintId(PathKind::Structured.hash(&entry.blueprint));
            builder.add_prototype(id, &entry.path, blueprint)?;
        }
        for path in &self.resource_prototypes {
            builder.add_resource_prototype(PrototypeId(PathKind::Resource.hash(path)), path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_structured() {
        assert_eq!(
            PathKind::Structured.prepare("Powers/Hero/Punch.prototype"),
            "Powers.Hero.Punch?prototype"
        );
    }

    #[test]
    fn test_prepare_resource() {
        assert_eq!(PathKind::Resource.prepare("Regions/Town.prototype"), "&Regions/Town.prototype");
    }

    #[test]
    fn test_kinds_hash_apart() {
        let path = "Entity/Items/Bag.prototype";
        assert_ne!(PathKind::Structured.hash(path), PathKind::Resource.hash(path));
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest = DataManifest::from_json(
            r#"{
                "strings": [{ "id": 17, "name": "Hello" }],
                "blueprints": [{ "path": "Entity/Avatar.blueprint", "runtime_binding": "AvatarPrototype" }],
                "prototypes": [{ "path": "Entity/Hero.prototype", "blueprint": "Entity/Avatar.blueprint" }],
                "resource_prototypes": ["Regions/Town.prototype"]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.strings.len(), 1);
        assert_eq!(manifest.prototypes[0].blueprint, "Entity/Avatar.blueprint");
        assert!(manifest.curves.is_empty());
        assert_eq!(manifest.resource_prototypes, vec!["Regions/Town.prototype".to_string()]);
    }

    #[test]
    fn test_manifest_invalid_json() {
        let err = DataManifest::from_json("{ \"prototypes\": 5 }").unwrap_err();
        assert!(matches!(err, DataError::Manifest(_)));
    }

    #[test]
    fn test_manifest_missing_file() {
        let err = DataManifest::load(Path::new("/nonexistent/gamedata/manifest.json")).unwrap_err();
        assert!(matches!(err, DataError::MissingDataSource { .. }));
    }
}
