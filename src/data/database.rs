//! Game Database
//!
//! The immutable context object every consumer reads game data through.
//! Built once at startup by [`DatabaseBuilder`], verified, then published;
//! callers share it behind an `Arc`. There is no global instance and no
//! mutation after [`DatabaseBuilder::build`] returns, so concurrent readers
//! need no locking.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use super::blueprint::Blueprint;
use super::directory::ReferenceDirectory;
use super::enums::{EnumCategory, EnumPolicy, PrototypeCatalog, PrototypeEnumTables};
use super::ids::{AssetTypeId, BlueprintId, CurveId, Namespace, PrototypeId, StringId};
use super::source::DataManifest;
use super::DataError;

/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "Assets/GameData/manifest.json";

/// Database startup configuration.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    /// Path of the data manifest.
    pub manifest_path: PathBuf,
    /// Accept an Inventory enum with no entries.
    pub allow_empty_inventory: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            allow_empty_inventory: false,
        }
    }
}

impl DatabaseConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            manifest_path: std::env::var("GAMEDATA_MANIFEST")
                .map(PathBuf::from)
                .unwrap_or(defaults.manifest_path),
            allow_empty_inventory: std::env::var("GAMEDATA_ALLOW_EMPTY_INVENTORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.allow_empty_inventory),
        }
    }

    /// Enum verification policy derived from this config.
    pub fn enum_policy(&self) -> EnumPolicy {
        EnumPolicy {
            allow_empty_inventory: self.allow_empty_inventory,
        }
    }
}

/// Converts a Power-relative enum index into a property id.
///
/// Property encoding lives outside the data layer; this is its seam.
pub trait PropertyIdReconstructor {
    /// Property id for the power at `power_index` in the Power category.
    fn power_property_id(&self, power_index: u64) -> u64;
}

impl<F: Fn(u64) -> u64> PropertyIdReconstructor for F {
    fn power_property_id(&self, power_index: u64) -> u64 {
        self(power_index)
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Append-only registration front end for [`GameDatabase`].
#[derive(Debug)]
pub struct DatabaseBuilder {
    strings: ReferenceDirectory<StringId>,
    asset_types: ReferenceDirectory<AssetTypeId>,
    curves: ReferenceDirectory<CurveId>,
    blueprint_refs: ReferenceDirectory<BlueprintId>,
    prototype_refs: ReferenceDirectory<PrototypeId>,
    blueprints: BTreeMap<BlueprintId, Blueprint>,
    /// Blueprint of every structured prototype; resource prototypes are absent.
    prototype_blueprints: BTreeMap<PrototypeId, BlueprintId>,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBuilder {
    /// Create an empty builder.
    ///
    /// Display strings have no reverse lookup; every other namespace does.
    pub fn new() -> Self {
        Self {
            strings: ReferenceDirectory::new(false),
            asset_types: ReferenceDirectory::new(true),
            curves: ReferenceDirectory::new(true),
            blueprint_refs: ReferenceDirectory::new(true),
            prototype_refs: ReferenceDirectory::new(true),
            blueprints: BTreeMap::new(),
            prototype_blueprints: BTreeMap::new(),
        }
    }

    /// Register a display string.
    pub fn add_string(&mut self, id: StringId, name: &str) -> Result<&mut Self, DataError> {
        self.strings.register(id, name)?;
        Ok(self)
    }

    /// Register an asset type.
    pub fn add_asset_type(&mut self, id: AssetTypeId, name: &str) -> Result<&mut Self, DataError> {
        self.asset_types.register(id, name)?;
        Ok(self)
    }

    /// Register a curve.
    pub fn add_curve(&mut self, id: CurveId, name: &str) -> Result<&mut Self, DataError> {
        self.curves.register(id, name)?;
        Ok(self)
    }

    /// Register a blueprint and its runtime binding.
    pub fn add_blueprint(
        &mut self,
        id: BlueprintId,
        name: &str,
        runtime_binding: &str,
    ) -> Result<&mut Self, DataError> {
        self.blueprint_refs.register(id, name)?;
        self.blueprints.insert(id, Blueprint::new(id, runtime_binding));
        Ok(self)
    }

    /// Register a schema-derived prototype.
    ///
    /// The blueprint may be registered later; it is resolved at build time.
    pub fn add_prototype(
        &mut self,
        id: PrototypeId,
        name: &str,
        blueprint: BlueprintId,
    ) -> Result<&mut Self, DataError> {
        self.prototype_refs.register(id, name)?;
        self.prototype_blueprints.insert(id, blueprint);
        Ok(self)
    }

    /// Register a resource-derived prototype.
    pub fn add_resource_prototype(&mut self, id: PrototypeId, name: &str) -> Result<&mut Self, DataError> {
        self.prototype_refs.register(id, name)?;
        Ok(self)
    }

    /// Build the enum tables, verify and publish.
    pub fn build(self, policy: EnumPolicy) -> Result<GameDatabase, DataError> {
        let enums = PrototypeEnumTables::build(self.prototype_refs.enumerate(), &self, policy)?;

        Ok(GameDatabase {
            strings: self.strings,
            asset_types: self.asset_types,
            curves: self.curves,
            blueprint_refs: self.blueprint_refs,
            prototype_refs: self.prototype_refs,
            blueprints: self.blueprints,
            prototype_blueprints: self.prototype_blueprints,
            enums,
        })
    }
}

impl PrototypeCatalog for DatabaseBuilder {
    fn is_structured(&self, id: PrototypeId) -> bool {
        self.prototype_blueprints.contains_key(&id)
    }

    fn blueprint_of(&self, id: PrototypeId) -> Option<&Blueprint> {
        self.prototype_blueprints
            .get(&id)
            .and_then(|blueprint| self.blueprints.get(blueprint))
    }
}

// =============================================================================
// DATABASE
// =============================================================================

/// Published, read-only game data.
#[derive(Debug)]
pub struct GameDatabase {
    strings: ReferenceDirectory<StringId>,
    asset_types: ReferenceDirectory<AssetTypeId>,
    curves: ReferenceDirectory<CurveId>,
    blueprint_refs: ReferenceDirectory<BlueprintId>,
    prototype_refs: ReferenceDirectory<PrototypeId>,
    blueprints: BTreeMap<BlueprintId, Blueprint>,
    prototype_blueprints: BTreeMap<PrototypeId, BlueprintId>,
    enums: PrototypeEnumTables,
}

impl GameDatabase {
    /// Load, build and verify the database described by `config`.
    ///
    /// Any error means the server must not start serving.
    pub fn load(config: &DatabaseConfig) -> Result<Self, DataError> {
        info!("Initializing game database from {}", config.manifest_path.display());
        let started = Instant::now();

        let manifest = DataManifest::load(&config.manifest_path)?;
        let database = Self::from_manifest(&manifest, config.enum_policy())?;

        database.log_summary();
        info!(
            "Finished initializing game database in {} ms",
            started.elapsed().as_millis()
        );
        Ok(database)
    }

    /// Build from an already-parsed manifest.
    pub fn from_manifest(manifest: &DataManifest, policy: EnumPolicy) -> Result<Self, DataError> {
        let mut builder = DatabaseBuilder::new();
        manifest.register_into(&mut builder)?;
        builder.build(policy)
    }

    fn log_summary(&self) {
        info!(
            "Loaded {} strings, {} asset types, {} curves, {} blueprints, {} prototypes",
            self.strings.len(),
            self.asset_types.len(),
            self.curves.len(),
            self.blueprint_refs.len(),
            self.prototype_refs.len(),
        );
        for category in EnumCategory::ALL {
            info!("{} enum: {} values", category, self.enums.len(category) - 1);
        }
        info!("Enum fingerprint: {}", hex::encode(self.enums.fingerprint()));
    }

    /// Prototype enum tables.
    #[inline]
    pub fn enums(&self) -> &PrototypeEnumTables {
        &self.enums
    }

    /// Prototype directory.
    #[inline]
    pub fn prototypes(&self) -> &ReferenceDirectory<PrototypeId> {
        &self.prototype_refs
    }

    /// Largest valid All-category enum value.
    #[inline]
    pub fn max_enum_value(&self) -> u64 {
        self.enums.max_enum_value()
    }

    /// Display string text.
    pub fn display_string(&self, id: StringId) -> Result<&str, DataError> {
        self.strings.name_of(id)
    }

    /// Asset type name.
    pub fn asset_type_name(&self, id: AssetTypeId) -> Result<&str, DataError> {
        self.asset_types.name_of(id)
    }

    /// Curve name.
    pub fn curve_name(&self, id: CurveId) -> Result<&str, DataError> {
        self.curves.name_of(id)
    }

    /// Blueprint name.
    pub fn blueprint_name(&self, id: BlueprintId) -> Result<&str, DataError> {
        self.blueprint_refs.name_of(id)
    }

    /// Prototype name.
    pub fn prototype_name(&self, id: PrototypeId) -> Result<&str, DataError> {
        self.prototype_refs.name_of(id)
    }

    /// Prototype id by name, for either prototype family.
    pub fn prototype_by_name(&self, name: &str) -> Result<PrototypeId, DataError> {
        self.prototype_refs.id_by_name(name)
    }

    /// Prototype whose name equals the display string `asset`.
    ///
    /// The invalid string id maps to the invalid prototype.
    pub fn prototype_by_asset(&self, asset: StringId) -> Result<PrototypeId, DataError> {
        if !asset.is_valid() {
            return Ok(PrototypeId::INVALID);
        }
        let name = self.display_string(asset)?;
        self.prototype_by_name(name)
    }

    /// Blueprint of a structured prototype.
    pub fn prototype_blueprint(&self, id: PrototypeId) -> Result<&Blueprint, DataError> {
        self.prototype_blueprints
            .get(&id)
            .and_then(|blueprint| self.blueprints.get(blueprint))
            .ok_or(DataError::UnknownId {
                namespace: Namespace::Blueprint,
                id: id.0,
            })
    }

    /// True for schema-derived prototypes.
    #[inline]
    pub fn is_structured(&self, id: PrototypeId) -> bool {
        self.prototype_blueprints.contains_key(&id)
    }

    /// Prototype at an enum index.
    pub fn prototype_from_enum(&self, index: u64, category: EnumCategory) -> Result<PrototypeId, DataError> {
        self.enums
            .prototype(index, category)
            .ok_or(DataError::UnknownReferenceIndex { category, index })
    }

    /// Enum index of a prototype.
    pub fn enum_value(&self, id: PrototypeId, category: EnumCategory) -> Result<u64, DataError> {
        self.enums.enum_value(id, category).ok_or(DataError::UnknownId {
            namespace: Namespace::Prototype,
            id: id.0,
        })
    }

    /// Property ids of every power whose name contains `filter`.
    pub fn power_property_ids<R>(&self, filter: &str, reconstructor: &R) -> Vec<u64>
    where
        R: PropertyIdReconstructor + ?Sized,
    {
        self.enums
            .power_indices_matching(filter, |id| self.prototype_refs.name_of(id).ok())
            .into_iter()
            .map(|index| reconstructor.power_property_id(index))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_builder() -> DatabaseBuilder {
        let mut builder = DatabaseBuilder::new();
        builder
            .add_blueprint(BlueprintId(100), "Entity/Avatar.blueprint", "AvatarPrototype").unwrap()
            .add_blueprint(BlueprintId(101), "Powers/Power.blueprint", "PowerPrototype").unwrap()
            .add_blueprint(BlueprintId(102), "Inventory/Bag.blueprint", "InventoryPrototype").unwrap()
            .add_prototype(PrototypeId(5), "Entity/Hero.prototype", BlueprintId(100)).unwrap()
            .add_prototype(PrototypeId(1), "Powers/Hero/Punch.prototype", BlueprintId(101)).unwrap()
            .add_prototype(PrototypeId(2), "Powers/Hero/Leap.prototype", BlueprintId(101)).unwrap()
            .add_prototype(PrototypeId(9), "Inventory/Backpack.prototype", BlueprintId(102)).unwrap()
            .add_resource_prototype(PrototypeId(7), "Regions/Town.prototype").unwrap()
            .add_string(StringId(33), "Entity/Hero.prototype").unwrap();
        builder
    }

    /// Shared buffer the fmt subscriber writes into.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fingerprint_logged_at_info() {
        let db = sample_builder().build(EnumPolicy::default()).unwrap();
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || db.log_summary());

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let fingerprint = hex::encode(db.enums().fingerprint());
        assert!(output.contains(&fingerprint), "missing fingerprint in:\n{}", output);
    }

    #[test]
    fn test_build_and_query() {
        let db = sample_builder().build(EnumPolicy::default()).unwrap();

        assert_eq!(db.prototype_name(PrototypeId(5)).unwrap(), "Entity/Hero.prototype");
        assert_eq!(db.prototype_by_name("Regions/Town.prototype").unwrap(), PrototypeId(7));
        assert_eq!(db.blueprint_name(BlueprintId(101)).unwrap(), "Powers/Power.blueprint");
        assert_eq!(db.prototype_blueprint(PrototypeId(1)).unwrap().runtime_binding, "PowerPrototype");
        assert!(db.is_structured(PrototypeId(9)));
        assert!(!db.is_structured(PrototypeId(7)));
        assert_eq!(db.max_enum_value(), 5);
    }

    #[test]
    fn test_enum_lookups() {
        let db = sample_builder().build(EnumPolicy::default()).unwrap();

        assert_eq!(db.enum_value(PrototypeId(5), EnumCategory::Entity).unwrap(), 1);
        assert_eq!(db.prototype_from_enum(2, EnumCategory::Power).unwrap(), PrototypeId(2));
        assert!(matches!(
            db.prototype_from_enum(3, EnumCategory::Power),
            Err(DataError::UnknownReferenceIndex { category: EnumCategory::Power, index: 3 })
        ));
        assert!(matches!(
            db.enum_value(PrototypeId(7), EnumCategory::Entity),
            Err(DataError::UnknownId { namespace: Namespace::Prototype, .. })
        ));
    }

    #[test]
    fn test_prototype_by_asset() {
        let db = sample_builder().build(EnumPolicy::default()).unwrap();

        assert_eq!(db.prototype_by_asset(StringId(33)).unwrap(), PrototypeId(5));
        assert_eq!(db.prototype_by_asset(StringId::INVALID).unwrap(), PrototypeId::INVALID);
        assert!(db.prototype_by_asset(StringId(34)).is_err());
    }

    #[test]
    fn test_power_property_ids() {
        let db = sample_builder().build(EnumPolicy::default()).unwrap();

        // Power table: [0, 1 (Punch), 2 (Leap)]
        let ids = db.power_property_ids("Punch", &|index: u64| (index << 8) | 0x3F);
        assert_eq!(ids, vec![(1 << 8) | 0x3F]);

        let all = db.power_property_ids("Powers/Hero", &|index: u64| index);
        assert_eq!(all, vec![1, 2]);
    }

    #[test]
    fn test_missing_blueprint_fails_build() {
        let mut builder = DatabaseBuilder::new();
        builder
            .add_prototype(PrototypeId(5), "Entity/Hero.prototype", BlueprintId(100)).unwrap();

        let err = builder.build(EnumPolicy::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingBlueprint { .. }));
    }

    #[test]
    fn test_duplicate_prototype_fails() {
        let mut builder = sample_builder();
        let err = builder
            .add_resource_prototype(PrototypeId(5), "Other.prototype")
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateId { namespace: Namespace::Prototype, id: 5, .. }));
    }

    #[test]
    fn test_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.manifest_path, PathBuf::from(DEFAULT_MANIFEST_PATH));
        assert!(!config.allow_empty_inventory);
        assert_eq!(config.enum_policy(), EnumPolicy::default());
    }

    #[test]
    fn test_load_missing_manifest() {
        let config = DatabaseConfig {
            manifest_path: PathBuf::from("/nonexistent/gamedata/manifest.json"),
            ..Default::default()
        };
        assert!(matches!(
            GameDatabase::load(&config),
            Err(DataError::MissingDataSource { .. })
        ));
    }
}
