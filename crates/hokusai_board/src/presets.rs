//! Named catalog snapshots.

use chrono::{DateTime, Utc};
use hokusai_core::{
    ImageData, Preset, ReferenceCatalog, ReferenceCategory, ReferenceEntry, normalize_handle,
};
use hokusai_error::{HokusaiResult, JsonError, PresetError, PresetErrorKind};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Entry shape accepted on import, including the flat `base64`/`mimeType`
/// image fields older exports carry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedEntry {
    #[serde(flatten)]
    entry: ReferenceEntry,
    #[serde(default)]
    base64: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

impl ImportedEntry {
    fn into_entry(self) -> ReferenceEntry {
        let mut entry = self.entry;
        if entry.image.is_none() {
            if let Some(encoded) = self.base64.as_deref() {
                let mime = self.mime_type.as_deref().unwrap_or("image/png");
                entry.image = ImageData::from_base64(encoded, mime).ok();
            }
        }
        entry
    }
}

/// Saved presets, newest first.
///
/// # Examples
///
/// ```
/// use hokusai_board::PresetLibrary;
/// use hokusai_core::{ReferenceCatalog, ReferenceEntry};
///
/// let mut catalog = ReferenceCatalog::new();
/// catalog.add(ReferenceEntry::character("zorbie", "Zorbie", "Green alien")).unwrap();
///
/// let mut library = PresetLibrary::default();
/// let id = library.save("Aliens", &catalog).unwrap().id().clone();
///
/// catalog.clear();
/// library.apply(&id, &mut catalog).unwrap();
/// assert!(catalog.contains("zorbie"));
/// assert!(library.save("  ", &catalog).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl PresetLibrary {
    /// Wrap a persisted preset list.
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    /// Presets, newest first.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Unwrap into the persisted list.
    pub fn into_vec(self) -> Vec<Preset> {
        self.presets
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns true if no presets are saved.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Preset by id.
    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id() == id)
    }

    /// Snapshot `catalog` under a new id.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for blank names.
    #[instrument(skip(self, catalog), fields(entries = catalog.len()))]
    pub fn save(
        &mut self,
        name: &str,
        catalog: &ReferenceCatalog,
    ) -> Result<&Preset, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::new(PresetErrorKind::EmptyName));
        }
        let id = Uuid::new_v4().to_string();
        self.presets
            .insert(0, Preset::snapshot(id, name, catalog, Utc::now()));
        info!(name, "Saved preset");
        Ok(&self.presets[0])
    }

    /// Add a preset from an exported document.
    ///
    /// The document needs a non-empty `name` and object-shaped `characters`
    /// and `locations`. Each entry must be keyed by its own handle and pass
    /// the same checks as [`ReferenceCatalog::add`]; a handle may appear in
    /// only one category. It gets a fresh `import_` id; its timestamp is kept
    /// when it parses as RFC 3339 or epoch milliseconds. Nothing is added on
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` or `InvalidDocument`.
    #[instrument(skip(self, document))]
    pub fn import(&mut self, document: &Value) -> Result<&Preset, PresetError> {
        let invalid =
            |reason: &str| PresetError::new(PresetErrorKind::InvalidDocument(reason.to_string()));

        let object = document
            .as_object()
            .ok_or_else(|| invalid("expected a JSON object"))?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err(PresetError::new(PresetErrorKind::EmptyName));
        }
        let mut catalog = ReferenceCatalog::new();
        add_entries(&mut catalog, object.get("characters"), ReferenceCategory::Character)?;
        add_entries(&mut catalog, object.get("locations"), ReferenceCategory::Location)?;
        let (characters, locations) = catalog.into_parts();
        let created_at = object
            .get("createdAt")
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        let id = format!("import_{}", Uuid::new_v4().simple());
        debug!(%id, characters = characters.len(), locations = locations.len(), "Importing preset");
        self.presets
            .insert(0, Preset::new(id, name, characters, locations, created_at));
        info!(name, "Imported preset");
        Ok(&self.presets[0])
    }

    /// Export a preset as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or a `JsonError` if encoding fails.
    pub fn export(&self, id: &str) -> HokusaiResult<Value> {
        let preset = self
            .get(id)
            .ok_or_else(|| PresetError::new(PresetErrorKind::NotFound(id.to_string())))?;
        let document = serde_json::to_value(preset)
            .map_err(|e| JsonError::new(format!("Failed to encode preset: {}", e)))?;
        Ok(document)
    }

    /// Delete a preset.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids.
    #[track_caller]
    pub fn delete(&mut self, id: &str) -> Result<Preset, PresetError> {
        let position = self
            .presets
            .iter()
            .position(|preset| preset.id() == id)
            .ok_or_else(|| PresetError::new(PresetErrorKind::NotFound(id.to_string())))?;
        Ok(self.presets.remove(position))
    }

    /// Replace the contents of `catalog` with a preset.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids; `catalog` is unchanged.
    #[track_caller]
    pub fn apply(&self, id: &str, catalog: &mut ReferenceCatalog) -> Result<(), PresetError> {
        let preset = self
            .get(id)
            .ok_or_else(|| PresetError::new(PresetErrorKind::NotFound(id.to_string())))?;
        let (characters, locations) = preset.catalog().into_parts();
        catalog.replace(characters, locations);
        info!(name = %preset.name(), "Applied preset");
        Ok(())
    }
}

#[track_caller]
fn add_entries(
    catalog: &mut ReferenceCatalog,
    value: Option<&Value>,
    category: ReferenceCategory,
) -> Result<(), PresetError> {
    let field = match category {
        ReferenceCategory::Character => "characters",
        ReferenceCategory::Location => "locations",
    };
    let invalid = |reason: String| PresetError::new(PresetErrorKind::InvalidDocument(reason));

    let Some(Value::Object(map)) = value else {
        return Err(invalid(format!("'{}' must be an object", field)));
    };
    for (key, raw) in map {
        let imported: ImportedEntry = serde_json::from_value(raw.clone())
            .map_err(|e| invalid(format!("{} entry '{}': {}", field, key, e)))?;
        let mut entry = imported.into_entry();

        let handle = normalize_handle(key);
        if normalize_handle(&entry.id) != handle {
            return Err(invalid(format!(
                "{} entry '{}' has mismatched id '{}'",
                field, key, entry.id
            )));
        }
        entry.id = handle;
        entry.category = category;
        catalog
            .add(entry)
            .map_err(|e| invalid(format!("{} entry '{}': {}", field, key, e.kind)))?;
    }
    Ok(())
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_import_rejects_bad_shapes_without_side_effects() {
        let mut library = PresetLibrary::default();
        assert!(library.import(&json!([1, 2])).is_err());
        assert!(library.import(&json!({"name": "", "characters": {}, "locations": {}})).is_err());
        assert!(library.import(&json!({"name": "x", "characters": [], "locations": {}})).is_err());
        assert!(library.import(&json!({"name": "x", "characters": {}})).is_err());

        let zorbie = json!({"id": "zorbie", "name": "Zorbie", "type": "character", "description": "Green alien"});
        let land = json!({"id": "zorbie", "name": "Zorbie Land", "type": "location", "description": "Crater"});
        // Key and id disagree
        assert!(
            library
                .import(&json!({"name": "x", "characters": {"Zorbie Two": zorbie}, "locations": {}}))
                .is_err()
        );
        // Same handle in both categories
        assert!(
            library
                .import(&json!({"name": "x", "characters": {"zorbie": zorbie}, "locations": {"zorbie": land}}))
                .is_err()
        );
        // Blank description
        let blank = json!({"id": "arena", "name": "Arena", "type": "location", "description": "  "});
        assert!(
            library
                .import(&json!({"name": "x", "characters": {}, "locations": {"arena": blank}}))
                .is_err()
        );
        // Handle with no letters or digits
        let empty = json!({"id": "!!", "name": "Nobody", "type": "character", "description": "Ghost"});
        assert!(
            library
                .import(&json!({"name": "x", "characters": {"!!": empty}, "locations": {}}))
                .is_err()
        );
        assert!(library.is_empty());
    }

    #[test]
    fn test_import_normalizes_handles_and_files_by_section() {
        let mut library = PresetLibrary::default();
        let document = json!({
            "name": "Arena crew",
            "characters": {
                "Jax-Iron": {"id": "JaxIron", "name": "Jax", "type": "location", "description": "Steel armor"}
            },
            "locations": {}
        });
        let id = library.import(&document).unwrap().id().clone();

        let mut catalog = ReferenceCatalog::new();
        library.apply(&id, &mut catalog).unwrap();
        let jax = catalog.get("jaxiron").unwrap();
        assert_eq!(jax.id, "jaxiron");
        assert!(jax.is_character());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_import_assigns_fresh_id_and_keeps_millis_timestamp() {
        let mut library = PresetLibrary::default();
        let document = json!({
            "id": "1700000000000",
            "name": "Arena crew",
            "createdAt": 1_700_000_000_000_i64,
            "characters": {
                "zorbie": {
                    "id": "zorbie",
                    "name": "Zorbie",
                    "type": "character",
                    "description": "Green alien",
                    "base64": "AQID",
                    "mimeType": "image/jpeg"
                }
            },
            "locations": {}
        });
        let preset = library.import(&document).unwrap();
        assert!(preset.id().starts_with("import_"));
        assert_eq!(preset.created_at().timestamp_millis(), 1_700_000_000_000);
        let zorbie = &preset.characters()["zorbie"];
        let image = zorbie.image.as_ref().unwrap();
        assert_eq!(image.data, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_newest_first_and_delete() {
        let catalog = ReferenceCatalog::new();
        let mut library = PresetLibrary::default();
        let first = library.save("first", &catalog).unwrap().id().clone();
        library.save("second", &catalog).unwrap();
        assert_eq!(library.presets()[0].name(), "second");

        library.delete(&first).unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.delete(&first).is_err());
    }
}
