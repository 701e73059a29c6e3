//! Informal names that resolve to catalog handles.

use hokusai_core::{ReferenceCatalog, normalize_handle};
use hokusai_error::{ScriptError, ScriptErrorKind};
use std::collections::BTreeMap;

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("ayo", "auraayo"),
    ("rayne", "rayneaura"),
    ("hana", "aurahana"),
    ("hanna", "aurahana"),
    ("zorbie", "zorbie"),
    ("jax", "jaxiron"),
    ("iron", "jaxiron"),
    ("gnatman", "auragnat"),
    ("gnat", "auragnat"),
    ("kinetic", "aurakinetic"),
    ("sparky", "aurakinetic"),
];

/// Alias to handle rule table.
///
/// Aliases are matched case-insensitively as whole words and only count when
/// their handle exists in the catalog being searched.
///
/// # Examples
///
/// ```
/// use hokusai_script::AliasTable;
///
/// let mut aliases = AliasTable::empty();
/// aliases.insert("The Boss", "@JaxIron").unwrap();
/// assert_eq!(aliases.handle_for("the boss"), Some("jaxiron"));
///
/// assert_eq!(AliasTable::builtin().handle_for("Sparky"), Some("aurakinetic"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AliasTable {
    /// The built-in table for the starter cast.
    pub fn builtin() -> Self {
        Self {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, handle)| (alias.to_string(), handle.to_string()))
                .collect(),
        }
    }

    /// A table with no aliases.
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// Build a table from configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAlias` if an alias or its handle is blank.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, ScriptError> {
        let mut table = Self::empty();
        for (alias, handle) in map {
            table.insert(alias, handle)?;
        }
        Ok(table)
    }

    /// Add or replace an alias.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAlias` if the alias or the normalized handle is empty.
    #[track_caller]
    pub fn insert(&mut self, alias: &str, handle: &str) -> Result<(), ScriptError> {
        let alias_key = alias.trim().to_ascii_lowercase();
        let handle = normalize_handle(handle);
        if alias_key.is_empty() || handle.is_empty() {
            return Err(ScriptError::new(ScriptErrorKind::InvalidAlias(
                alias.to_string(),
            )));
        }
        self.aliases.insert(alias_key, handle);
        Ok(())
    }

    /// Handle an alias points at.
    pub fn handle_for(&self, alias: &str) -> Option<&str> {
        self.aliases
            .get(&alias.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    /// All `(alias, handle)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, handle)| (alias.as_str(), handle.as_str()))
    }

    /// Pairs whose handle exists in `catalog`.
    pub fn active<'a>(
        &'a self,
        catalog: &'a ReferenceCatalog,
    ) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter()
            .filter(move |(_, handle)| catalog.contains(handle))
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
