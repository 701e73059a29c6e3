//! Reference resolution for scene content.

use crate::AliasTable;
use crate::matcher::ReferenceMatcher;
use hokusai_core::ReferenceCatalog;
use std::collections::BTreeSet;

/// Finds the catalog entries a piece of text mentions.
///
/// A mention is an `@handle`, the entry's display name, or an alias whose
/// handle is in the catalog. All three are matched case-insensitively as
/// whole words. Results are deduplicated and ordered by first mention.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ReferenceCatalog, ReferenceEntry};
/// use hokusai_script::{AliasTable, ReferenceResolver};
///
/// let mut catalog = ReferenceCatalog::new();
/// catalog.add(ReferenceEntry::character("auraayo", "Ayo", "Red skin")).unwrap();
/// catalog.add(ReferenceEntry::character("rayneaura", "Rayne", "Silver hair")).unwrap();
///
/// let resolver = ReferenceResolver::new(&catalog, &AliasTable::builtin());
/// assert_eq!(resolver.resolve("Ayo fights @rayneaura"), vec!["auraayo", "rayneaura"]);
/// assert!(resolver.resolve("").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    matcher: ReferenceMatcher,
}

impl ReferenceResolver {
    /// Build a resolver over a catalog snapshot.
    pub fn new(catalog: &ReferenceCatalog, aliases: &AliasTable) -> Self {
        Self {
            matcher: ReferenceMatcher::new(catalog, aliases),
        }
    }

    /// Handles mentioned in `text`, deduplicated, in order of first mention.
    pub fn resolve(&self, text: &str) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.matcher
            .find(text)
            .into_iter()
            .filter(|mention| seen.insert(mention.handle.clone()))
            .map(|mention| mention.handle)
            .collect()
    }
}

/// One-shot form of [`ReferenceResolver::resolve`].
pub fn resolve_mentioned_ids(
    text: &str,
    catalog: &ReferenceCatalog,
    aliases: &AliasTable,
) -> Vec<String> {
    ReferenceResolver::new(catalog, aliases).resolve(text)
}
