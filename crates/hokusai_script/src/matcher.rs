//! Whole-word search for handles, names and aliases.

use crate::AliasTable;
use hokusai_core::ReferenceCatalog;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// How a mention was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MentionKind {
    /// `@handle`
    Handle,
    /// Display name
    Name,
    /// Alias from the alias table
    Alias,
}

/// One match of a catalog term in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Mention {
    pub start: usize,
    pub end: usize,
    pub handle: String,
    pub kind: MentionKind,
}

impl Mention {
    /// True if the mention is written as a label (`@name` or `Name:`).
    ///
    /// Names and aliases in that position are never substituted.
    pub fn is_guarded(&self, text: &str) -> bool {
        if self.kind == MentionKind::Handle {
            return false;
        }
        text[..self.start].ends_with('@') || text[self.end..].starts_with(':')
    }
}

#[derive(Debug, Clone)]
struct Term {
    pattern: Regex,
    handle: String,
    kind: MentionKind,
}

impl Term {
    fn new(needle: &str, handle: &str, kind: MentionKind) -> Option<Self> {
        let pattern = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
            .inspect_err(|e| warn!(needle, error = %e, "Skipping unmatchable reference term"))
            .ok()?;
        Some(Self {
            pattern,
            handle: handle.to_string(),
            kind,
        })
    }
}

/// Case-insensitive whole-word matcher over a catalog snapshot.
///
/// Case folding is Unicode-aware, so `élise` finds `Élise`.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceMatcher {
    terms: Vec<Term>,
}

impl ReferenceMatcher {
    pub fn new(catalog: &ReferenceCatalog, aliases: &AliasTable) -> Self {
        let mut terms = Vec::new();
        for entry in catalog.iter() {
            terms.extend(Term::new(
                &format!("@{}", entry.id),
                &entry.id,
                MentionKind::Handle,
            ));
            let name = entry.name.trim();
            if !name.is_empty() {
                terms.extend(Term::new(name, &entry.id, MentionKind::Name));
            }
        }
        for (alias, handle) in aliases.active(catalog) {
            terms.extend(Term::new(alias, handle, MentionKind::Alias));
        }
        Self { terms }
    }

    /// Every whole-word match, ordered by start then longest first.
    pub fn find(&self, text: &str) -> Vec<Mention> {
        let mut mentions = Vec::new();
        for term in &self.terms {
            for found in term.pattern.find_iter(text) {
                let (start, end) = (found.start(), found.end());
                if is_whole_word(text, start, end) {
                    mentions.push(Mention {
                        start,
                        end,
                        handle: term.handle.clone(),
                        kind: term.kind,
                    });
                }
            }
        }
        mentions.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| b.end.cmp(&a.end))
                .then_with(|| a.handle.cmp(&b.handle))
        });
        mentions
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word-boundary check on both edges of `text[start..end]`.
///
/// An edge only needs a boundary when the matched character there is itself a
/// word character, so `@handle` matches directly after a letter-free prefix.
pub(crate) fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let span = &text[start..end];
    let starts_with_word = span.chars().next().is_some_and(is_word_char);
    let ends_with_word = span.chars().next_back().is_some_and(is_word_char);
    if starts_with_word && text[..start].chars().next_back().is_some_and(is_word_char) {
        return false;
    }
    if ends_with_word && text[end..].chars().next().is_some_and(is_word_char) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hokusai_core::ReferenceEntry;

    fn catalog() -> ReferenceCatalog {
        let mut catalog = ReferenceCatalog::new();
        catalog
            .add(ReferenceEntry::character("auraayo", "Ayo", "Red skin"))
            .unwrap();
        catalog
            .add(ReferenceEntry::character("jaxiron", "Jax Iron", "Armored"))
            .unwrap();
        catalog
    }

    #[test]
    fn test_whole_word_only() {
        let matcher = ReferenceMatcher::new(&catalog(), &AliasTable::builtin());
        assert!(matcher.find("Ayoko walks").is_empty());
        let found = matcher.find("ayo walks");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, MentionKind::Name);
    }

    #[test]
    fn test_longest_match_first_at_same_start() {
        let matcher = ReferenceMatcher::new(&catalog(), &AliasTable::builtin());
        let found = matcher.find("Jax Iron arrives");
        assert_eq!(found[0].kind, MentionKind::Name);
        assert_eq!(found[0].end, "Jax Iron".len());
    }

    #[test]
    fn test_guard_on_label_positions() {
        let matcher = ReferenceMatcher::new(&catalog(), &AliasTable::builtin());
        let text = "Ayo: Let's go, @ayo";
        let found = matcher.find(text);
        assert!(found.iter().all(|m| m.is_guarded(text)));
    }

    #[test]
    fn test_non_ascii_names_match_any_case() {
        let mut catalog = catalog();
        catalog
            .add(ReferenceEntry::character("elise", "Élise", "Braided hair"))
            .unwrap();
        let matcher = ReferenceMatcher::new(&catalog, &AliasTable::builtin());
        let text = "Then élise smiles";
        let found = matcher.find(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, "elise");
        assert_eq!(&text[found[0].start..found[0].end], "élise");
    }

    #[test]
    fn test_inactive_alias_ignored() {
        let matcher = ReferenceMatcher::new(&catalog(), &AliasTable::builtin());
        assert!(matcher.find("Sparky grins").is_empty());
    }
}
