//! Sequence heading renumbering.

use hokusai_core::StyleMode;
use regex::Regex;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let prefixes = StyleMode::iter()
            .map(|style| regex::escape(style.prefix().trim_end()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)\A(\s*(?:(?:{prefixes})\s*)?)Sequence\s+(?:\d+|X)\s*:");
        Regex::new(&pattern).expect("sequence heading pattern should compile")
    })
}

/// Renumber a leading `Sequence N:` heading to `ordinal` (1-based).
///
/// The heading may follow a style prefix and may carry the `X` placeholder.
/// Content without a leading heading is returned unchanged.
///
/// # Examples
///
/// ```
/// use hokusai_script::rewrite_sequence_heading;
///
/// assert_eq!(rewrite_sequence_heading("Sequence 4: Duel", 2), "Sequence 2: Duel");
/// assert_eq!(
///     rewrite_sequence_heading("ADD SHONEN ANIME, 4K, Sequence X: [New Scene]", 3),
///     "ADD SHONEN ANIME, 4K, Sequence 3: [New Scene]"
/// );
/// assert_eq!(rewrite_sequence_heading("Title: Aura", 1), "Title: Aura");
/// ```
pub fn rewrite_sequence_heading(content: &str, ordinal: usize) -> String {
    let replacement = format!("${{1}}Sequence {ordinal}:");
    heading_pattern()
        .replacen(content, 1, replacement.as_str())
        .into_owned()
}
