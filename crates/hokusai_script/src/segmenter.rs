//! Splitting raw script text into timed scenes.

use crate::{AliasTable, ReferenceResolver};
use hokusai_core::{ReferenceCatalog, SCENE_DURATION_SECS, Scene, scene_label, time_range_label};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Chunks this short or shorter are dropped as noise.
const MIN_CHUNK_CHARS: usize = 20;

fn heading_marker() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Sequence \d+:|Title:|Scene \d+:").expect("scene marker pattern should compile")
    })
}

/// Split raw script text into scenes.
///
/// Windows line endings are normalized first. Text is cut before every
/// `Sequence N:`, `Title:` and `Scene N:` marker. Scripts without any marker
/// are split on blank lines instead. Chunks are trimmed and kept only when
/// longer than 20 characters.
///
/// Scene `i` of the result is labelled with ordinal `start_ordinal + i + 1`
/// and starts `start_time_secs + 15 * i` seconds in. References are resolved
/// against `catalog` for every scene.
///
/// # Examples
///
/// ```
/// use hokusai_core::ReferenceCatalog;
/// use hokusai_script::{AliasTable, segment};
///
/// let raw = "Sequence 1: Ayo wakes up in the dojo.\nSequence 2: Rayne arrives at the gate.";
/// let scenes = segment(raw, &ReferenceCatalog::new(), &AliasTable::builtin(), 0, 0);
/// assert_eq!(scenes.len(), 2);
/// assert_eq!(scenes[1].id, "02");
/// assert_eq!(scenes[1].time_range, "00:15 - 00:30");
///
/// assert!(segment("short", &ReferenceCatalog::new(), &AliasTable::builtin(), 0, 0).is_empty());
/// ```
#[instrument(skip(raw_text, catalog, aliases), fields(chars = raw_text.len()))]
pub fn segment(
    raw_text: &str,
    catalog: &ReferenceCatalog,
    aliases: &AliasTable,
    start_ordinal: usize,
    start_time_secs: u32,
) -> Vec<Scene> {
    let resolver = ReferenceResolver::new(catalog, aliases);
    let normalized = raw_text.replace("\r\n", "\n");
    let chunks = split_chunks(&normalized);
    debug!(count = chunks.len(), "Segmented script");

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let start = start_time_secs + index as u32 * SCENE_DURATION_SECS;
            Scene {
                id: scene_label(start_ordinal + index + 1),
                time_range: time_range_label(start),
                referenced_ids: resolver.resolve(chunk),
                content: chunk.to_string(),
            }
        })
        .collect()
}

fn split_chunks(raw_text: &str) -> Vec<&str> {
    let marker = heading_marker();
    let pieces: Vec<&str> = if marker.is_match(raw_text) {
        let mut cuts: Vec<usize> = marker.find_iter(raw_text).map(|m| m.start()).collect();
        if cuts.first() != Some(&0) {
            cuts.insert(0, 0);
        }
        cuts.push(raw_text.len());
        cuts.windows(2)
            .map(|bounds| &raw_text[bounds[0]..bounds[1]])
            .collect()
    } else {
        raw_text.split("\n\n").collect()
    };

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|chunk| chunk.chars().count() > MIN_CHUNK_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_kept_when_long_enough() {
        let raw = "An epic tale of aura and fists.\nSequence 1: Ayo wakes in the dojo.";
        assert_eq!(split_chunks(raw).len(), 2);
    }

    #[test]
    fn test_markers_split_mid_line() {
        let raw = "Title: The Aura Tournament Begins Scene 2: The crowd roars loudly";
        let chunks = split_chunks(raw);
        assert_eq!(
            chunks,
            vec!["Title: The Aura Tournament Begins", "Scene 2: The crowd roars loudly"]
        );
    }

    #[test]
    fn test_paragraph_fallback() {
        let raw = "Ayo trains under the waterfall.\n\nRayne watches from the cliffs.\n\nok";
        let chunks = split_chunks(raw);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "Rayne watches from the cliffs.");
    }

    #[test]
    fn test_offsets_continue_timeline() {
        let raw = "Sequence 5: Ayo and Rayne clash again.";
        let scenes = segment(raw, &ReferenceCatalog::new(), &AliasTable::builtin(), 4, 60);
        assert_eq!(scenes[0].id, "05");
        assert_eq!(scenes[0].time_range, "01:00 - 01:15");
    }
}
