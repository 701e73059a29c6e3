//! Prompt compilation: style prefix injection and reference substitution.

use crate::AliasTable;
use crate::matcher::ReferenceMatcher;
use hokusai_core::{ReferenceCatalog, ReferenceEntry, StyleMode};
use strum::IntoEnumIterator;

/// Audio directive appended when music is disabled.
pub const NO_MUSIC_TAG: &str = " [AUDIO: NO MUSIC, SFX ONLY]";

/// Template used for newly inserted scenes before compilation.
pub const PLACEHOLDER_SCRIPT: &str = "Sequence X: [New Scene]\nPrompt: ADD SHONEN ANIME, 4K, [Describe scene here]\nChronological Flow:\n(Action) ...";

/// Inline description substituted for a reference.
///
/// Characters carry an extra clause pointing the model at the attached outfit.
///
/// # Examples
///
/// ```
/// use hokusai_core::ReferenceEntry;
/// use hokusai_script::descriptor;
///
/// let ayo = ReferenceEntry::character("auraayo", "Ayo", "Red skin");
/// assert_eq!(
///     descriptor(&ayo),
///     "(Ayo: Red skin, wearing the outfit shown in reference image)"
/// );
///
/// let dojo = ReferenceEntry::location("dojo", "Old Dojo", "Wooden floors");
/// assert_eq!(descriptor(&dojo), "(Old Dojo: Wooden floors)");
/// ```
pub fn descriptor(entry: &ReferenceEntry) -> String {
    if entry.is_character() {
        format!(
            "({}: {}, wearing the outfit shown in reference image)",
            entry.name, entry.description
        )
    } else {
        format!("({}: {})", entry.name, entry.description)
    }
}

/// Replace any style prefix in `text` with the prefix for `style`.
///
/// Every known prefix is removed wherever it occurs, leading separators are
/// trimmed, and the requested prefix is prepended. Applying it twice gives
/// the same result as applying it once.
///
/// # Examples
///
/// ```
/// use hokusai_core::StyleMode;
/// use hokusai_script::inject_style;
///
/// let anime = inject_style("Ayo runs", StyleMode::Anime);
/// assert_eq!(anime, "ADD SHONEN ANIME, 4K, Ayo runs");
///
/// let pixar = inject_style(&anime, StyleMode::Pixar);
/// assert!(pixar.starts_with("PIXAR STYLE"));
/// assert!(!pixar.contains("SHONEN"));
/// assert_eq!(inject_style(&pixar, StyleMode::Pixar), pixar);
/// ```
pub fn inject_style(text: &str, style: StyleMode) -> String {
    let mut body = text.to_string();
    loop {
        let before = body.clone();
        for known in StyleMode::iter() {
            let full = known.prefix();
            let trimmed = full.trim_end();
            body = body.replace(full, "").replace(trimmed, "");
        }
        if body == before {
            break;
        }
    }
    let body = body.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    format!("{}{}", style.prefix(), body)
}

/// Add or remove the no-music directive.
///
/// Any existing directive is removed and the text trimmed before the tag is
/// appended, so toggling on twice leaves exactly one tag.
///
/// # Examples
///
/// ```
/// use hokusai_script::{NO_MUSIC_TAG, toggle_no_music};
///
/// let on = toggle_no_music("Ayo runs ", true);
/// assert_eq!(on, format!("Ayo runs{NO_MUSIC_TAG}"));
/// assert_eq!(toggle_no_music(&on, true), on);
/// assert_eq!(toggle_no_music(&on, false), "Ayo runs");
/// ```
pub fn toggle_no_music(text: &str, enabled: bool) -> String {
    let cleaned = text
        .replace(NO_MUSIC_TAG, "")
        .replace(NO_MUSIC_TAG.trim_start(), "");
    let cleaned = cleaned.trim();
    if enabled {
        format!("{cleaned}{NO_MUSIC_TAG}")
    } else {
        cleaned.to_string()
    }
}

/// Compile scene content into a render prompt.
///
/// The style prefix is injected, then every mention of an entry listed in
/// `referenced_ids` is replaced by its [`descriptor`]. Handles are always
/// replaced. Names and aliases are left alone when written as a label
/// (`@Ayo`, `Ayo:`). Matches never overlap and existing descriptors are not
/// touched, so compiling compiled output changes nothing.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ReferenceCatalog, ReferenceEntry, StyleMode};
/// use hokusai_script::{AliasTable, compile};
///
/// let mut catalog = ReferenceCatalog::new();
/// catalog.add(ReferenceEntry::character("auraayo", "Ayo", "Red skin")).unwrap();
///
/// let ids = vec!["auraayo".to_string()];
/// let prompt = compile("@auraayo punches", &ids, &catalog, &AliasTable::builtin(), StyleMode::Anime);
/// assert_eq!(
///     prompt,
///     "ADD SHONEN ANIME, 4K, (Ayo: Red skin, wearing the outfit shown in reference image) punches"
/// );
/// ```
pub fn compile(
    content: &str,
    referenced_ids: &[String],
    catalog: &ReferenceCatalog,
    aliases: &AliasTable,
    style: StyleMode,
) -> String {
    let styled = inject_style(content, style);
    let entries: Vec<&ReferenceEntry> = referenced_ids
        .iter()
        .filter_map(|id| catalog.get(id))
        .collect();
    if entries.is_empty() {
        return styled;
    }

    let protected = protected_spans(&styled, &entries);
    let matcher = ReferenceMatcher::new(catalog, aliases);

    let mut out = String::with_capacity(styled.len());
    let mut cursor = 0;
    // End of the last label; shorter terms inside it stay untouched.
    let mut guarded_until = 0;
    for mention in matcher.find(&styled) {
        if mention.start < cursor.max(guarded_until)
            || overlaps(&protected, mention.start, mention.end)
        {
            continue;
        }
        if mention.is_guarded(&styled) {
            guarded_until = guarded_until.max(mention.end);
            continue;
        }
        let Some(entry) = entries.iter().find(|e| e.id == mention.handle) else {
            continue;
        };
        out.push_str(&styled[cursor..mention.start]);
        out.push_str(&descriptor(entry));
        cursor = mention.end;
    }
    out.push_str(&styled[cursor..]);
    out
}

/// Compiled content for a freshly inserted scene.
pub fn placeholder_content(style: StyleMode, no_music: bool) -> String {
    toggle_no_music(&inject_style(PLACEHOLDER_SCRIPT, style), no_music)
}

fn protected_spans(text: &str, entries: &[&ReferenceEntry]) -> Vec<(usize, usize)> {
    entries
        .iter()
        .flat_map(|entry| {
            let inline = descriptor(entry);
            text.match_indices(inline.as_str())
                .map(|(start, found)| (start, start + found.len()))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn overlaps(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| start < e && s < end)
}
