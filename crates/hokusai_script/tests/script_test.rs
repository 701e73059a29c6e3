use hokusai_core::{Project, ReferenceCatalog, ReferenceEntry, StyleMode};
use hokusai_script::{
    AliasTable, NO_MUSIC_TAG, compile, inject_style, resolve_mentioned_ids,
    rewrite_sequence_heading, sanitize, segment, toggle_no_music,
};

fn duel_catalog() -> ReferenceCatalog {
    let mut catalog = ReferenceCatalog::new();
    catalog
        .add(ReferenceEntry::character("auraayo", "Ayo", "Young man with red skin"))
        .unwrap();
    catalog
        .add(ReferenceEntry::character("rayneaura", "Rayne", "Silver hair"))
        .unwrap();
    catalog
}

#[test]
fn test_resolves_names_and_handles_in_mention_order() {
    let mut aliases = AliasTable::empty();
    aliases.insert("ayo", "auraayo").unwrap();

    let ids = resolve_mentioned_ids("Ayo fights @rayneaura", &duel_catalog(), &aliases);
    assert_eq!(ids, vec!["auraayo", "rayneaura"]);
}

#[test]
fn test_resolver_deduplicates_repeat_mentions() {
    let ids = resolve_mentioned_ids(
        "@rayneaura blocks. Ayo strikes. Rayne counters. ayo falls.",
        &duel_catalog(),
        &AliasTable::builtin(),
    );
    assert_eq!(ids, vec!["rayneaura", "auraayo"]);
}

#[test]
fn test_resolver_on_starter_catalog_uses_aliases() {
    let catalog = Project::starter_catalog().unwrap();
    let ids = resolve_mentioned_ids(
        "Sparky zaps Gnat while Iron watches",
        &catalog,
        &AliasTable::builtin(),
    );
    assert_eq!(ids, vec!["aurakinetic", "auragnat", "jaxiron"]);
}

#[test]
fn test_segments_two_sequences_with_timeline() {
    let raw = "Sequence 1: A\nPrompt: ...\nSequence 2: B\nPrompt: ...";
    let scenes = segment(raw, &duel_catalog(), &AliasTable::builtin(), 0, 0);

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].id, "01");
    assert_eq!(scenes[1].id, "02");
    assert_eq!(scenes[0].time_range, "00:00 - 00:15");
    assert_eq!(scenes[1].time_range, "00:15 - 00:30");
    assert!(scenes[0].content.starts_with("Sequence 1: A"));
}

#[test]
fn test_segmented_scenes_carry_references() {
    let raw = "Sequence 1: Ayo trains alone at dawn.\nSequence 2: @rayneaura arrives with a warning.";
    let scenes = segment(raw, &duel_catalog(), &AliasTable::builtin(), 0, 0);
    assert_eq!(scenes[0].referenced_ids, vec!["auraayo"]);
    assert_eq!(scenes[1].referenced_ids, vec!["rayneaura"]);
}

#[test]
fn test_windows_line_endings_segment_like_unix() {
    let paragraphs = "Ayo trains under the waterfall at dawn.\r\n\r\nRayne watches from the cliffs above.";
    let scenes = segment(paragraphs, &duel_catalog(), &AliasTable::builtin(), 0, 0);
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].content, "Ayo trains under the waterfall at dawn.");
    assert_eq!(scenes[1].referenced_ids, vec!["rayneaura"]);

    let marked = "Sequence 1: Ayo trains at dawn.\r\nPrompt: waterfall\r\nSequence 2: Rayne arrives at the gate.";
    let scenes = segment(marked, &duel_catalog(), &AliasTable::builtin(), 0, 0);
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].content, "Sequence 1: Ayo trains at dawn.\nPrompt: waterfall");
    assert!(scenes.iter().all(|scene| !scene.content.contains('\r')));
}

#[test]
fn test_style_injection_never_doubles_prefix() {
    let catalog = duel_catalog();
    let ids = vec!["auraayo".to_string()];
    let aliases = AliasTable::builtin();

    for style in [StyleMode::Anime, StyleMode::Aaa, StyleMode::Pixar] {
        let once = compile("Ayo powers up", &ids, &catalog, &aliases, style);
        let again = compile(&inject_style(&once, style), &ids, &catalog, &aliases, style);
        assert_eq!(once, again);
        assert_eq!(once.matches(style.prefix()).count(), 1);
    }
}

#[test]
fn test_no_music_toggle_never_accumulates() {
    let base = "Sequence 1: Ayo rests by the fire";
    let on = toggle_no_music(&toggle_no_music(base, true), true);
    assert_eq!(on.matches(NO_MUSIC_TAG.trim()).count(), 1);

    let off = toggle_no_music(&on, false);
    assert_eq!(off, base);
    assert_eq!(toggle_no_music(&off, false), base);
}

#[test]
fn test_sanitize_replaces_outside_and_strips_inside_quotes() {
    let outside = sanitize("Ayo smash the wall");
    assert_eq!(outside, "Ayo defeat the wall");

    let inside = sanitize("Ayo shouts \"smash it\" at the wall");
    assert!(!inside.contains("smash"));
    assert!(!inside.contains("defeat"));
    assert!(inside.contains("at the wall"));
}

#[test]
fn test_heading_rewrite_handles_style_prefix_case() {
    let content = "add shonen anime, 4k, sequence 9: Night raid";
    assert_eq!(
        rewrite_sequence_heading(content, 1),
        "add shonen anime, 4k, Sequence 1: Night raid"
    );
}
