use hokusai_core::{
    GenerationResult, ImageData, Preset, Project, ReferenceCategory, ReferenceEntry, Scene,
    SceneStatus, StoryboardSettings, StyleMode,
};
use serde_json::json;

#[test]
fn reference_entry_uses_type_field_on_the_wire() {
    let entry = ReferenceEntry::location("loccity", "South City", "Neon streets.")
        .with_image(ImageData::new(b"png".to_vec(), "image/png"));

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["type"], "location");
    assert_eq!(value["image"]["data"], "cG5n");
    assert!(value.get("voice").is_none());

    let back: ReferenceEntry = serde_json::from_value(value).unwrap();
    assert_eq!(back.category, ReferenceCategory::Location);
    assert_eq!(back.image.unwrap().data, b"png".to_vec());
}

#[test]
fn scene_labels_follow_position_and_offset() {
    let first = Scene::at(0, 0, "Sequence 1: Start", vec![]);
    assert_eq!(first.id, "01");
    assert_eq!(first.time_range, "00:00 - 00:15");

    let appended = Scene::at(1, 45, "Sequence 5: Later", vec![]);
    assert_eq!(appended.id, "02");
    assert_eq!(appended.time_range, "01:00 - 01:15");
    assert_eq!(appended.ordinal(), Some(2));
}

#[test]
fn generation_result_transitions_are_whole_values() {
    let idle = GenerationResult::default();
    assert_eq!(idle.status(), SceneStatus::Idle);

    let pending = idle.begin();
    assert_eq!(idle.status(), SceneStatus::Idle);
    assert_eq!(pending.status(), SceneStatus::Pending);

    let failed = pending.fail("Service busy or rate limited. Waiting...");
    assert_eq!(failed.status(), SceneStatus::Failed);

    let retry = failed.begin();
    assert!(retry.error_message.is_none());

    let done = GenerationResult::succeeded(ImageData::new(vec![7], "image/png"));
    assert_eq!(done.status(), SceneStatus::Succeeded);
    assert_eq!(done.begin().settle(), done);
}

#[test]
fn generation_result_reads_sparse_json() {
    let result: GenerationResult = serde_json::from_value(json!({ "isPending": true })).unwrap();
    assert!(result.is_pending);
    assert!(result.image.is_none());
}

#[test]
fn preset_documents_round_trip_with_camel_case() {
    let catalog = Project::starter_catalog().unwrap();
    let preset = Preset::snapshot("p1", "Default Cast", &catalog, chrono::Utc::now());

    let value = serde_json::to_value(&preset).unwrap();
    assert!(value.get("createdAt").is_some());
    assert!(value["characters"]["auraayo"].is_object());

    let back: Preset = serde_json::from_value(value).unwrap();
    assert_eq!(back, preset);
}

#[test]
fn starter_project_carries_cast_and_lore() {
    let project = Project::starter().unwrap();
    assert_eq!(project.catalog.characters().len(), 7);
    assert_eq!(project.catalog.locations().len(), 3);
    assert!(project.lore.starts_with("WORLD SETTING"));
    assert_eq!(project.settings, StoryboardSettings::default());
    assert_eq!(project.settings.style, StyleMode::Anime);
}

#[test]
fn style_cycles_through_all_modes() {
    let style = StyleMode::default();
    assert_eq!(style.cycle(), StyleMode::Aaa);
    assert_eq!(style.cycle().cycle(), StyleMode::Pixar);
    assert_eq!(style.cycle().cycle().cycle(), StyleMode::Anime);
    assert_eq!(StyleMode::Aaa.to_string(), "aaa");
}
