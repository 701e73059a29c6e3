mod test_utils;

use hokusai_board::{Direction, Placement, Storyboard, reindex};
use hokusai_core::{GenerationResult, ImageData, Scene, SceneKey, StoryboardSettings};
use std::collections::HashMap;

fn numbered(count: usize) -> Vec<Scene> {
    (0..count)
        .map(|i| Scene::at(i, 0, format!("Sequence {}: beat {}", i + 1, i + 1), vec![]))
        .collect()
}

fn tagged(tag: u8) -> GenerationResult {
    GenerationResult::succeeded(ImageData::new(vec![tag], "image/png"))
}

/// Board of `count` scenes where scene `i` carries an image tagged `i`.
fn board_with_results(count: usize) -> (Storyboard, Vec<SceneKey>) {
    let mut board = Storyboard::new();
    let keys = board.append(numbered(count));
    for (i, key) in keys.iter().enumerate() {
        board.set_result(*key, tagged(i as u8));
    }
    (board, keys)
}

fn results_by_key(board: &Storyboard) -> HashMap<SceneKey, GenerationResult> {
    board
        .entries()
        .filter_map(|(key, _, result)| result.map(|r| (key, r.clone())))
        .collect()
}

fn assert_labels_follow_positions(board: &Storyboard) {
    for (index, scene) in board.scenes().enumerate() {
        let start = index as u32 * 15;
        assert_eq!(scene.id, format!("{:02}", index + 1));
        assert_eq!(
            scene.time_range,
            format!(
                "{:02}:{:02} - {:02}:{:02}",
                start / 60,
                start % 60,
                (start + 15) / 60,
                (start + 15) % 60
            )
        );
    }
}

#[test]
fn test_reindex_labels_long_storyboard() {
    let scenes = reindex(numbered(9).into_iter().rev().collect());
    assert_eq!(scenes[0].id, "01");
    assert_eq!(scenes[8].id, "09");
    assert_eq!(scenes[4].time_range, "01:00 - 01:15");
    assert!(scenes[0].content.starts_with("Sequence 1: beat 9"));
}

#[test]
fn test_delete_keeps_survivor_results() {
    let (mut board, keys) = board_with_results(4);
    let before = results_by_key(&board);

    board.delete(1);

    assert_labels_follow_positions(&board);
    let after = results_by_key(&board);
    assert!(!after.contains_key(&keys[1]));
    for key in [keys[0], keys[2], keys[3]] {
        assert_eq!(after[&key], before[&key]);
    }
    assert_eq!(board.result_for("02").unwrap(), &tagged(2));
}

#[test]
fn test_move_keeps_results_with_scenes() {
    let (mut board, keys) = board_with_results(3);
    assert!(board.move_scene(2, Direction::Up));

    assert_labels_follow_positions(&board);
    assert_eq!(board.key_of("02"), Some(keys[2]));
    assert_eq!(board.result_for("02").unwrap(), &tagged(2));
    assert_eq!(board.result_for("03").unwrap(), &tagged(1));
    assert!(board.scene(keys[2]).unwrap().content.starts_with("Sequence 2:"));
}

#[test]
fn test_insert_shifts_results_and_starts_empty() {
    let (mut board, keys) = board_with_results(3);
    let inserted = board
        .insert(0, Placement::Before, &StoryboardSettings::default())
        .unwrap();

    assert_labels_follow_positions(&board);
    assert!(board.result(inserted).is_none());
    assert!(board.result_for("01").is_none());
    assert_eq!(board.key_of("02"), Some(keys[0]));
    assert_eq!(board.result_for("02").unwrap(), &tagged(0));
    assert_eq!(board.result_for("04").unwrap(), &tagged(2));
}

#[test]
fn test_mixed_edit_sequence_preserves_every_survivor() {
    let (mut board, keys) = board_with_results(5);
    let before = results_by_key(&board);

    board.move_scene(0, Direction::Down);
    board.insert(2, Placement::After, &StoryboardSettings::default());
    board.delete(4);
    board.move_scene(3, Direction::Up);

    assert_labels_follow_positions(&board);
    let after = results_by_key(&board);
    for key in keys {
        match board.position_of(key) {
            Some(_) => assert_eq!(after[&key], before[&key]),
            None => assert!(!after.contains_key(&key)),
        }
    }
}

#[test]
fn test_generation_map_round_trips_through_labels() {
    let (mut board, _) = board_with_results(3);
    board.set_result(board.key_of("02").unwrap(), GenerationResult::default());

    let map = board.generation_map();
    assert_eq!(map.len(), 2);

    let restored = Storyboard::from_parts(board.to_scenes(), &map);
    assert_eq!(restored.result_for("01").unwrap(), &tagged(0));
    assert!(restored.result_for("02").is_none());
    assert_eq!(restored.result_for("03").unwrap(), &tagged(2));
}

#[test]
fn test_pending_results_keep_last_image() {
    let (mut board, keys) = board_with_results(1);
    board.begin(keys[0]);
    let pending = board.result(keys[0]).unwrap();
    assert!(pending.is_pending);
    assert_eq!(pending.image.as_ref(), Some(&ImageData::new(vec![0], "image/png")));

    board.fail(keys[0], "boom");
    let failed = board.result(keys[0]).unwrap();
    assert!(!failed.is_pending);
    assert_eq!(failed.error_message.as_deref(), Some("boom"));
    assert!(failed.image.is_some());
}
