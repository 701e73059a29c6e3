//! Ordered scenes with generation results bound to stable keys.

use hokusai_core::{
    GenerationResult, SCENE_DURATION_SECS, Scene, SceneKey, StoryboardSettings, scene_label,
    time_range_label,
};
use hokusai_script::{
    ReferenceResolver, placeholder_content, rewrite_sequence_heading, toggle_no_music,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Direction for [`Storyboard::move_scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    /// Towards the start
    Up,
    /// Towards the end
    Down,
}

/// Side of the anchor scene for [`Storyboard::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Placement {
    /// Insert at the anchor's position
    Before,
    /// Insert right after the anchor
    After,
}

/// Recompute positional ids, time ranges and `Sequence N:` headings.
///
/// # Examples
///
/// ```
/// use hokusai_board::reindex;
/// use hokusai_core::Scene;
///
/// let scenes = vec![
///     Scene::at(4, 0, "Sequence 5: Ayo wakes", vec![]),
///     Scene::at(0, 0, "Sequence 1: Rayne waits", vec![]),
/// ];
/// let scenes = reindex(scenes);
/// assert_eq!(scenes[0].id, "01");
/// assert_eq!(scenes[0].content, "Sequence 1: Ayo wakes");
/// assert_eq!(scenes[1].time_range, "00:15 - 00:30");
/// ```
pub fn reindex(mut scenes: Vec<Scene>) -> Vec<Scene> {
    for (index, scene) in scenes.iter_mut().enumerate() {
        relabel(scene, index);
    }
    scenes
}

fn relabel(scene: &mut Scene, index: usize) {
    scene.id = scene_label(index + 1);
    scene.time_range = time_range_label(index as u32 * SCENE_DURATION_SECS);
    scene.content = rewrite_sequence_heading(&scene.content, index + 1);
}

#[derive(Debug, Clone, PartialEq)]
struct SceneSlot {
    key: SceneKey,
    scene: Scene,
}

/// The ordered scene list and each scene's generation result.
///
/// Results are keyed by [`SceneKey`], which never changes once issued. Every
/// structural edit reindexes positional labels, and a scene's result follows
/// it wherever it moves without any remapping. Results of deleted scenes are
/// dropped; inserted scenes start without one.
///
/// # Examples
///
/// ```
/// use hokusai_board::{Direction, Storyboard};
/// use hokusai_core::{GenerationResult, ImageData, Scene};
///
/// let mut board = Storyboard::new();
/// let keys = board.append(vec![
///     Scene::at(0, 0, "Sequence 1: Ayo trains", vec![]),
///     Scene::at(1, 0, "Sequence 2: Rayne arrives", vec![]),
/// ]);
/// board.set_result(keys[1], GenerationResult::succeeded(ImageData::new(vec![1], "image/png")));
///
/// board.move_scene(1, Direction::Up);
/// assert_eq!(board.key_of("01"), Some(keys[1]));
/// assert!(board.result_for("01").unwrap().image.is_some());
/// assert!(board.result_for("02").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Storyboard {
    slots: Vec<SceneSlot>,
    results: HashMap<SceneKey, GenerationResult>,
    next_key: SceneKey,
}

impl Default for Storyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Storyboard {
    /// An empty storyboard.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            results: HashMap::new(),
            next_key: SceneKey::new(1),
        }
    }

    /// Rebuild from persisted scenes and their label-keyed results.
    ///
    /// Results left pending by an interrupted run are settled.
    pub fn from_parts(
        scenes: Vec<Scene>,
        generations: &BTreeMap<String, GenerationResult>,
    ) -> Self {
        let mut board = Self::new();
        for scene in scenes {
            let key = board.issue_key();
            if let Some(result) = generations.get(&scene.id) {
                board.results.insert(key, result.settle());
            }
            board.slots.push(SceneSlot { key, scene });
        }
        board
    }

    /// Scenes in order, cloned.
    pub fn to_scenes(&self) -> Vec<Scene> {
        self.slots.iter().map(|slot| slot.scene.clone()).collect()
    }

    /// Results keyed by current positional id, the flat format used at rest.
    pub fn generation_map(&self) -> BTreeMap<String, GenerationResult> {
        self.slots
            .iter()
            .filter_map(|slot| {
                self.results
                    .get(&slot.key)
                    .filter(|result| **result != GenerationResult::default())
                    .map(|result| (slot.scene.id.clone(), result.clone()))
            })
            .collect()
    }

    fn issue_key(&mut self) -> SceneKey {
        let key = self.next_key;
        self.next_key = key.next();
        key
    }

    fn reindex_slots(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            relabel(&mut slot.scene, index);
        }
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no scenes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Scenes in order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.slots.iter().map(|slot| &slot.scene)
    }

    /// Keys in scene order.
    pub fn keys(&self) -> Vec<SceneKey> {
        self.slots.iter().map(|slot| slot.key).collect()
    }

    /// Scenes with their keys and results, in order.
    pub fn entries(&self) -> impl Iterator<Item = (SceneKey, &Scene, Option<&GenerationResult>)> {
        self.slots
            .iter()
            .map(|slot| (slot.key, &slot.scene, self.results.get(&slot.key)))
    }

    /// The last scene.
    pub fn last(&self) -> Option<&Scene> {
        self.slots.last().map(|slot| &slot.scene)
    }

    /// Key of the scene currently labelled `id`.
    ///
    /// Unpadded numbers are accepted, so `"3"` finds scene `"03"`.
    pub fn key_of(&self, id: &str) -> Option<SceneKey> {
        let id = id.trim();
        let label = id
            .parse::<usize>()
            .map(scene_label)
            .unwrap_or_else(|_| id.to_string());
        self.slots
            .iter()
            .find(|slot| slot.scene.id == id || slot.scene.id == label)
            .map(|slot| slot.key)
    }

    /// Current position of a key.
    pub fn position_of(&self, key: SceneKey) -> Option<usize> {
        self.slots.iter().position(|slot| slot.key == key)
    }

    /// Scene for a key.
    pub fn scene(&self, key: SceneKey) -> Option<&Scene> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| &slot.scene)
    }

    fn scene_mut(&mut self, key: SceneKey) -> Option<&mut Scene> {
        self.slots
            .iter_mut()
            .find(|slot| slot.key == key)
            .map(|slot| &mut slot.scene)
    }

    /// Result for a key, if one was ever recorded.
    pub fn result(&self, key: SceneKey) -> Option<&GenerationResult> {
        self.results.get(&key)
    }

    /// Result for the scene currently labelled `id`.
    pub fn result_for(&self, id: &str) -> Option<&GenerationResult> {
        self.key_of(id).and_then(|key| self.result(key))
    }

    /// Replace a scene's result whole.
    ///
    /// Returns false, storing nothing, if the scene no longer exists.
    pub fn set_result(&mut self, key: SceneKey, result: GenerationResult) -> bool {
        if self.position_of(key).is_none() {
            return false;
        }
        self.results.insert(key, result);
        true
    }

    /// Mark a scene's result pending, keeping its last image.
    pub fn begin(&mut self, key: SceneKey) -> bool {
        let current = self.results.get(&key).cloned().unwrap_or_default();
        self.set_result(key, current.begin())
    }

    /// Record a failure on a scene, keeping its last image.
    pub fn fail(&mut self, key: SceneKey, message: impl Into<String>) -> bool {
        let current = self.results.get(&key).cloned().unwrap_or_default();
        self.set_result(key, current.fail(message))
    }

    /// Clear a scene's pending flag.
    pub fn settle(&mut self, key: SceneKey) -> bool {
        match self.results.get(&key) {
            Some(current) => {
                let settled = current.settle();
                self.set_result(key, settled)
            }
            None => false,
        }
    }

    /// Remove the scene at `index` and drop its result.
    ///
    /// Out of range is a no-op returning `None`.
    #[instrument(skip(self), fields(len = self.slots.len()))]
    pub fn delete(&mut self, index: usize) -> Option<Scene> {
        if index >= self.slots.len() {
            return None;
        }
        let slot = self.slots.remove(index);
        self.results.remove(&slot.key);
        self.reindex_slots();
        debug!(key = %slot.key, "Deleted scene");
        Some(slot.scene)
    }

    /// Swap the scene at `index` with its neighbour.
    ///
    /// Moving the first scene up or the last scene down is a no-op returning
    /// false.
    #[instrument(skip(self), fields(len = self.slots.len()))]
    pub fn move_scene(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.slots.len() && target < self.slots.len() => {
                self.slots.swap(index, target);
                self.reindex_slots();
                true
            }
            _ => false,
        }
    }

    /// Insert a placeholder scene next to the scene at `index`.
    ///
    /// The placeholder is compiled with the current style and no-music
    /// setting. An index past the end is a no-op returning `None`.
    #[instrument(skip(self, settings), fields(len = self.slots.len()))]
    pub fn insert(
        &mut self,
        index: usize,
        placement: Placement,
        settings: &StoryboardSettings,
    ) -> Option<SceneKey> {
        if index >= self.slots.len() {
            return None;
        }
        let position = match placement {
            Placement::Before => index,
            Placement::After => index + 1,
        };
        let key = self.issue_key();
        let scene = Scene {
            id: String::new(),
            time_range: String::new(),
            referenced_ids: Vec::new(),
            content: placeholder_content(settings.style, settings.no_music),
        };
        self.slots.insert(position, SceneSlot { key, scene });
        self.reindex_slots();
        debug!(%key, position, "Inserted placeholder scene");
        Some(key)
    }

    /// Append scenes at the end, keeping existing results.
    pub fn append(&mut self, scenes: Vec<Scene>) -> Vec<SceneKey> {
        let keys = scenes
            .into_iter()
            .map(|scene| {
                let key = self.issue_key();
                self.slots.push(SceneSlot { key, scene });
                key
            })
            .collect();
        self.reindex_slots();
        keys
    }

    /// Replace every scene and drop every result.
    pub fn replace_all(&mut self, scenes: Vec<Scene>) -> Vec<SceneKey> {
        self.slots.clear();
        self.results.clear();
        self.append(scenes)
    }

    /// Overwrite a scene's content.
    pub fn update_content(&mut self, key: SceneKey, content: impl Into<String>) -> bool {
        match self.scene_mut(key) {
            Some(scene) => {
                scene.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Replace a scene's advisory reference list.
    pub fn set_referenced_ids(&mut self, key: SceneKey, ids: Vec<String>) -> bool {
        match self.scene_mut(key) {
            Some(scene) => {
                scene.referenced_ids = ids;
                true
            }
            None => false,
        }
    }

    /// Re-resolve references for every scene.
    pub fn rescan_references(&mut self, resolver: &ReferenceResolver) {
        for slot in &mut self.slots {
            slot.scene.referenced_ids = resolver.resolve(&slot.scene.content);
        }
    }

    /// Add or remove the no-music tag on every scene.
    pub fn apply_no_music(&mut self, enabled: bool) {
        for slot in &mut self.slots {
            slot.scene.content = toggle_no_music(&slot.scene.content, enabled);
        }
    }

    /// Remove every scene and result.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_of(count: usize) -> (Storyboard, Vec<SceneKey>) {
        let scenes = (0..count)
            .map(|i| Scene::at(i, 0, format!("Sequence {}: beat {}", i + 1, i + 1), vec![]))
            .collect();
        let mut board = Storyboard::new();
        let keys = board.append(scenes);
        (board, keys)
    }

    #[test]
    fn test_move_out_of_bounds_is_noop() {
        let (mut board, _) = board_of(2);
        let before = board.clone();
        assert!(!board.move_scene(0, Direction::Up));
        assert!(!board.move_scene(1, Direction::Down));
        assert!(!board.move_scene(7, Direction::Up));
        assert_eq!(board, before);
    }

    #[test]
    fn test_delete_out_of_bounds_is_noop() {
        let (mut board, _) = board_of(2);
        assert!(board.delete(2).is_none());
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_insert_after_last() {
        let (mut board, _) = board_of(2);
        let key = board
            .insert(1, Placement::After, &StoryboardSettings::default())
            .unwrap();
        assert_eq!(board.position_of(key), Some(2));
        let scene = board.scene(key).unwrap();
        assert_eq!(scene.id, "03");
        assert!(scene.content.contains("Sequence 3: [New Scene]"));
        assert!(board.result(key).is_none());
        assert!(board.insert(3, Placement::Before, &StoryboardSettings::default()).is_none());
    }

    #[test]
    fn test_key_lookup_accepts_unpadded() {
        let (board, keys) = board_of(3);
        assert_eq!(board.key_of("3"), Some(keys[2]));
        assert_eq!(board.key_of("03"), Some(keys[2]));
        assert_eq!(board.key_of("04"), None);
    }

    #[test]
    fn test_from_parts_settles_pending() {
        let scenes = vec![Scene::at(0, 0, "Sequence 1: beat", vec![])];
        let mut generations = BTreeMap::new();
        generations.insert("01".to_string(), GenerationResult::default().begin());
        let board = Storyboard::from_parts(scenes, &generations);
        assert!(!board.result_for("01").unwrap().is_pending);
    }

    #[test]
    fn test_set_result_after_delete_is_ignored() {
        let (mut board, keys) = board_of(2);
        board.delete(0);
        assert!(!board.set_result(keys[0], GenerationResult::default().fail("late")));
        assert!(board.result(keys[0]).is_none());
    }
}
