//! The live project shared by the scheduler, batch driver and assistant.

use crate::{PresetLibrary, Storyboard};
use hokusai_core::{
    Project, ReferenceCatalog, ReferenceEntry, RenderRequest, SCENE_DURATION_SECS, SceneKey,
    StoryboardSettings, StyleMode,
};
use hokusai_script::{AliasTable, ReferenceResolver, compile, sanitize, segment, toggle_no_music};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

/// Workspace behind the lock every async component shares.
pub type SharedWorkspace = Arc<RwLock<Workspace>>;

/// How imported script text joins the storyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImportMode {
    /// Add after the existing scenes, continuing the timeline
    Append,
    /// Discard existing scenes and results
    Replace,
}

/// Everything being edited in one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    /// Scenes and generation results
    pub storyboard: Storyboard,
    /// Characters and locations
    pub catalog: ReferenceCatalog,
    /// Saved catalog snapshots
    pub presets: PresetLibrary,
    /// World lore for drafting
    pub lore: String,
    /// Style, no-music and voice-tag toggles
    pub settings: StoryboardSettings,
}

impl Workspace {
    /// Open a persisted project.
    pub fn from_project(project: Project) -> Self {
        Self {
            storyboard: Storyboard::from_parts(project.scenes, &project.generations),
            catalog: project.catalog,
            presets: PresetLibrary::new(project.presets),
            lore: project.lore,
            settings: project.settings,
        }
    }

    /// Snapshot for persistence.
    pub fn to_project(&self) -> Project {
        Project {
            catalog: self.catalog.clone(),
            scenes: self.storyboard.to_scenes(),
            generations: self.storyboard.generation_map(),
            lore: self.lore.clone(),
            presets: self.presets.presets().to_vec(),
            settings: self.settings,
        }
    }

    /// Wrap for sharing across tasks.
    pub fn into_shared(self) -> SharedWorkspace {
        Arc::new(RwLock::new(self))
    }

    /// Segment script text into scenes and add them to the storyboard.
    ///
    /// Appended scenes continue from the last scene's ordinal and the end of
    /// the timeline. The no-music setting is applied to every new scene. When
    /// nothing is detected the storyboard is left untouched, even in
    /// [`ImportMode::Replace`].
    #[instrument(skip(self, raw_text, aliases), fields(chars = raw_text.len()))]
    pub fn import_script(
        &mut self,
        raw_text: &str,
        mode: ImportMode,
        aliases: &AliasTable,
    ) -> Vec<SceneKey> {
        let (start_ordinal, start_time) = match mode {
            ImportMode::Append => (
                self.storyboard
                    .last()
                    .and_then(|scene| scene.ordinal())
                    .unwrap_or(0),
                self.storyboard.len() as u32 * SCENE_DURATION_SECS,
            ),
            ImportMode::Replace => (0, 0),
        };
        let mut scenes = segment(raw_text, &self.catalog, aliases, start_ordinal, start_time);
        if scenes.is_empty() {
            warn!("No scenes detected");
            return Vec::new();
        }
        for scene in &mut scenes {
            scene.content = toggle_no_music(&scene.content, self.settings.no_music);
        }

        let keys = match mode {
            ImportMode::Append => self.storyboard.append(scenes),
            ImportMode::Replace => self.storyboard.replace_all(scenes),
        };
        info!(count = keys.len(), %mode, "Imported scenes");
        keys
    }

    /// Switch the style used for new placeholders and renders.
    pub fn set_style(&mut self, style: StyleMode) {
        self.settings.style = style;
    }

    /// Toggle the no-music tag on every scene and for future scenes.
    pub fn set_no_music(&mut self, enabled: bool) {
        self.settings.no_music = enabled;
        self.storyboard.apply_no_music(enabled);
    }

    /// Toggle voice descriptions in drafted dialogue.
    pub fn set_voice_tags(&mut self, enabled: bool) {
        self.settings.voice_tags = enabled;
    }

    /// Re-resolve every scene's references against the current catalog.
    pub fn rescan_references(&mut self, aliases: &AliasTable) {
        let resolver = ReferenceResolver::new(&self.catalog, aliases);
        self.storyboard.rescan_references(&resolver);
    }

    /// Remove a catalog entry and rescan scene references.
    pub fn remove_reference(
        &mut self,
        handle: &str,
        aliases: &AliasTable,
    ) -> Option<ReferenceEntry> {
        let removed = self.catalog.remove(handle);
        if removed.is_some() {
            self.rescan_references(aliases);
        }
        removed
    }

    /// Build the render request for a scene without changing any state.
    ///
    /// References are resolved afresh from the current content; the resolved
    /// handles are returned alongside the request.
    pub fn render_request(
        &self,
        key: SceneKey,
        aliases: &AliasTable,
    ) -> Option<(Vec<String>, RenderRequest)> {
        let content = &self.storyboard.scene(key)?.content;
        let style = self.settings.style;

        let ids = ReferenceResolver::new(&self.catalog, aliases).resolve(content);
        let prompt = sanitize(&compile(content, &ids, &self.catalog, aliases, style));
        let references = ids
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .filter_map(|entry| entry.image.clone())
            .collect();
        Some((
            ids,
            RenderRequest {
                prompt,
                references,
                style,
            },
        ))
    }

    /// Remove every scene, result and catalog entry.
    ///
    /// Lore, presets and settings are kept.
    pub fn clean_slate(&mut self) {
        self.storyboard.clear();
        self.catalog.clear();
        info!("Workspace wiped clean");
    }
}
