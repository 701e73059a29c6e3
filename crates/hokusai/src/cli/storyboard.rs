//! Storyboard editing command handlers.

use super::commands::DirectionArg;
use hokusai::{
    Direction, HokusaiError, HokusaiResult, ImportMode, Placement, Project, ReferenceResolver,
    SceneKey, SceneStatus, ScriptError, ScriptErrorKind, Session, StorageError, StorageErrorKind,
    StyleMode, Workspace,
};
use std::path::Path;
use tracing::info;

/// Longest content preview printed by `list`.
const PREVIEW_CHARS: usize = 72;

/// Read a UTF-8 text file.
pub(crate) async fn read_text(path: &Path) -> HokusaiResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        HokusaiError::from(StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        ))))
    })
}

/// Write bytes to a file.
pub(crate) async fn write_bytes(path: &Path, bytes: &[u8]) -> HokusaiResult<()> {
    tokio::fs::write(path, bytes).await.map_err(|e| {
        HokusaiError::from(StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        ))))
    })
}

/// Stable key and position of the scene labelled `id`.
fn locate(workspace: &Workspace, id: &str) -> HokusaiResult<(SceneKey, usize)> {
    workspace
        .storyboard
        .key_of(id)
        .and_then(|key| Some((key, workspace.storyboard.position_of(key)?)))
        .ok_or_else(|| {
            HokusaiError::from(ScriptError::new(ScriptErrorKind::SceneNotFound(
                id.to_string(),
            )))
        })
}

fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default().trim();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Segment a script file into scenes.
pub async fn import_script(session: &Session, file: &Path, append: bool) -> HokusaiResult<()> {
    let text = read_text(file).await?;
    let mode = if append {
        ImportMode::Append
    } else {
        ImportMode::Replace
    };
    let imported = session
        .workspace()
        .write()
        .await
        .import_script(&text, mode, session.aliases())
        .len();

    if imported == 0 {
        println!("No scenes detected.");
        return Ok(());
    }
    println!("Imported {} scenes", imported);
    session.save().await
}

/// Print every scene with its status.
pub async fn list_scenes(session: &Session) -> HokusaiResult<()> {
    let workspace = session.workspace().read().await;
    if workspace.storyboard.is_empty() {
        println!("Storyboard is empty. Import a script to begin.");
        return Ok(());
    }

    println!(
        "Style: {} | No music: {} | Voice tags: {}",
        workspace.settings.style.label(),
        workspace.settings.no_music,
        workspace.settings.voice_tags
    );
    println!("{:-<80}", "");
    for (_, scene, result) in workspace.storyboard.entries() {
        let status = result.map(|r| r.status()).unwrap_or(SceneStatus::Idle);
        let refs = scene
            .referenced_ids
            .iter()
            .map(|id| format!("@{id}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{} [{}] {:<9} {}",
            scene.id,
            scene.time_range,
            status.to_string(),
            preview(&scene.content)
        );
        if !refs.is_empty() {
            println!("      refs: {refs}");
        }
        if let Some(message) = result.and_then(|r| r.error_message.as_deref()) {
            println!("      error: {message}");
        }
    }
    println!("{:-<80}", "");
    println!("Total: {} scenes", workspace.storyboard.len());
    Ok(())
}

/// Print one scene and its compiled prompt.
pub async fn show_scene(session: &Session, id: &str) -> HokusaiResult<()> {
    let workspace = session.workspace().read().await;
    let (key, _) = locate(&workspace, id)?;
    let Some(scene) = workspace.storyboard.scene(key) else {
        return Ok(());
    };

    println!("Scene {} [{}]", scene.id, scene.time_range);
    println!("{}", scene.content);
    if let Some((ids, request)) = workspace.render_request(key, session.aliases()) {
        println!("{:-<80}", "");
        println!("Resolved references: {}", ids.join(", "));
        println!("Reference images: {}", request.references.len());
        println!("{:-<80}", "");
        println!("{}", request.prompt);
    }
    Ok(())
}

/// Replace a scene's script text and rescan its references.
pub async fn edit_scene(session: &Session, id: &str, content: &str) -> HokusaiResult<()> {
    {
        let mut workspace = session.workspace().write().await;
        let (key, _) = locate(&workspace, id)?;
        let ids = ReferenceResolver::new(&workspace.catalog, session.aliases()).resolve(content);
        workspace.storyboard.update_content(key, content);
        workspace.storyboard.set_referenced_ids(key, ids);
    }
    println!("Updated scene {id}");
    session.save().await
}

/// Insert a placeholder scene next to `id`.
pub async fn insert_scene(session: &Session, id: &str, before: bool) -> HokusaiResult<()> {
    let placement = if before {
        Placement::Before
    } else {
        Placement::After
    };
    let inserted = {
        let mut workspace = session.workspace().write().await;
        let (_, index) = locate(&workspace, id)?;
        let settings = workspace.settings;
        workspace
            .storyboard
            .insert(index, placement, &settings)
            .and_then(|key| workspace.storyboard.scene(key))
            .map(|scene| scene.id.clone())
    };

    if let Some(new_id) = inserted {
        println!("Inserted scene {new_id} {placement} {id}");
        session.save().await?;
    }
    Ok(())
}

/// Move a scene one step.
pub async fn move_scene(session: &Session, id: &str, direction: DirectionArg) -> HokusaiResult<()> {
    let direction = match direction {
        DirectionArg::Up => Direction::Up,
        DirectionArg::Down => Direction::Down,
    };
    let moved = {
        let mut workspace = session.workspace().write().await;
        let (_, index) = locate(&workspace, id)?;
        workspace.storyboard.move_scene(index, direction)
    };

    if moved {
        println!("Moved scene {id} {direction}");
        session.save().await
    } else {
        println!("Scene {id} cannot move {direction}");
        Ok(())
    }
}

/// Delete a scene and its frame.
pub async fn delete_scene(session: &Session, id: &str) -> HokusaiResult<()> {
    let deleted = {
        let mut workspace = session.workspace().write().await;
        let (_, index) = locate(&workspace, id)?;
        workspace.storyboard.delete(index)
    };

    if deleted.is_some() {
        println!("Deleted scene {id}");
        session.save().await?;
    }
    Ok(())
}

/// Set the visual style.
pub async fn set_style(session: &Session, mode: &str) -> HokusaiResult<()> {
    let style = StyleMode::parse(mode)?;
    session.workspace().write().await.set_style(style);
    println!("Style set to {}", style.label());
    session.save().await
}

/// Toggle the no-music tag.
pub async fn set_no_music(session: &Session, enabled: bool) -> HokusaiResult<()> {
    session.workspace().write().await.set_no_music(enabled);
    println!("No music {}", if enabled { "on" } else { "off" });
    session.save().await
}

/// Toggle voice tags in drafts.
pub async fn set_voice_tags(session: &Session, enabled: bool) -> HokusaiResult<()> {
    session.workspace().write().await.set_voice_tags(enabled);
    println!("Voice tags {}", if enabled { "on" } else { "off" });
    session.save().await
}

/// Show the lore, or replace it from a file.
pub async fn lore(session: &Session, file: Option<&Path>) -> HokusaiResult<()> {
    match file {
        Some(path) => {
            let text = read_text(path).await?;
            session.workspace().write().await.lore = text.trim().to_string();
            println!("Lore updated");
            session.save().await
        }
        None => {
            println!("{}", session.workspace().read().await.lore);
            Ok(())
        }
    }
}

/// Write every rendered frame into `dir`.
pub async fn export_frames(session: &Session, dir: &Path) -> HokusaiResult<()> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;

    let frames: Vec<(String, hokusai::ImageData)> = {
        let workspace = session.workspace().read().await;
        workspace
            .storyboard
            .entries()
            .filter_map(|(_, scene, result)| {
                result
                    .and_then(|r| r.image.clone())
                    .map(|image| (scene.id.clone(), image))
            })
            .collect()
    };

    for (id, image) in &frames {
        let path = dir.join(format!("scene_{}.{}", id, image.extension()));
        write_bytes(&path, &image.data).await?;
        info!(path = %path.display(), "Wrote frame");
    }
    println!("Exported {} frames to {}", frames.len(), dir.display());
    Ok(())
}

/// Restore the starter project, or wipe scenes and references.
pub async fn reset(session: &Session, clean: bool) -> HokusaiResult<()> {
    if clean {
        session.workspace().write().await.clean_slate();
        println!("Removed all scenes and references");
        return session.save().await;
    }

    session.reset().await?;
    let project: Project = session.workspace().read().await.to_project();
    println!(
        "Restored starter project with {} references",
        project.catalog.len()
    );
    session.save().await
}
