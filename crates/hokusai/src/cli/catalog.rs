//! Reference and preset command handlers.

use super::commands::{KindArg, PresetCommands, ReferenceCommands};
use super::storyboard::{read_text, write_bytes};
use hokusai::{
    CatalogError, CatalogErrorKind, HokusaiError, HokusaiResult, ImageData, JsonError,
    ReferenceEntry, Session, StorageError, StorageErrorKind, normalize_handle,
};
use std::path::Path;

async fn read_image(path: &Path) -> HokusaiResult<ImageData> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        HokusaiError::from(StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            path.display(),
            e
        ))))
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    Ok(ImageData::new(bytes, ImageData::mime_for_extension(extension)))
}

fn print_entry(entry: &ReferenceEntry) {
    let image = if entry.image.is_some() { "image" } else { "no image" };
    println!(
        "@{:<14} {:<16} [{}, {}] {}",
        entry.id, entry.name, entry.category, image, entry.description
    );
    if let Some(voice) = &entry.voice {
        println!("{:16}voice: {}", "", voice);
    }
}

/// Handle reference catalog commands.
pub async fn handle_reference_command(
    session: &Session,
    command: ReferenceCommands,
) -> HokusaiResult<()> {
    match command {
        ReferenceCommands::List => {
            let workspace = session.workspace().read().await;
            println!("Characters:");
            workspace.catalog.characters().values().for_each(print_entry);
            println!("Locations:");
            workspace.catalog.locations().values().for_each(print_entry);
            Ok(())
        }

        ReferenceCommands::Add {
            kind,
            id,
            name,
            description,
            voice,
            image,
        } => {
            let mut entry = match kind {
                KindArg::Character => ReferenceEntry::character(id.as_str(), name, description),
                KindArg::Location => ReferenceEntry::location(id.as_str(), name, description),
            };
            if let Some(voice) = voice {
                entry = entry.with_voice(voice);
            }
            if let Some(path) = image {
                entry = entry.with_image(read_image(&path).await?);
            }

            {
                let mut workspace = session.workspace().write().await;
                workspace.catalog.add(entry)?;
                workspace.rescan_references(session.aliases());
            }
            println!("Added @{}", normalize_handle(&id));
            session.save().await
        }

        ReferenceCommands::Remove { id } => {
            let handle = normalize_handle(&id);
            let removed = session
                .workspace()
                .write()
                .await
                .remove_reference(&handle, session.aliases());
            match removed {
                Some(entry) => {
                    println!("Removed @{} ({})", entry.id, entry.name);
                    session.save().await
                }
                None => Err(HokusaiError::from(CatalogError::new(
                    CatalogErrorKind::NotFound(handle),
                ))),
            }
        }

        ReferenceCommands::Image { id, path } => {
            let handle = normalize_handle(&id);
            let image = read_image(&path).await?;
            session
                .workspace()
                .write()
                .await
                .catalog
                .attach_image(&handle, image)?;
            println!("Attached {} to @{}", path.display(), handle);
            session.save().await
        }
    }
}

/// Handle preset commands.
pub async fn handle_preset_command(session: &Session, command: PresetCommands) -> HokusaiResult<()> {
    match command {
        PresetCommands::List => {
            let workspace = session.workspace().read().await;
            if workspace.presets.is_empty() {
                println!("No presets saved.");
            }
            for preset in workspace.presets.presets() {
                println!(
                    "{}  {}  ({} characters, {} locations, {})",
                    preset.id(),
                    preset.name(),
                    preset.characters().len(),
                    preset.locations().len(),
                    preset.created_at().format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }

        PresetCommands::Save { name } => {
            let id = {
                let mut guard = session.workspace().write().await;
                let workspace = &mut *guard;
                workspace.presets.save(&name, &workspace.catalog)?.id().clone()
            };
            println!("Saved preset '{}' as {}", name.trim(), id);
            session.save().await
        }

        PresetCommands::Import { file } => {
            let text = read_text(&file).await?;
            let document: serde_json::Value =
                serde_json::from_str(&text).map_err(|e| JsonError::new(e.to_string()))?;
            let (id, name) = {
                let mut workspace = session.workspace().write().await;
                let preset = workspace.presets.import(&document)?;
                (preset.id().clone(), preset.name().clone())
            };
            println!("Imported preset '{}' as {}", name, id);
            session.save().await
        }

        PresetCommands::Export { id, output } => {
            let document = session.workspace().read().await.presets.export(&id)?;
            let text = serde_json::to_string_pretty(&document)
                .map_err(|e| JsonError::new(e.to_string()))?;
            match output {
                Some(path) => {
                    write_bytes(&path, text.as_bytes()).await?;
                    println!("Exported preset {} to {}", id, path.display());
                }
                None => println!("{text}"),
            }
            Ok(())
        }

        PresetCommands::Apply { id } => {
            {
                let mut guard = session.workspace().write().await;
                let workspace = &mut *guard;
                workspace.presets.apply(&id, &mut workspace.catalog)?;
                workspace.rescan_references(session.aliases());
            }
            println!("Applied preset {id}");
            session.save().await
        }

        PresetCommands::Delete { id } => {
            let removed = session.workspace().write().await.presets.delete(&id)?;
            println!("Deleted preset '{}'", removed.name());
            session.save().await
        }
    }
}
