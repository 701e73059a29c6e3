//! Generation and drafting command handlers.

use super::commands::DraftCommands;
use super::storyboard::read_text;
use hokusai::{
    BatchDriver, HokusaiError, HokusaiResult, ImageRenderer, ImportMode, ScriptError,
    ScriptErrorKind, Session, TextService,
};
use std::sync::Arc;
use tracing::warn;

#[cfg(feature = "gemini")]
fn gemini(session: &Session) -> HokusaiResult<Arc<hokusai::GeminiClient>> {
    Ok(Arc::new(hokusai::GeminiClient::new(
        &session.config().generation,
    )?))
}

#[cfg(feature = "gemini")]
fn renderer(session: &Session) -> HokusaiResult<Arc<dyn ImageRenderer>> {
    let client: Arc<dyn ImageRenderer> = gemini(session)?;
    Ok(client)
}

#[cfg(feature = "gemini")]
fn text_service(session: &Session) -> HokusaiResult<Arc<dyn TextService>> {
    let client: Arc<dyn TextService> = gemini(session)?;
    Ok(client)
}

#[cfg(not(feature = "gemini"))]
fn renderer(_session: &Session) -> HokusaiResult<Arc<dyn ImageRenderer>> {
    Err(no_provider())
}

#[cfg(not(feature = "gemini"))]
fn text_service(_session: &Session) -> HokusaiResult<Arc<dyn TextService>> {
    Err(no_provider())
}

#[cfg(not(feature = "gemini"))]
fn no_provider() -> HokusaiError {
    hokusai::ConfigError::new("No generation provider enabled. Rebuild with --features gemini")
        .into()
}

async fn ensure_scene(session: &Session, id: &str) -> HokusaiResult<()> {
    if session.workspace().read().await.storyboard.key_of(id).is_some() {
        return Ok(());
    }
    Err(HokusaiError::from(ScriptError::new(
        ScriptErrorKind::SceneNotFound(id.to_string()),
    )))
}

/// Render one scene.
pub async fn generate(session: &Session, id: &str) -> HokusaiResult<()> {
    ensure_scene(session, id).await?;
    let scheduler = session.scheduler(renderer(session)?);

    println!("Rendering scene {id}...");
    let outcome = scheduler.generate_one(id).await;
    session.save().await?;

    if outcome.success {
        println!("Rendered scene {id}");
    } else {
        let message = session
            .workspace()
            .read()
            .await
            .storyboard
            .result_for(id)
            .and_then(|result| result.error_message.clone())
            .unwrap_or_default();
        println!("Scene {id} failed: {message}");
    }
    Ok(())
}

/// Render scenes in order; Ctrl-C stops at the next safe point.
pub async fn batch(session: &Session, ids: Vec<String>) -> HokusaiResult<()> {
    let ids = if ids.is_empty() {
        session
            .workspace()
            .read()
            .await
            .storyboard
            .scenes()
            .map(|scene| scene.id.clone())
            .collect()
    } else {
        ids
    };
    if ids.is_empty() {
        println!("Nothing to render.");
        return Ok(());
    }

    let driver = BatchDriver::new(session.scheduler(renderer(session)?), session.config().batch);

    let cancel = driver.cancel_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping batch");
            cancel.cancel();
        }
    });

    let mut progress = driver.subscribe();
    let reporter = tokio::spawn(async move {
        let mut last_processed = 0;
        while progress.changed().await.is_ok() {
            let snapshot = *progress.borrow_and_update();
            if !snapshot.running {
                continue;
            }
            if snapshot.cooldown_remaining > 0 {
                if snapshot.cooldown_remaining % 10 == 0 {
                    println!(
                        "  Rate limited, cooling down: {}s",
                        snapshot.cooldown_remaining
                    );
                }
            } else if snapshot.processed != last_processed {
                last_processed = snapshot.processed;
                println!("[{}/{}] Rendering...", snapshot.processed, snapshot.total);
            }
        }
    });

    let report = driver.run(&ids).await;
    drop(driver);
    interrupt.abort();
    if let Err(e) = reporter.await {
        warn!(error = %e, "Progress reporter stopped");
    }
    session.save().await?;

    println!(
        "Batch {}: {} rendered, {} failed",
        if report.cancelled { "stopped" } else { "complete" },
        report.succeeded,
        report.failed
    );
    Ok(())
}

/// Rewrite a scene with the text model.
pub async fn refine(session: &Session, id: &str, instruction: &str) -> HokusaiResult<()> {
    ensure_scene(session, id).await?;
    let assistant = session.assistant(text_service(session)?);

    let refined = assistant.refine_scene(id, instruction).await;
    session.save().await?;
    refined?;

    let workspace = session.workspace().read().await;
    if let Some(scene) = workspace
        .storyboard
        .key_of(id)
        .and_then(|key| workspace.storyboard.scene(key))
    {
        println!("{}", scene.content);
    }
    Ok(())
}

/// Draft the next sequence and append it.
pub async fn next_beat(session: &Session) -> HokusaiResult<()> {
    let assistant = session.assistant(text_service(session)?);
    let keys = assistant.next_beat().await?;
    if keys.is_empty() {
        println!("The model returned nothing to add.");
        return Ok(());
    }

    {
        let workspace = session.workspace().read().await;
        for key in &keys {
            if let Some(scene) = workspace.storyboard.scene(*key) {
                println!("{} [{}]\n{}\n", scene.id, scene.time_range, scene.content);
            }
        }
    }
    session.save().await
}

/// Draft a script, print it, and optionally import it.
pub async fn draft(session: &Session, command: DraftCommands) -> HokusaiResult<()> {
    let assistant = session.assistant(text_service(session)?);
    let (script, import) = match command {
        DraftCommands::Idea { idea, import } => (assistant.draft_from_idea(&idea).await?, import),
        DraftCommands::Episode {
            idea,
            scenes,
            import,
        } => (assistant.draft_episode(&idea, scenes).await?, import),
        DraftCommands::Breakdown { file, import } => {
            let raw = read_text(&file).await?;
            (assistant.break_down_script(&raw).await?, import)
        }
    };

    println!("{script}");
    if import {
        let imported = session
            .workspace()
            .write()
            .await
            .import_script(&script, ImportMode::Replace, session.aliases())
            .len();
        println!("Imported {imported} scenes");
        session.save().await?;
    }
    Ok(())
}
