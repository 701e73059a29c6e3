mod test_utils;

use hokusai_board::{GenerationScheduler, RATE_LIMITED_MESSAGE};
use hokusai_core::SceneStatus;
use hokusai_error::{GenerationError, GenerationErrorKind};
use hokusai_rate_limit::RetryPolicy;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_utils::{MockRenderer, fixture_workspace, png};

const SCRIPT: &str = "Sequence 1: @auraayo charges across the arena.\nSequence 2: Rayne waits by the gate, calm.";

#[tokio::test]
async fn test_success_stores_image_and_attaches_references() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let renderer = MockRenderer::always_ok();
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer.clone()));

    let outcome = scheduler.generate_one("01").await;
    assert!(outcome.success);

    let calls = renderer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].references, vec![png()]);
    assert!(calls[0].prompt.starts_with("ADD SHONEN ANIME, 4K, "));
    assert!(calls[0].prompt.contains("(Ayo: Young man with red skin"));

    let workspace = workspace.read().await;
    let result = workspace.storyboard.result_for("01").unwrap();
    assert_eq!(result.status(), SceneStatus::Succeeded);
    assert!(result.error_message.is_none());
}

#[tokio::test]
async fn test_unknown_scene_changes_nothing() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let renderer = MockRenderer::always_ok();
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer.clone()));

    let outcome = scheduler.generate_one("09").await;
    assert!(!outcome.success);
    assert!(!outcome.is_rate_limited);
    assert!(renderer.calls().is_empty());
    assert!(workspace.read().await.storyboard.generation_map().is_empty());
}

#[tokio::test]
async fn test_rate_limit_stores_busy_message() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let renderer = MockRenderer::always_err(GenerationErrorKind::Http {
        status_code: 429,
        message: "Resource has been exhausted".to_string(),
    });
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer.clone()));

    let outcome = scheduler.generate_one("02").await;
    assert!(outcome.is_rate_limited);
    assert_eq!(renderer.calls().len(), 1);

    let workspace = workspace.read().await;
    let result = workspace.storyboard.result_for("02").unwrap();
    assert_eq!(result.error_message.as_deref(), Some(RATE_LIMITED_MESSAGE));
    assert!(!result.is_pending);
}

#[tokio::test]
async fn test_safety_block_keeps_raw_message() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let renderer = MockRenderer::always_err(GenerationErrorKind::SafetyBlocked("SAFETY".to_string()));
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer.clone()));

    let outcome = scheduler.generate_one("01").await;
    assert!(!outcome.success && !outcome.is_rate_limited);
    assert_eq!(renderer.calls().len(), 1);
    assert_eq!(
        workspace.read().await.storyboard.result_for("01").unwrap().error_message.as_deref(),
        Some("Blocked by Safety Filter: SAFETY")
    );
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let renderer = MockRenderer::new(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            Err(GenerationError::new(GenerationErrorKind::Http {
                status_code: 500,
                message: "Internal error".to_string(),
            })
            .into())
        } else {
            Ok(png())
        }
    });
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer))
        .with_retry(RetryPolicy::new(15_000, 1.5, 5));

    let outcome = scheduler.generate_one("01").await;
    assert!(outcome.success);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}
