mod test_utils;

use hokusai_board::{BatchDriver, BatchReport, CancelFlag, GenerationScheduler, RATE_LIMITED_MESSAGE};
use hokusai_error::{GenerationError, GenerationErrorKind};
use hokusai_rate_limit::{BatchConfig, RetryPolicy};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_utils::{MockRenderer, fixture_workspace, png};

const SCRIPT: &str = "Sequence 1: alpha strike at dawn in the forest.\nSequence 2: beta counter under the waterfall.\nSequence 3: gamma finale on the rooftop.";

fn ids() -> Vec<String> {
    vec!["01".to_string(), "02".to_string(), "03".to_string()]
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_scene_cools_down_until_cancelled() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let cancel = CancelFlag::new();
    let beta_attempts = Arc::new(AtomicUsize::new(0));

    let renderer = {
        let cancel = cancel.clone();
        let beta_attempts = Arc::clone(&beta_attempts);
        MockRenderer::new(move |request| {
            if request.prompt.contains("beta") {
                if beta_attempts.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                    cancel.cancel();
                }
                return Err(GenerationError::new(GenerationErrorKind::RateLimited(
                    "Resource exhausted".to_string(),
                ))
                .into());
            }
            Ok(png())
        })
    };
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer.clone()))
        .with_retry(RetryPolicy::no_retry());
    let driver = BatchDriver::new(scheduler, BatchConfig::default()).with_cancel_flag(cancel);
    let progress = driver.subscribe();

    let report = driver.run(&ids()).await;

    assert_eq!(
        report,
        BatchReport {
            succeeded: 1,
            failed: 0,
            cancelled: true,
        }
    );
    assert_eq!(beta_attempts.load(Ordering::SeqCst), 3);
    assert_eq!(renderer.calls_mentioning("alpha"), 1);
    assert_eq!(renderer.calls_mentioning("gamma"), 0);

    let workspace = workspace.read().await;
    assert!(workspace.storyboard.result_for("01").unwrap().image.is_some());
    assert_eq!(
        workspace.storyboard.result_for("02").unwrap().error_message.as_deref(),
        Some(RATE_LIMITED_MESSAGE)
    );
    assert!(workspace.storyboard.result_for("03").is_none());

    let last = *progress.borrow();
    assert!(!last.running);
    assert_eq!(last.processed, 2);
    assert_eq!(last.total, 3);
    assert_eq!(last.cooldown_remaining, 0);
}

#[tokio::test(start_paused = true)]
async fn test_other_failures_skip_to_next_scene() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let renderer = MockRenderer::new(|request| {
        if request.prompt.contains("beta") {
            return Err(GenerationError::new(GenerationErrorKind::SafetyBlocked(
                "OTHER".to_string(),
            ))
            .into());
        }
        Ok(png())
    });
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer.clone()))
        .with_retry(RetryPolicy::no_retry());
    let driver = BatchDriver::new(scheduler, BatchConfig::default());

    let report = driver.run(&ids()).await;

    assert_eq!(
        report,
        BatchReport {
            succeeded: 2,
            failed: 1,
            cancelled: false,
        }
    );
    assert_eq!(renderer.calls_mentioning("beta"), 1);
    assert_eq!(renderer.calls_mentioning("gamma"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_then_success_retries_same_scene() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let beta_attempts = Arc::new(AtomicUsize::new(0));
    let renderer = {
        let beta_attempts = Arc::clone(&beta_attempts);
        MockRenderer::new(move |request| {
            if request.prompt.contains("beta") && beta_attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(GenerationError::new(GenerationErrorKind::Service(
                    "The model is overloaded. Please try again later.".to_string(),
                ))
                .into());
            }
            Ok(png())
        })
    };
    let scheduler = GenerationScheduler::new(workspace.clone(), Arc::new(renderer))
        .with_retry(RetryPolicy::no_retry());
    let driver = BatchDriver::new(scheduler, BatchConfig::default());

    let started = tokio::time::Instant::now();
    let report = driver.run(&ids()).await;

    assert_eq!(report.succeeded, 3);
    assert_eq!(beta_attempts.load(Ordering::SeqCst), 2);
    assert!(started.elapsed() >= std::time::Duration::from_secs(60));
    let workspace = workspace.read().await;
    assert!(workspace.storyboard.result_for("02").unwrap().error_message.is_none());
}

#[tokio::test]
async fn test_cancel_before_start_attempts_nothing() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let renderer = MockRenderer::always_ok();
    let scheduler = GenerationScheduler::new(workspace, Arc::new(renderer.clone()));
    let driver = BatchDriver::new(scheduler, BatchConfig::default());
    driver.cancel_flag().cancel();

    let report = driver.run(&ids()).await;
    assert!(report.cancelled);
    assert!(renderer.calls().is_empty());
}
