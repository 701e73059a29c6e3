//! Tests for the classify-and-backoff utility.

use hokusai_error::{
    CatalogError, CatalogErrorKind, GenerationError, GenerationErrorKind, HokusaiError,
    HokusaiResult, RetryableError,
};
use hokusai_rate_limit::{RequestLimiter, RetryPolicy, with_backoff};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

fn transient() -> HokusaiError {
    GenerationError::new(GenerationErrorKind::Http {
        status_code: 500,
        message: "Internal error".to_string(),
    })
    .into()
}

fn rate_limited() -> HokusaiError {
    GenerationError::new(GenerationErrorKind::Http {
        status_code: 429,
        message: "Too Many Requests".to_string(),
    })
    .into()
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_back_off_then_succeed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();

    let result: HokusaiResult<&str> = with_backoff(&RetryPolicy::default(), "render", || {
        let calls = calls.clone();
        async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(transient())
            } else {
                Ok("frame")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "frame");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_millis(15_000 + 22_500));
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_max_retries() {
    let calls = Arc::new(AtomicUsize::new(0));

    let result: HokusaiResult<()> = with_backoff(&RetryPolicy::default(), "render", || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        }
    })
    .await;

    let err = result.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limits_surface_immediately() {
    let calls = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();

    let result: HokusaiResult<()> = with_backoff(&RetryPolicy::default(), "render", || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(rate_limited())
        }
    })
    .await;

    assert!(result.unwrap_err().is_rate_limited());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_permanent_errors_surface_immediately() {
    let calls = Arc::new(AtomicUsize::new(0));

    let result: HokusaiResult<()> = with_backoff(&RetryPolicy::default(), "lookup", || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CatalogError::new(CatalogErrorKind::NotFound("zorbie".to_string())).into())
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_retry_policy_attempts_once() {
    let calls = Arc::new(AtomicUsize::new(0));

    let result: HokusaiResult<()> = with_backoff(&RetryPolicy::no_retry(), "render", || {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unlimited_limiter_never_waits() {
    let limiter = RequestLimiter::new(Some(0));
    assert!(!limiter.is_limited());
    for _ in 0..100 {
        limiter.acquire().await;
    }
}
