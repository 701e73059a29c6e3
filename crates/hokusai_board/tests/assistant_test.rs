mod test_utils;

use hokusai_board::ScriptAssistant;
use hokusai_core::SceneStatus;
use hokusai_error::{GenerationError, GenerationErrorKind, HokusaiErrorKind};
use hokusai_rate_limit::RetryPolicy;
use hokusai_script::NO_MUSIC_TAG;
use std::sync::Arc;
use test_utils::{MockTextService, fixture_workspace};

const SCRIPT: &str = "Sequence 1: Ayo trains under the waterfall.\nSequence 2: Rayne watches from the cliffs.";

#[tokio::test]
async fn test_refine_replaces_content_and_rescans() {
    let mut workspace = fixture_workspace(SCRIPT);
    workspace.set_no_music(true);
    let workspace = workspace.into_shared();
    let text = MockTextService::with_responses(vec![Ok(
        "Sequence 1: Rayne and Ayo spar in the rain.".to_string(),
    )]);
    let assistant = ScriptAssistant::new(workspace.clone(), Arc::new(text.clone()));

    assistant.refine_scene("01", "add Rayne").await.unwrap();

    let prompts = text.prompts();
    assert!(prompts[0].ends_with("| add Rayne"));

    let workspace = workspace.read().await;
    let scene = workspace.storyboard.scenes().next().unwrap();
    assert_eq!(
        scene.content,
        format!("Sequence 1: Rayne and Ayo spar in the rain.{NO_MUSIC_TAG}")
    );
    assert_eq!(scene.referenced_ids, vec!["rayneaura", "auraayo"]);
    let result = workspace.storyboard.result_for("01").unwrap();
    assert_eq!(result.status(), SceneStatus::Idle);
}

#[tokio::test]
async fn test_refine_failure_is_recorded_on_scene() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let text = MockTextService::with_responses(vec![Err(GenerationError::new(
        GenerationErrorKind::Http {
            status_code: 400,
            message: "Bad request".to_string(),
        },
    )
    .into())]);
    let assistant = ScriptAssistant::new(workspace.clone(), Arc::new(text));

    assert!(assistant.refine_scene("02", "darker").await.is_err());

    let workspace = workspace.read().await;
    let result = workspace.storyboard.result_for("02").unwrap();
    assert_eq!(
        result.error_message.as_deref(),
        Some("Refine failed: HTTP 400 error: Bad request")
    );
    assert!(!result.is_pending);
}

#[tokio::test]
async fn test_refine_unknown_scene() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let assistant = ScriptAssistant::new(workspace, Arc::new(MockTextService::default()));
    let err = assistant.refine_scene("07", "anything").await.unwrap_err();
    assert!(matches!(err.kind(), HokusaiErrorKind::Script(_)));
}

#[tokio::test]
async fn test_next_beat_appends_after_last_scene() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let text = MockTextService::with_responses(vec![Ok(
        "Sequence 3: Ayo leaps from the cliff toward Rayne.".to_string(),
    )]);
    let assistant = ScriptAssistant::new(workspace.clone(), Arc::new(text.clone()))
        .with_retry(RetryPolicy::no_retry());

    let keys = assistant.next_beat().await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(text.prompts()[0].contains("Sequence 3: [Title]"));
    assert!(text.prompts()[0].contains("Rayne watches from the cliffs."));

    let workspace = workspace.read().await;
    let scene = workspace.storyboard.scene(keys[0]).unwrap();
    assert_eq!(scene.id, "03");
    assert_eq!(scene.time_range, "00:30 - 00:45");
    assert_eq!(scene.referenced_ids, vec!["auraayo", "rayneaura"]);
}

#[tokio::test]
async fn test_next_beat_empty_response_adds_nothing() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let assistant = ScriptAssistant::new(workspace.clone(), Arc::new(MockTextService::default()));

    assert!(assistant.next_beat().await.unwrap().is_empty());
    assert_eq!(workspace.read().await.storyboard.len(), 2);
}

#[tokio::test]
async fn test_cold_open_on_empty_board() {
    let workspace = fixture_workspace("").into_shared();
    let text = MockTextService::with_responses(vec![Ok(
        "Sequence 1: Dawn breaks over the arena as Ayo arrives.".to_string(),
    )]);
    let assistant = ScriptAssistant::new(workspace.clone(), Arc::new(text.clone()));

    let keys = assistant.next_beat().await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(text.prompts()[0].contains("opening scene"));
    assert_eq!(workspace.read().await.storyboard.scene(keys[0]).unwrap().id, "01");
}

#[tokio::test]
async fn test_breakdown_falls_back_to_original_script() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let assistant = ScriptAssistant::new(workspace, Arc::new(MockTextService::default()));
    let script = "INT. DOJO - NIGHT. Ayo bows.";
    assert_eq!(assistant.break_down_script(script).await.unwrap(), script);
}

#[tokio::test]
async fn test_episode_draft_rejects_empty_output() {
    let workspace = fixture_workspace(SCRIPT).into_shared();
    let assistant = ScriptAssistant::new(workspace, Arc::new(MockTextService::default()));
    assert!(assistant.draft_episode("tournament", 4).await.is_err());
}
