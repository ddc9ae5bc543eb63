//! Coordinator flow tests: cache check, confirmation, request outcomes.

use explain_client::error::ApiError;
use explain_client::page::Region;
use explain_client::types::{ExplainStatus, FlowState, Severity, UiEvent};
use explain_client::ExplainCoordinator;
use explain_test_utils::{
    explain_malformed, explain_success, explain_with_status, test_context, CollectingNotifier,
    FakePage, ScriptedApi,
};
use pretty_assertions::assert_eq;

fn coordinator(
    api: ScriptedApi,
) -> ExplainCoordinator<FakePage, ScriptedApi, CollectingNotifier> {
    ExplainCoordinator::new(
        FakePage::console(test_context()),
        api,
        CollectingNotifier::new(),
    )
}

#[tokio::test]
async fn cache_miss_issues_single_fresh_request() {
    let api = ScriptedApi::new()
        .with_cache_miss()
        .with_explain(Ok(explain_success("Root cause: OOM", "OpenAI")));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    assert_eq!(coord.api().explain_call_flags(), vec![false]);
    assert_eq!(coord.state(), FlowState::Idle);

    let page = coord.page();
    assert_eq!(page.content, "Root cause: OOM");
    assert!(page.title.contains("OpenAI"));
    assert!(page.is_visible(Region::Container));
    assert!(page.is_visible(Region::Content));
    assert!(!page.is_visible(Region::Spinner));
}

#[tokio::test]
async fn cache_hit_shows_dialog_and_hides_container() {
    let api = ScriptedApi::new().with_cache_hit("2024-05-01 10:15:00");
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    assert_eq!(coord.state(), FlowState::AwaitingConfirmation);
    let page = coord.page();
    assert!(page.is_visible(Region::ConfirmDialog));
    assert!(!page.is_visible(Region::Container));
    assert_eq!(page.confirm_timestamp, "2024-05-01 10:15:00");
    assert!(coord.api().explain_call_flags().is_empty());
}

#[tokio::test]
async fn generate_new_forces_request_and_clears_prior_content() {
    let api = ScriptedApi::new()
        .with_cache_hit("2024-05-01 10:15:00")
        .with_explain(Ok(explain_success("fresh explanation", "OpenAI")));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;
    coord.handle_event(UiEvent::ConfirmGenerateNew).await;

    assert_eq!(coord.api().explain_call_flags(), vec![true]);
    let page = coord.page();
    assert_eq!(page.content_clears, 1);
    assert!(!page.is_visible(Region::ConfirmDialog));
    assert_eq!(page.content, "fresh explanation");
}

#[tokio::test]
async fn view_existing_issues_nonforced_request() {
    let api = ScriptedApi::new()
        .with_cache_hit("2024-05-01 10:15:00")
        .with_explain(Ok(explain_success("cached explanation", "OpenAI")));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;
    coord.handle_event(UiEvent::ConfirmViewExisting).await;

    assert_eq!(coord.api().explain_call_flags(), vec![false]);
    let page = coord.page();
    assert!(!page.is_visible(Region::ConfirmDialog));
    assert_eq!(page.content_clears, 0);
    assert_eq!(page.content, "cached explanation");
}

#[tokio::test]
async fn cancel_issues_no_request_and_leaves_container_hidden() {
    let api = ScriptedApi::new().with_cache_hit("2024-05-01 10:15:00");
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;
    coord.handle_event(UiEvent::ConfirmCancel).await;

    assert!(coord.api().explain_call_flags().is_empty());
    assert_eq!(coord.state(), FlowState::Idle);
    let page = coord.page();
    assert!(!page.is_visible(Region::ConfirmDialog));
    assert!(!page.is_visible(Region::Container));
}

#[tokio::test]
async fn cache_check_failure_falls_back_to_fresh_request() {
    let api = ScriptedApi::new()
        .with_cache_check(Err(ApiError::Status(500)))
        .with_explain(Ok(explain_success("explanation", "OpenAI")));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    assert_eq!(coord.api().explain_call_flags(), vec![false]);
    // No confirmation dialog on the fallback path.
    assert!(!coord.page().is_visible(Region::ConfirmDialog));
    assert!(coord.page().confirm_timestamp.is_empty());
}

#[tokio::test]
async fn http_failure_with_error_body_notifies_and_hides_container() {
    let api = ScriptedApi::new().with_cache_miss().with_explain(Ok(
        explain_with_status(false, ExplainStatus::Error, "Provider unavailable", "OpenAI"),
    ));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    let messages = &coord.notifier().messages;
    assert_eq!(
        messages,
        &vec![
            ("Explain failed".to_string(), Severity::Error),
            ("Provider unavailable".to_string(), Severity::Error),
        ]
    );
    assert!(!coord.page().is_visible(Region::Container));
    assert_eq!(coord.state(), FlowState::Idle);
}

#[tokio::test]
async fn warning_status_notifies_and_hides_container() {
    let api = ScriptedApi::new().with_cache_miss().with_explain(Ok(
        explain_with_status(true, ExplainStatus::Warning, "explanation disabled", ""),
    ));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    assert_eq!(
        coord.notifier().messages,
        vec![("explanation disabled".to_string(), Severity::Warning)]
    );
    assert!(!coord.page().is_visible(Region::Container));
}

#[tokio::test]
async fn malformed_body_surfaces_the_caught_error() {
    let api = ScriptedApi::new()
        .with_cache_miss()
        .with_explain(Ok(explain_malformed(true)));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    let messages = &coord.notifier().messages;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].0.starts_with("Error:"));
    assert_eq!(messages[0].1, Severity::Error);
    assert_eq!(coord.state(), FlowState::Idle);
}

#[tokio::test]
async fn request_failure_notifies_and_returns_to_idle() {
    let api = ScriptedApi::new()
        .with_cache_miss()
        .with_explain(Err(ApiError::Status(503)));
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;

    let messages = &coord.notifier().messages;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].0.starts_with("Error:"));
    assert_eq!(coord.state(), FlowState::Idle);
}

#[tokio::test]
async fn second_activation_while_awaiting_confirmation_is_ignored() {
    let api = ScriptedApi::new().with_cache_hit("2024-05-01 10:15:00");
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ExplainClicked).await;
    // Would panic on a second unscripted cache check if the guard failed.
    coord.handle_event(UiEvent::ExplainClicked).await;

    assert_eq!(*coord.api().cache_calls.lock().unwrap(), 1);
    assert_eq!(coord.state(), FlowState::AwaitingConfirmation);
}

#[tokio::test]
async fn confirmation_events_outside_dialog_are_ignored() {
    let api = ScriptedApi::new();
    let mut coord = coordinator(api);

    coord.handle_event(UiEvent::ConfirmGenerateNew).await;
    coord.handle_event(UiEvent::ConfirmViewExisting).await;
    coord.handle_event(UiEvent::ConfirmCancel).await;

    assert!(coord.api().explain_call_flags().is_empty());
    assert_eq!(coord.state(), FlowState::Idle);
    assert_eq!(coord.page().mutations, 0);
}
