//! Explanation request coordinator
//!
//! Drives the request lifecycle for one page: consult the cache-check
//! endpoint, confirm overwrite with the user when a cached explanation
//! exists, issue the explain request (fresh or forced), and hand the
//! outcome to the presentation layer.
//!
//! The coordinator owns the page surface, the endpoint client, and the
//! notifier, constructed once per page load. Exactly one request is in
//! flight at a time: activations arriving while the flow is not idle are
//! ignored.

use crate::api::{ExplainApi, ExplainResponse};
use crate::page::{Notifier, PageSurface};
use crate::types::{ExplainStatus, FlowState, Severity, UiEvent};
use crate::{confirm, present};

/// Per-page coordinator for the explain-error flow.
#[derive(Debug)]
pub struct ExplainCoordinator<P, A, N> {
    page: P,
    api: A,
    notifier: N,
    state: FlowState,
}

impl<P, A, N> ExplainCoordinator<P, A, N>
where
    P: PageSurface,
    A: ExplainApi,
    N: Notifier,
{
    /// Create the coordinator for one page load.
    #[must_use]
    pub fn new(page: P, api: A, notifier: N) -> Self {
        Self {
            page,
            api,
            notifier,
            state: FlowState::Idle,
        }
    }

    /// Current flow state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The page surface, for the injector and for teardown checks.
    #[inline]
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// Shared view of the page surface.
    #[inline]
    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    /// The endpoint client, for the status poller.
    #[inline]
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The notification banner.
    #[inline]
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Route one user interaction through the state machine.
    pub async fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ExplainClicked => self.on_activate().await,
            UiEvent::ConfirmViewExisting => self.on_confirm_view_existing().await,
            UiEvent::ConfirmGenerateNew => self.on_confirm_generate_new().await,
            UiEvent::ConfirmCancel => self.on_confirm_cancel(),
        }
    }

    /// Entry point of one activation: check the cache, then either confirm
    /// with the user or request directly.
    async fn on_activate(&mut self) {
        if self.state != FlowState::Idle {
            tracing::debug!(state = ?self.state, "activation ignored, request already in progress");
            return;
        }

        self.state = FlowState::CheckingCache;
        let checked = self.api.check_existing_explanation().await;
        match checked {
            Ok(cached) if cached.has_explanation => {
                tracing::debug!(timestamp = %cached.timestamp, "cached explanation found");
                confirm::show_dialog(&mut self.page, &cached.timestamp);
                self.state = FlowState::AwaitingConfirmation;
            }
            Ok(_) => self.request(false).await,
            Err(e) => {
                // Treat an unreachable cache check as a miss.
                tracing::warn!(error = %e, "cache check failed, requesting fresh explanation");
                self.request(false).await;
            }
        }
    }

    async fn on_confirm_view_existing(&mut self) {
        if self.state != FlowState::AwaitingConfirmation {
            return;
        }
        confirm::hide_dialog(&mut self.page);
        // The server returns the cached payload for a non-forced request.
        self.request(false).await;
    }

    async fn on_confirm_generate_new(&mut self) {
        if self.state != FlowState::AwaitingConfirmation {
            return;
        }
        confirm::hide_dialog(&mut self.page);
        present::clear_content(&mut self.page);
        self.request(true).await;
    }

    fn on_confirm_cancel(&mut self) {
        if self.state != FlowState::AwaitingConfirmation {
            return;
        }
        confirm::hide_dialog(&mut self.page);
        self.state = FlowState::Idle;
    }

    /// Issue the explain request and render the outcome. Always returns
    /// the flow to idle.
    async fn request(&mut self, force_new: bool) {
        self.state = FlowState::Requesting;
        present::show_spinner(&mut self.page);

        let outcome = self.api.explain(force_new).await;
        match outcome {
            Ok(response) => self.render_response(response),
            Err(e) => {
                self.notifier.show(&format!("Error: {e}"), Severity::Error);
            }
        }
        self.state = FlowState::Idle;
    }

    fn render_response(&mut self, response: ExplainResponse) {
        if !response.http_ok {
            self.notifier.show("Explain failed", Severity::Error);
        }
        // The body is parsed even on a failed HTTP status; the server
        // writes its diagnostic payload either way.
        match response.body {
            Ok(result) => match result.status {
                ExplainStatus::Success => {
                    present::show_explanation(&mut self.page, &result.message, &result.provider_name);
                }
                ExplainStatus::Warning => {
                    self.notifier.show(&result.message, Severity::Warning);
                    present::hide_container(&mut self.page);
                }
                ExplainStatus::Error => {
                    self.notifier.show(&result.message, Severity::Error);
                    present::hide_container(&mut self.page);
                }
            },
            Err(e) => {
                self.notifier.show(&format!("Error: {e}"), Severity::Error);
            }
        }
    }
}
