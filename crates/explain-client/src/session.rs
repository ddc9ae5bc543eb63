//! Per-page session wiring
//!
//! One cooperative event loop per page load: UI events from the host
//! bindings and the fixed-delay timers (status re-poll, injector retry)
//! are multiplexed on a single logical thread of execution, so the DOM
//! surface is only ever mutated from here. A `CancellationToken` scoped
//! to the page lifetime stops pending timers deterministically on
//! navigation instead of relying on page unload.

use crate::api::ExplainApi;
use crate::coordinator::ExplainCoordinator;
use crate::error::SessionError;
use crate::inject::{inject_button, InjectOutcome};
use crate::page::{Notifier, PageSurface};
use crate::poll::poll_build_status;
use crate::types::{BuildStatus, UiEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Session timing configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay between status polls while the run is in progress.
    pub poll_interval: Duration,
    /// Delay before re-running anchor detection when injection found none.
    pub inject_retry_delay: Duration,
    /// UI event channel capacity.
    pub event_buffer: usize,
}

impl SessionConfig {
    /// Create default configuration: 5 s re-poll, 3 s injector retry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a poll interval.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// With an injector retry delay.
    #[inline]
    #[must_use]
    pub fn with_inject_retry_delay(mut self, delay: Duration) -> Self {
        self.inject_retry_delay = delay;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            inject_retry_delay: Duration::from_secs(3),
            event_buffer: 16,
        }
    }
}

/// Handle held by the host bindings: pushes UI events in and tears the
/// session down on navigation.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cancel: CancellationToken,
    events: mpsc::Sender<UiEvent>,
}

impl SessionHandle {
    /// Deliver one user interaction.
    ///
    /// # Errors
    /// [`SessionError::ChannelClosed`] once the session is gone or the
    /// event buffer is full.
    pub fn send(&self, event: UiEvent) -> Result<(), SessionError> {
        self.events
            .try_send(event)
            .map_err(|_| SessionError::ChannelClosed)
    }

    /// Stop the session and any pending timers.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token for tying further work to the page lifetime.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Where the background timer work currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickPhase {
    /// Polling build status.
    Poll,
    /// Run finished failing; waiting to re-run anchor detection.
    InjectRetry,
    /// No more timer work.
    Done,
}

/// One page load's worth of orchestration.
#[derive(Debug)]
pub struct PageSession<P, A, N> {
    coordinator: ExplainCoordinator<P, A, N>,
    config: SessionConfig,
    cancel: CancellationToken,
    events: mpsc::Receiver<UiEvent>,
    phase: TickPhase,
    next_delay: Option<Duration>,
}

impl<P, A, N> PageSession<P, A, N>
where
    P: PageSurface,
    A: ExplainApi,
    N: Notifier,
{
    /// Wire up a session for one page load.
    #[must_use]
    pub fn new(page: P, api: A, notifier: N, config: SessionConfig) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(config.event_buffer);
        let cancel = CancellationToken::new();
        let handle = SessionHandle {
            cancel: cancel.clone(),
            events: tx,
        };
        let session = Self {
            coordinator: ExplainCoordinator::new(page, api, notifier),
            config,
            cancel,
            events: rx,
            phase: TickPhase::Poll,
            // First poll fires immediately on page load.
            next_delay: Some(Duration::ZERO),
        };
        (session, handle)
    }

    /// The coordinator, for inspection.
    #[inline]
    #[must_use]
    pub fn coordinator(&self) -> &ExplainCoordinator<P, A, N> {
        &self.coordinator
    }

    /// Mutable coordinator access.
    #[inline]
    pub fn coordinator_mut(&mut self) -> &mut ExplainCoordinator<P, A, N> {
        &mut self.coordinator
    }

    /// Run the session until cancelled or the host drops its handle.
    ///
    /// Pages that are not a console view get no polling and no injection;
    /// the loop still serves events in case the host wired any, but in
    /// practice it just waits for teardown.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        if !self.coordinator.page().is_console_view() {
            tracing::debug!("not a console view, skipping status polling");
            self.phase = TickPhase::Done;
            self.next_delay = None;
        }

        loop {
            let delay = self.next_delay;
            let Self {
                coordinator,
                config,
                cancel,
                events,
                phase,
                next_delay,
            } = self;

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("page session cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => coordinator.handle_event(event).await,
                    None => {
                        // All host handles dropped: the page is going away.
                        tracing::debug!("ui event channel closed, tearing down");
                        break;
                    }
                },
                () = maybe_sleep(delay), if delay.is_some() => {
                    *next_delay = None;
                    tick(coordinator, config, phase, next_delay).await;
                }
            }
        }
        Ok(())
    }
}

async fn maybe_sleep(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}

/// One timer tick: either a status poll or an injection retry.
async fn tick<P, A, N>(
    coordinator: &mut ExplainCoordinator<P, A, N>,
    config: &SessionConfig,
    phase: &mut TickPhase,
    next_delay: &mut Option<Duration>,
) where
    P: PageSurface,
    A: ExplainApi,
    N: Notifier,
{
    match *phase {
        TickPhase::Poll => {
            let status = poll_build_status(coordinator.api()).await;
            match status {
                BuildStatus::Running => {
                    *next_delay = Some(config.poll_interval);
                }
                BuildStatus::CompletedFailed => {
                    attempt_inject(coordinator, config, phase, next_delay);
                }
                BuildStatus::Unrelated => {
                    // Successful run: no explanation is offered.
                    *phase = TickPhase::Done;
                }
            }
        }
        TickPhase::InjectRetry => {
            let page = coordinator.page_mut();
            if !page.is_console_view() || page.has_explain_button() {
                *phase = TickPhase::Done;
                return;
            }
            attempt_inject(coordinator, config, phase, next_delay);
        }
        TickPhase::Done => {}
    }
}

fn attempt_inject<P, A, N>(
    coordinator: &mut ExplainCoordinator<P, A, N>,
    config: &SessionConfig,
    phase: &mut TickPhase,
    next_delay: &mut Option<Duration>,
) where
    P: PageSurface,
    A: ExplainApi,
    N: Notifier,
{
    match inject_button(coordinator.page_mut()) {
        InjectOutcome::NoAnchor => {
            *phase = TickPhase::InjectRetry;
            *next_delay = Some(config.inject_retry_delay);
        }
        outcome => {
            tracing::debug!(?outcome, "injection finished");
            *phase = TickPhase::Done;
        }
    }
}
