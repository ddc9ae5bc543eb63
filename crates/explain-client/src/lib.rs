//! explain-client - CI console "explain this failure" orchestration
//!
//! Client-side state machine for offering an AI-generated explanation of
//! a failed job run:
//! - Polls build status and injects the action control exactly once
//! - Checks for a cached explanation and confirms overwrite with the user
//! - Issues the explain request (fresh or forced) and renders the outcome
//!
//! The backend provider, server-side caching, page markup, and CSRF
//! minting are external collaborators consumed through the [`ExplainApi`],
//! [`PageSurface`], [`Notifier`], and [`CrumbSource`] seams.
//!
//! # Example
//!
//! ```rust,ignore
//! use explain_client::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(page: impl PageSurface, notifier: impl Notifier) -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = page.context().clone();
//! let api = HttpExplainApi::new(&ctx, Arc::new(StaticCrumb::new("Jenkins-Crumb", "...")))?;
//! let (mut session, handle) = PageSession::new(page, api, notifier, SessionConfig::new());
//!
//! // Host bindings: handle.send(UiEvent::ExplainClicked), handle.cancel() on navigation.
//! session.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod api;
pub mod confirm;
pub mod coordinator;
pub mod error;
pub mod inject;
pub mod page;
pub mod poll;
pub mod present;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use api::{CrumbSource, ExplainApi, ExplainResponse, HttpExplainApi, StaticCrumb};
pub use coordinator::ExplainCoordinator;
pub use error::{ApiError, SessionError};
pub use inject::{inject_button, InjectOutcome};
pub use page::{is_console_path, ButtonSpec, InsertionPoint, Notifier, PageSurface, Region};
pub use poll::poll_build_status;
pub use session::{PageSession, SessionConfig, SessionHandle};
pub use types::{
    BuildStatus, CachedExplanation, ExplainStatus, ExplanationResult, FlowState, PageContext,
    Severity, UiEvent,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding the explain-error client
    pub use crate::{
        BuildStatus, ExplainApi, ExplainCoordinator, FlowState, HttpExplainApi, Notifier,
        PageContext, PageSession, PageSurface, SessionConfig, SessionHandle, Severity, StaticCrumb,
        UiEvent,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
