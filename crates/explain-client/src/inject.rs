//! Idempotent button injection
//!
//! Places the "Explain Error" control into the page exactly once,
//! tolerating the varied console layouts the host renders. Anchor
//! resolution order, first match wins:
//! 1. the container of recognizable log controls, as first child;
//! 2. the console-action toolbar, appended;
//! 3. a synthesized wrapper immediately above the console output.
//!
//! When no anchor exists yet the caller re-runs the whole procedure after
//! a fixed delay, bounded by navigation away from the page rather than by
//! a retry count.

use crate::page::{ButtonSpec, InsertionPoint, PageSurface};

/// Outcome of one injection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    /// The control was inserted and its subtree activated.
    Inserted(InsertionPoint),
    /// The control already exists; nothing was touched.
    AlreadyPresent,
    /// Feature disabled and no cached explanation; nothing was touched.
    Suppressed,
    /// No usable anchor in the page yet; retry later.
    NoAnchor,
}

/// Attempt to inject the action control. Idempotent: a page that already
/// carries the control is never mutated, which also makes a stale poll
/// completing after injection a no-op.
pub fn inject_button<P: PageSurface>(page: &mut P) -> InjectOutcome {
    if page.has_explain_button() {
        return InjectOutcome::AlreadyPresent;
    }

    let ctx = page.context();
    if !ctx.plugin_enabled && !ctx.has_explanation {
        return InjectOutcome::Suppressed;
    }
    let spec = ButtonSpec::explain_error(&ctx.provider_name);

    let at = if page.has_labeled_controls() {
        InsertionPoint::LabeledControls
    } else if page.has_console_toolbar() {
        InsertionPoint::ConsoleToolbar
    } else if page.has_console_output() {
        InsertionPoint::AboveConsoleOutput
    } else {
        tracing::warn!("console output element not found, will retry");
        return InjectOutcome::NoAnchor;
    };

    page.insert_button(&spec, at);
    // Newly inserted controls are inert until the host rebinds behaviors.
    page.activate(at);
    tracing::debug!(?at, "explain button injected");
    InjectOutcome::Inserted(at)
}
