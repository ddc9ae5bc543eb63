//! The DOM seam
//!
//! The core never touches a live DOM. Everything it needs from the host
//! page goes through [`PageSurface`] (element queries, insertion, region
//! visibility) and [`Notifier`] (the shared banner). A real binding lives
//! in the host; tests use the recording fake from `explain-test-utils`.

use crate::types::{PageContext, Severity};

/// Fixed UI regions of the explanation card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The explanation card as a whole.
    Container,
    /// In-progress spinner inside the card.
    Spinner,
    /// Rendered explanation text inside the card.
    Content,
    /// The overwrite confirmation dialog.
    ConfirmDialog,
}

/// Where the action control ends up, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// First child of the container holding the recognized log controls
    /// ("Download", "Copy", "View as plain text").
    LabeledControls,
    /// Appended to the console-action toolbar.
    ConsoleToolbar,
    /// A synthesized wrapper immediately above the console output element.
    AboveConsoleOutput,
}

/// Specification of the action control handed to the host for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    /// Visible label.
    pub label: String,
    /// Tooltip naming the configured provider.
    pub tooltip: String,
}

impl ButtonSpec {
    /// The standard "Explain Error" control for the given provider.
    #[must_use]
    pub fn explain_error(provider_name: &str) -> Self {
        Self {
            label: "Explain Error".to_string(),
            tooltip: format!("Provider: {provider_name}"),
        }
    }
}

/// Host-page capabilities the core consumes.
///
/// One implementation exists per page load; components receive it
/// explicitly instead of re-querying global state.
pub trait PageSurface: Send {
    /// Whether the current location is still a job-run console view.
    fn is_console_view(&self) -> bool;

    /// Context attributes rendered into the page by the host.
    fn context(&self) -> &PageContext;

    /// Whether the action control is already present.
    fn has_explain_button(&self) -> bool;

    /// Whether a container with recognizable log-control labels exists.
    fn has_labeled_controls(&self) -> bool;

    /// Whether a console-action toolbar element exists.
    fn has_console_toolbar(&self) -> bool;

    /// Whether the console output element exists.
    fn has_console_output(&self) -> bool;

    /// Insert the action control at the resolved point.
    fn insert_button(&mut self, spec: &ButtonSpec, at: InsertionPoint);

    /// Trigger the host's declarative-behavior rebinding on the subtree
    /// that received the new control, so nested controls become live.
    fn activate(&mut self, at: InsertionPoint);

    /// Toggle one of the fixed regions.
    fn set_region_visible(&mut self, region: Region, visible: bool);

    /// Set the card title.
    fn set_title(&mut self, title: &str);

    /// Set the explanation text.
    fn set_content(&mut self, text: &str);

    /// Empty the explanation text region.
    fn clear_content(&mut self);

    /// Set the cached-explanation timestamp shown in the dialog.
    fn set_confirm_timestamp(&mut self, timestamp: &str);
}

/// The shared process-wide notification banner.
pub trait Notifier: Send {
    /// Show a message at the given severity.
    fn show(&mut self, message: &str, severity: Severity);
}

/// Whether a path names a job-run console view.
///
/// Polling and injection only run on such pages, and never on the
/// explanation-viewing sub-page.
#[must_use]
pub fn is_console_path(path: &str) -> bool {
    if path.contains("/error-explanation") {
        return false;
    }
    let trimmed = path.trim_end_matches('/');
    trimmed.ends_with("/console") || trimmed.ends_with("/consoleFull")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_paths_recognized() {
        assert!(is_console_path("/job/app/42/console"));
        assert!(is_console_path("/job/app/42/console/"));
        assert!(is_console_path("/job/app/42/consoleFull"));
    }

    #[test]
    fn non_console_paths_rejected() {
        assert!(!is_console_path("/job/app/42"));
        assert!(!is_console_path("/job/app/42/artifacts"));
        assert!(!is_console_path("/job/app/42/error-explanation/"));
        assert!(!is_console_path("/job/app/42/error-explanation/console"));
    }

    #[test]
    fn button_spec_carries_provider_tooltip() {
        let spec = ButtonSpec::explain_error("Gemini");
        assert_eq!(spec.label, "Explain Error");
        assert_eq!(spec.tooltip, "Provider: Gemini");
    }
}
