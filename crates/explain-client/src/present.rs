//! Presentation updates for the explanation card
//!
//! Small, total operations over the fixed regions. The invariant that the
//! spinner and the result text are never visible together is enforced
//! here, not left to callers.

use crate::page::{PageSurface, Region};

/// Reveal the card with the spinner running. The result text is hidden so
/// the two are never visible at once.
pub fn show_spinner<P: PageSurface>(page: &mut P) {
    page.set_region_visible(Region::Container, true);
    page.set_region_visible(Region::Content, false);
    page.set_region_visible(Region::Spinner, true);
}

/// Render a finished explanation: title reflects the provider, spinner
/// goes away, result text becomes visible.
pub fn show_explanation<P: PageSurface>(page: &mut P, message: &str, provider_name: &str) {
    page.set_title(&format!("AI Error Explanation ({provider_name})"));
    page.set_region_visible(Region::Container, true);
    page.set_region_visible(Region::Spinner, false);
    page.set_content(message);
    page.set_region_visible(Region::Content, true);
}

/// Hide the card. Content is left in place; it is only cleared explicitly
/// before a forced regeneration.
pub fn hide_container<P: PageSurface>(page: &mut P) {
    page.set_region_visible(Region::Container, false);
}

/// Hide and empty the result text region, so stale text is never shown
/// under a fresh spinner. Used only at the start of a forced regeneration.
pub fn clear_content<P: PageSurface>(page: &mut P) {
    page.set_region_visible(Region::Content, false);
    page.clear_content();
}
