//! Overwrite confirmation dialog
//!
//! The dialog and the main card are mutually exclusive: showing the dialog
//! hides the card. Hiding the dialog does not re-show the card; resolving
//! the user's choice is the coordinator's job. The dialog's controls are
//! wired once by the host and route through the session's event channel,
//! so wiring survives repeated show/hide cycles.

use crate::page::{PageSurface, Region};

/// Show the dialog with the cached explanation's timestamp, hiding the
/// main card.
pub fn show_dialog<P: PageSurface>(page: &mut P, timestamp: &str) {
    page.set_confirm_timestamp(timestamp);
    page.set_region_visible(Region::Container, false);
    page.set_region_visible(Region::ConfirmDialog, true);
}

/// Hide the dialog only.
pub fn hide_dialog<P: PageSurface>(page: &mut P) {
    page.set_region_visible(Region::ConfirmDialog, false);
}
