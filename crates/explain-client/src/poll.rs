//! Build-status polling
//!
//! One poll is a single POST to the status-check endpoint. Failures fail
//! open: the run is reported as completed-and-failed so the action becomes
//! available instead of silently never appearing. The re-poll cadence
//! while the run is in progress lives in the session loop.

use crate::api::ExplainApi;
use crate::types::BuildStatus;

/// Query the run's status once, failing open on any endpoint error.
pub async fn poll_build_status<A: ExplainApi + ?Sized>(api: &A) -> BuildStatus {
    match api.check_build_status().await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "build status check failed, assuming run completed");
            BuildStatus::CompletedFailed
        }
    }
}
