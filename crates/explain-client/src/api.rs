//! Backend endpoint seam
//!
//! [`ExplainApi`] is the narrow interface over the three POST endpoints of
//! the backend action. [`HttpExplainApi`] is the real implementation:
//! form-encoded bodies, JSON responses, and the request-forgery crumb from
//! a host-provided [`CrumbSource`] on every call.

use crate::error::ApiError;
use crate::types::{
    BuildStatus, BuildStatusPayload, CachedExplanation, ExplanationResult, PageContext,
};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Response of the explain endpoint.
///
/// A non-success HTTP status does not abort processing: the body is still
/// parsed for an application-level status, so both facts travel together.
#[derive(Debug)]
pub struct ExplainResponse {
    /// Whether the HTTP status was a success.
    pub http_ok: bool,
    /// The parsed body, or why parsing failed.
    pub body: Result<ExplanationResult, ApiError>,
}

/// The three backend endpoints, relative to the run's base path.
#[async_trait]
pub trait ExplainApi: Send + Sync {
    /// POST `checkBuildStatus`.
    async fn check_build_status(&self) -> Result<BuildStatus, ApiError>;

    /// POST `checkExistingExplanation`.
    async fn check_existing_explanation(&self) -> Result<CachedExplanation, ApiError>;

    /// POST `explainConsoleError`, with `forceNew=true` in the body when
    /// `force_new` is set (empty body otherwise).
    ///
    /// # Errors
    /// Only transport-level failures are errors here; HTTP status and body
    /// problems are reported inside [`ExplainResponse`].
    async fn explain(&self, force_new: bool) -> Result<ExplainResponse, ApiError>;
}

#[async_trait]
impl<T: ExplainApi + ?Sized> ExplainApi for Arc<T> {
    async fn check_build_status(&self) -> Result<BuildStatus, ApiError> {
        (**self).check_build_status().await
    }

    async fn check_existing_explanation(&self) -> Result<CachedExplanation, ApiError> {
        (**self).check_existing_explanation().await
    }

    async fn explain(&self, force_new: bool) -> Result<ExplainResponse, ApiError> {
        (**self).explain(force_new).await
    }
}

/// Source of the request-forgery-protection header pair.
///
/// Token minting belongs to the host; the client only merges the pair
/// into outgoing request headers.
pub trait CrumbSource: Send + Sync {
    /// The `(header name, value)` pair, if the host issued one.
    fn crumb(&self) -> Option<(String, String)>;
}

/// A fixed crumb captured once at page load.
#[derive(Debug, Clone)]
pub struct StaticCrumb {
    field: String,
    value: String,
}

impl StaticCrumb {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl CrumbSource for StaticCrumb {
    fn crumb(&self) -> Option<(String, String)> {
        Some((self.field.clone(), self.value.clone()))
    }
}

/// HTTP implementation of [`ExplainApi`] over reqwest.
#[derive(Clone)]
pub struct HttpExplainApi {
    client: reqwest::Client,
    base: Url,
    crumb: Arc<dyn CrumbSource>,
}

impl std::fmt::Debug for HttpExplainApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExplainApi")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpExplainApi {
    /// Derive the endpoint base `<root>/<run>console-explain-error/` from
    /// the page context.
    ///
    /// # Errors
    /// [`ApiError::InvalidEndpoint`] if the context does not form a URL.
    pub fn new(ctx: &PageContext, crumb: Arc<dyn CrumbSource>) -> Result<Self, ApiError> {
        let base = Url::parse(&format!(
            "{}/{}console-explain-error/",
            ctx.root_url.trim_end_matches('/'),
            ensure_trailing_slash(ctx.run_url.trim_start_matches('/')),
        ))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
            crumb,
        })
    }

    /// Endpoint base, mainly for logging.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn post_form(&self, endpoint: &str, body: &str) -> Result<reqwest::Response, ApiError> {
        let url = self.base.join(endpoint)?;
        let mut request = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body.to_string());
        if let Some((field, value)) = self.crumb.crumb() {
            request = request.header(field.as_str(), value.as_str());
        }
        Ok(request.send().await?)
    }
}

fn ensure_trailing_slash(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

#[async_trait]
impl ExplainApi for HttpExplainApi {
    async fn check_build_status(&self) -> Result<BuildStatus, ApiError> {
        let response = self.post_form("checkBuildStatus", "").await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        let payload: BuildStatusPayload = serde_json::from_str(&body)?;
        Ok(payload.into())
    }

    async fn check_existing_explanation(&self) -> Result<CachedExplanation, ApiError> {
        let response = self.post_form("checkExistingExplanation", "").await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn explain(&self, force_new: bool) -> Result<ExplainResponse, ApiError> {
        let body = if force_new { "forceNew=true" } else { "" };
        let response = self.post_form("explainConsoleError", body).await?;
        let http_ok = response.status().is_success();
        let text = response.text().await?;
        let body = serde_json::from_str::<ExplanationResult>(&text).map_err(ApiError::from);
        Ok(ExplainResponse { http_ok, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PageContext {
        PageContext::from_attributes(
            "https://ci.example.com/",
            "job/app/42/",
            "OpenAI",
            "false",
            "true",
        )
    }

    #[test]
    fn base_url_derivation() {
        let api = HttpExplainApi::new(&ctx(), Arc::new(StaticCrumb::new("Jenkins-Crumb", "c")))
            .unwrap();
        assert_eq!(
            api.base().as_str(),
            "https://ci.example.com/job/app/42/console-explain-error/"
        );
    }

    #[test]
    fn base_url_tolerates_missing_slashes() {
        let ctx = PageContext::from_attributes(
            "https://ci.example.com",
            "/job/app/42",
            "OpenAI",
            "false",
            "true",
        );
        let api =
            HttpExplainApi::new(&ctx, Arc::new(StaticCrumb::new("Jenkins-Crumb", "c"))).unwrap();
        assert_eq!(
            api.base().as_str(),
            "https://ci.example.com/job/app/42/console-explain-error/"
        );
    }

    #[test]
    fn invalid_root_is_rejected() {
        let ctx = PageContext::from_attributes("not a url", "job/app/42/", "x", "false", "true");
        let result = HttpExplainApi::new(&ctx, Arc::new(StaticCrumb::new("f", "v")));
        assert!(matches!(result, Err(ApiError::InvalidEndpoint(_))));
    }
}
