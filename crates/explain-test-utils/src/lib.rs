//! Testing utilities for the console-explain workspace
//!
//! Shared fakes and fixtures: a recording page surface, a scripted
//! endpoint client, and a collecting notifier.

use async_trait::async_trait;
use explain_client::api::{ExplainApi, ExplainResponse};
use explain_client::error::ApiError;
use explain_client::page::{ButtonSpec, InsertionPoint, Notifier, PageSurface, Region};
use explain_client::types::{
    BuildStatus, CachedExplanation, ExplainStatus, ExplanationResult, PageContext, Severity,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A standard page context for tests.
pub fn test_context() -> PageContext {
    PageContext::from_attributes(
        "https://ci.example.com",
        "job/app/42/",
        "OpenAI",
        "false",
        "true",
    )
}

/// Recording in-memory page surface.
///
/// Every mutation is counted so tests can assert "no DOM mutation at all".
#[derive(Debug)]
pub struct FakePage {
    pub ctx: PageContext,
    pub console_view: bool,
    pub labeled_controls: bool,
    pub console_toolbar: bool,
    pub console_output: bool,
    pub button: Option<ButtonSpec>,
    pub inserted_at: Option<InsertionPoint>,
    pub activations: Vec<InsertionPoint>,
    pub title: String,
    pub content: String,
    pub content_clears: u32,
    pub confirm_timestamp: String,
    pub mutations: u32,
    /// When set, overrides `console_output` so tests can make the anchor
    /// appear while a session owns the page.
    pub late_console_output: Option<Arc<AtomicBool>>,
    visible: HashMap<Region, bool>,
}

impl FakePage {
    /// A console view whose only anchor is the console output element.
    #[must_use]
    pub fn console(ctx: PageContext) -> Self {
        Self {
            ctx,
            console_view: true,
            labeled_controls: false,
            console_toolbar: false,
            console_output: true,
            button: None,
            inserted_at: None,
            activations: Vec::new(),
            title: String::new(),
            content: String::new(),
            content_clears: 0,
            confirm_timestamp: String::new(),
            mutations: 0,
            late_console_output: None,
            visible: HashMap::new(),
        }
    }

    /// A console view with none of the anchors rendered yet.
    #[must_use]
    pub fn without_anchors(ctx: PageContext) -> Self {
        let mut page = Self::console(ctx);
        page.console_output = false;
        page
    }

    /// Visibility of a region; hidden until shown.
    #[must_use]
    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.get(&region).copied().unwrap_or(false)
    }
}

impl PageSurface for FakePage {
    fn is_console_view(&self) -> bool {
        self.console_view
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn has_explain_button(&self) -> bool {
        self.button.is_some()
    }

    fn has_labeled_controls(&self) -> bool {
        self.labeled_controls
    }

    fn has_console_toolbar(&self) -> bool {
        self.console_toolbar
    }

    fn has_console_output(&self) -> bool {
        match &self.late_console_output {
            Some(switch) => switch.load(Ordering::SeqCst),
            None => self.console_output,
        }
    }

    fn insert_button(&mut self, spec: &ButtonSpec, at: InsertionPoint) {
        self.mutations += 1;
        self.button = Some(spec.clone());
        self.inserted_at = Some(at);
    }

    fn activate(&mut self, at: InsertionPoint) {
        self.activations.push(at);
    }

    fn set_region_visible(&mut self, region: Region, visible: bool) {
        self.mutations += 1;
        self.visible.insert(region, visible);
    }

    fn set_title(&mut self, title: &str) {
        self.mutations += 1;
        self.title = title.to_string();
    }

    fn set_content(&mut self, text: &str) {
        self.mutations += 1;
        self.content = text.to_string();
    }

    fn clear_content(&mut self) {
        self.mutations += 1;
        self.content.clear();
        self.content_clears += 1;
    }

    fn set_confirm_timestamp(&mut self, timestamp: &str) {
        self.mutations += 1;
        self.confirm_timestamp = timestamp.to_string();
    }
}

/// Scripted endpoint client: responses are consumed front-to-back, and
/// every call is recorded.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    statuses: Mutex<VecDeque<Result<BuildStatus, ApiError>>>,
    cache_checks: Mutex<VecDeque<Result<CachedExplanation, ApiError>>>,
    explains: Mutex<VecDeque<Result<ExplainResponse, ApiError>>>,
    /// `force_new` flag of each explain call, in order.
    pub explain_calls: Mutex<Vec<bool>>,
    /// Number of status polls issued.
    pub status_calls: Mutex<u32>,
    /// Number of cache checks issued.
    pub cache_calls: Mutex<u32>,
}

impl ScriptedApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(self, status: Result<BuildStatus, ApiError>) -> Self {
        self.statuses.lock().unwrap().push_back(status);
        self
    }

    #[must_use]
    pub fn with_cache_check(self, cached: Result<CachedExplanation, ApiError>) -> Self {
        self.cache_checks.lock().unwrap().push_back(cached);
        self
    }

    #[must_use]
    pub fn with_explain(self, response: Result<ExplainResponse, ApiError>) -> Self {
        self.explains.lock().unwrap().push_back(response);
        self
    }

    /// Shorthand: script a cache miss.
    #[must_use]
    pub fn with_cache_miss(self) -> Self {
        self.with_cache_check(Ok(CachedExplanation {
            has_explanation: false,
            timestamp: String::new(),
        }))
    }

    /// Shorthand: script a cache hit with the given timestamp.
    #[must_use]
    pub fn with_cache_hit(self, timestamp: &str) -> Self {
        self.with_cache_check(Ok(CachedExplanation {
            has_explanation: true,
            timestamp: timestamp.to_string(),
        }))
    }

    #[must_use]
    pub fn explain_call_flags(&self) -> Vec<bool> {
        self.explain_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn status_call_count(&self) -> u32 {
        *self.status_calls.lock().unwrap()
    }
}

/// A successful explain response.
#[must_use]
pub fn explain_success(message: &str, provider_name: &str) -> ExplainResponse {
    explain_with_status(true, ExplainStatus::Success, message, provider_name)
}

/// An explain response with explicit HTTP and application status.
#[must_use]
pub fn explain_with_status(
    http_ok: bool,
    status: ExplainStatus,
    message: &str,
    provider_name: &str,
) -> ExplainResponse {
    ExplainResponse {
        http_ok,
        body: Ok(ExplanationResult {
            status,
            message: message.to_string(),
            provider_name: provider_name.to_string(),
        }),
    }
}

/// An explain response whose body failed to parse.
#[must_use]
pub fn explain_malformed(http_ok: bool) -> ExplainResponse {
    let parse_err = serde_json::from_str::<ExplanationResult>("<html>").unwrap_err();
    ExplainResponse {
        http_ok,
        body: Err(ApiError::MalformedBody(parse_err)),
    }
}

#[async_trait]
impl ExplainApi for ScriptedApi {
    async fn check_build_status(&self) -> Result<BuildStatus, ApiError> {
        *self.status_calls.lock().unwrap() += 1;
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted build status response left")
    }

    async fn check_existing_explanation(&self) -> Result<CachedExplanation, ApiError> {
        *self.cache_calls.lock().unwrap() += 1;
        self.cache_checks
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted cache-check response left")
    }

    async fn explain(&self, force_new: bool) -> Result<ExplainResponse, ApiError> {
        self.explain_calls.lock().unwrap().push(force_new);
        self.explains
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted explain response left")
    }
}

/// Notifier that collects every banner message.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    pub messages: Vec<(String, Severity)>,
}

impl CollectingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for CollectingNotifier {
    fn show(&mut self, message: &str, severity: Severity) {
        self.messages.push((message.to_string(), severity));
    }
}
