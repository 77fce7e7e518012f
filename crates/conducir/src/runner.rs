//! Scenario runner: isolation, retries, bounded parallelism, teardown.
//!
//! One scenario gets one fresh page and one fixture scope per attempt.
//! Retries re-run the whole scenario from scratch; partial progress from a
//! failed attempt is discarded, never resumed. Scenarios of a suite run
//! across a bounded worker pool, while operations inside one scenario
//! execute strictly in program order. Whatever the outcome, the fixture
//! scope is torn down before the record is produced, so no page object can
//! outlive its scenario.
//!
//! Errors are never retried inside page-object operations; retry lives here,
//! at scenario granularity, and failures are recorded together with a
//! best-effort screenshot artifact.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tokio::sync::Semaphore;

use crate::config::RunConfig;
use crate::driver::Engine;
use crate::fixture::{FixtureContext, FixtureRegistry};
use crate::reporter::{RunReport, ScenarioRecord};
use crate::result::{ConducirError, ConducirResult};

/// Async body of a scenario, invoked once per attempt
pub type ScenarioBody =
    Arc<dyn for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<()>> + Send + Sync>;

/// One executable scenario with a single pass/fail/skip outcome
#[derive(Clone)]
pub struct Scenario {
    name: String,
    body: ScenarioBody,
    skip: bool,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("skip", &self.skip)
            .finish_non_exhaustive()
    }
}

fn noop_body(_ctx: &FixtureContext) -> BoxFuture<'_, ConducirResult<()>> {
    Box::pin(async { Ok(()) })
}

impl Scenario {
    /// Create a scenario from a name and an async body
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
            skip: false,
        }
    }

    /// Create a scenario that is recorded as skipped without running
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: Arc::new(noop_body),
            skip: true,
        }
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    const fn is_skip(&self) -> bool {
        self.skip
    }

    async fn run(&self, ctx: &FixtureContext) -> ConducirResult<()> {
        (self.body)(ctx).await
    }
}

/// An ordered collection of scenarios sharing a preamble
#[derive(Clone)]
pub struct ScenarioSuite {
    name: String,
    before_each: Option<ScenarioBody>,
    scenarios: Vec<Scenario>,
}

impl fmt::Debug for ScenarioSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioSuite")
            .field("name", &self.name)
            .field("scenarios", &self.scenarios.len())
            .finish_non_exhaustive()
    }
}

impl ScenarioSuite {
    /// Create an empty suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_each: None,
            scenarios: Vec::new(),
        }
    }

    /// Attach a preamble run before every scenario body in this suite
    #[must_use]
    pub fn with_before_each<F>(mut self, before: F) -> Self
    where
        F: for<'a> Fn(&'a FixtureContext) -> BoxFuture<'a, ConducirResult<()>>
            + Send
            + Sync
            + 'static,
    {
        self.before_each = Some(Arc::new(before));
        self
    }

    /// Append a scenario
    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Suite name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scenarios in declaration order
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the suite has no scenarios
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Runs suites against an engine with a per-run fixture registry
pub struct ScenarioRunner {
    config: RunConfig,
    registry: Arc<FixtureRegistry>,
    engine: Arc<dyn Engine>,
}

impl fmt::Debug for ScenarioRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl ScenarioRunner {
    /// Create a runner from a config, registry, and engine
    #[must_use]
    pub fn new(config: RunConfig, registry: FixtureRegistry, engine: Arc<dyn Engine>) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            engine,
        }
    }

    /// The runner's configuration
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every suite in order and aggregate the records
    pub async fn run(&self, suites: &[ScenarioSuite]) -> RunReport {
        let mut report = RunReport::new("conducir");
        for suite in suites {
            tracing::info!(suite = suite.name(), scenarios = suite.len(), "running suite");
            report.extend(self.run_suite(suite).await);
        }
        report
    }

    /// Run one suite across the bounded worker pool
    pub async fn run_suite(&self, suite: &ScenarioSuite) -> Vec<ScenarioRecord> {
        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let mut handles = Vec::with_capacity(suite.len());

        for scenario in suite.scenarios() {
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();
            let registry = Arc::clone(&self.registry);
            let engine = Arc::clone(&self.engine);
            let suite_name = suite.name().to_string();
            let before_each = suite.before_each.clone();
            let scenario = scenario.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("worker pool closed");
                run_scenario(
                    &config,
                    &registry,
                    engine.as_ref(),
                    &suite_name,
                    before_each.as_ref(),
                    &scenario,
                )
                .await
            }));
        }

        let mut records = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(record) => records.push(record),
                Err(e) => records.push(ScenarioRecord::failed(
                    suite.name(),
                    "<worker>",
                    Duration::ZERO,
                    0,
                    format!("worker panicked: {e}"),
                )),
            }
        }
        records
    }
}

async fn run_scenario(
    config: &RunConfig,
    registry: &Arc<FixtureRegistry>,
    engine: &dyn Engine,
    suite: &str,
    before_each: Option<&ScenarioBody>,
    scenario: &Scenario,
) -> ScenarioRecord {
    if scenario.is_skip() {
        tracing::info!(suite, scenario = scenario.name(), "skipped");
        return ScenarioRecord::skipped(suite, scenario.name());
    }

    let attempts = config.retries + 1;
    let started = Instant::now();
    let mut last_error = String::new();
    let mut screenshot = None;

    for attempt in 1..=attempts {
        match run_attempt(config, registry, engine, suite, before_each, scenario, attempt).await {
            Ok(()) => {
                tracing::info!(suite, scenario = scenario.name(), attempt, "passed");
                return ScenarioRecord::passed(suite, scenario.name(), started.elapsed(), attempt);
            }
            Err((error, shot)) => {
                tracing::warn!(
                    suite,
                    scenario = scenario.name(),
                    attempt,
                    error = %error,
                    "attempt failed"
                );
                last_error = error.to_string();
                if shot.is_some() {
                    screenshot = shot;
                }
            }
        }
    }

    let mut record =
        ScenarioRecord::failed(suite, scenario.name(), started.elapsed(), attempts, last_error);
    if let Some(path) = screenshot {
        record = record.with_screenshot(path);
    }
    record
}

/// One attempt on a fresh page, with guaranteed teardown
async fn run_attempt(
    config: &RunConfig,
    registry: &Arc<FixtureRegistry>,
    engine: &dyn Engine,
    suite: &str,
    before_each: Option<&ScenarioBody>,
    scenario: &Scenario,
    attempt: u32,
) -> Result<(), (ConducirError, Option<PathBuf>)> {
    let page = engine.new_page().await.map_err(|e| (e, None))?;
    let page = page.with_base_url(config.base_url.clone());
    let ctx = FixtureContext::new(scenario.name(), page, Arc::clone(registry));

    let body = async {
        ctx.run_hooks().await?;
        if let Some(before) = before_each {
            before(&ctx).await?;
        }
        scenario.run(&ctx).await
    };
    let outcome = match tokio::time::timeout(config.scenario_timeout(), body).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ConducirError::Timeout {
            ms: config.scenario_timeout_ms,
        }),
    };

    let screenshot = if outcome.is_err() {
        capture_failure_screenshot(config, &ctx, suite, scenario.name(), attempt).await
    } else {
        None
    };

    if let Err(teardown_error) = ctx.teardown().await {
        tracing::warn!(
            suite,
            scenario = scenario.name(),
            error = %teardown_error,
            "teardown failed"
        );
    }

    outcome.map_err(|e| (e, screenshot))
}

async fn capture_failure_screenshot(
    config: &RunConfig,
    ctx: &FixtureContext,
    suite: &str,
    scenario: &str,
    attempt: u32,
) -> Option<PathBuf> {
    let bytes = ctx.page().screenshot().await.ok()?;
    if bytes.is_empty() {
        return None;
    }
    let filename = format!(
        "{}-{}-attempt{attempt}.png",
        sanitize(suite),
        sanitize(scenario)
    );
    let path = config.artifact_dir.join(filename);
    std::fs::create_dir_all(&config.artifact_dir).ok()?;
    std::fs::write(&path, bytes).ok()?;
    Some(path)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageHandle;
    use crate::reporter::ScenarioStatus;
    use crate::sim::SimEngine;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn runner(config: RunConfig) -> ScenarioRunner {
        ScenarioRunner::new(config, FixtureRegistry::new(), Arc::new(SimEngine::new()))
    }

    fn quick_config() -> RunConfig {
        RunConfig::builder()
            .scenario_timeout_ms(2_000)
            .retries(0)
            .workers(2)
            .build()
    }

    async fn passing(_ctx: &FixtureContext) -> ConducirResult<()> {
        Ok(())
    }

    async fn failing(_ctx: &FixtureContext) -> ConducirResult<()> {
        Err(ConducirError::PageClosed)
    }

    #[tokio::test]
    async fn test_passing_scenario_recorded() {
        let mut suite = ScenarioSuite::new("smoke");
        suite.add(Scenario::new("works", |ctx| Box::pin(passing(ctx))));

        let records = runner(quick_config()).run_suite(&suite).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, ScenarioStatus::Passed);
        assert_eq!(records[0].attempts, 1);
    }

    #[tokio::test]
    async fn test_failing_scenario_keeps_typed_message() {
        let mut suite = ScenarioSuite::new("smoke");
        suite.add(Scenario::new("breaks", |ctx| Box::pin(failing(ctx))));

        let records = runner(quick_config()).run_suite(&suite).await;
        assert_eq!(records[0].status, ScenarioStatus::Failed);
        assert!(records[0]
            .error
            .as_deref()
            .unwrap()
            .contains("page handle is closed"));
    }

    #[tokio::test]
    async fn test_skipped_scenario_never_runs() {
        let mut suite = ScenarioSuite::new("smoke");
        suite.add(Scenario::skipped("later"));

        let records = runner(quick_config()).run_suite(&suite).await;
        assert_eq!(records[0].status, ScenarioStatus::Skipped);
        assert_eq!(records[0].attempts, 0);
    }

    #[tokio::test]
    async fn test_retry_reruns_from_scratch_and_passes() {
        static ATTEMPTS: AtomicU32 = AtomicU32::new(0);

        async fn flaky(ctx: &FixtureContext) -> ConducirResult<()> {
            // a fresh attempt always starts on a blank page
            assert_eq!(ctx.page().current_url().await?, "about:blank");
            ctx.page().goto("/pages/iot-dashboard").await?;
            if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ConducirError::PageClosed);
            }
            Ok(())
        }

        let mut suite = ScenarioSuite::new("smoke");
        suite.add(Scenario::new("flaky", |ctx| Box::pin(flaky(ctx))));

        let config = RunConfig::builder()
            .base_url("")
            .scenario_timeout_ms(2_000)
            .retries(1)
            .build();
        let records = runner(config).run_suite(&suite).await;
        assert_eq!(records[0].status, ScenarioStatus::Passed);
        assert_eq!(records[0].attempts, 2);
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        async fn sleepy(_ctx: &FixtureContext) -> ConducirResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }

        let mut suite = ScenarioSuite::new("smoke");
        suite.add(Scenario::new("sleepy", |ctx| Box::pin(sleepy(ctx))));

        let config = RunConfig::builder()
            .scenario_timeout_ms(100)
            .retries(0)
            .build();
        let records = runner(config).run_suite(&suite).await;
        assert_eq!(records[0].status, ScenarioStatus::Failed);
        assert!(records[0].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_page_torn_down_after_failure() {
        static LEAKED: Mutex<Option<PageHandle>> = Mutex::new(None);

        async fn leaky(ctx: &FixtureContext) -> ConducirResult<()> {
            *LEAKED.lock().unwrap() = Some(ctx.page().clone());
            Err(ConducirError::PageClosed)
        }

        let mut suite = ScenarioSuite::new("smoke");
        suite.add(Scenario::new("leaky", |ctx| Box::pin(leaky(ctx))));

        let _ = runner(quick_config()).run_suite(&suite).await;
        let handle = LEAKED.lock().unwrap().take().unwrap();
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_before_each_runs_ahead_of_body() {
        async fn preamble(ctx: &FixtureContext) -> ConducirResult<()> {
            ctx.page().goto("/pages/forms/layouts").await
        }

        async fn body(ctx: &FixtureContext) -> ConducirResult<()> {
            let url = ctx.page().current_url().await?;
            if url == "/pages/forms/layouts" {
                Ok(())
            } else {
                Err(ConducirError::assertion("/pages/forms/layouts", url))
            }
        }

        let mut suite =
            ScenarioSuite::new("smoke").with_before_each(|ctx| Box::pin(preamble(ctx)));
        suite.add(Scenario::new("sees preamble", |ctx| Box::pin(body(ctx))));

        let config = RunConfig::builder()
            .base_url("")
            .scenario_timeout_ms(2_000)
            .build();
        let records = runner(config).run_suite(&suite).await;
        assert_eq!(records[0].status, ScenarioStatus::Passed);
    }
}
