//! Run configuration for the scenario runner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default scenario timeout (60 seconds, generous for external URLs)
pub const DEFAULT_SCENARIO_TIMEOUT_MS: u64 = 60_000;

/// Base URL of the demo playground the suites target
pub const DEFAULT_BASE_URL: &str = "https://playground.bondaracademy.com";

/// Rendering engine family to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineKind {
    /// Chromium-family browsers
    #[default]
    Chromium,
    /// Firefox-family browsers
    Firefox,
    /// WebKit-family browsers
    WebKit,
}

impl EngineKind {
    /// Engine name as used in reports and CLI flags
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Firefox => "firefox",
            Self::WebKit => "webkit",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for one run of the scenario suites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base URL relative navigation targets are joined against
    pub base_url: String,
    /// Timeout for one scenario attempt, in milliseconds
    pub scenario_timeout_ms: u64,
    /// Whole-scenario retries after a failed attempt
    pub retries: u32,
    /// Bounded worker pool size for parallel scenarios
    pub workers: usize,
    /// Run the browser headless
    pub headless: bool,
    /// Rendering engine family
    pub engine: EngineKind,
    /// Directory failure artifacts (screenshots, reports) are written to
    pub artifact_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            scenario_timeout_ms: DEFAULT_SCENARIO_TIMEOUT_MS,
            retries: 1,
            workers: 4,
            headless: true,
            engine: EngineKind::Chromium,
            artifact_dir: PathBuf::from("test-results"),
        }
    }
}

impl RunConfig {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Defaults adjusted by the environment.
    ///
    /// On CI (`CI` set and non-empty) scenarios run sequentially with more
    /// retries to ride out resource constraints; `BASE_URL` and
    /// `TEST_TIMEOUT` override their respective settings when present.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let is_ci = std::env::var("CI").is_ok_and(|v| !v.is_empty());
        if is_ci {
            config.retries = 3;
            config.workers = 1;
        }
        if let Ok(base_url) = std::env::var("BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        if let Some(timeout) = std::env::var("TEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.scenario_timeout_ms = timeout;
        }
        config
    }

    /// Scenario timeout as a Duration
    #[must_use]
    pub const fn scenario_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.scenario_timeout_ms)
    }
}

/// Builder for [`RunConfig`]
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the per-scenario timeout in milliseconds
    #[must_use]
    pub const fn scenario_timeout_ms(mut self, ms: u64) -> Self {
        self.config.scenario_timeout_ms = ms;
        self
    }

    /// Set the retry count
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the worker pool size
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.max(1);
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set the engine family
    #[must_use]
    pub const fn engine(mut self, engine: EngineKind) -> Self {
        self.config.engine = engine;
        self
    }

    /// Set the artifact directory
    #[must_use]
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.artifact_dir = dir.into();
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> RunConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_profile() {
        let config = RunConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.scenario_timeout_ms, 60_000);
        assert_eq!(config.retries, 1);
        assert_eq!(config.workers, 4);
        assert!(config.headless);
        assert_eq!(config.engine, EngineKind::Chromium);
    }

    #[test]
    fn test_builder_chained() {
        let config = RunConfig::builder()
            .base_url("http://localhost:4200")
            .scenario_timeout_ms(5_000)
            .retries(2)
            .workers(8)
            .headless(false)
            .engine(EngineKind::Firefox)
            .artifact_dir("artifacts")
            .build();

        assert_eq!(config.base_url, "http://localhost:4200");
        assert_eq!(config.scenario_timeout_ms, 5_000);
        assert_eq!(config.retries, 2);
        assert_eq!(config.workers, 8);
        assert!(!config.headless);
        assert_eq!(config.engine, EngineKind::Firefox);
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_workers_clamped_to_one() {
        let config = RunConfig::builder().workers(0).build();
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_engine_kind_names() {
        assert_eq!(EngineKind::Chromium.as_str(), "chromium");
        assert_eq!(EngineKind::Firefox.as_str(), "firefox");
        assert_eq!(EngineKind::WebKit.as_str(), "webkit");
    }
}
