//! Conducir: page-object end-to-end testing core.
//!
//! Scenario suites drive a third-party demo web application through page
//! objects; an engine-facing driver trait keeps the browser swappable.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Scenario ──requests──► FixtureContext ──builds──► PageObject  │
//! │     │                        │                        │        │
//! │     │                   one PageHandle           Locators      │
//! │     ▼                        │                        │        │
//! │  ScenarioRunner ──────► Engine/PageDriver ◄───resolve─┘        │
//! │  (retries, pool,        (CDP or simulated)                     │
//! │   teardown, report)                                            │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locators are declarative and auto-waiting; fixtures are per-scenario and
//! torn down with their page whatever the outcome; retries re-run whole
//! scenarios on fresh pages.

#![warn(missing_docs)]

mod config;
mod data;
mod driver;
mod fixture;
mod locator;
mod page;
mod page_object;
mod reporter;
mod result;
mod runner;
mod wait;

/// Page objects for the demo playground
pub mod pages;

/// Scenario suites and the standard fixture registry
pub mod suites;

/// Simulated playground engine, also the test double for the core
pub mod sim;

/// CDP browser engine (feature `browser`)
#[cfg(feature = "browser")]
pub mod browser;

pub use config::{
    EngineKind, RunConfig, RunConfigBuilder, DEFAULT_BASE_URL, DEFAULT_SCENARIO_TIMEOUT_MS,
};
pub use data::TestData;
pub use driver::{Engine, PageDriver};
pub use fixture::{FixtureContext, FixtureFactory, FixtureHook, FixtureRegistry, FixtureValue};
pub use locator::{expect, AriaRole, Expect, Locator, Strategy};
pub use page::PageHandle;
pub use page_object::PageObject;
pub use reporter::{RunReport, ScenarioRecord, ScenarioStatus};
pub use result::{ConducirError, ConducirResult};
pub use runner::{Scenario, ScenarioBody, ScenarioRunner, ScenarioSuite};
pub use wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};

#[cfg(feature = "browser")]
pub use browser::CdpEngine;
pub use sim::SimEngine;
