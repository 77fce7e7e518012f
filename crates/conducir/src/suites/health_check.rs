//! Harness wiring checks, kept trivial on purpose: when these fail, the
//! problem is the pipeline, not the playground.

use crate::fixture::FixtureContext;
use crate::result::{ConducirError, ConducirResult};
use crate::runner::{Scenario, ScenarioSuite};

/// Always-green scenarios verifying the runner and reporters
#[must_use]
pub fn suite() -> ScenarioSuite {
    let mut suite = ScenarioSuite::new("health check");
    suite.add(Scenario::new("system is working", |ctx| {
        Box::pin(system_is_working(ctx))
    }));
    suite.add(Scenario::new("can perform basic assertion", |ctx| {
        Box::pin(basic_assertion(ctx))
    }));
    suite
}

async fn system_is_working(_ctx: &FixtureContext) -> ConducirResult<()> {
    Ok(())
}

async fn basic_assertion(_ctx: &FixtureContext) -> ConducirResult<()> {
    let result = 1 + 1;
    if result == 2 {
        Ok(())
    } else {
        Err(ConducirError::assertion("2", result.to_string()))
    }
}
