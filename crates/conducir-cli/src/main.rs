//! Conducir CLI: run the playground scenario suites.
//!
//! ```bash
//! conducir run --simulated              # run everything against the sim
//! conducir run --filter "date picker"   # run one suite in a real browser
//! conducir run --junit out/junit.xml --json out/results.json
//! conducir list                         # show suites and scenarios
//! ```

mod cli;
mod error;

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use conducir::{suites, Engine, RunConfig, ScenarioRunner, SimEngine};

use crate::cli::{Cli, Commands, RunArgs};
use crate::error::{CliError, CliResult};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> CliResult<bool> {
    match cli.command {
        Commands::List => {
            for suite in suites::all() {
                println!("{} ({} scenarios)", suite.name(), suite.len());
                for scenario in suite.scenarios() {
                    println!("  {}", scenario.name());
                }
            }
            Ok(true)
        }
        Commands::Run(args) => run_suites(args).await,
    }
}

async fn run_suites(args: RunArgs) -> CliResult<bool> {
    let config = build_config(&args);
    tracing::info!(
        base_url = %config.base_url,
        engine = %config.engine,
        workers = config.workers,
        retries = config.retries,
        "starting run"
    );

    let engine: Arc<dyn Engine> = if args.simulated {
        Arc::new(SimEngine::new())
    } else {
        launch_browser(&config).await?
    };

    let selected: Vec<_> = suites::all()
        .into_iter()
        .filter(|suite| {
            args.filter
                .as_ref()
                .map_or(true, |filter| suite.name().contains(filter.as_str()))
        })
        .collect();
    if selected.is_empty() {
        return Err(CliError::Unsupported(format!(
            "no suite matches filter {:?}",
            args.filter.unwrap_or_default()
        )));
    }

    let runner = ScenarioRunner::new(config, suites::registry(), Arc::clone(&engine));
    let report = runner.run(&selected).await;
    print!("{}", report.summary());

    if let Some(path) = &args.junit {
        report.write_junit(path)?;
        tracing::info!(path = %path.display(), "wrote junit report");
    }
    if let Some(path) = &args.json {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "wrote json report");
    }

    if let Err(e) = engine.shutdown().await {
        tracing::warn!(error = %e, "engine shutdown failed");
    }
    Ok(report.all_passed())
}

fn build_config(args: &RunArgs) -> RunConfig {
    let mut builder = RunConfig::builder();
    let env_defaults = RunConfig::from_env();
    builder = builder
        .base_url(args.base_url.clone().unwrap_or(env_defaults.base_url))
        .scenario_timeout_ms(args.timeout.unwrap_or(env_defaults.scenario_timeout_ms))
        .retries(args.retries.unwrap_or(env_defaults.retries))
        .workers(args.workers.unwrap_or(env_defaults.workers))
        .headless(!args.headed)
        .engine(args.engine.into());
    if let Some(artifacts) = &args.artifacts {
        builder = builder.artifact_dir(artifacts.clone());
    }
    builder.build()
}

#[cfg(feature = "browser")]
async fn launch_browser(config: &RunConfig) -> CliResult<Arc<dyn Engine>> {
    let engine = conducir::CdpEngine::launch(config).await?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "browser"))]
async fn launch_browser(_config: &RunConfig) -> CliResult<Arc<dyn Engine>> {
    Err(CliError::Unsupported(
        "this build has no browser support; rebuild with --features browser or pass --simulated"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::parse_from(argv);
        match cli.command {
            Commands::Run(args) => args,
            Commands::List => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_config_overrides() {
        let args = run_args(&[
            "conducir",
            "run",
            "--base-url",
            "http://localhost:4200",
            "--workers",
            "1",
            "--retries",
            "0",
            "--timeout",
            "5000",
            "--headed",
            "--artifacts",
            "shots",
        ]);
        let config = build_config(&args);
        assert_eq!(config.base_url, "http://localhost:4200");
        assert_eq!(config.workers, 1);
        assert_eq!(config.retries, 0);
        assert_eq!(config.scenario_timeout_ms, 5_000);
        assert!(!config.headless);
        assert_eq!(config.artifact_dir, std::path::PathBuf::from("shots"));
    }

    #[tokio::test]
    async fn test_simulated_run_of_health_check_suite() {
        let args = run_args(&[
            "conducir",
            "run",
            "--simulated",
            "--filter",
            "health check",
            "--timeout",
            "5000",
        ]);
        let all_passed = run_suites(args).await.unwrap();
        assert!(all_passed);
    }

    #[tokio::test]
    async fn test_unmatched_filter_is_an_error() {
        let args = run_args(&[
            "conducir",
            "run",
            "--simulated",
            "--filter",
            "no such suite",
        ]);
        assert!(run_suites(args).await.is_err());
    }
}
