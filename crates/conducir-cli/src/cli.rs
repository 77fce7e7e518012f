//! Argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use conducir::EngineKind;

/// Drive the demo playground's scenario suites
#[derive(Debug, Parser)]
#[command(name = "conducir", version, about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run scenario suites
    Run(RunArgs),
    /// List suites and scenarios without running them
    List,
}

/// Options for `conducir run`
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Only run suites whose name contains this filter
    #[arg(long)]
    pub filter: Option<String>,

    /// Base URL of the target application
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Bounded worker pool size
    #[arg(long)]
    pub workers: Option<usize>,

    /// Whole-scenario retries after a failed attempt
    #[arg(long)]
    pub retries: Option<u32>,

    /// Per-scenario timeout in milliseconds
    #[arg(long, env = "TEST_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Rendering engine family to target
    #[arg(long, value_enum, default_value_t = EngineArg::Chromium)]
    pub engine: EngineArg,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Drive the simulated playground instead of a real browser
    #[arg(long)]
    pub simulated: bool,

    /// Write a JUnit XML report to this path
    #[arg(long)]
    pub junit: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Directory for failure artifacts
    #[arg(long)]
    pub artifacts: Option<PathBuf>,
}

/// Engine families accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// Chromium-family browsers
    Chromium,
    /// Firefox-family browsers
    Firefox,
    /// WebKit-family browsers
    Webkit,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Chromium => Self::Chromium,
            EngineArg::Firefox => Self::Firefox,
            EngineArg::Webkit => Self::WebKit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flags() {
        let cli = Cli::parse_from([
            "conducir",
            "run",
            "--filter",
            "date picker",
            "--workers",
            "2",
            "--retries",
            "3",
            "--timeout",
            "30000",
            "--engine",
            "firefox",
            "--headed",
            "--simulated",
            "--junit",
            "out/junit.xml",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.filter.as_deref(), Some("date picker"));
        assert_eq!(args.workers, Some(2));
        assert_eq!(args.retries, Some(3));
        assert_eq!(args.timeout, Some(30_000));
        assert_eq!(args.engine, EngineArg::Firefox);
        assert!(args.headed);
        assert!(args.simulated);
        assert_eq!(args.junit.as_deref(), Some(std::path::Path::new("out/junit.xml")));
    }

    #[test]
    fn test_list_subcommand() {
        let cli = Cli::parse_from(["conducir", "list"]);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_engine_mapping() {
        assert_eq!(EngineKind::from(EngineArg::Chromium), EngineKind::Chromium);
        assert_eq!(EngineKind::from(EngineArg::Webkit), EngineKind::WebKit);
    }
}
