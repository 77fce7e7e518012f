//! CLI error type.

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the terminal
#[derive(Debug, Error)]
pub enum CliError {
    /// A suite, runner, or report operation failed
    #[error(transparent)]
    Conducir(#[from] conducir::ConducirError),

    /// The requested mode is not available in this build
    #[error("{0}")]
    Unsupported(String),
}
