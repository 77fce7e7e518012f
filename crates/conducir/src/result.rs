//! Result and error types for Conducir.

use thiserror::Error;

/// Result type for Conducir operations
pub type ConducirResult<T> = Result<T, ConducirError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum ConducirError {
    /// Locator resolved to zero matches within the timeout
    #[error("no element matching {strategy} within {timeout_ms}ms")]
    ElementNotFound {
        /// Description of the selection strategy
        strategy: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// A uniqueness-assuming strategy matched more than one element
    #[error("{strategy} matched {count} elements, expected exactly one")]
    AmbiguousMatch {
        /// Description of the selection strategy
        strategy: String,
        /// Number of elements matched
        count: usize,
    },

    /// Expected page state was not reached
    #[error("navigation to {destination} failed: {message}")]
    Navigation {
        /// Destination state that was expected
        destination: String,
        /// Error message
        message: String,
    },

    /// A composed operation could not complete
    #[error("{operation} failed: {source}")]
    Interaction {
        /// Name of the page-object operation
        operation: String,
        /// Underlying cause
        #[source]
        source: Box<ConducirError>,
    },

    /// Expected vs. actual mismatch
    #[error("assertion failed: expected {expected:?}, got {actual:?}")]
    Assertion {
        /// Expected value
        expected: String,
        /// Actual value
        actual: String,
    },

    /// Fixture dependency cycle detected
    #[error("fixture dependency cycle: {chain}")]
    FixtureCycle {
        /// The declared chain, e.g. "a -> b -> a"
        chain: String,
    },

    /// Fixture construction or lookup failed
    #[error("fixture '{name}': {message}")]
    Fixture {
        /// Fixture name
        name: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Page handle was used after its owning scenario tore it down
    #[error("page handle is closed")]
    PageClosed,

    /// Browser launch error
    #[error("failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConducirError {
    /// Wrap a lower-level failure in a named operation
    #[must_use]
    pub fn interaction(operation: impl Into<String>, source: Self) -> Self {
        Self::Interaction {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Build an assertion failure from expected and actual values
    #[must_use]
    pub fn assertion(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Assertion {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// The innermost error, unwrapping interaction wrappers
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Interaction { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this error (or its root cause) is a missing-element failure
    #[must_use]
    pub fn is_element_not_found(&self) -> bool {
        matches!(self.root_cause(), Self::ElementNotFound { .. })
    }

    /// Whether this error (or its root cause) is an ambiguity failure
    #[must_use]
    pub fn is_ambiguous_match(&self) -> bool {
        matches!(self.root_cause(), Self::AmbiguousMatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_wraps_cause() {
        let cause = ConducirError::ElementNotFound {
            strategy: "placeholder \"Email\"".to_string(),
            timeout_ms: 100,
        };
        let wrapped = ConducirError::interaction("fill block form", cause);

        assert!(matches!(wrapped, ConducirError::Interaction { .. }));
        assert!(wrapped.is_element_not_found());
        let rendered = wrapped.to_string();
        assert!(rendered.contains("fill block form"));
    }

    #[test]
    fn test_root_cause_unwraps_nested_wrappers() {
        let inner = ConducirError::Timeout { ms: 50 };
        let once = ConducirError::interaction("click submit", inner);
        let twice = ConducirError::interaction("fill inline form", once);

        assert!(matches!(
            twice.root_cause(),
            ConducirError::Timeout { ms: 50 }
        ));
    }

    #[test]
    fn test_assertion_message_shows_both_sides() {
        let err = ConducirError::assertion("Common Datepicker", "Range Datepicker");
        let rendered = err.to_string();
        assert!(rendered.contains("Common Datepicker"));
        assert!(rendered.contains("Range Datepicker"));
    }

    #[test]
    fn test_ambiguous_match_is_not_element_not_found() {
        let err = ConducirError::AmbiguousMatch {
            strategy: "placeholder \"Email\"".to_string(),
            count: 4,
        };
        assert!(err.is_ambiguous_match());
        assert!(!err.is_element_not_found());
    }
}
