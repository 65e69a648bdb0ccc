//! Result and error types for Conducir.

use crate::driver::ElementState;
use thiserror::Error;

/// Result type for Conducir operations
pub type ConducirResult<T> = Result<T, ConducirError>;

/// Failure reported by the external browser driver.
///
/// The engine never inspects driver internals; a driver failure is an opaque
/// message that either gets retried (a stale click) or surfaces through
/// [`ConducirError::Driver`].
#[derive(Debug, Clone, Error)]
#[error("Driver error: {message}")]
pub struct DriverError {
    /// Error message
    pub message: String,
}

impl DriverError {
    /// Create a new driver error
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while executing configured operations
#[derive(Debug, Error)]
pub enum ConducirError {
    /// No handler registered for the operation name
    #[error("Unknown operation \"{name}\"")]
    UnknownOperation {
        /// Operation name as it appeared in configuration
        name: String,
    },

    /// A required attribute is absent from the operation
    #[error("Operation {operation} is missing required attribute \"{attribute}\"")]
    MissingAttribute {
        /// Operation name
        operation: String,
        /// Attribute name
        attribute: String,
    },

    /// Mutually exclusive attributes were both supplied
    #[error("Operation {operation} has ambiguous attributes: {detail}")]
    AmbiguousAttribute {
        /// Operation name
        operation: String,
        /// What clashed
        detail: String,
    },

    /// An attribute value failed to parse
    #[error("Attribute \"{attribute}\" is invalid: {message}")]
    InvalidAttribute {
        /// Attribute name
        attribute: String,
        /// Parse failure detail
        message: String,
    },

    /// A bounded wait expired before its condition held
    #[error("Timed out waiting for {condition} on {locator}")]
    Timeout {
        /// Locator being waited on
        locator: String,
        /// Condition that never held
        condition: ElementState,
    },

    /// The click retry loop was exhausted
    #[error("Click on {locator} failed after {attempts} attempts")]
    RetryExhausted {
        /// Locator being clicked
        locator: String,
        /// Attempts made
        attempts: u32,
    },

    /// No enumerated window carried the requested title
    #[error("No window found with title \"{title}\"")]
    WindowNotFound {
        /// Title the operation asked for
        title: String,
    },

    /// A return operation ran with no matching enter on the context stack
    #[error("Context stack is empty: no window or frame to return to")]
    ContextStackEmpty,

    /// The row-correlation regex matched nothing
    #[error("No match for pattern \"{pattern}\" in attribute of {locator}")]
    NoRowMatch {
        /// Secondary element locator
        locator: String,
        /// Regex that failed to match
        pattern: String,
    },

    /// The run was cancelled through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Malformed or unreachable configuration; fatal to the whole run
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Driver-side failure
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error while loading configuration
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error while exporting results
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConducirError {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing-attribute error
    #[must_use]
    pub fn missing_attribute(operation: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            operation: operation.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an invalid-attribute error
    #[must_use]
    pub fn invalid_attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Whether this error should terminate the whole run rather than just
    /// the current test case. Only configuration-load failures qualify;
    /// everything else is a per-case failure.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Io(_) | Self::Yaml(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_operation_display() {
        let err = ConducirError::UnknownOperation {
            name: "Bogus".to_string(),
        };
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_missing_attribute_display() {
        let err = ConducirError::missing_attribute("SelectDropDown", "select-index");
        assert!(err.to_string().contains("SelectDropDown"));
        assert!(err.to_string().contains("select-index"));
    }

    #[test]
    fn test_timeout_names_condition() {
        let err = ConducirError::Timeout {
            locator: "//button".to_string(),
            condition: ElementState::Clickable,
        };
        assert!(err.to_string().contains("clickable"));
        assert!(err.to_string().contains("//button"));
    }

    #[test]
    fn test_only_configuration_errors_are_fatal() {
        assert!(ConducirError::configuration("no such file").is_fatal());
        assert!(!ConducirError::Cancelled.is_fatal());
        assert!(!ConducirError::UnknownOperation {
            name: "X".to_string()
        }
        .is_fatal());
        assert!(!ConducirError::Driver(DriverError::new("stale element")).is_fatal());
    }

    #[test]
    fn test_driver_error_from() {
        let err: ConducirError = DriverError::new("gone").into();
        assert!(err.to_string().contains("gone"));
    }
}
