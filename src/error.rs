//! Error types for tooltip configuration and host toolkit operations.

use thiserror::Error;

use crate::registry::TooltipId;

/// Errors reported by a host toolkit implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolkitError {
    /// The widget handle does not refer to a live widget
    #[error("Widget not found: {0}")]
    UnknownWidget(String),

    /// The toolkit could not create or address a popup window
    #[error("Popup unavailable: {0}")]
    PopupUnavailable(String),

    /// A geometry, screen or pointer query failed
    #[error("Geometry query failed: {0}")]
    Query(String),
}

impl ToolkitError {
    /// Create a query failure with a message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }
}

/// Errors that can occur when configuring or driving a tooltip.
#[derive(Error, Debug)]
pub enum TooltipError {
    /// Option key is not part of the recognized option set
    #[error("Unknown option: \"{key}\"")]
    UnknownOption {
        /// The offending key
        key: String,
    },

    /// Option key is recognized but the value has the wrong shape
    #[error("Invalid value for option \"{key}\": {message}")]
    InvalidValue {
        /// The option key
        key: String,
        /// Why the value was rejected
        message: String,
    },

    /// Registry handle does not refer to an attached tooltip
    #[error("Unknown tooltip: {0}")]
    UnknownTooltip(TooltipId),

    /// JSON parsing or serialization error
    #[error("Failed to parse tooltip options: {0}")]
    Parse(#[from] serde_json::Error),

    /// Host toolkit failure
    #[error("Toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),
}

impl TooltipError {
    /// Create an unknown option error.
    pub fn unknown_option(key: impl Into<String>) -> Self {
        Self::UnknownOption { key: key.into() }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TooltipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_message_names_key() {
        let err = TooltipError::unknown_option("foo");
        assert_eq!(err.to_string(), "Unknown option: \"foo\"");
    }

    #[test]
    fn test_toolkit_error_converts() {
        let err: TooltipError = ToolkitError::query("no screen").into();
        assert!(matches!(err, TooltipError::Toolkit(ToolkitError::Query(_))));
        assert_eq!(
            err.to_string(),
            "Toolkit error: Geometry query failed: no screen"
        );
    }
}
