//! VM error types

use crate::value::Value;
use thiserror::Error;

/// VM execution errors
#[derive(Debug, Error)]
pub enum VmError {
    /// Type error (e.g., calling non-function)
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Range error
    #[error("RangeError: {0}")]
    RangeError(String),

    /// Internal error
    #[error("InternalError: {0}")]
    InternalError(String),

    /// Stack overflow
    #[error("RangeError: Maximum call stack size exceeded")]
    StackOverflow,

    /// Thrown JS exception
    #[error("Uncaught exception: {0}")]
    Exception(Box<ThrownValue>),

    /// A proxy operation needed a trap the handler does not supply
    #[error("TypeError: Proxy handler has no '{trap}' trap (required by {operation})")]
    TrapMissing {
        /// Trap name
        trap: &'static str,
        /// Operation that needed the trap
        operation: &'static str,
    },

    /// A trap resolved to a defined value that cannot be called
    #[error("TypeError: Proxy handler trap '{trap}' is not a function (in {operation})")]
    TrapNotCallable {
        /// Trap name
        trap: &'static str,
        /// Operation that invoked the trap
        operation: &'static str,
    },
}

/// A thrown JavaScript value
#[derive(Debug)]
pub struct ThrownValue {
    /// The thrown value
    pub value: Value,
    /// The thrown value (as a string representation)
    pub message: String,
}

impl std::fmt::Display for ThrownValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl VmError {
    /// Create a type error
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a range error
    pub fn range_error(msg: impl Into<String>) -> Self {
        Self::RangeError(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Create an exception from a thrown JS value
    pub fn exception(value: Value) -> Self {
        let message = value.to_display_string();
        Self::Exception(Box::new(ThrownValue { message, value }))
    }

    /// Whether this error belongs to the TypeError class.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::TypeError(_) | Self::TrapMissing { .. } | Self::TrapNotCallable { .. }
        )
    }

    /// The payload of a thrown JS value, if this is one.
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Self::Exception(thrown) => Some(&thrown.value),
            _ => None,
        }
    }
}

impl From<String> for VmError {
    fn from(s: String) -> Self {
        VmError::type_error(s)
    }
}

impl From<&str> for VmError {
    fn from(s: &str) -> Self {
        VmError::type_error(s)
    }
}

/// Result type for VM operations
pub type VmResult<T> = std::result::Result<T, VmError>;
