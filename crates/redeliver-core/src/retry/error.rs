//! Error types for the redelivery policy.

use thiserror::Error;

/// Errors raised by a redelivery policy itself (never by the classified failure).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy was invoked on an exchange that carries no failure, i.e. outside
    /// an exception-handling path. This is a wiring error in the caller.
    #[error("this redelivery policy must be used within an exception control clause")]
    InvalidUsage,
}

/// A failure to reach the target endpoint.
///
/// Hosts raise this (or wrap it as the `source()` of their own error) to mark a
/// failure as connectivity-caused. A `std::io::Error` of kind
/// `ConnectionRefused` is treated the same way.
#[derive(Debug, Error)]
#[error("connection to {target} failed")]
pub struct ConnectError {
    pub target: String,
    #[source]
    pub source: Option<std::io::Error>,
}

impl ConnectError {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: None,
        }
    }

    pub fn with_source(target: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            target: target.into(),
            source: Some(source),
        }
    }
}
