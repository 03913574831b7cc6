#![forbid(unsafe_code)]

//! Runtime error types.

use std::fmt;

/// Failure to hand a message to the push transport.
///
/// The streaming layer never surfaces these to subscribers; they are logged
/// and swallowed, matching the layer's degrade-silently contract.
#[derive(Debug)]
pub enum TransportError {
    /// The transport connection is gone.
    Closed,
    /// The underlying transport rejected the send.
    Send(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "transport closed"),
            Self::Send(msg) => write!(f, "transport send failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(TransportError::Closed.to_string(), "transport closed");
        assert_eq!(
            TransportError::Send("boom".into()).to_string(),
            "transport send failed: boom"
        );
    }
}
