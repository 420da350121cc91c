//! Error types for the ble-gatt-bridge crate.

use thiserror::Error;

/// The main error type for this crate.
///
/// `Clone` is required so the outcome of a single deduplicated native call
/// can be fanned out to every waiting caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A composite identifier did not have the expected number of
    /// slash-separated segments. Produced locally, before any bridge call
    /// is issued.
    #[error("Invalid instanceId: {id}")]
    InvalidInstanceId {
        /// The identifier that failed validation.
        id: String,
    },

    /// The native bridge reported failure for an issued call. The payload
    /// is forwarded verbatim, with no added context.
    #[error("Native error: {message}")]
    Native {
        /// The raw failure payload from the native side.
        message: String,
    },

    /// A native reply did not have the positional shape the operation
    /// promises (wrong field count or kind).
    #[error("Unexpected reply from {operation}: {context}")]
    UnexpectedReply {
        /// The bridge operation whose reply was malformed.
        operation: &'static str,
        /// Description of what was wrong with the reply.
        context: String,
    },
}

impl Error {
    /// Wrap a raw native failure payload.
    pub(crate) fn native(message: impl Into<String>) -> Self {
        Self::Native {
            message: message.into(),
        }
    }

    /// Reject an identifier that failed its arity check.
    pub(crate) fn invalid_instance_id(id: impl Into<String>) -> Self {
        Self::InvalidInstanceId { id: id.into() }
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_instance_id("abc");
        assert_eq!(err.to_string(), "Invalid instanceId: abc");

        let err = Error::native("gatt failure 133");
        assert_eq!(err.to_string(), "Native error: gatt failure 133");
    }

    #[test]
    fn test_error_clone_for_fanout() {
        let err = Error::native("busy");
        assert_eq!(err.clone(), err);
    }
}
