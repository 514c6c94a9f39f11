// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the registry, message layer and codecs.

/// Errors returned by dynpb operations.
///
/// Every error is reported at the point of the offending call. A failed
/// mutation never leaves a message or container half-written.
///
/// # Example
///
/// ```rust
/// use dynpb::{DescriptorPool, EnumDecl, Error};
///
/// let pool = DescriptorPool::new();
/// let result = pool.register(vec![], vec![EnumDecl::new("NoZero").value("A", 1)]);
/// match result {
///     Err(Error::InvalidSchema(msg)) => println!("rejected: {}", msg),
///     Err(e) => println!("Other error: {}", e),
///     Ok(()) => println!("Success"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Schema Errors
    // ========================================================================
    /// Descriptor batch rejected at registration time.
    InvalidSchema(String),

    // ========================================================================
    // Name Resolution Errors
    // ========================================================================
    /// Field name not declared on the message.
    UnknownField { message: String, field: String },
    /// Enum symbol not declared on the enum.
    UnknownSymbol { enum_name: String, symbol: String },

    // ========================================================================
    // Value Errors
    // ========================================================================
    /// Value of the wrong kind for the field or container.
    TypeError(String),
    /// Numeric value outside the field's range, or not integral.
    RangeError(String),
    /// Container constructed with a missing or inconsistent element kind.
    ArgumentError(String),

    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// Malformed wire bytes or malformed/unexpected JSON.
    ParseError(String),
    /// Message graph reaches itself (encode, deep copy). Not recoverable by retrying.
    CyclicStructure(String),
    /// Acyclic message graph nested deeper than the configured limit.
    DepthLimitExceeded(usize),
}

impl Error {
    /// True for name-resolution failures (unknown field or enum symbol).
    pub fn is_name_error(&self) -> bool {
        matches!(self, Error::UnknownField { .. } | Error::UnknownSymbol { .. })
    }

    /// True for wire or JSON parse failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::ParseError(_))
    }

    pub(crate) fn unknown_field(message: &str, field: &str) -> Self {
        Error::UnknownField {
            message: message.to_string(),
            field: field.to_string(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidSchema(msg) => write!(f, "Invalid schema: {}", msg),
            Error::UnknownField { message, field } => {
                write!(f, "Unknown field '{}' on message {}", field, message)
            }
            Error::UnknownSymbol { enum_name, symbol } => {
                write!(f, "Unknown symbol '{}' for enum {}", symbol, enum_name)
            }
            Error::TypeError(msg) => write!(f, "Type error: {}", msg),
            Error::RangeError(msg) => write!(f, "Range error: {}", msg),
            Error::ArgumentError(msg) => write!(f, "Argument error: {}", msg),
            Error::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Error::CyclicStructure(msg) => write!(f, "Cyclic message structure: {}", msg),
            Error::DepthLimitExceeded(depth) => {
                write!(f, "Maximum message depth {} exceeded", depth)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(Error::unknown_field("M", "x").is_name_error());
        assert!(Error::UnknownSymbol {
            enum_name: "E".into(),
            symbol: "Q".into()
        }
        .is_name_error());
        assert!(!Error::TypeError("x".into()).is_name_error());
        assert!(Error::ParseError("x".into()).is_parse_error());
    }

    #[test]
    fn test_display() {
        let e = Error::unknown_field("TestMessage", "nope");
        assert_eq!(e.to_string(), "Unknown field 'nope' on message TestMessage");
        assert_eq!(
            Error::DepthLimitExceeded(100).to_string(),
            "Maximum message depth 100 exceeded"
        );
    }
}
