//! Defines the error type returned by fallible `SkipDict` operations.
use std::fmt;

/// The error enum for all fallible operations in skipdict.
///
/// Every operation that returns one of these leaves the map exactly as it was
/// before the call: structural changes only start once the lookup and policy
/// checks have passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDictError {
    /// The requested key is not present. Returned by `get`, `delete` and `pop`.
    NotFound,
    /// The key was rejected by the map's key policy because its kind differs
    /// from (and does not derive from) the kind of the first key inserted.
    ///
    /// Both fields hold the `Debug` rendering of the kinds involved.
    TypeMismatch {
        /// The kind recorded when the map received its first key.
        expected: String,
        /// The kind of the rejected key.
        found: String,
    },
    /// A malformed argument was passed at the API boundary, e.g. a maximum
    /// level of zero or a promotion probability outside `(0, 1)`.
    InvalidArgument(String),
}

impl fmt::Display for SkipDictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipDictError::NotFound => write!(f, "Key not found"),
            SkipDictError::TypeMismatch { expected, found } => {
                write!(
                    f,
                    "Key type mismatch: skipdict keys can't be of different types (expected {}, found {})",
                    expected, found
                )
            }
            SkipDictError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
        }
    }
}

impl std::error::Error for SkipDictError {}
